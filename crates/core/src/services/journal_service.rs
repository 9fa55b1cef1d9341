use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::book::JournalBook;
use crate::models::entry::Entry;
use crate::models::journal::Journal;

/// Maximum length of a journal name, in characters.
pub const MAX_JOURNAL_NAME_LEN: usize = 100;

/// Manages journals and their entries inside a `JournalBook`.
///
/// Pure business logic, no I/O. Validation lives here so that only
/// well-formed entries reach the analytics engine.
pub struct JournalService;

impl JournalService {
    pub fn new() -> Self {
        Self
    }

    // ── Journals ────────────────────────────────────────────────────

    /// Create a journal. The first journal in a book becomes the active one.
    pub fn create_journal(
        &self,
        book: &mut JournalBook,
        name: &str,
        initial_capital: f64,
    ) -> Result<Uuid, CoreError> {
        let name = Self::validate_name(name)?;
        Self::validate_initial_capital(initial_capital)?;

        let journal = Journal::new(name, initial_capital);
        let id = journal.id;
        book.journals.push(journal);
        if book.active_journal.is_none() {
            book.active_journal = Some(id);
        }
        log::info!("Created journal {id}");
        Ok(id)
    }

    pub fn rename_journal(
        &self,
        book: &mut JournalBook,
        journal_id: Uuid,
        name: &str,
    ) -> Result<(), CoreError> {
        let name = Self::validate_name(name)?;
        self.journal_mut(book, journal_id)?.name = name;
        Ok(())
    }

    pub fn set_initial_capital(
        &self,
        book: &mut JournalBook,
        journal_id: Uuid,
        initial_capital: f64,
    ) -> Result<(), CoreError> {
        Self::validate_initial_capital(initial_capital)?;
        self.journal_mut(book, journal_id)?.initial_capital = initial_capital;
        Ok(())
    }

    /// Delete a journal and all of its entries.
    /// If it was active, the first remaining journal becomes active.
    pub fn delete_journal(
        &self,
        book: &mut JournalBook,
        journal_id: Uuid,
    ) -> Result<Journal, CoreError> {
        let idx = book
            .journals
            .iter()
            .position(|j| j.id == journal_id)
            .ok_or_else(|| CoreError::JournalNotFound(journal_id.to_string()))?;

        let removed = book.journals.remove(idx);
        if book.active_journal == Some(journal_id) {
            book.active_journal = book.journals.first().map(|j| j.id);
        }
        log::info!(
            "Deleted journal {journal_id} ({} entries)",
            removed.entries.len()
        );
        Ok(removed)
    }

    pub fn set_active(&self, book: &mut JournalBook, journal_id: Uuid) -> Result<(), CoreError> {
        self.journal(book, journal_id)?;
        book.active_journal = Some(journal_id);
        Ok(())
    }

    pub fn journal<'a>(&self, book: &'a JournalBook, journal_id: Uuid) -> Result<&'a Journal, CoreError> {
        book.journal(journal_id)
            .ok_or_else(|| CoreError::JournalNotFound(journal_id.to_string()))
    }

    pub fn journal_mut<'a>(
        &self,
        book: &'a mut JournalBook,
        journal_id: Uuid,
    ) -> Result<&'a mut Journal, CoreError> {
        book.journal_mut(journal_id)
            .ok_or_else(|| CoreError::JournalNotFound(journal_id.to_string()))
    }

    // ── Entries ─────────────────────────────────────────────────────

    /// Append a validated entry to a journal (insertion order is kept).
    pub fn add_entry(&self, journal: &mut Journal, entry: Entry) -> Result<(), CoreError> {
        Self::validate_entry(&entry)?;
        if journal.entries.iter().any(|e| e.id == entry.id) {
            return Err(CoreError::ValidationError(format!(
                "Entry {} already exists in journal '{}'",
                entry.id, journal.name
            )));
        }
        journal.entries.push(entry);
        Ok(())
    }

    /// Replace an entry's amounts and date. The id and notes are kept.
    pub fn update_entry(
        &self,
        journal: &mut Journal,
        entry_id: Uuid,
        date: NaiveDate,
        gross_pnl: f64,
        taxes_and_charges: f64,
        capital_deployed: f64,
    ) -> Result<(), CoreError> {
        let entry = journal
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))?;

        let updated = Entry {
            id: entry.id,
            date,
            gross_pnl,
            taxes_and_charges,
            capital_deployed,
            notes: entry.notes.clone(),
        };
        Self::validate_entry(&updated)?;

        *entry = updated;
        Ok(())
    }

    /// Set or clear the notes on an existing entry.
    pub fn set_notes(
        &self,
        journal: &mut Journal,
        entry_id: Uuid,
        notes: Option<String>,
    ) -> Result<(), CoreError> {
        let entry = journal
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))?;
        entry.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    /// Remove an entry by id and return it.
    pub fn remove_entry(&self, journal: &mut Journal, entry_id: Uuid) -> Result<Entry, CoreError> {
        let idx = journal
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))?;
        Ok(journal.entries.remove(idx))
    }

    /// Remove every entry from a journal. Returns how many were removed.
    pub fn clear_entries(&self, journal: &mut Journal) -> usize {
        let count = journal.entries.len();
        journal.entries.clear();
        count
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Validate an entry before it is stored.
    ///
    /// Rules:
    /// - Gross P&L must be a finite number
    /// - Taxes & charges must be finite and non-negative
    /// - Capital deployed must be finite and positive
    /// - Date may be at most one day in the future (timezone tolerance)
    pub fn validate_entry(entry: &Entry) -> Result<(), CoreError> {
        if !entry.gross_pnl.is_finite() {
            return Err(CoreError::ValidationError(
                "Gross P&L must be a number".into(),
            ));
        }
        if !entry.taxes_and_charges.is_finite() || entry.taxes_and_charges < 0.0 {
            return Err(CoreError::ValidationError(
                "Taxes & charges must be a non-negative number".into(),
            ));
        }
        if !entry.capital_deployed.is_finite() || entry.capital_deployed <= 0.0 {
            return Err(CoreError::ValidationError(
                "Capital deployed must be a positive number".into(),
            ));
        }

        let today = Utc::now().date_naive();
        if let Some(tomorrow) = today.succ_opt() {
            if entry.date > tomorrow {
                return Err(CoreError::ValidationError(format!(
                    "Entry date {} is in the future",
                    entry.date
                )));
            }
        }

        Ok(())
    }

    fn validate_name(name: &str) -> Result<String, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Journal name must not be empty".into(),
            ));
        }
        if trimmed.chars().count() > MAX_JOURNAL_NAME_LEN {
            return Err(CoreError::ValidationError(format!(
                "Journal name exceeds {MAX_JOURNAL_NAME_LEN} characters"
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate_initial_capital(initial_capital: f64) -> Result<(), CoreError> {
        if !initial_capital.is_finite() || initial_capital < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Initial capital must be a non-negative number, got {initial_capital}"
            )));
        }
        Ok(())
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}
