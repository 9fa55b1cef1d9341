pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::{PeriodSlice, PeriodSnapshot, Summary},
    book::JournalBook,
    entry::{Entry, EntrySortOrder},
    journal::Journal,
    settings::Settings,
};
use services::{
    analytics_service::AnalyticsService,
    export_service,
    journal_service::JournalService,
    period_service::{PeriodFilter, PeriodService},
    sample_service,
};
use storage::manager::StorageManager;

/// Upper bound for `Settings::entries_per_page`.
const MAX_ENTRIES_PER_PAGE: usize = 500;

/// Main entry point for the trade journal core library.
/// Holds the journal book and the services that operate on it.
///
/// Entry operations act on the active journal.
#[must_use]
pub struct TradeJournal {
    book: JournalBook,
    journal_service: JournalService,
    analytics_service: AnalyticsService,
    period_service: PeriodService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for TradeJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeJournal")
            .field("journals", &self.book.journals.len())
            .field("entries", &self.book.total_entries())
            .field("active_journal", &self.book.active_journal)
            .field("settings", &self.book.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl TradeJournal {
    /// Create an empty journal book with default settings.
    pub fn create_new() -> Self {
        Self::build(JournalBook::default())
    }

    /// Wrap an existing journal book (e.g. one read by the host application).
    pub fn from_book(book: JournalBook) -> Self {
        Self::build(book)
    }

    /// Load a journal book from encrypted bytes (access code required).
    /// Use this for WASM / desktop shells where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], access_code: &str) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_bytes(encrypted, access_code)?;
        Ok(Self::build(book))
    }

    /// Save the journal book to encrypted bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, access_code: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.book, access_code)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, access_code: &str) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_file(path, access_code)?;
        Ok(Self::build(book))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, access_code: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.book, path, access_code)?;
        self.dirty = false;
        Ok(())
    }

    /// The underlying journal book.
    #[must_use]
    pub fn book(&self) -> &JournalBook {
        &self.book
    }

    // ── Journals ────────────────────────────────────────────────────

    /// Create a journal with the given starting capital.
    /// The first journal created becomes the active one.
    pub fn create_journal(&mut self, name: &str, initial_capital: f64) -> Result<Uuid, CoreError> {
        let id = self
            .journal_service
            .create_journal(&mut self.book, name, initial_capital)?;
        self.dirty = true;
        Ok(id)
    }

    /// Create a journal using the default starting capital from settings.
    pub fn create_journal_with_default_capital(&mut self, name: &str) -> Result<Uuid, CoreError> {
        let capital = self.book.settings.default_initial_capital;
        self.create_journal(name, capital)
    }

    pub fn rename_journal(&mut self, journal_id: Uuid, name: &str) -> Result<(), CoreError> {
        self.journal_service
            .rename_journal(&mut self.book, journal_id, name)?;
        self.dirty = true;
        Ok(())
    }

    /// Change a journal's starting capital. Analytics pick it up on the next summary.
    pub fn set_initial_capital(&mut self, journal_id: Uuid, initial_capital: f64) -> Result<(), CoreError> {
        self.journal_service
            .set_initial_capital(&mut self.book, journal_id, initial_capital)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete a journal with all its entries and trash.
    pub fn delete_journal(&mut self, journal_id: Uuid) -> Result<Journal, CoreError> {
        let removed = self.journal_service.delete_journal(&mut self.book, journal_id)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn set_active_journal(&mut self, journal_id: Uuid) -> Result<(), CoreError> {
        self.journal_service.set_active(&mut self.book, journal_id)?;
        self.dirty = true;
        Ok(())
    }

    /// The journal entry operations act on, if any.
    #[must_use]
    pub fn active_journal(&self) -> Option<&Journal> {
        self.book
            .active_journal
            .and_then(|id| self.book.journal(id))
    }

    #[must_use]
    pub fn get_journal(&self, journal_id: Uuid) -> Option<&Journal> {
        self.book.journal(journal_id)
    }

    /// All journals in creation order.
    #[must_use]
    pub fn get_journals(&self) -> &[Journal] {
        &self.book.journals
    }

    // ── Entry Management ────────────────────────────────────────────

    /// Log a day's result in the active journal.
    pub fn add_entry(
        &mut self,
        date: NaiveDate,
        gross_pnl: f64,
        taxes_and_charges: f64,
        capital_deployed: f64,
    ) -> Result<Uuid, CoreError> {
        self.insert_entry(Entry::new(date, gross_pnl, taxes_and_charges, capital_deployed))
    }

    /// Log a day's result with notes attached.
    pub fn add_entry_with_notes(
        &mut self,
        date: NaiveDate,
        gross_pnl: f64,
        taxes_and_charges: f64,
        capital_deployed: f64,
        notes: impl Into<String>,
    ) -> Result<Uuid, CoreError> {
        self.insert_entry(Entry::with_notes(
            date,
            gross_pnl,
            taxes_and_charges,
            capital_deployed,
            notes,
        ))
    }

    /// Update an existing entry in the active journal.
    pub fn update_entry(
        &mut self,
        entry_id: Uuid,
        date: NaiveDate,
        gross_pnl: f64,
        taxes_and_charges: f64,
        capital_deployed: f64,
    ) -> Result<(), CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        self.journal_service.update_entry(
            journal,
            entry_id,
            date,
            gross_pnl,
            taxes_and_charges,
            capital_deployed,
        )?;
        self.dirty = true;
        Ok(())
    }

    /// Set or clear notes on an entry of the active journal.
    pub fn set_entry_notes(&mut self, entry_id: Uuid, notes: Option<String>) -> Result<(), CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        self.journal_service.set_notes(journal, entry_id, notes)?;
        self.dirty = true;
        Ok(())
    }

    /// Permanently remove an entry from the active journal.
    pub fn remove_entry(&mut self, entry_id: Uuid) -> Result<Entry, CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        let removed = self.journal_service.remove_entry(journal, entry_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Remove every entry of the active journal. Returns how many were removed.
    pub fn clear_entries(&mut self) -> Result<usize, CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        let count = self.journal_service.clear_entries(journal);
        if count > 0 {
            log::info!("Cleared {count} entries from journal {}", journal.id);
            self.dirty = true;
        }
        Ok(count)
    }

    /// Add several entries to the active journal. All entries are validated
    /// first; if any fails, none are added (all-or-nothing).
    pub fn add_entries(&mut self, entries: Vec<Entry>) -> Result<Vec<Uuid>, CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        let mut staged = journal.clone();
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            ids.push(entry.id);
            self.journal_service.add_entry(&mut staged, entry)?;
        }

        *journal = staged;
        self.dirty = true;
        Ok(ids)
    }

    /// Get a single entry of the active journal by id.
    #[must_use]
    pub fn get_entry(&self, entry_id: Uuid) -> Option<&Entry> {
        self.active_journal().and_then(|j| j.entry(entry_id))
    }

    // ── Undo (Trash) ────────────────────────────────────────────────

    /// Remove an entry and keep it in the journal's trash for undo.
    pub fn remove_entry_to_trash(&mut self, entry_id: Uuid) -> Result<Entry, CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        let entry = self.journal_service.remove_entry(journal, entry_id)?;
        journal.trash.push(entry.clone());
        self.dirty = true;
        Ok(entry)
    }

    /// Restore the most recently trashed entry of the active journal.
    /// Returns `None` if the trash is empty.
    pub fn undo_last_removal(&mut self) -> Result<Option<Entry>, CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        let entry = match journal.trash.pop() {
            Some(e) => e,
            None => return Ok(None),
        };

        if let Err(e) = self.journal_service.add_entry(journal, entry.clone()) {
            journal.trash.push(entry);
            return Err(e);
        }
        self.dirty = true;
        Ok(Some(entry))
    }

    /// Entries currently in the active journal's trash.
    #[must_use]
    pub fn get_trash(&self) -> &[Entry] {
        self.active_journal()
            .map(|j| j.trash.as_slice())
            .unwrap_or_default()
    }

    /// Permanently discard the active journal's trash.
    pub fn clear_trash(&mut self) -> Result<(), CoreError> {
        let journal = Self::active_in(&mut self.book)?;
        if !journal.trash.is_empty() {
            journal.trash.clear();
            self.dirty = true;
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Entries of the active journal, newest first.
    #[must_use]
    pub fn get_entries(&self) -> Vec<&Entry> {
        self.get_entries_sorted(&EntrySortOrder::DateDesc)
    }

    /// Entries of the active journal in the requested order.
    /// Ties keep insertion order.
    #[must_use]
    pub fn get_entries_sorted(&self, order: &EntrySortOrder) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.active_entries().iter().collect();
        match order {
            EntrySortOrder::DateDesc => entries.sort_by(|a, b| b.date.cmp(&a.date)),
            EntrySortOrder::DateAsc => entries.sort_by(|a, b| a.date.cmp(&b.date)),
            EntrySortOrder::NetPnlDesc => entries.sort_by(|a, b| b.net_pnl().total_cmp(&a.net_pnl())),
            EntrySortOrder::NetPnlAsc => entries.sort_by(|a, b| a.net_pnl().total_cmp(&b.net_pnl())),
            EntrySortOrder::CapitalDesc => {
                entries.sort_by(|a, b| b.capital_deployed.total_cmp(&a.capital_deployed))
            }
        }
        entries
    }

    /// Entries within a date range (inclusive), newest first.
    #[must_use]
    pub fn get_entries_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Entry> {
        self.get_entries()
            .into_iter()
            .filter(|e| e.date >= from && e.date <= to)
            .collect()
    }

    /// Search notes, weekday name and ISO date (case-insensitive), newest first.
    #[must_use]
    pub fn search_entries(&self, query: &str) -> Vec<&Entry> {
        let q = query.trim().to_lowercase();
        self.get_entries()
            .into_iter()
            .filter(|e| {
                e.notes.as_deref().unwrap_or("").to_lowercase().contains(&q)
                    || e.day_name().to_lowercase().contains(&q)
                    || e.date.to_string().contains(&q)
            })
            .collect()
    }

    /// One page of entries, newest first. `page` is zero-based.
    #[must_use]
    pub fn get_entries_page(&self, page: usize) -> Vec<&Entry> {
        let per_page = self.book.settings.entries_per_page.max(1);
        self.get_entries()
            .into_iter()
            .skip(page.saturating_mul(per_page))
            .take(per_page)
            .collect()
    }

    /// Number of pages needed to list every entry of the active journal.
    #[must_use]
    pub fn page_count(&self) -> usize {
        let per_page = self.book.settings.entries_per_page.max(1);
        self.entry_count().div_ceil(per_page)
    }

    /// Number of entries in the active journal.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.active_entries().len()
    }

    #[must_use]
    pub fn earliest_entry_date(&self) -> Option<NaiveDate> {
        self.active_entries().iter().map(|e| e.date).min()
    }

    #[must_use]
    pub fn latest_entry_date(&self) -> Option<NaiveDate> {
        self.active_entries().iter().map(|e| e.date).max()
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Full analytics for the active journal, recomputed from scratch.
    pub fn summary(&self) -> Result<Summary, CoreError> {
        let journal = self.active_journal().ok_or(CoreError::NoActiveJournal)?;
        Ok(self.summarize(journal))
    }

    /// Full analytics for any journal in the book.
    pub fn summary_for(&self, journal_id: Uuid) -> Result<Summary, CoreError> {
        let journal = self.journal_service.journal(&self.book, journal_id)?;
        Ok(self.summarize(journal))
    }

    /// "Today's performance" for the active journal.
    pub fn today_slice(&self, today: NaiveDate) -> Result<PeriodSlice, CoreError> {
        let summary = self.summary()?;
        Ok(self.period_service.today(&summary, today))
    }

    /// "This month's performance" for the active journal.
    pub fn month_slice(&self, year: i32, month: u32) -> Result<PeriodSlice, CoreError> {
        let summary = self.summary()?;
        Ok(self.period_service.month(&summary, year, month))
    }

    /// Labelled slice of the active journal for share cards.
    pub fn period_snapshot(&self, filter: PeriodFilter) -> Result<PeriodSnapshot, CoreError> {
        let journal = self.active_journal().ok_or(CoreError::NoActiveJournal)?;
        let summary = self.summarize(journal);
        Ok(self.period_service.snapshot(
            &summary,
            filter,
            &journal.name,
            &self.book.settings.currency,
        ))
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.book.settings
    }

    /// Set the journal currency (3 ASCII letters, e.g. "INR", "USD").
    pub fn set_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., INR, USD)"
            )));
        }
        self.book.settings.currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    pub fn set_default_initial_capital(&mut self, capital: f64) -> Result<(), CoreError> {
        if !capital.is_finite() || capital < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Default initial capital must be a non-negative number, got {capital}"
            )));
        }
        self.book.settings.default_initial_capital = capital;
        self.dirty = true;
        Ok(())
    }

    pub fn set_entries_per_page(&mut self, per_page: usize) -> Result<(), CoreError> {
        if !(1..=MAX_ENTRIES_PER_PAGE).contains(&per_page) {
            return Err(CoreError::ValidationError(format!(
                "Entries per page must be between 1 and {MAX_ENTRIES_PER_PAGE}, got {per_page}"
            )));
        }
        self.book.settings.entries_per_page = per_page;
        self.dirty = true;
        Ok(())
    }

    // ── Access Code & Dirty State ───────────────────────────────────

    /// Re-encrypt the journal book under a new access code.
    ///
    /// `last_saved_bytes` must be the most recently saved encrypted bytes;
    /// the current access code is verified by decrypting them. If
    /// verification fails, returns `CoreError::Decryption`.
    pub fn change_access_code(
        &mut self,
        last_saved_bytes: &[u8],
        current_access_code: &str,
        new_access_code: &str,
    ) -> Result<Vec<u8>, CoreError> {
        StorageManager::load_from_bytes(last_saved_bytes, current_access_code)?;
        let new_bytes = StorageManager::save_to_bytes(&self.book, new_access_code)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    /// Returns `true` if the journal book has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Sample Data ─────────────────────────────────────────────────

    /// Create a "Sample Journal" filled with generated demo entries and make
    /// it active. The same seed always yields the same entries.
    pub fn load_sample_data(&mut self, seed: u64) -> Result<Uuid, CoreError> {
        let capital = self.book.settings.default_initial_capital;
        let count = self.book.settings.sample_entry_count;
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .ok_or_else(|| CoreError::ValidationError("Invalid sample start date".into()))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let entries = sample_service::generate_sample_entries(&mut rng, count, start, capital);

        let mut staged = self.book.clone();
        let id = self
            .journal_service
            .create_journal(&mut staged, "Sample Journal", capital)?;
        let journal = self.journal_service.journal_mut(&mut staged, id)?;
        for entry in entries {
            self.journal_service.add_entry(journal, entry)?;
        }
        staged.active_journal = Some(id);

        self.book = staged;
        self.dirty = true;
        Ok(id)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the active journal's entries as CSV, newest first.
    /// Columns: id, date, day, gross_pnl, taxes_and_charges, net_pnl, capital_deployed, notes
    pub fn export_entries_to_csv(&self) -> Result<String, CoreError> {
        export_service::entries_to_csv(self.active_entries())
    }

    /// Export the active journal's entries as JSON.
    pub fn export_entries_to_json(&self) -> Result<String, CoreError> {
        export_service::entries_to_json(self.active_entries())
    }

    /// Import entries from a JSON array into the active journal.
    /// Amounts are coerced; the import is all-or-nothing.
    /// Returns the number of entries imported.
    pub fn import_entries_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let entries = export_service::entries_from_json(json).inspect_err(|e| {
            log::warn!("Rejected JSON import: {e}");
        })?;
        let count = entries.len();
        self.add_entries(entries)?;
        Ok(count)
    }

    /// Import entries from CSV (as produced by `export_entries_to_csv`)
    /// into the active journal. All-or-nothing.
    pub fn import_entries_from_csv(&mut self, csv: &str) -> Result<usize, CoreError> {
        let entries = export_service::entries_from_csv(csv)?
            .into_iter()
            .map(export_service::CsvEntryRow::into_entry)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| log::warn!("Rejected CSV import: {e}"))?;
        let count = entries.len();
        self.add_entries(entries)?;
        Ok(count)
    }

    /// The active journal's summary as pretty JSON.
    pub fn summary_to_json(&self) -> Result<String, CoreError> {
        export_service::summary_to_json(&self.summary()?)
    }

    /// The whole journal book as JSON (unencrypted snapshot for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.book)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal book: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(book: JournalBook) -> Self {
        Self {
            book,
            journal_service: JournalService::new(),
            analytics_service: AnalyticsService::new(),
            period_service: PeriodService::new(),
            dirty: false,
        }
    }

    fn summarize(&self, journal: &Journal) -> Summary {
        log::debug!("Summarizing journal {}", journal.id);
        self.analytics_service
            .compute_summary(&journal.entries, journal.initial_capital)
    }

    fn insert_entry(&mut self, entry: Entry) -> Result<Uuid, CoreError> {
        let id = entry.id;
        let journal = Self::active_in(&mut self.book)?;
        self.journal_service.add_entry(journal, entry)?;
        self.dirty = true;
        Ok(id)
    }

    fn active_entries(&self) -> &[Entry] {
        self.active_journal()
            .map(|j| j.entries.as_slice())
            .unwrap_or_default()
    }

    /// Active journal of `book`. Takes the book rather than `self` so callers
    /// can still use the services while holding the journal.
    fn active_in(book: &mut JournalBook) -> Result<&mut Journal, CoreError> {
        let id = book.active_journal.ok_or(CoreError::NoActiveJournal)?;
        book.journal_mut(id)
            .ok_or_else(|| CoreError::JournalNotFound(id.to_string()))
    }
}
