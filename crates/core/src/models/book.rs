use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::journal::Journal;
use super::settings::Settings;

/// The main data container. Everything in here gets serialized,
/// encrypted under the user's access code, and saved to a portable .tjnl file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalBook {
    /// All journals, in creation order
    pub journals: Vec<Journal>,

    /// User settings (currency, defaults, paging)
    pub settings: Settings,

    /// Journal that facade operations act on
    #[serde(default)]
    pub active_journal: Option<Uuid>,
}

impl JournalBook {
    /// Look up a journal by id.
    #[must_use]
    pub fn journal(&self, journal_id: Uuid) -> Option<&Journal> {
        self.journals.iter().find(|j| j.id == journal_id)
    }

    /// Mutable lookup of a journal by id.
    pub fn journal_mut(&mut self, journal_id: Uuid) -> Option<&mut Journal> {
        self.journals.iter_mut().find(|j| j.id == journal_id)
    }

    /// Total number of entries across every journal.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.journals.iter().map(|j| j.entries.len()).sum()
    }
}
