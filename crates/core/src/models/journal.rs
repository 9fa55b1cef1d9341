use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::Entry;

/// A named trading journal with its own starting capital.
///
/// Entries are kept in insertion order. Anything order-sensitive
/// (the analytics engine, listings) sorts its own view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier
    pub id: Uuid,

    /// Display name (e.g., "Options", "Swing")
    pub name: String,

    /// Capital in effect before the first entry
    pub initial_capital: f64,

    /// Day the journal was created
    pub created_at: NaiveDate,

    /// Logged entries, insertion order
    pub entries: Vec<Entry>,

    /// Entries that have been removed but can be restored (undo support).
    #[serde(default)]
    pub trash: Vec<Entry>,
}

impl Journal {
    pub fn new(name: impl Into<String>, initial_capital: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_capital,
            created_at: Utc::now().date_naive(),
            entries: Vec::new(),
            trash: Vec::new(),
        }
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn entry(&self, entry_id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}
