use serde::{Deserialize, Serialize};

/// Default starting capital for new journals.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 500_000.0;

/// Default number of entries shown per page in listings.
pub const DEFAULT_ENTRIES_PER_PAGE: usize = 20;

/// User-configurable settings, stored inside the encrypted journal book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency all amounts are recorded in (e.g., "INR", "USD").
    pub currency: String,

    /// Starting capital offered when a new journal is created.
    pub default_initial_capital: f64,

    /// Page size for entry listings.
    pub entries_per_page: usize,

    /// Number of entries generated when loading sample data.
    pub sample_entry_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            default_initial_capital: DEFAULT_INITIAL_CAPITAL,
            entries_per_page: DEFAULT_ENTRIES_PER_PAGE,
            sample_entry_count: 250,
        }
    }
}
