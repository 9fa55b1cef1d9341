use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::analytics::Summary;
use crate::models::entry::{Entry, RawEntry};

/// CSV header written by `entries_to_csv` and expected by `entries_from_csv`.
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "date",
    "day",
    "gross_pnl",
    "taxes_and_charges",
    "net_pnl",
    "capital_deployed",
    "notes",
];

/// One row of an exported journal CSV, as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvEntryRow {
    pub id: String,
    pub date: String,
    pub day: String,
    pub gross_pnl: String,
    pub taxes_and_charges: String,
    /// Net P&L with two decimals; informational on import
    pub net_pnl: String,
    pub capital_deployed: String,
    #[serde(default)]
    pub notes: String,
}

impl CsvEntryRow {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            date: entry.date.format("%Y-%m-%d").to_string(),
            day: entry.day_name().to_string(),
            gross_pnl: entry.gross_pnl.to_string(),
            taxes_and_charges: entry.taxes_and_charges.to_string(),
            net_pnl: format!("{:.2}", entry.net_pnl()),
            capital_deployed: entry.capital_deployed.to_string(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }

    /// Convert back into an `Entry`, coercing amounts the same way JSON
    /// imports do. The `day` and `net_pnl` columns are derived and ignored.
    pub fn into_entry(self) -> Result<Entry, CoreError> {
        RawEntry {
            id: Some(self.id).filter(|id| !id.trim().is_empty()),
            date: self.date,
            gross_pnl: Value::String(self.gross_pnl),
            taxes_and_charges: Value::String(self.taxes_and_charges),
            capital_deployed: Value::String(self.capital_deployed),
            notes: Some(self.notes),
        }
        .into_entry()
    }
}

/// Export entries as CSV, newest first.
pub fn entries_to_csv(entries: &[Entry]) -> Result<String, CoreError> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    // Header is written explicitly so an empty journal still exports one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for entry in sorted {
        wtr.serialize(CsvEntryRow::from_entry(entry))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| CoreError::Csv(format!("Failed to flush CSV writer: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CoreError::Serialization(format!("CSV output is not UTF-8: {e}")))
}

/// Parse CSV produced by `entries_to_csv` (header required).
pub fn entries_from_csv(data: &str) -> Result<Vec<CsvEntryRow>, CoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(data.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(CoreError::Csv(format!(
            "Unexpected CSV header: expected '{}'",
            CSV_HEADER.join(",")
        )));
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Export entries as pretty JSON, in stored order.
pub fn entries_to_json(entries: &[Entry]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(entries)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize entries to JSON: {e}")))
}

/// Parse a JSON array of loosely-typed entries, coercing amounts.
pub fn entries_from_json(json: &str) -> Result<Vec<Entry>, CoreError> {
    let raw: Vec<RawEntry> = serde_json::from_str(json)?;
    raw.into_iter().map(RawEntry::into_entry).collect()
}

/// Serialize a summary for the presentation layer.
pub fn summary_to_json(summary: &Summary) -> Result<String, CoreError> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize summary: {e}")))
}
