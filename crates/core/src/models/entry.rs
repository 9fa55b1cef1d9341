use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreError;

/// Weekday names in Sunday-first order, indexed by `num_days_from_sunday()`.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Sort order for entry listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySortOrder {
    /// Newest date first (default for display)
    DateDesc,
    /// Oldest date first
    DateAsc,
    /// Largest net P&L first
    NetPnlDesc,
    /// Smallest (most negative) net P&L first
    NetPnlAsc,
    /// Largest capital deployed first
    CapitalDesc,
}

/// One logged trading day.
///
/// `capital_deployed` is the account balance in effect on `date`, not a delta.
/// A change between two consecutive (date-sorted) entries is read by the
/// analytics engine as a deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier
    pub id: Uuid,

    /// Trading date (daily granularity, no time component)
    pub date: NaiveDate,

    /// Profit (+) or loss (−) before charges
    pub gross_pnl: f64,

    /// Brokerage, taxes and fees; always subtracted
    pub taxes_and_charges: f64,

    /// Capital balance as of this date
    pub capital_deployed: f64,

    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entry {
    pub fn new(date: NaiveDate, gross_pnl: f64, taxes_and_charges: f64, capital_deployed: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            gross_pnl,
            taxes_and_charges,
            capital_deployed,
            notes: None,
        }
    }

    /// Create an entry with notes attached.
    pub fn with_notes(
        date: NaiveDate,
        gross_pnl: f64,
        taxes_and_charges: f64,
        capital_deployed: f64,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::new(date, gross_pnl, taxes_and_charges, capital_deployed)
        }
    }

    /// Gross P&L minus taxes and charges, with non-finite fields read as zero.
    /// Saturates at `±f64::MAX`.
    #[must_use]
    pub fn net_pnl(&self) -> f64 {
        saturating_sub(
            coerce_amount(self.gross_pnl),
            coerce_amount(self.taxes_and_charges),
        )
    }

    /// Full English weekday name of the entry date (e.g. "Monday").
    #[must_use]
    pub fn day_name(&self) -> &'static str {
        day_name(self.date)
    }
}

/// Full English weekday name for a date.
#[must_use]
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

// ── Coercion ────────────────────────────────────────────────────────

/// Read an amount as a usable number: NaN and ±∞ become `0.0`.
#[inline]
#[must_use]
pub fn coerce_amount(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Clamp an overflowed result back into the finite range. NaN becomes `0.0`.
#[inline]
#[must_use]
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

/// `a + b` for finite amounts, saturating at `±f64::MAX` instead of
/// overflowing to infinity.
#[inline]
#[must_use]
pub fn saturating_add(a: f64, b: f64) -> f64 {
    saturate(a + b)
}

/// `a - b` for finite amounts, saturating at `±f64::MAX`.
#[inline]
#[must_use]
pub fn saturating_sub(a: f64, b: f64) -> f64 {
    saturate(a - b)
}

/// Read a loosely-typed JSON amount as a number.
///
/// Numbers pass through, numeric strings are parsed, anything else
/// (null, bool, empty or garbage strings, arrays, objects) becomes `0.0`.
#[must_use]
pub fn coerce_json_amount(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    coerce_amount(raw)
}

/// An entry as it arrives from an external document or import file.
///
/// Amount fields are untyped; `into_entry` coerces them. Accepts both
/// snake_case and camelCase field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: Option<String>,

    pub date: String,

    #[serde(default, alias = "grossPnl")]
    pub gross_pnl: Value,

    #[serde(default, alias = "taxesAndCharges")]
    pub taxes_and_charges: Value,

    #[serde(default, alias = "capitalDeployed")]
    pub capital_deployed: Value,

    #[serde(default)]
    pub notes: Option<String>,
}

impl RawEntry {
    /// Convert into a typed `Entry`.
    ///
    /// Only the date can be rejected. A missing or non-UUID id is replaced
    /// with a fresh one.
    pub fn into_entry(self) -> Result<Entry, CoreError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            CoreError::ValidationError(format!("Invalid entry date '{}': {e}", self.date))
        })?;

        let id = match self.id.as_deref().map(str::trim) {
            Some(s) => Uuid::parse_str(s).unwrap_or_else(|_| {
                log::warn!("Entry id '{s}' is not a UUID, assigning a new one");
                Uuid::new_v4()
            }),
            None => Uuid::new_v4(),
        };

        for (field, value) in [
            ("gross_pnl", &self.gross_pnl),
            ("taxes_and_charges", &self.taxes_and_charges),
            ("capital_deployed", &self.capital_deployed),
        ] {
            if !is_numeric(value) {
                log::warn!("Entry on {date}: field {field} is not numeric, reading it as 0");
            }
        }

        Ok(Entry {
            id,
            date,
            gross_pnl: coerce_json_amount(&self.gross_pnl),
            taxes_and_charges: coerce_json_amount(&self.taxes_and_charges),
            capital_deployed: coerce_json_amount(&self.capital_deployed),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}
