use chrono::{Datelike, NaiveDate};

use crate::models::analytics::{DailyPnlPoint, PeriodSlice, PeriodSnapshot, Summary};
use crate::models::entry::{coerce_amount, saturating_add};

/// Which part of the daily series a slice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    /// Every day in the series
    All,
    /// A single calendar day
    Day(NaiveDate),
    /// A calendar month (1-based `month`)
    Month { year: i32, month: u32 },
    /// Inclusive date range
    Range { from: NaiveDate, to: NaiveDate },
}

impl PeriodFilter {
    #[must_use]
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            PeriodFilter::All => true,
            PeriodFilter::Day(day) => date == day,
            PeriodFilter::Month { year, month } => date.year() == year && date.month() == month,
            PeriodFilter::Range { from, to } => date >= from && date <= to,
        }
    }

    /// Display label for share cards, e.g. "16 Oct 2026", "Oct 2026".
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            PeriodFilter::All => "All time".to_string(),
            PeriodFilter::Day(day) => day.format("%d %b %Y").to_string(),
            PeriodFilter::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}")),
            PeriodFilter::Range { from, to } => {
                format!("{} to {}", from.format("%d %b %Y"), to.format("%d %b %Y"))
            }
        }
    }
}

/// Reduce the daily series to the days matching `predicate`.
///
/// Sums `pnl`, averages `capital`, and derives ROI from those two. Equity and
/// drawdown are not re-derived. Sums saturate at `±f64::MAX`.
pub fn slice_by_period<F>(daily: &[DailyPnlPoint], predicate: F) -> PeriodSlice
where
    F: Fn(NaiveDate) -> bool,
{
    let mut pnl = 0.0;
    let mut capital_sum = 0.0;
    let mut trading_days = 0usize;

    for point in daily.iter().filter(|p| predicate(p.date)) {
        pnl = saturating_add(pnl, point.pnl);
        capital_sum = saturating_add(capital_sum, point.capital);
        trading_days += 1;
    }

    let capital = if trading_days > 0 {
        capital_sum / trading_days as f64
    } else {
        0.0
    };
    let roi = if capital > 0.0 {
        coerce_amount(pnl / capital * 100.0)
    } else {
        0.0
    };

    PeriodSlice {
        pnl,
        roi,
        capital,
        trading_days,
    }
}

/// Period snapshots ("today", "this month") built from an existing summary.
pub struct PeriodService;

impl PeriodService {
    pub fn new() -> Self {
        Self
    }

    pub fn slice(&self, summary: &Summary, filter: PeriodFilter) -> PeriodSlice {
        let slice = slice_by_period(&summary.daily_pnl_data, |date| filter.matches(date));
        log::debug!(
            "Period slice {:?}: {} trading days, pnl {}",
            filter,
            slice.trading_days,
            slice.pnl
        );
        slice
    }

    pub fn today(&self, summary: &Summary, today: NaiveDate) -> PeriodSlice {
        self.slice(summary, PeriodFilter::Day(today))
    }

    pub fn month(&self, summary: &Summary, year: i32, month: u32) -> PeriodSlice {
        self.slice(summary, PeriodFilter::Month { year, month })
    }

    /// Labelled slice for share cards and exports.
    pub fn snapshot(
        &self,
        summary: &Summary,
        filter: PeriodFilter,
        journal_name: &str,
        currency: &str,
    ) -> PeriodSnapshot {
        PeriodSnapshot {
            label: filter.label(),
            currency: currency.to_string(),
            journal_name: journal_name.to_string(),
            slice: self.slice(summary, filter),
        }
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}
