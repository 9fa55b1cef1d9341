use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Performance summary of one journal.
///
/// A transient value: recomputed from the entry list on every call, never
/// stored. Every ratio is `0.0` when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    // ── Capital & equity ────────────────────────────────────────────
    /// Initial capital of the journal
    pub starting_capital: f64,

    /// Mean of every entry's capital deployed
    pub average_capital: f64,

    /// Equity after the last entry (starting capital + flows + net P&L)
    pub current_equity: f64,

    /// Highest equity seen during the walk
    pub peak_equity: f64,

    /// Sum of net P&L over all entries
    pub total_net_pnl: f64,

    /// Net deposits (+) / withdrawals (−) inferred from capital snapshots
    pub total_capital_flow: f64,

    /// total_net_pnl / average_capital × 100
    pub roi: f64,

    // ── Day counts ──────────────────────────────────────────────────
    pub total_trades: usize,
    pub win_days: usize,
    pub loss_days: usize,
    /// Days with exactly zero net P&L
    pub flat_days: usize,
    pub win_rate: f64,
    pub loss_rate: f64,

    // ── Win / loss aggregates ───────────────────────────────────────
    /// Sum of positive net P&L
    pub total_profit_on_win_days: f64,
    /// Sum of negative net P&L (stays negative)
    pub total_loss_on_loss_days: f64,
    pub avg_profit_on_win_days: f64,
    pub avg_loss_on_loss_days: f64,
    /// Best day, never below zero
    pub max_profit: f64,
    /// Worst day, never above zero
    pub max_loss: f64,
    pub profit_factor: f64,
    /// Net P&L per entry
    pub expectancy: f64,
    pub win_loss_ratio: f64,

    // ── Streaks & drawdown ──────────────────────────────────────────
    pub max_winning_streak: usize,
    pub max_losing_streak: usize,
    /// Largest peak-to-trough gap, always ≥ 0
    pub max_drawdown: f64,
    /// max_drawdown / peak_equity × 100
    pub max_dd_percentage: f64,

    // ── Series ──────────────────────────────────────────────────────
    /// Always 7 buckets, Sunday first
    pub pnl_by_day_of_week: Vec<DayOfWeekPnl>,
    pub monthly_performance: Vec<MonthlyPerformance>,
    /// One point per entry, date ascending
    pub daily_pnl_data: Vec<DailyPnlPoint>,
    pub pnl_distribution: Vec<DistributionBucket>,
}

impl Summary {
    /// `true` when the summary was built from no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }

    /// Net P&L keyed by date for calendar heatmaps.
    ///
    /// When several entries share a date the last one in the daily series wins.
    #[must_use]
    pub fn calendar(&self) -> BTreeMap<NaiveDate, f64> {
        self.daily_pnl_data
            .iter()
            .map(|point| (point.date, point.pnl))
            .collect()
    }
}

/// One point of the equity / underwater curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPnlPoint {
    pub date: NaiveDate,

    /// Net P&L of the day
    pub pnl: f64,

    /// Equity after the day's P&L
    pub equity: f64,

    /// Capital deployed snapshot of the day
    pub capital: f64,

    /// Distance below peak, stored negated (≤ 0) for underwater plots
    pub drawdown: f64,

    /// Deposit (+) or withdrawal (−) inferred for the day
    pub capital_flow: f64,
}

/// Net P&L summed over one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOfWeekPnl {
    /// Short weekday name ("Sun" .. "Sat")
    pub day: String,
    pub pnl: f64,
}

/// Monthly rollup of net P&L and capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    /// Label such as "Jan 2024"
    pub month: String,
    pub year: i32,
    /// 1-based month number
    pub month_number: u32,
    pub net_pnl: f64,
    /// Mean capital deployed over the month's entries
    pub average_capital: f64,
    /// net_pnl / average_capital × 100
    pub monthly_return: f64,
    pub trading_days: usize,
    /// Earliest entry date of the month
    pub first_date: NaiveDate,
}

/// One bar of the P&L-percent histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    /// Display label, e.g. "0% to 1%"
    pub range: String,
    /// Inclusive lower bound in percent, `None` when unbounded
    pub min: Option<f64>,
    /// Exclusive upper bound in percent, `None` when unbounded
    pub max: Option<f64>,
    pub count: usize,
}

impl DistributionBucket {
    /// Whether a P&L percentage falls in `[min, max)`.
    #[must_use]
    pub fn contains(&self, pnl_percent: f64) -> bool {
        self.min.map_or(true, |min| pnl_percent >= min)
            && self.max.map_or(true, |max| pnl_percent < max)
    }
}

/// Aggregate over a subset of the daily series (a day, a month, a range).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSlice {
    /// Sum of net P&L in the period
    pub pnl: f64,
    /// pnl / capital × 100
    pub roi: f64,
    /// Mean capital deployed in the period
    pub capital: f64,
    pub trading_days: usize,
}

/// A labelled period slice ready for sharing or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// Human-readable period, e.g. "16 Oct 2026" or "Oct 2026"
    pub label: String,
    pub currency: String,
    pub journal_name: String,
    pub slice: PeriodSlice,
}
