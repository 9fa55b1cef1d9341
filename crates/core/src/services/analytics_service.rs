use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::analytics::{
    DailyPnlPoint, DayOfWeekPnl, DistributionBucket, MonthlyPerformance, Summary,
};
use crate::models::entry::{coerce_amount, saturating_add, saturating_sub, Entry};

/// Short weekday labels, Sunday first.
pub const SHORT_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// P&L-percent histogram layout: `(min, max, label)` with `[min, max)` ranges.
/// Zero falls in "0% to 1%".
const DISTRIBUTION_LAYOUT: [(Option<f64>, Option<f64>, &str); 10] = [
    (None, Some(-3.5), "< -3.5%"),
    (Some(-3.5), Some(-3.0), "-3.5% to -3%"),
    (Some(-3.0), Some(-2.0), "-3% to -2%"),
    (Some(-2.0), Some(-1.0), "-2% to -1%"),
    (Some(-1.0), Some(0.0), "-1% to 0%"),
    (Some(0.0), Some(1.0), "0% to 1%"),
    (Some(1.0), Some(2.0), "1% to 2%"),
    (Some(2.0), Some(3.0), "2% to 3%"),
    (Some(3.0), Some(3.5), "3% to 3.5%"),
    (Some(3.5), None, "> 3.5%"),
];

/// An entry reduced to the numbers the engine works with, already coerced.
#[derive(Debug, Clone, Copy)]
struct Day {
    date: NaiveDate,
    net_pnl: f64,
    capital: f64,
}

impl From<&Entry> for Day {
    fn from(entry: &Entry) -> Self {
        Self {
            date: entry.date,
            net_pnl: entry.net_pnl(),
            capital: coerce_amount(entry.capital_deployed),
        }
    }
}

/// Computes journal analytics: equity curve, drawdown, win/loss statistics,
/// streaks, weekday and monthly breakdowns, P&L distribution.
///
/// Pure business logic with no I/O, state or caching. Callers recompute
/// whenever the entry list or the starting capital changes.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Build the full `Summary` for a journal's entries.
    ///
    /// Entries may come in any order; they are sorted by date (stable) on a
    /// private copy. Non-finite amounts are read as zero, so this never fails
    /// and never yields NaN or infinity.
    pub fn compute_summary(&self, entries: &[Entry], initial_capital: f64) -> Summary {
        let initial_capital = coerce_amount(initial_capital);
        if entries.is_empty() {
            return empty_summary(initial_capital);
        }

        let mut days: Vec<Day> = entries.iter().map(Day::from).collect();
        days.sort_by_key(|d| d.date);

        log::debug!(
            "Computing summary over {} entries (initial capital {initial_capital})",
            days.len()
        );

        // 1. Equity & drawdown walk
        let walk = walk_equity(&days, initial_capital);

        // 2. Win/loss partition
        let total_trades = days.len();
        let mut win_days = 0usize;
        let mut loss_days = 0usize;
        let mut total_profit_on_win_days = 0.0;
        let mut total_loss_on_loss_days = 0.0;
        let mut max_profit = 0.0_f64;
        let mut max_loss = 0.0_f64;
        let mut total_net_pnl = 0.0;

        for day in &days {
            total_net_pnl = saturating_add(total_net_pnl, day.net_pnl);
            if day.net_pnl > 0.0 {
                win_days += 1;
                total_profit_on_win_days = saturating_add(total_profit_on_win_days, day.net_pnl);
                max_profit = max_profit.max(day.net_pnl);
            } else if day.net_pnl < 0.0 {
                loss_days += 1;
                total_loss_on_loss_days = saturating_add(total_loss_on_loss_days, day.net_pnl);
                max_loss = max_loss.min(day.net_pnl);
            }
        }

        let avg_profit_on_win_days = ratio(total_profit_on_win_days, win_days as f64);
        let avg_loss_on_loss_days = ratio(total_loss_on_loss_days, loss_days as f64);

        // 3. Streaks
        let (max_winning_streak, max_losing_streak) = longest_streaks(&days);

        // 4. Capital & returns
        let average_capital =
            days.iter().map(|d| d.capital).fold(0.0, saturating_add) / total_trades as f64;

        Summary {
            starting_capital: initial_capital,
            average_capital: coerce_amount(average_capital),
            current_equity: walk.current_equity,
            peak_equity: walk.peak_equity,
            total_net_pnl,
            total_capital_flow: walk.total_capital_flow,
            roi: percent_of(total_net_pnl, average_capital),
            total_trades,
            win_days,
            loss_days,
            flat_days: total_trades - win_days - loss_days,
            win_rate: percent_of(win_days as f64, total_trades as f64),
            loss_rate: percent_of(loss_days as f64, total_trades as f64),
            total_profit_on_win_days,
            total_loss_on_loss_days,
            avg_profit_on_win_days,
            avg_loss_on_loss_days,
            max_profit,
            max_loss,
            profit_factor: ratio(total_profit_on_win_days, total_loss_on_loss_days).abs(),
            expectancy: ratio(total_net_pnl, total_trades as f64),
            win_loss_ratio: ratio(avg_profit_on_win_days, avg_loss_on_loss_days).abs(),
            max_winning_streak,
            max_losing_streak,
            max_drawdown: walk.max_drawdown,
            max_dd_percentage: percent_of(walk.max_drawdown, walk.peak_equity),
            pnl_by_day_of_week: pnl_by_day_of_week(&days),
            monthly_performance: monthly_performance(&days),
            daily_pnl_data: walk.points,
            pnl_distribution: pnl_distribution(&days),
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper around [`AnalyticsService::compute_summary`].
pub fn compute_summary(entries: &[Entry], initial_capital: f64) -> Summary {
    AnalyticsService::new().compute_summary(entries, initial_capital)
}

/// Zeroed summary seeded with the initial capital.
fn empty_summary(initial_capital: f64) -> Summary {
    Summary {
        starting_capital: initial_capital,
        average_capital: 0.0,
        current_equity: initial_capital,
        peak_equity: initial_capital,
        total_net_pnl: 0.0,
        total_capital_flow: 0.0,
        roi: 0.0,
        total_trades: 0,
        win_days: 0,
        loss_days: 0,
        flat_days: 0,
        win_rate: 0.0,
        loss_rate: 0.0,
        total_profit_on_win_days: 0.0,
        total_loss_on_loss_days: 0.0,
        avg_profit_on_win_days: 0.0,
        avg_loss_on_loss_days: 0.0,
        max_profit: 0.0,
        max_loss: 0.0,
        profit_factor: 0.0,
        expectancy: 0.0,
        win_loss_ratio: 0.0,
        max_winning_streak: 0,
        max_losing_streak: 0,
        max_drawdown: 0.0,
        max_dd_percentage: 0.0,
        pnl_by_day_of_week: SHORT_DAY_NAMES
            .iter()
            .map(|day| DayOfWeekPnl { day: (*day).to_string(), pnl: 0.0 })
            .collect(),
        monthly_performance: Vec::new(),
        daily_pnl_data: Vec::new(),
        pnl_distribution: Vec::new(),
    }
}

struct EquityWalk {
    points: Vec<DailyPnlPoint>,
    current_equity: f64,
    peak_equity: f64,
    max_drawdown: f64,
    total_capital_flow: f64,
}

/// Single forward pass over date-sorted days. Running totals saturate at
/// `±f64::MAX`.
///
/// A change in capital deployed versus the previous day (or the initial
/// capital for the first day) is a flow added before the day's P&L. Both the
/// start-of-day and end-of-day equity are peak candidates.
fn walk_equity(days: &[Day], initial_capital: f64) -> EquityWalk {
    let mut points = Vec::with_capacity(days.len());
    let mut running_equity = initial_capital;
    let mut previous_capital = initial_capital;
    let mut peak_equity = initial_capital;
    let mut max_drawdown = 0.0_f64;
    let mut total_capital_flow = 0.0;

    for day in days {
        let capital_flow = saturating_sub(day.capital, previous_capital);
        let equity_start_of_day = saturating_add(running_equity, capital_flow);
        running_equity = saturating_add(equity_start_of_day, day.net_pnl);

        peak_equity = peak_equity.max(equity_start_of_day).max(running_equity);
        let drawdown = saturating_sub(peak_equity, running_equity);
        max_drawdown = max_drawdown.max(drawdown);

        total_capital_flow = saturating_add(total_capital_flow, capital_flow);
        previous_capital = day.capital;

        points.push(DailyPnlPoint {
            date: day.date,
            pnl: day.net_pnl,
            equity: running_equity,
            capital: day.capital,
            drawdown: if drawdown > 0.0 { -drawdown } else { 0.0 },
            capital_flow,
        });
    }

    EquityWalk {
        points,
        current_equity: running_equity,
        peak_equity,
        max_drawdown,
        total_capital_flow,
    }
}

/// Longest consecutive win and loss runs. A flat day breaks both.
fn longest_streaks(days: &[Day]) -> (usize, usize) {
    let mut current_win = 0usize;
    let mut current_loss = 0usize;
    let mut longest_win = 0usize;
    let mut longest_loss = 0usize;

    for day in days {
        if day.net_pnl > 0.0 {
            current_win += 1;
            current_loss = 0;
            longest_win = longest_win.max(current_win);
        } else if day.net_pnl < 0.0 {
            current_loss += 1;
            current_win = 0;
            longest_loss = longest_loss.max(current_loss);
        } else {
            current_win = 0;
            current_loss = 0;
        }
    }

    (longest_win, longest_loss)
}

fn pnl_by_day_of_week(days: &[Day]) -> Vec<DayOfWeekPnl> {
    let mut totals = [0.0_f64; 7];
    for day in days {
        let slot = &mut totals[day.date.weekday().num_days_from_sunday() as usize];
        *slot = saturating_add(*slot, day.net_pnl);
    }

    SHORT_DAY_NAMES
        .iter()
        .zip(totals)
        .map(|(day, pnl)| DayOfWeekPnl { day: (*day).to_string(), pnl })
        .collect()
}

fn monthly_performance(days: &[Day]) -> Vec<MonthlyPerformance> {
    struct MonthAcc {
        first_date: NaiveDate,
        net_pnl: f64,
        capital_sum: f64,
        count: usize,
    }

    let mut order: Vec<(i32, u32)> = Vec::new();
    let mut groups: HashMap<(i32, u32), MonthAcc> = HashMap::new();

    for day in days {
        let key = (day.date.year(), day.date.month());
        let acc = groups.entry(key).or_insert_with(|| {
            order.push(key);
            MonthAcc {
                first_date: day.date,
                net_pnl: 0.0,
                capital_sum: 0.0,
                count: 0,
            }
        });
        acc.net_pnl = saturating_add(acc.net_pnl, day.net_pnl);
        acc.capital_sum = saturating_add(acc.capital_sum, day.capital);
        acc.count += 1;
    }

    let mut months: Vec<MonthlyPerformance> = order
        .into_iter()
        .filter_map(|key| groups.remove(&key).map(|acc| (key, acc)))
        .map(|((year, month_number), acc)| {
            let average_capital = acc.capital_sum / acc.count as f64;
            MonthlyPerformance {
                month: acc.first_date.format("%b %Y").to_string(),
                year,
                month_number,
                net_pnl: acc.net_pnl,
                average_capital,
                monthly_return: percent_of(acc.net_pnl, average_capital),
                trading_days: acc.count,
                first_date: acc.first_date,
            }
        })
        .collect();

    months.sort_by_key(|m| m.first_date);
    months
}

fn pnl_distribution(days: &[Day]) -> Vec<DistributionBucket> {
    let mut buckets: Vec<DistributionBucket> = DISTRIBUTION_LAYOUT
        .iter()
        .map(|(min, max, label)| DistributionBucket {
            range: (*label).to_string(),
            min: *min,
            max: *max,
            count: 0,
        })
        .collect();

    for day in days.iter().filter(|d| d.capital > 0.0) {
        let pnl_percent = day.net_pnl * 100.0 / day.capital;
        if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(pnl_percent)) {
            bucket.count += 1;
        }
    }

    buckets
}

/// `numerator / denominator`, or 0 when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        coerce_amount(numerator / denominator)
    }
}

/// `numerator / denominator × 100`, or 0 unless the denominator is positive.
fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        coerce_amount(numerator / denominator * 100.0)
    } else {
        0.0
    }
}
