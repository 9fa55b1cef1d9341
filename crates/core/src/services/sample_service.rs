use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use crate::models::entry::Entry;

/// Probability that a generated day is a winning day.
const WIN_PROBABILITY: f64 = 0.55;
/// Upper bound of a winning day's gross P&L.
const MAX_WIN: f64 = 25_000.0;
/// Upper bound of a losing day's gross loss (absolute).
const MAX_LOSS: f64 = 15_000.0;

/// Generate `count` demo entries on consecutive weekdays after `start`.
///
/// Gross P&L is a win with 55% probability (up to 25 000) or a loss (up to
/// 15 000). Charges are 2% to 7% of the absolute gross. Amounts are rounded to
/// two decimals and capital is fixed at `capital`.
pub fn generate_sample_entries<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    start: NaiveDate,
    capital: f64,
) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(count);
    let mut date = start;

    while entries.len() < count {
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let gross_pnl = if rng.gen_bool(WIN_PROBABILITY) {
            rng.gen_range(0.0..MAX_WIN)
        } else {
            -rng.gen_range(0.0..MAX_LOSS)
        };
        let charges = gross_pnl.abs() * rng.gen_range(0.02..0.07);

        entries.push(Entry::new(
            date,
            round2(gross_pnl),
            round2(charges),
            capital,
        ));
    }

    log::debug!("Generated {} sample entries starting after {start}", entries.len());
    entries
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
