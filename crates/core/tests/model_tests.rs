use chrono::NaiveDate;
use serde_json::json;
use trade_journal_core::errors::CoreError;
use trade_journal_core::models::analytics::{DailyPnlPoint, DistributionBucket, Summary};
use trade_journal_core::models::book::JournalBook;
use trade_journal_core::models::entry::{
    coerce_amount, coerce_json_amount, day_name, saturate, saturating_add, saturating_sub, Entry,
    RawEntry, DAY_NAMES,
};
use trade_journal_core::models::journal::Journal;
use trade_journal_core::models::settings::{Settings, DEFAULT_ENTRIES_PER_PAGE, DEFAULT_INITIAL_CAPITAL};
use trade_journal_core::services::analytics_service::compute_summary;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Entry
// ═══════════════════════════════════════════════════════════════════

mod entry {
    use super::*;

    #[test]
    fn new_assigns_unique_ids() {
        let a = Entry::new(d(2024, 1, 2), 100.0, 5.0, 100_000.0);
        let b = Entry::new(d(2024, 1, 2), 100.0, 5.0, 100_000.0);
        assert_ne!(a.id, b.id);
        assert!(a.notes.is_none());
    }

    #[test]
    fn with_notes_sets_notes() {
        let e = Entry::with_notes(d(2024, 1, 2), 100.0, 5.0, 100_000.0, "gap up");
        assert_eq!(e.notes.as_deref(), Some("gap up"));
    }

    #[test]
    fn net_pnl_subtracts_charges_for_profit() {
        let e = Entry::new(d(2024, 1, 2), 1500.0, 120.0, 100_000.0);
        assert_eq!(e.net_pnl(), 1380.0);
    }

    #[test]
    fn net_pnl_subtracts_charges_for_loss() {
        let e = Entry::new(d(2024, 1, 2), -800.0, 40.0, 100_000.0);
        assert_eq!(e.net_pnl(), -840.0);
    }

    #[test]
    fn net_pnl_reads_non_finite_as_zero() {
        let e = Entry::new(d(2024, 1, 2), f64::NAN, 40.0, 100_000.0);
        assert_eq!(e.net_pnl(), -40.0);
        let e = Entry::new(d(2024, 1, 2), 100.0, f64::INFINITY, 100_000.0);
        assert_eq!(e.net_pnl(), 100.0);
    }

    #[test]
    fn day_name_matches_weekday() {
        // 2024-01-01 was a Monday
        assert_eq!(Entry::new(d(2024, 1, 1), 0.0, 0.0, 1.0).day_name(), "Monday");
        assert_eq!(day_name(d(2024, 1, 6)), "Saturday");
        assert_eq!(day_name(d(2024, 1, 7)), "Sunday");
    }

    #[test]
    fn day_names_are_sunday_first() {
        assert_eq!(DAY_NAMES[0], "Sunday");
        assert_eq!(DAY_NAMES[6], "Saturday");
    }

    #[test]
    fn serde_roundtrip_json() {
        let e = Entry::with_notes(d(2024, 3, 15), 2500.5, 75.25, 200_000.0, "breakout");
        let json = serde_json::to_string(&e).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }

    #[test]
    fn deserialize_without_notes_field() {
        let json = r#"{
            "id": "6f1c2a7e-0b7e-4c55-9d0e-2f3a4b5c6d7e",
            "date": "2024-03-15",
            "gross_pnl": 10.0,
            "taxes_and_charges": 1.0,
            "capital_deployed": 1000.0
        }"#;
        let e: Entry = serde_json::from_str(json).unwrap();
        assert!(e.notes.is_none());
        assert_eq!(e.net_pnl(), 9.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Coercion
// ═══════════════════════════════════════════════════════════════════

mod coercion {
    use super::*;

    #[test]
    fn coerce_amount_passes_finite_values() {
        assert_eq!(coerce_amount(12.5), 12.5);
        assert_eq!(coerce_amount(-3.0), -3.0);
        assert_eq!(coerce_amount(0.0), 0.0);
    }

    #[test]
    fn coerce_amount_zeroes_non_finite() {
        assert_eq!(coerce_amount(f64::NAN), 0.0);
        assert_eq!(coerce_amount(f64::INFINITY), 0.0);
        assert_eq!(coerce_amount(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn saturating_arithmetic_clamps_to_max() {
        assert_eq!(saturating_add(f64::MAX, f64::MAX), f64::MAX);
        assert_eq!(saturating_sub(-f64::MAX, f64::MAX), -f64::MAX);
        assert_eq!(saturating_add(1.5, 2.0), 3.5);
        assert_eq!(saturate(f64::INFINITY), f64::MAX);
        assert_eq!(saturate(f64::NEG_INFINITY), -f64::MAX);
        assert_eq!(saturate(f64::NAN), 0.0);
    }

    #[test]
    fn net_pnl_saturates() {
        let e = Entry::new(d(2024, 1, 2), -f64::MAX, f64::MAX, 100.0);
        assert_eq!(e.net_pnl(), -f64::MAX);
    }

    #[test]
    fn coerce_json_numbers_and_strings() {
        assert_eq!(coerce_json_amount(&json!(42)), 42.0);
        assert_eq!(coerce_json_amount(&json!(-1.5)), -1.5);
        assert_eq!(coerce_json_amount(&json!("1500.25")), 1500.25);
        assert_eq!(coerce_json_amount(&json!("  -7 ")), -7.0);
    }

    #[test]
    fn coerce_json_garbage_is_zero() {
        assert_eq!(coerce_json_amount(&json!(null)), 0.0);
        assert_eq!(coerce_json_amount(&json!(true)), 0.0);
        assert_eq!(coerce_json_amount(&json!("")), 0.0);
        assert_eq!(coerce_json_amount(&json!("abc")), 0.0);
        assert_eq!(coerce_json_amount(&json!("NaN")), 0.0);
        assert_eq!(coerce_json_amount(&json!("inf")), 0.0);
        assert_eq!(coerce_json_amount(&json!([1, 2])), 0.0);
        assert_eq!(coerce_json_amount(&json!({"v": 1})), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  RawEntry
// ═══════════════════════════════════════════════════════════════════

mod raw_entry {
    use super::*;

    #[test]
    fn camel_case_document_is_accepted() {
        let raw: RawEntry = serde_json::from_value(json!({
            "id": "trade-sample-1",
            "date": "2023-01-02",
            "grossPnl": "1500.5",
            "taxesAndCharges": 30,
            "capitalDeployed": "500000",
            "notes": "first day"
        }))
        .unwrap();
        let e = raw.into_entry().unwrap();
        assert_eq!(e.date, d(2023, 1, 2));
        assert_eq!(e.gross_pnl, 1500.5);
        assert_eq!(e.taxes_and_charges, 30.0);
        assert_eq!(e.capital_deployed, 500_000.0);
        assert_eq!(e.notes.as_deref(), Some("first day"));
    }

    #[test]
    fn missing_amounts_become_zero() {
        let raw: RawEntry = serde_json::from_value(json!({ "date": "2023-01-02" })).unwrap();
        let e = raw.into_entry().unwrap();
        assert_eq!(e.gross_pnl, 0.0);
        assert_eq!(e.taxes_and_charges, 0.0);
        assert_eq!(e.capital_deployed, 0.0);
    }

    #[test]
    fn uuid_id_is_kept() {
        let id = uuid::Uuid::new_v4();
        let raw = RawEntry {
            id: Some(id.to_string()),
            date: "2023-01-02".into(),
            ..RawEntry::default()
        };
        assert_eq!(raw.into_entry().unwrap().id, id);
    }

    #[test]
    fn blank_notes_are_dropped() {
        let raw = RawEntry {
            date: "2023-01-02".into(),
            notes: Some("   ".into()),
            ..RawEntry::default()
        };
        assert!(raw.into_entry().unwrap().notes.is_none());
    }

    #[test]
    fn invalid_date_is_rejected() {
        let raw = RawEntry {
            date: "02/01/2023".into(),
            ..RawEntry::default()
        };
        assert!(matches!(raw.into_entry(), Err(CoreError::ValidationError(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Journal & JournalBook
// ═══════════════════════════════════════════════════════════════════

mod journal {
    use super::*;

    #[test]
    fn new_journal_is_empty() {
        let j = Journal::new("Options", 250_000.0);
        assert_eq!(j.name, "Options");
        assert_eq!(j.initial_capital, 250_000.0);
        assert!(j.entries.is_empty());
        assert!(j.trash.is_empty());
    }

    #[test]
    fn entry_lookup() {
        let mut j = Journal::new("Swing", 100_000.0);
        let a = Entry::new(d(2024, 1, 2), 1000.0, 10.0, 100_000.0);
        let b = Entry::new(d(2024, 1, 3), -500.0, 5.0, 100_000.0);
        let a_id = a.id;
        j.entries.push(a);
        j.entries.push(b);
        assert_eq!(j.entry(a_id).map(|e| e.gross_pnl), Some(1000.0));
        assert!(j.entry(uuid::Uuid::new_v4()).is_none());
    }

    #[test]
    fn book_lookup_and_totals() {
        let mut book = JournalBook::default();
        let mut j = Journal::new("A", 1.0);
        j.entries.push(Entry::new(d(2024, 1, 2), 1.0, 0.0, 1.0));
        let id = j.id;
        book.journals.push(j);
        book.journals.push(Journal::new("B", 1.0));

        assert_eq!(book.total_entries(), 1);
        assert_eq!(book.journal(id).map(|j| j.name.as_str()), Some("A"));
        book.journal_mut(id).unwrap().name = "Renamed".into();
        assert_eq!(book.journal(id).unwrap().name, "Renamed");
        assert!(book.active_journal.is_none());
    }

    #[test]
    fn book_bincode_roundtrip() {
        let mut book = JournalBook::default();
        let mut j = Journal::new("A", 50_000.0);
        j.entries.push(Entry::with_notes(d(2024, 1, 2), 1.5, 0.5, 50_000.0, "n"));
        book.active_journal = Some(j.id);
        book.journals.push(j);

        let bytes = bincode::serialize(&book).unwrap();
        let back: JournalBook = bincode::deserialize(&bytes).unwrap();
        assert_eq!(book, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.currency, "INR");
        assert_eq!(s.default_initial_capital, DEFAULT_INITIAL_CAPITAL);
        assert_eq!(s.entries_per_page, DEFAULT_ENTRIES_PER_PAGE);
        assert_eq!(s.sample_entry_count, 250);
    }

    #[test]
    fn serde_roundtrip_json() {
        let s = Settings {
            currency: "USD".into(),
            default_initial_capital: 10_000.0,
            entries_per_page: 50,
            sample_entry_count: 10,
        };
        let back: Settings = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(s, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Summary & series types
// ═══════════════════════════════════════════════════════════════════

mod summary_types {
    use super::*;

    fn point(date: NaiveDate, pnl: f64) -> DailyPnlPoint {
        DailyPnlPoint {
            date,
            pnl,
            equity: 0.0,
            capital: 0.0,
            drawdown: 0.0,
            capital_flow: 0.0,
        }
    }

    #[test]
    fn calendar_keeps_last_value_for_duplicate_dates() {
        let mut summary = compute_summary(&[], 0.0);
        summary.daily_pnl_data = vec![
            point(d(2024, 1, 2), 10.0),
            point(d(2024, 1, 2), -5.0),
            point(d(2024, 1, 3), 7.0),
        ];
        let cal = summary.calendar();
        assert_eq!(cal.len(), 2);
        assert_eq!(cal[&d(2024, 1, 2)], -5.0);
        assert_eq!(cal[&d(2024, 1, 3)], 7.0);
    }

    #[test]
    fn is_empty_tracks_trade_count() {
        assert!(compute_summary(&[], 1.0).is_empty());
        let e = Entry::new(d(2024, 1, 2), 1.0, 0.0, 1.0);
        assert!(!compute_summary(&[e], 1.0).is_empty());
    }

    #[test]
    fn bucket_contains_is_half_open() {
        let bucket = DistributionBucket {
            range: "0% to 1%".into(),
            min: Some(0.0),
            max: Some(1.0),
            count: 0,
        };
        assert!(bucket.contains(0.0));
        assert!(bucket.contains(0.999));
        assert!(!bucket.contains(1.0));
        assert!(!bucket.contains(-0.001));
    }

    #[test]
    fn unbounded_bucket_sides() {
        let low = DistributionBucket { range: "low".into(), min: None, max: Some(-3.5), count: 0 };
        let high = DistributionBucket { range: "high".into(), min: Some(3.5), max: None, count: 0 };
        assert!(low.contains(-1e9));
        assert!(!low.contains(-3.5));
        assert!(high.contains(3.5));
        assert!(high.contains(1e9));
    }

    #[test]
    fn summary_json_roundtrip() {
        let entries = vec![
            Entry::new(d(2024, 1, 2), 1000.0, 10.0, 100_000.0),
            Entry::new(d(2024, 1, 3), -400.0, 10.0, 100_000.0),
        ];
        let summary = compute_summary(&entries, 100_000.0);
        let json = serde_json::to_string(&summary).unwrap();
        let back: Summary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_trades, 2);
        assert_eq!(back.daily_pnl_data.len(), 2);
        assert_eq!(back.pnl_by_day_of_week.len(), 7);
        assert_eq!(back.pnl_distribution.len(), 10);
        assert!((back.total_net_pnl - summary.total_net_pnl).abs() < 1e-9);
        assert!(back.pnl_distribution[0].min.is_none());
        assert!(back.pnl_distribution[9].max.is_none());
    }
}
