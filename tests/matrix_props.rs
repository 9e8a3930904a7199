use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use github_contrib::matrix::{DAYS, WEEKS};
use github_contrib::{build_matrix, classify, ContributionDay, Intensity};
use proptest::prelude::*;

fn arb_reference() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970 .. roughly 2096
    (0i64..4_000_000_000i64).prop_map(|s| DateTime::from_timestamp(s, 0).unwrap())
}

fn arb_days() -> impl Strategy<Value = Vec<(i64, u32)>> {
    // Offsets in days relative to the reference, reaching past both window edges.
    proptest::collection::vec((-30i64..800i64, 0u32..40u32), 0..300)
}

fn to_days(reference: DateTime<Utc>, raw: &[(i64, u32)]) -> Vec<ContributionDay> {
    raw.iter()
        .map(|(back, count)| {
            let date = reference.date_naive() - Duration::days(*back);
            ContributionDay::new(date.format("%Y-%m-%d").to_string(), *count)
        })
        .collect()
}

proptest! {
    #[test]
    fn classify_partitions_counts(n in any::<u32>()) {
        let expected = match n {
            0 => Intensity::None,
            1..=3 => Intensity::Low,
            4..=6 => Intensity::Medium,
            7..=9 => Intensity::High,
            _ => Intensity::VeryHigh,
        };
        prop_assert_eq!(classify(n), expected);
    }

    #[test]
    fn classify_is_monotone(a in 0u32..1000, b in 0u32..1000) {
        if a <= b {
            prop_assert!(classify(a) <= classify(b));
        }
    }

    #[test]
    fn every_placed_record_sits_where_its_date_says(reference in arb_reference(), raw in arb_days()) {
        let days = to_days(reference, &raw);
        let m = build_matrix(&days, reference);
        let today = reference.date_naive();
        let window_start: NaiveDate = today.checked_sub_months(Months::new(12)).unwrap();

        prop_assert_eq!(m.columns().count(), WEEKS);
        for (column, week) in m.columns().enumerate() {
            prop_assert_eq!(week.len(), DAYS);
            for (row, cell) in week.iter().enumerate() {
                if let Some(r) = cell {
                    prop_assert!(r.date >= window_start && r.date <= today);
                    let offset = (today - r.date).num_days() / 7;
                    prop_assert_eq!(column as i64, 51 - offset);
                    prop_assert_eq!(row as u32, r.date.weekday().num_days_from_sunday());
                }
            }
        }
    }

    #[test]
    fn in_window_dates_are_never_lost(reference in arb_reference(), raw in arb_days()) {
        let days = to_days(reference, &raw);
        let m = build_matrix(&days, reference);
        let today = reference.date_naive();
        let window_start = today.checked_sub_months(Months::new(12)).unwrap();

        for (back, _) in &raw {
            let date = today - Duration::days(*back);
            let placeable = date >= window_start && date <= today && (today - date).num_days() / 7 <= 51;
            let present = m.records().any(|r| r.date == date);
            prop_assert_eq!(placeable, present);
        }
    }

    #[test]
    fn build_is_idempotent(reference in arb_reference(), raw in arb_days()) {
        let days = to_days(reference, &raw);
        prop_assert_eq!(build_matrix(&days, reference), build_matrix(&days, reference));
    }
}
