//! Contribution heat-map grid.
//!
//! [`build_matrix`] folds a flat list of daily contribution counts into a
//! fixed 52 x 7 grid whose rightmost column ends on the reference date, and
//! [`classify`] buckets a count into one of five intensity tiers.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::models::ContributionDay;

/// Number of week columns in the grid.
pub const WEEKS: usize = 52;
/// Number of weekday rows in the grid, Sunday first.
pub const DAYS: usize = 7;

/// A single day's activity placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionRecord {
    pub date: NaiveDate,
    pub count: u32,
}

/// Visual bucket for a day's contribution count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Intensity {
    /// All tiers from lowest to highest.
    pub const ALL: [Intensity; 5] = [
        Intensity::None,
        Intensity::Low,
        Intensity::Medium,
        Intensity::High,
        Intensity::VeryHigh,
    ];

    /// Tier index, `0` for [`Intensity::None`] up to `4`.
    #[must_use]
    pub const fn level(self) -> usize {
        self as usize
    }
}

/// Maps a count to its tier: 0, 1-3, 4-6, 7-9, 10 and above.
#[must_use]
pub const fn classify(count: u32) -> Intensity {
    match count {
        0 => Intensity::None,
        1..=3 => Intensity::Low,
        4..=6 => Intensity::Medium,
        7..=9 => Intensity::High,
        _ => Intensity::VeryHigh,
    }
}

/// Fixed 52-week by 7-day grid, column-major, oldest week first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionMatrix {
    cells: [[Option<ContributionRecord>; DAYS]; WEEKS],
}

impl Default for ContributionMatrix {
    fn default() -> Self {
        Self {
            cells: [[None; DAYS]; WEEKS],
        }
    }
}

impl ContributionMatrix {
    /// Cell at `column` (week) and `row` (weekday, 0 = Sunday).
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<&ContributionRecord> {
        self.cells.get(column)?.get(row)?.as_ref()
    }

    /// Columns from oldest to most recent week.
    pub fn columns(&self) -> impl Iterator<Item = &[Option<ContributionRecord>; DAYS]> {
        self.cells.iter()
    }

    /// Rows from Sunday to Saturday, each yielding its 52 cells left to right.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Option<&ContributionRecord>>> {
        (0..DAYS).map(move |row| self.cells.iter().map(move |col| col[row].as_ref()))
    }

    /// Occupied cells in column-major order.
    pub fn records(&self) -> impl Iterator<Item = &ContributionRecord> {
        self.cells.iter().flatten().flatten()
    }

    /// Sum of counts over occupied cells.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.records().map(|r| u64::from(r.count)).sum()
    }

    /// Whether no cell holds a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }
}

/// Places each day into the grid ending at `reference`.
///
/// Days that do not parse, fall outside the year ending at `reference`, or
/// land more than 51 weeks back are skipped. When two days map to the same
/// cell the later one in `days` wins.
pub fn build_matrix<'a, I>(days: I, reference: DateTime<Utc>) -> ContributionMatrix
where
    I: IntoIterator<Item = &'a ContributionDay>,
{
    let today = reference.date_naive();
    let window_start = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);

    let mut matrix = ContributionMatrix::default();
    for day in days {
        let Some(date) = parse_day(&day.date) else {
            tracing::trace!(date = %day.date, "dropping unparseable contribution date");
            continue;
        };
        if date < window_start || date > today {
            tracing::trace!(%date, "dropping contribution outside window");
            continue;
        }

        let week_offset = (today - date).num_days() / 7;
        if week_offset > (WEEKS as i64 - 1) {
            tracing::trace!(%date, week_offset, "dropping contribution past first column");
            continue;
        }

        let column = WEEKS - 1 - week_offset as usize;
        let row = date.weekday().num_days_from_sunday() as usize;
        let record = ContributionRecord {
            date,
            count: day.contribution_count,
        };
        if let Some(prev) = matrix.cells[column][row].replace(record) {
            tracing::debug!(%date, previous = %prev.date, "overwriting grid cell");
        }
    }
    matrix
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp reduced to its UTC date.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 15);
        assert_eq!(parse_day("2024-06-15"), expected);
        assert_eq!(parse_day(" 2024-06-15 "), expected);
        assert_eq!(parse_day("2024-06-15T23:30:00-02:00"), NaiveDate::from_ymd_opt(2024, 6, 16));
        assert_eq!(parse_day("2024-06-15T08:00:00Z"), expected);
        assert_eq!(parse_day("15/06/2024"), None);
        assert_eq!(parse_day("2024-02-30"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(0), Intensity::None);
        assert_eq!(classify(1), Intensity::Low);
        assert_eq!(classify(3), Intensity::Low);
        assert_eq!(classify(4), Intensity::Medium);
        assert_eq!(classify(6), Intensity::Medium);
        assert_eq!(classify(7), Intensity::High);
        assert_eq!(classify(9), Intensity::High);
        assert_eq!(classify(10), Intensity::VeryHigh);
        assert_eq!(classify(u32::MAX), Intensity::VeryHigh);
    }

    #[test]
    fn levels_follow_tier_order() {
        for (i, tier) in Intensity::ALL.iter().enumerate() {
            assert_eq!(tier.level(), i);
        }
    }

    #[test]
    fn out_of_range_get_is_none() {
        let m = ContributionMatrix::default();
        assert!(m.get(WEEKS, 0).is_none());
        assert!(m.get(0, DAYS).is_none());
    }

    #[test]
    fn leap_day_reference_clamps_window_start() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            today.checked_sub_months(Months::new(12)),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );

        // 2023-02-28 opens the window but is 366 days back (offset 52);
        // 2023-02-27 is before the window. Only 2023-03-05 (offset 51) lands.
        let days = [
            ContributionDay::new("2023-02-27", 1),
            ContributionDay::new("2023-02-28", 4),
            ContributionDay::new("2023-03-05", 2),
        ];
        let m = build_matrix(&days, at(2024, 2, 29));
        let kept: Vec<_> = m.records().map(|r| (r.date, r.count)).collect();
        assert_eq!(kept, vec![(NaiveDate::from_ymd_opt(2023, 3, 5).unwrap(), 2)]);
        assert!(m.get(0, 0).is_some());
    }

    #[test]
    fn reference_time_of_day_is_ignored() {
        let days = [ContributionDay::new("2024-06-15", 3)];
        let early = build_matrix(&days, Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        let late = build_matrix(&days, Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap());
        assert_eq!(early, late);
        assert!(early.get(WEEKS - 1, 6).is_some());
    }
}
