//! Date range, day iteration and per-day query windows.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::DateRangeError;

/// Timestamp format used for the `from`/`to` query parameters.
pub const WINDOW_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Date formats accepted from user input, tried in order.
const INPUT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parses a calendar date given as `YYYY-MM-DD` or `DD/MM/YYYY`.
///
/// # Errors
///
/// Returns [`DateRangeError::Malformed`] if neither format matches.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    let input = input.trim();
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| DateRangeError::Malformed(input.to_string()))
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both endpoints with [`parse_date`] and validates the order.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the first day (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns an iterator over every day in the range, in chronological order.
    ///
    /// The iterator is derived purely from the endpoints, so calling this again
    /// always yields the same sequence.
    #[must_use]
    pub const fn days(&self) -> DayIterator {
        DayIterator {
            next: Some(self.start),
            end: self.end,
        }
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        self.days().len()
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DayIterator {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .filter(|day| *day <= self.end)
            .map_or(0, |day| (self.end - day).num_days() as usize + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DayIterator {}

/// The half-open UTC interval `[from, to)` covering exactly one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    day: NaiveDate,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DayWindow {
    /// Builds the window starting at midnight UTC of `day`.
    #[must_use]
    pub fn for_day(day: NaiveDate) -> Self {
        let from = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
        Self {
            day,
            from,
            to: from + TimeDelta::days(1),
        }
    }

    /// Returns the calendar day this window covers.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn from(&self) -> DateTime<Utc> {
        self.from
    }

    /// Returns the exclusive upper bound.
    #[must_use]
    pub const fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Returns the `(from, to)` query parameters in RFC 3339 form.
    #[must_use]
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("from", self.from.format(WINDOW_TIMESTAMP_FORMAT).to_string()),
            ("to", self.to.format(WINDOW_TIMESTAMP_FORMAT).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_new() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(range.start(), date(2024, 1, 1));
        assert_eq!(range.end(), date(2024, 1, 31));
        assert_eq!(range.total_days(), 31);
    }

    #[test]
    fn test_date_range_reversed() {
        let err = DateRange::new(date(2024, 1, 31), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, DateRangeError::Reversed { .. }));
    }

    #[test]
    fn test_days_are_contiguous_and_inclusive() {
        let cases = [
            (date(2024, 1, 1), date(2024, 1, 1)),
            (date(2024, 1, 1), date(2024, 1, 3)),
            (date(2023, 12, 30), date(2024, 1, 2)),
            (date(2024, 2, 27), date(2024, 3, 1)),
            (date(2020, 1, 1), date(2021, 12, 31)),
        ];

        for (start, end) in cases {
            let range = DateRange::new(start, end).unwrap();
            let days: Vec<_> = range.days().collect();

            assert_eq!(days.len() as i64, (end - start).num_days() + 1);
            assert_eq!(days.first(), Some(&start));
            assert_eq!(days.last(), Some(&end));
            assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
            assert_eq!(range.days().len(), days.len());
            assert_eq!(range.total_days(), days.len());
            assert_eq!((range.start(), range.end()), (start, end));
        }
    }

    #[test]
    fn test_days_is_restartable() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        let first: Vec<_> = range.days().collect();
        let second: Vec<_> = range.days().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_days_at_calendar_end() {
        let range = DateRange::single_day(NaiveDate::MAX);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![NaiveDate::MAX]);
        assert_eq!(range.total_days(), 1);
    }

    #[test]
    fn test_parse_both_formats() {
        assert_eq!(parse_date("2024-01-02").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date("02/01/2024").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date(" 2024-01-02 ").unwrap(), date(2024, 1, 2));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            DateRange::parse("2024-13-01", "2024-12-31"),
            Err(DateRangeError::Malformed("2024-13-01".to_string()))
        );
        assert!(matches!(
            DateRange::parse("2024-01-01", "yesterday"),
            Err(DateRangeError::Malformed(_))
        ));
        assert!(matches!(
            DateRange::parse("03/01/2024", "01/01/2024"),
            Err(DateRangeError::Reversed { .. })
        ));
    }

    #[test]
    fn test_day_window() {
        let window = DayWindow::for_day(date(2024, 1, 31));

        assert!(window.from() < window.to());
        assert_eq!(window.to() - window.from(), TimeDelta::days(1));
        assert_eq!(
            window.query_params(),
            [
                ("from", "2024-01-31T00:00:00Z".to_string()),
                ("to", "2024-02-01T00:00:00Z".to_string()),
            ]
        );
    }
}
