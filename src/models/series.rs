use chrono::{DateTime, NaiveDate, Utc};

use super::Ohlcv;

/// Daily time series for one ticker.
///
/// Invariant: rows are ordered by date ascending with no duplicate dates.
/// `from_rows` establishes the invariant no matter what order the provider
/// returned the rows in; when a date appears twice the first row wins.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    rows: Vec<Ohlcv>,
}

impl TimeSeries {
    /// Build a series from raw fetched rows, sorting and de-duplicating by date.
    pub fn from_rows(mut rows: Vec<Ohlcv>) -> Self {
        rows.sort_by(|a, b| a.time.cmp(&b.time));
        rows.dedup_by_key(|r| r.time.date_naive());
        Self { rows }
    }

    pub fn rows(&self) -> &[Ohlcv] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row, if any.
    pub fn latest(&self) -> Option<&Ohlcv> {
        self.rows.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    /// Row timestamps in date order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.rows.iter().map(|r| r.time).collect()
    }

    /// Calendar dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.time.date_naive()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(day: u32, close: f64) -> Ohlcv {
        let time = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Ohlcv::new(time, close, close, close, close, 1000, "NPN.JO".to_string())
    }

    #[test]
    fn test_from_rows_sorts_by_date() {
        let series = TimeSeries::from_rows(vec![row(3, 103.0), row(1, 101.0), row(2, 102.0)]);

        assert_eq!(series.closes(), vec![101.0, 102.0, 103.0]);
    }

    #[test]
    fn test_from_rows_drops_duplicate_dates() {
        let series = TimeSeries::from_rows(vec![row(1, 101.0), row(1, 999.0), row(2, 102.0)]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes()[1], 102.0);
    }

    #[test]
    fn test_latest_is_last_date() {
        let series = TimeSeries::from_rows(vec![row(2, 102.0), row(5, 105.0), row(3, 103.0)]);

        assert_eq!(series.latest().unwrap().close, 105.0);
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::from_rows(Vec::new());

        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
