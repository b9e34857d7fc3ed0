//! Batch fetch of the watchlist with per-symbol failure collection.
//!
//! A symbol that comes back empty or errors is recorded in the report and
//! dropped from the series map; the batch never fails as a whole. The
//! caller decides how to surface the failures.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{TimeSeries, Watchlist};
use crate::services::yahoo::{YahooClient, YahooError};

/// Why a symbol is missing from the series map.
#[derive(Debug, Clone)]
pub enum FetchFailure {
    /// The provider had no rows for the symbol in the requested range.
    NoData,
    /// The request itself failed (network, HTTP status, malformed payload).
    Request(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::NoData => write!(f, "no data in range"),
            FetchFailure::Request(reason) => write!(f, "{}", reason),
        }
    }
}

/// Outcome of one watchlist fetch: the series that arrived plus the
/// per-symbol failures for everything that didn't.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    series: HashMap<String, TimeSeries>,
    failures: HashMap<String, FetchFailure>,
}

impl FetchReport {
    pub fn series(&self, symbol: &str) -> Option<&TimeSeries> {
        self.series.get(symbol)
    }

    pub fn failure(&self, symbol: &str) -> Option<&FetchFailure> {
        self.failures.get(symbol)
    }

    /// Number of symbols that produced a series.
    pub fn fetched_count(&self) -> usize {
        self.series.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub(crate) fn record_series(&mut self, symbol: String, series: TimeSeries) {
        self.series.insert(symbol, series);
    }

    pub(crate) fn record_failure(&mut self, symbol: String, failure: FetchFailure) {
        self.failures.insert(symbol, failure);
    }
}

/// Fetches the whole watchlist through a [`YahooClient`], one symbol at a
/// time, collecting results into a [`FetchReport`].
pub struct MarketFetcher {
    client: YahooClient,
}

impl MarketFetcher {
    pub fn new() -> Result<Self, crate::error::Error> {
        let client = YahooClient::new()
            .map_err(|e| crate::error::Error::Config(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch `[start, end]` dailies for every watchlist symbol.
    ///
    /// First attempt per symbol is final. Failures are recorded, logged,
    /// and skipped; the report always comes back.
    pub async fn fetch_all(
        &self,
        watchlist: &Watchlist,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchReport {
        let mut report = FetchReport::default();

        for symbol in watchlist.symbols() {
            match self.client.get_history(symbol, start, end).await {
                Ok(rows) => {
                    let series = TimeSeries::from_rows(rows);
                    tracing::info!("fetched {}: {} rows", symbol, series.len());
                    report.record_series(symbol.clone(), series);
                }
                Err(YahooError::NoData) => {
                    tracing::warn!("no data for {} in range {} - {}", symbol, start, end);
                    report.record_failure(symbol.clone(), FetchFailure::NoData);
                }
                Err(e) => {
                    tracing::warn!("fetch failed for {}: {}", symbol, e);
                    report.record_failure(symbol.clone(), FetchFailure::Request(e.to_string()));
                }
            }
        }

        report
    }
}

/// In-memory memoization of fetches, keyed by (tickers, date range).
///
/// Owned by the caller for the duration of one invocation; nothing here
/// survives the process.
#[derive(Default)]
pub struct FetchCache {
    entries: HashMap<(String, NaiveDate, NaiveDate), FetchReport>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for this watchlist and range, fetching it
    /// on first use.
    pub async fn get_or_fetch(
        &mut self,
        fetcher: &MarketFetcher,
        watchlist: &Watchlist,
        start: NaiveDate,
        end: NaiveDate,
    ) -> &FetchReport {
        let key = (watchlist.symbols().join(","), start, end);

        if !self.entries.contains_key(&key) {
            let report = fetcher.fetch_all(watchlist, start, end).await;
            self.entries.insert(key.clone(), report);
        } else {
            tracing::debug!("fetch cache hit for {:?}", key);
        }

        &self.entries[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ohlcv;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_report_separates_series_and_failures() {
        let mut report = FetchReport::default();
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let rows = vec![Ohlcv::new(time, 1.0, 1.0, 1.0, 1.0, 10, "NPN.JO".into())];

        report.record_series("NPN.JO".to_string(), TimeSeries::from_rows(rows));
        report.record_failure("MTN.JO".to_string(), FetchFailure::NoData);

        assert_eq!(report.fetched_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.series("NPN.JO").is_some());
        assert!(report.series("MTN.JO").is_none());
        assert!(matches!(
            report.failure("MTN.JO"),
            Some(FetchFailure::NoData)
        ));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(FetchFailure::NoData.to_string(), "no data in range");
        assert_eq!(
            FetchFailure::Request("HTTP error (500)".to_string()).to_string(),
            "HTTP error (500)"
        );
    }
}
