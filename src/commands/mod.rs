pub mod export;
pub mod heatmap;
pub mod returns;
pub mod tickers;
pub mod top;
pub mod trend;

use crate::cli::RunContext;
use crate::error::{Error, Result};
use crate::services::{FetchReport, MarketFetcher};

/// Fetch the whole watchlist for the run's date range, blocking on a fresh
/// Tokio runtime, and print per-symbol warnings for anything that failed.
pub(crate) fn fetch_report(context: &RunContext) -> Result<FetchReport> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Network(format!("Failed to create runtime: {}", e)))?;

    let report = runtime.block_on(async {
        let fetcher = MarketFetcher::new()?;
        Ok::<FetchReport, Error>(
            fetcher
                .fetch_all(&context.watchlist, context.start, context.end)
                .await,
        )
    })?;

    for symbol in context.watchlist.symbols() {
        if let Some(failure) = report.failure(symbol) {
            eprintln!("⚠️  Skipping {}: {}", symbol, failure);
        }
    }

    if report.fetched_count() == 0 {
        return Err(Error::NotFound(
            "No data for any watchlist symbol".to_string(),
        ));
    }

    Ok(report)
}
