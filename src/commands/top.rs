use crate::cli::RunContext;
use crate::error::{Error, Result};
use crate::models::indicators::daily_return;
use crate::services::{FetchCache, FetchReport, MarketFetcher};

pub fn run(context: &RunContext, limit: usize, detail: Option<&str>) {
    match show_top(context, limit, detail) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn show_top(context: &RunContext, limit: usize, detail: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Network(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let fetcher = MarketFetcher::new()?;
        let mut cache = FetchCache::new();

        {
            let report = cache
                .get_or_fetch(&fetcher, &context.watchlist, context.start, context.end)
                .await;
            print_ranking(context, report, limit)?;
        }

        // Detail view re-reads through the cache, so no second request goes out
        if let Some(ticker) = detail {
            let ticker = ticker.to_uppercase();
            let report = cache
                .get_or_fetch(&fetcher, &context.watchlist, context.start, context.end)
                .await;
            print_detail(&ticker, report)?;
        }

        Ok(())
    })
}

fn print_ranking(context: &RunContext, report: &FetchReport, limit: usize) -> Result<()> {
    for symbol in context.watchlist.symbols() {
        if let Some(failure) = report.failure(symbol) {
            eprintln!("⚠️  Skipping {}: {}", symbol, failure);
        }
    }

    let mut rows: Vec<(&str, f64, f64)> = Vec::new();
    for symbol in context.watchlist.symbols() {
        let Some(series) = report.series(symbol) else {
            continue;
        };
        let Some(latest) = series.latest() else {
            continue;
        };
        if let Some(change) = daily_return(series) {
            rows.push((symbol, latest.close, change));
        } else {
            eprintln!("⚠️  Skipping {}: insufficient history", symbol);
        }
    }

    if rows.is_empty() {
        return Err(Error::NotFound(
            "No ticker had enough history to rank".to_string(),
        ));
    }

    rows.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    println!("🏆 Top Performers ({} → {})\n", context.start, context.end);
    println!("  {:<4} {:<8} {:>12} {:>10}", "Rank", "Ticker", "Last Price", "Return");
    for (i, (symbol, close, change)) in rows.iter().take(limit).enumerate() {
        println!("  {:<4} {:<8} {:>12.2} {:>9.2}%", i + 1, symbol, close, change);
    }

    Ok(())
}

fn print_detail(ticker: &str, report: &FetchReport) -> Result<()> {
    let series = report
        .series(ticker)
        .ok_or_else(|| Error::NotFound(format!("No data for {}", ticker)))?;

    println!("\n📈 {} closing prices ({} rows)\n", ticker, series.len());
    for row in series.rows() {
        println!("  {}  {:>10.2}", row.time.format("%Y-%m-%d"), row.close);
    }

    Ok(())
}
