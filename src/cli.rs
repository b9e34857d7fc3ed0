use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::commands;
use crate::constants::{DEFAULT_EXPORT_PATH, DEFAULT_LOOKBACK_DAYS};
use crate::error::{Error, Result};
use crate::models::Watchlist;

#[derive(Parser)]
#[command(name = "jseboard")]
#[command(about = "JSE Top 40 performance board", long_about = None)]
pub struct Cli {
    /// Start of the date range (YYYY-MM-DD, default: 90 days back)
    #[arg(long, global = true)]
    pub start: Option<String>,

    /// End of the date range (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    pub end: Option<String>,

    /// Path to a watchlist JSON file (array of ticker symbols)
    #[arg(long, global = true)]
    pub watchlist: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the watchlist tickers
    Tickers,
    /// Show latest daily returns as a sorted bar chart
    Returns,
    /// Rank top performers by daily return
    Top {
        /// How many tickers to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Also show the closing-price history for one of them
        #[arg(long)]
        detail: Option<String>,
    },
    /// Show the closing-price trend for one ticker
    Trend {
        /// Ticker symbol (must be on the watchlist)
        ticker: String,
        /// Also show the RSI tail
        #[arg(long)]
        rsi: bool,
        /// Also show the MACD/signal tail
        #[arg(long)]
        macd: bool,
    },
    /// Show the pairwise return correlation grid
    Heatmap,
    /// Export closing prices to a CSV file
    Export {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,
    },
}

pub fn run() {
    let cli = Cli::parse();

    let context = match build_context(&cli) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Tickers => {
            commands::tickers::run(&context);
        }
        Commands::Returns => {
            commands::returns::run(&context);
        }
        Commands::Top { limit, detail } => {
            commands::top::run(&context, limit, detail.as_deref());
        }
        Commands::Trend { ticker, rsi, macd } => {
            commands::trend::run(&context, &ticker, rsi, macd);
        }
        Commands::Heatmap => {
            commands::heatmap::run(&context);
        }
        Commands::Export { output } => {
            commands::export::run(&context, &output);
        }
    }
}

/// Resolved run configuration shared by every command.
pub struct RunContext {
    pub watchlist: Watchlist,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn build_context(cli: &Cli) -> Result<RunContext> {
    let watchlist = match &cli.watchlist {
        Some(path) => Watchlist::from_file(path)?,
        None => Watchlist::default(),
    };

    let end = match &cli.end {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let start = match &cli.start {
        Some(raw) => parse_date(raw)?,
        None => end - Duration::days(DEFAULT_LOOKBACK_DAYS),
    };

    if start > end {
        return Err(Error::InvalidInput(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    Ok(RunContext {
        watchlist,
        start,
        end,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2024").is_err());
    }
}
