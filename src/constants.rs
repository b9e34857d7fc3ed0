//! Watchlist and indicator defaults.
//!
//! Ticker symbols use Yahoo Finance notation: JSE listings carry the `.JO`
//! suffix (e.g. `NPN.JO` for Naspers). Prices come back in ZAc (cents),
//! which is fine here since every derived metric is a ratio or a percentage.

/// Default watchlist: a hand-picked subset of the JSE Top 40.
pub const DEFAULT_WATCHLIST: &[&str] = &[
    "NPN.JO", // Naspers
    "MTN.JO", // MTN Group
    "SOL.JO", // Sasol
    "BHP.JO", // BHP Group
    "ABG.JO", // Absa Group
    "AGL.JO", // Anglo American
    "FSR.JO", // FirstRand
    "SBK.JO", // Standard Bank
];

/// Default lookback window in calendar days when no --start is given.
///
/// 90 days of dailies is enough history for the RSI window and for the
/// 26-period EMA inside MACD to settle.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// RSI trailing window length.
pub const RSI_PERIOD: usize = 14;

/// MACD fast/slow/signal EMA spans.
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Default output path for the `export` command.
pub const DEFAULT_EXPORT_PATH: &str = "closes.csv";
