//! Derived metrics over daily close series.
//!
//! Every function here is pure: no I/O, no hidden state, deterministic for a
//! given input. Metrics that need more history than the series carries come
//! back as `None` rather than panicking or leaking NaN into the output.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::TimeSeries;
use crate::constants::{MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN};

/// Latest daily percentage return: `(close[-1] - close[-2]) / close[-2] * 100`.
///
/// `None` when the series has fewer than 2 rows or the previous close is
/// zero — "unavailable", never a panic.
pub fn daily_return(series: &TimeSeries) -> Option<f64> {
    let rows = series.rows();
    if rows.len() < 2 {
        return None;
    }

    let prev = rows[rows.len() - 2].close;
    let last = rows[rows.len() - 1].close;
    if prev == 0.0 {
        return None;
    }

    Some((last - prev) / prev * 100.0)
}

/// Elementwise daily percentage change of closes, first element omitted.
///
/// Each entry is tagged with the timestamp of the *later* row so return
/// series from different tickers can be aligned by date. Pairs with a zero
/// previous close are skipped.
pub fn pct_change_series(series: &TimeSeries) -> Vec<(DateTime<Utc>, f64)> {
    let rows = series.rows();
    let mut changes = Vec::with_capacity(rows.len().saturating_sub(1));

    for pair in rows.windows(2) {
        let prev = pair[0].close;
        if prev == 0.0 {
            continue;
        }
        changes.push((pair[1].time, (pair[1].close - prev) / prev * 100.0));
    }

    changes
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`,
/// seeded by the first value. No bias adjustment.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    out
}

/// Relative Strength Index over a trailing window of `period` closes.
///
/// Output has the same length as the input. Index `i` is defined once a full
/// window ends there (`i >= period - 1`); the gains and losses among the
/// window's deltas are averaged with a simple mean, then
/// `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`.
///
/// Earlier indices stay `None` — never backfilled. A window with no losses
/// reads 100; a completely flat window reads 50 (neutral). Defined values
/// are always within [0, 100].
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period < 2 || closes.len() < period {
        return out;
    }

    let deltas_per_window = (period - 1) as f64;
    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for pair in window.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum += -delta;
            }
        }

        let avg_gain = gain_sum / deltas_per_window;
        let avg_loss = loss_sum / deltas_per_window;

        let value = if avg_loss == 0.0 && avg_gain == 0.0 {
            50.0
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };

        out[i] = Some(value);
    }

    out
}

/// MACD and signal line, full length, aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    /// `EMA(close, 12) - EMA(close, 26)` per point.
    pub macd: Vec<f64>,
    /// `EMA(macd, 9)` per point.
    pub signal: Vec<f64>,
}

/// Moving Average Convergence Divergence of a close series.
pub fn macd(closes: &[f64]) -> Macd {
    let fast = ema(closes, MACD_FAST_SPAN);
    let slow = ema(closes, MACD_SLOW_SPAN);

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, MACD_SIGNAL_SPAN);

    Macd { macd: line, signal }
}

/// Pairwise Pearson correlation of daily-return series, aligned by date.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Correlation between symbols `i` and `j`; `None` where undefined.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values[i][j]
    }
}

/// Build the correlation matrix for the given `(symbol, return series)`
/// pairs, preserving their order.
///
/// Each pair of tickers is aligned on the intersection of their dates. The
/// entry is `None` when the overlap has fewer than 2 points or either
/// aligned series has zero variance.
pub fn correlation_matrix(returns: &[(String, Vec<(DateTime<Utc>, f64)>)]) -> CorrelationMatrix {
    let symbols: Vec<String> = returns.iter().map(|(s, _)| s.clone()).collect();
    let by_date: Vec<HashMap<NaiveDate, f64>> = returns
        .iter()
        .map(|(_, series)| {
            series
                .iter()
                .map(|(time, value)| (time.date_naive(), *value))
                .collect()
        })
        .collect();

    let n = symbols.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (date, x) in &by_date[i] {
                if let Some(y) = by_date[j].get(date) {
                    xs.push(*x);
                    ys.push(*y);
                }
            }

            let corr = pearson(&xs, &ys);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    CorrelationMatrix { symbols, values }
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// `None` for fewer than 2 points or zero variance on either side.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 2 {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
