use crate::cli::RunContext;
use crate::commands::fetch_report;
use crate::constants::RSI_PERIOD;
use crate::error::{Error, Result};
use crate::models::indicators::{macd, rsi};
use crate::models::TimeSeries;

const CHART_WIDTH: usize = 50;
const TAIL_ROWS: usize = 10;

pub fn run(context: &RunContext, ticker: &str, show_rsi: bool, show_macd: bool) {
    match show_trend(context, ticker, show_rsi, show_macd) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn show_trend(context: &RunContext, ticker: &str, show_rsi: bool, show_macd: bool) -> Result<()> {
    let ticker = ticker.to_uppercase();
    if !context.watchlist.contains(&ticker) {
        return Err(Error::InvalidInput(format!(
            "{} is not on the watchlist (see 'jseboard tickers')",
            ticker
        )));
    }

    let report = fetch_report(context)?;
    let series = report
        .series(&ticker)
        .ok_or_else(|| Error::NotFound(format!("No data for {}", ticker)))?;

    println!(
        "📈 {} closing price trend ({} → {}, {} rows)\n",
        ticker,
        context.start,
        context.end,
        series.len()
    );
    print_close_chart(series);

    if show_rsi {
        print_rsi_tail(series);
    }
    if show_macd {
        print_macd_tail(series);
    }

    Ok(())
}

fn print_close_chart(series: &TimeSeries) {
    let closes = series.closes();
    let min = closes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    for row in series.rows() {
        let len = if span == 0.0 {
            CHART_WIDTH / 2
        } else {
            ((row.close - min) / span * CHART_WIDTH as f64).round() as usize
        };
        let bar: String = std::iter::repeat('▇').take(len.max(1)).collect();
        println!("  {}  {:>10.2}  {}", row.time.format("%Y-%m-%d"), row.close, bar);
    }
}

fn print_rsi_tail(series: &TimeSeries) {
    println!("\n🔄 RSI({}) — last {} defined points\n", RSI_PERIOD, TAIL_ROWS);

    let values = rsi(&series.closes(), RSI_PERIOD);
    let defined: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    if defined.is_empty() {
        println!("  n/a (need at least {} rows, have {})", RSI_PERIOD, series.len());
        return;
    }

    let rows = series.rows();
    let tail_start = defined.len().saturating_sub(TAIL_ROWS);
    for (i, value) in &defined[tail_start..] {
        println!("  {}  {:>6.2}", rows[*i].time.format("%Y-%m-%d"), value);
    }
}

fn print_macd_tail(series: &TimeSeries) {
    println!("\n📉 MACD(12,26,9) — last {} points\n", TAIL_ROWS);

    if series.is_empty() {
        println!("  n/a (no rows)");
        return;
    }

    let result = macd(&series.closes());
    let rows = series.rows();
    let tail_start = rows.len().saturating_sub(TAIL_ROWS);

    println!("  {:<12} {:>10} {:>10}", "Date", "MACD", "Signal");
    for i in tail_start..rows.len() {
        println!(
            "  {:<12} {:>10.4} {:>10.4}",
            rows[i].time.format("%Y-%m-%d"),
            result.macd[i],
            result.signal[i]
        );
    }
}
