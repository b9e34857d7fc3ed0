use crate::cli::RunContext;
use crate::commands::fetch_report;
use crate::models::indicators::{correlation_matrix, pct_change_series, CorrelationMatrix};

pub fn run(context: &RunContext) {
    let report = match fetch_report(context) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut returns = Vec::new();
    for symbol in context.watchlist.symbols() {
        if let Some(series) = report.series(symbol) {
            returns.push((symbol.clone(), pct_change_series(series)));
        }
    }

    if returns.len() < 2 {
        eprintln!("❌ Need at least 2 tickers with data for a correlation grid");
        std::process::exit(1);
    }

    let matrix = correlation_matrix(&returns);

    println!(
        "🔥 Daily Return Correlation ({} → {})\n",
        context.start, context.end
    );
    print_grid(&matrix);
}

fn print_grid(matrix: &CorrelationMatrix) {
    let symbols = matrix.symbols();

    print!("  {:<8}", "");
    for symbol in symbols {
        print!(" {:>8}", symbol);
    }
    println!();

    for (i, row_symbol) in symbols.iter().enumerate() {
        print!("  {:<8}", row_symbol);
        for j in 0..symbols.len() {
            match matrix.get(i, j) {
                Some(value) => print!(" {:>8.2}", value),
                None => print!(" {:>8}", "n/a"),
            }
        }
        println!();
    }
}
