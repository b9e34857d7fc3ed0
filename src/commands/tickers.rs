use crate::cli::RunContext;

pub fn run(context: &RunContext) {
    println!("📋 JSE Top 40 Watchlist ({} tickers)\n", context.watchlist.len());

    for (i, symbol) in context.watchlist.symbols().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, symbol);
    }
}
