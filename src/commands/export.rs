use std::path::Path;

use crate::cli::RunContext;
use crate::commands::fetch_report;
use crate::services::export_closes;

pub fn run(context: &RunContext, output: &Path) {
    let report = match fetch_report(context) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match export_closes(output, &context.watchlist, &report) {
        Ok(rows) => {
            println!(
                "✅ Exported {} rows for {} tickers to {}",
                rows,
                report.fetched_count(),
                output.display()
            );
        }
        Err(e) => {
            eprintln!("❌ Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
