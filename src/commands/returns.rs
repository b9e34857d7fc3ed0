use crate::cli::RunContext;
use crate::commands::fetch_report;
use crate::models::indicators::daily_return;

const BAR_WIDTH: usize = 40;

pub fn run(context: &RunContext) {
    let report = match fetch_report(context) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut returns: Vec<(&str, f64)> = Vec::new();
    let mut unavailable: Vec<&str> = Vec::new();

    for symbol in context.watchlist.symbols() {
        let Some(series) = report.series(symbol) else {
            continue;
        };
        match daily_return(series) {
            Some(value) => returns.push((symbol, value)),
            None => unavailable.push(symbol),
        }
    }

    if returns.is_empty() {
        eprintln!("❌ No ticker had enough history for a daily return");
        std::process::exit(1);
    }

    returns.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("📊 Daily Return Comparison ({} → {})\n", context.start, context.end);

    let max_abs = returns
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    for (symbol, value) in &returns {
        println!("  {:<8} {:>7.2}%  {}", symbol, value, bar(*value, max_abs));
    }

    for symbol in &unavailable {
        println!("  {:<8}     n/a  (insufficient history)", symbol);
    }
}

/// Scale a return into a signed ASCII bar against the largest magnitude.
fn bar(value: f64, max_abs: f64) -> String {
    if max_abs == 0.0 {
        return String::new();
    }

    let len = ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
    let glyph = if value < 0.0 { '░' } else { '█' };
    std::iter::repeat(glyph).take(len.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_against_max() {
        assert_eq!(bar(2.0, 2.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1.0, 2.0).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_bar_negative_uses_light_glyph() {
        assert!(bar(-1.0, 2.0).starts_with('░'));
    }

    #[test]
    fn test_bar_zero_max_is_empty() {
        assert!(bar(0.0, 0.0).is_empty());
    }
}
