use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WATCHLIST;
use crate::error::{Error, Result};

/// Ordered, immutable list of ticker symbols for one run.
///
/// The order is presentation order: commands iterate the watchlist, not the
/// fetched map, so output stays stable regardless of which symbols failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    /// Load a watchlist from a JSON file containing an array of symbols.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read watchlist: {}", e)))?;
        let symbols: Vec<String> = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid watchlist JSON: {}", e)))?;

        Self::from_symbols(symbols)
    }

    /// Build a watchlist from symbols, upper-casing and dropping duplicates
    /// while keeping first-seen order.
    pub fn from_symbols(symbols: Vec<String>) -> Result<Self> {
        let mut seen = Vec::new();
        for symbol in symbols {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            if !seen.contains(&symbol) {
                seen.push(symbol);
            }
        }

        if seen.is_empty() {
            return Err(Error::Config("Watchlist contains no symbols".to_string()));
        }

        Ok(Self { symbols: seen })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_watchlist_is_nonempty() {
        let watchlist = Watchlist::default();

        assert!(watchlist.len() >= 5);
        assert!(watchlist.contains("NPN.JO"));
    }

    #[test]
    fn test_from_symbols_dedups_and_uppercases() {
        let watchlist = Watchlist::from_symbols(vec![
            "npn.jo".to_string(),
            "MTN.JO".to_string(),
            "NPN.JO".to_string(),
            "  ".to_string(),
        ])
        .unwrap();

        assert_eq!(watchlist.symbols(), &["NPN.JO", "MTN.JO"]);
    }

    #[test]
    fn test_from_symbols_rejects_empty() {
        assert!(Watchlist::from_symbols(Vec::new()).is_err());
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join("jseboard_watchlist_test.json");
        std::fs::write(&path, r#"["SOL.JO", "BHP.JO"]"#).unwrap();

        let watchlist = Watchlist::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(watchlist.symbols(), &["SOL.JO", "BHP.JO"]);
    }
}
