mod exporter;
mod fetcher;
pub mod yahoo;

pub use exporter::export_closes;
pub use fetcher::{FetchCache, FetchFailure, FetchReport, MarketFetcher};
pub use yahoo::{YahooClient, YahooError};
