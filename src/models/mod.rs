mod ohlcv;
mod series;
mod watchlist;
pub mod indicators;

pub use ohlcv::Ohlcv;
pub use series::TimeSeries;
pub use watchlist::Watchlist;
