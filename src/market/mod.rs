// Market data: daily closing prices for one symbol.

pub mod fetcher;
pub mod traits;

pub use fetcher::AlphaVantageClient;
pub use traits::MarketData;
