use crate::model::{MarketDataError, PriceSeries};

#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<PriceSeries, MarketDataError>;
}
