use crate::config::AppConfig;
use crate::market::traits::MarketData;
use crate::model::{DailyBar, MarketDataError, PriceSeries};

use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, warn};

pub const TIME_SERIES_FUNCTION: &str = "TIME_SERIES_DAILY";
pub const SERIES_KEY: &str = "Time Series (Daily)";

pub struct AlphaVantageClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("StockAlert/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.settings.stock_endpoint.clone(),
            config.credentials.stock_api_key.clone(),
            Duration::from_secs(config.settings.request_timeout_secs),
        )
    }
}

#[async_trait::async_trait]
impl MarketData for AlphaVantageClient {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<PriceSeries, MarketDataError> {
        info!("Fetching daily series for {}", symbol);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("function", TIME_SERIES_FUNCTION),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Market data endpoint responded [{}]", status);
            return Err(MarketDataError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_daily_series(&body)
    }
}

/// Extracts the daily series from a raw provider payload. Rate-limit notes and
/// error messages come back with a 200 status, so the series key is checked here.
pub fn parse_daily_series(body: &str) -> Result<PriceSeries, MarketDataError> {
    let mut payload: Value = serde_json::from_str(body).map_err(|e| {
        error!("Unparseable market data response: {}", body);
        MarketDataError::Schema(e.to_string())
    })?;

    let Some(series) = payload.get_mut(SERIES_KEY).map(Value::take) else {
        error!("Unexpected API response: {}", payload);
        return Err(MarketDataError::Schema(format!("missing field {:?}", SERIES_KEY)));
    };

    let bars: BTreeMap<NaiveDate, DailyBar> = serde_json::from_value(series).map_err(|e| {
        error!("Malformed daily series: {}", e);
        MarketDataError::Schema(e.to_string())
    })?;

    Ok(PriceSeries::new(bars))
}
