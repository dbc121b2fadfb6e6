use crate::config::AppConfig;
use crate::model::{Article, NewsError};
use crate::news::traits::NewsSource;

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        // NewsAPI rejects requests without a user agent
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
            config.settings.news_endpoint.clone(),
            config.credentials.news_api_key.clone(),
            Duration::from_secs(config.settings.request_timeout_secs),
        )
    }

    async fn try_fetch(&self, company_name: &str) -> Result<Vec<Article>, NewsError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("qInTitle", company_name),
                ("sortBy", "publishedAt"),
                ("language", "en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
            });
        }

        let body: NewsResponse = response.json().await?;
        Ok(body.articles)
    }
}

#[async_trait::async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_top_articles(&self, company_name: &str, limit: usize) -> Vec<Article> {
        match self.try_fetch(company_name).await {
            Ok(mut articles) => {
                info!("News endpoint returned {} articles for '{}'", articles.len(), company_name);
                articles.truncate(limit);
                articles
            }
            Err(e) => {
                error!("Error fetching news: {}", e);
                Vec::new()
            }
        }
    }
}
