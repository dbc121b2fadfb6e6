mod analyzer;
mod config;
mod market;
mod model;
mod news;
mod notifier;
mod pipeline;
mod utils;

use analyzer::ChangeCalculatorImpl;
use config::{load_config, AppConfig};
use market::AlphaVantageClient;
use news::NewsApiClient;
use notifier::{Notifier, TwilioMessenger};
use pipeline::{AbortReason, Outcome, Pipeline};
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    info!("Starting stock alert system for {}", config.settings.stock_symbol);
    let missing = config.credentials.missing();
    if !missing.is_empty() {
        warn!("Unset environment variables: {}", missing.join(", "));
    }

    if let Err(e) = run_once(&config).await {
        error!("Failed to build HTTP client: {}", e);
    }
}

/// Builds the clients from `config` and performs a single pass of the pipeline.
async fn run_once(config: &AppConfig) -> Result<(), reqwest::Error> {
    let market = AlphaVantageClient::from_config(config)?;
    let news = NewsApiClient::from_config(config)?;
    let messenger = TwilioMessenger::from_config(config)?;
    let notifier = Notifier::from_config(Box::new(messenger), config);
    let calculator = ChangeCalculatorImpl::new();

    let pipeline = Pipeline {
        market: &market,
        calculator: &calculator,
        news: &news,
        notifier: &notifier,
        symbol: &config.settings.stock_symbol,
        company_name: &config.settings.company_name,
        alert_threshold: config.settings.alert_threshold,
        article_limit: config.settings.article_limit,
    };

    match pipeline.run().await {
        Outcome::Aborted(AbortReason::MarketData(e)) => {
            warn!("Run aborted, no price data: {}", e)
        }
        Outcome::Aborted(AbortReason::Calculation(e)) => {
            warn!("Run aborted, no price change: {}", e)
        }
        Outcome::BelowThreshold(change) => {
            info!("Finished without alert ({}%)", change.percent_change)
        }
        Outcome::NoArticles(change) => {
            warn!("Threshold crossed ({}%) but no articles to send", change.percent_change)
        }
        Outcome::Notified { change, report } if report.failed == 0 => info!(
            "Alerts sent successfully for {}% ({} messages)",
            change.percent_change, report.sent
        ),
        Outcome::Notified { change, report } => warn!(
            "Alerts for {}% partially sent: {} ok, {} failed",
            change.percent_change, report.sent, report.failed
        ),
    }

    Ok(())
}
