pub mod twilio;

use crate::config::AppConfig;
use crate::model::{Article, NotificationMessage, NotifyError, PriceChange};
use tracing::{error, info};

pub use twilio::TwilioMessenger;

const PLACEHOLDER: &str = "N/A";

/// Delivery channel for finished messages. Returns the provider's message id.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<String, NotifyError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

/// Turns a price change plus headlines into one message per article.
pub struct Notifier {
    messenger: Box<dyn Messenger>,
    symbol: String,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(messenger: Box<dyn Messenger>, symbol: String, from: String, to: String) -> Self {
        Self {
            messenger,
            symbol,
            from,
            to,
        }
    }

    pub fn from_config(messenger: Box<dyn Messenger>, config: &AppConfig) -> Self {
        Self::new(
            messenger,
            config.settings.stock_symbol.clone(),
            config.from_address(),
            config.to_address(),
        )
    }

    pub fn compose_body(&self, change: &PriceChange, article: &Article) -> String {
        format!(
            "{}: {}{:.2}%\nHeadline: {}\nBrief: {}",
            self.symbol,
            change.direction.glyph(),
            change.percent_change,
            article.title.as_deref().unwrap_or(PLACEHOLDER),
            article.description.as_deref().unwrap_or(PLACEHOLDER),
        )
    }

    /// Sends every article on its own; a failed send is logged and the rest still go out.
    pub async fn dispatch(&self, change: &PriceChange, articles: &[Article]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, article) in articles.iter().enumerate() {
            let message = NotificationMessage {
                body: self.compose_body(change, article),
                from: self.from.clone(),
                to: self.to.clone(),
            };

            match self.messenger.send(&message).await {
                Ok(sid) => {
                    info!("Message sent: {}", sid);
                    report.sent += 1;
                }
                Err(e) => {
                    error!("Error sending message {} of {}: {}", index + 1, articles.len(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
