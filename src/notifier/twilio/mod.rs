pub mod sender;

use crate::config::AppConfig;
use crate::model::{NotificationMessage, NotifyError};
use crate::notifier::Messenger;
use reqwest::Client;
use std::time::Duration;

/// Sends messages through the Twilio Messages REST resource.
pub struct TwilioMessenger {
    pub account_sid: String,
    pub auth_token: String,
    pub base_url: String,
    pub client: Client,
}

impl TwilioMessenger {
    pub fn new(
        account_sid: String,
        auth_token: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            account_sid,
            auth_token,
            base_url,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.credentials.twilio_sid.clone(),
            config.credentials.twilio_token.clone(),
            config.settings.twilio_endpoint.clone(),
            Duration::from_secs(config.settings.request_timeout_secs),
        )
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait::async_trait]
impl Messenger for TwilioMessenger {
    async fn send(&self, message: &NotificationMessage) -> Result<String, NotifyError> {
        sender::send_message(self, message).await
    }
}
