// notifier/twilio/sender.rs

use crate::model::{NotificationMessage, NotifyError};
use crate::notifier::twilio::TwilioMessenger;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Posts one message and returns the message SID Twilio assigned to it.
pub async fn send_message(
    messenger: &TwilioMessenger,
    message: &NotificationMessage,
) -> Result<String, NotifyError> {
    let url = messenger.messages_url();
    debug!("📤 Sending message to {}", message.to);
    info!("📤 Sending message:\n{}", message.body);

    let params = [
        ("Body", message.body.as_str()),
        ("From", message.from.as_str()),
        ("To", message.to.as_str()),
    ];
    let response = messenger
        .client
        .post(&url)
        .basic_auth(&messenger.account_sid, Some(&messenger.auth_token))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "unknown".into());
        warn!("❌ Twilio API responded [{}]: {}", status, body);
        return Err(NotifyError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let resource: MessageResource = response.json().await?;
    Ok(resource.sid)
}
