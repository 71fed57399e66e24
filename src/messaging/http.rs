//! SMS delivery through an HTTP gateway
//!
//! Posts `{"to": "...", "body": "..."}` as JSON to the configured gateway,
//! optionally with a bearer token. Transient failures (transport errors,
//! 429 and 5xx responses) are retried according to the configured policy.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::core::retry::{retry_async_if, RetryPolicy};
use crate::messaging::error::{MessagingError, MessagingResult};
use crate::messaging::traits::NotificationSender;
use crate::serving::api::TrackingLinks;

/// Connection settings for the SMS gateway
#[derive(Debug, Clone, PartialEq)]
pub struct SmsSettings {
    pub gateway_url: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl SmsSettings {
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            auth_token: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    body: &'a str,
}

/// Text sent to a newly registered client
pub fn registration_message(name: &str, sequence_number: u64, tracking_reference: &str) -> String {
    format!(
        "Hi {name}, you are number {sequence_number} in the queue. Track your place: {tracking_reference}"
    )
}

#[derive(Debug, Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    gateway_url: reqwest::Url,
    auth_token: Option<String>,
    retry: RetryPolicy,
    tracking: TrackingLinks,
}

impl HttpSmsSender {
    pub fn new(settings: SmsSettings, tracking: TrackingLinks) -> MessagingResult<Self> {
        let gateway_url = reqwest::Url::parse(settings.gateway_url.trim()).map_err(|e| {
            MessagingError::InvalidConfig {
                message: format!("gateway url '{}': {}", settings.gateway_url, e),
            }
        })?;
        if !matches!(gateway_url.scheme(), "http" | "https") {
            return Err(MessagingError::InvalidConfig {
                message: format!("gateway url '{gateway_url}' must use http or https"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| MessagingError::InvalidConfig {
                message: format!("HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            gateway_url,
            auth_token: settings.auth_token,
            retry: settings.retry,
            tracking,
        })
    }

    async fn post_once(&self, contact: &str, body: &str) -> MessagingResult<()> {
        let mut request = self
            .client
            .post(self.gateway_url.clone())
            .json(&SmsPayload { to: contact, body });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MessagingError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NotificationSender for HttpSmsSender {
    async fn send(&self, contact: &str, sequence_number: u64, name: &str) -> MessagingResult<()> {
        let tracking_reference = self.tracking.reference(sequence_number);
        let body = registration_message(name, sequence_number, &tracking_reference);

        retry_async_if(
            "sms_gateway_post",
            self.retry.clone(),
            || self.post_once(contact, &body),
            MessagingError::is_transient,
        )
        .await?;

        log::debug!("Sent registration SMS for #{} to {}", sequence_number, contact);
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "sms"
    }
}
