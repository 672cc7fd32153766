//! Digest delivery.
//!
//! [`Notifier`] receives a finished document, never partial state. Delivery
//! failure is reported and logged but does not invalidate the digest; the
//! run's computed output stands regardless.

use async_trait::async_trait;
use chrono::Local;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::MailConfig;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Accepts a finished document and delivers it to the recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, document: &str) -> Result<(), DeliveryError>;
}

/// Delivers the digest by email through the Mailgun HTTP API.
pub struct MailgunNotifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl MailgunNotifier {
    pub fn new(config: &MailConfig, api_key: String) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newsbrief/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    #[instrument(level = "info", skip_all)]
    async fn deliver(&self, document: &str) -> Result<(), DeliveryError> {
        let timestamp = Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);
        let subject = format!("News Digest ({timestamp})");

        let form = [
            ("from", self.from.as_str()),
            ("to", self.to.as_str()),
            ("subject", subject.as_str()),
            ("text", document),
        ];

        let response = self
            .http
            .post(format!("{}/messages", self.endpoint))
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        info!(status = %response.status(), to = %self.to, "Digest delivered");
        Ok(())
    }
}
