//! Chat-group webhook delivery

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{AuditReport, Notifier};
use crate::error::{AuditError, Result};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts reports as plain text messages to a chat-bot webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self { client, url: url.into() })
    }

    /// `{"msg_type": "text", "content": {"text": "【title】\n..."}}`
    pub fn payload(report: &AuditReport) -> Value {
        json!({
            "msg_type": "text",
            "content": {
                "text": format!("【{}】\n{}", report.verdict.title(), report.message()),
            }
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, report: &AuditReport) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(report))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Notify(format!("webhook returned {}", status)));
        }
        log::info!("Report for {} pushed to webhook", report.buyer);
        Ok(())
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // hook URLs embed their secret
        f.debug_struct("WebhookNotifier").field("url", &"[REDACTED]").finish()
    }
}
