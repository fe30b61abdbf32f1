//! Notification - delivering finished audit reports
//!
//! Every audited order becomes an [`AuditReport`]; each configured
//! [`Notifier`] receives it. Delivery failures are the caller's to log; they
//! never stop a scan.

mod console;
mod webhook;

pub use console::ConsoleNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;

use crate::config::NotifyConfig;
use crate::error::Result;
use crate::mall::Order;
use crate::verdict::Verdict;

const RULE: &str = "------------------------------";

/// Outcome of auditing one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub buyer: String,
    pub gift: String,
    pub order_id: String,
    pub verdict: Verdict,
    /// Engine answer, verbatim
    pub answer: String,
}

impl AuditReport {
    pub fn new(order: &Order, answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self {
            buyer: order.buyer_name().to_string(),
            gift: order.gift().to_string(),
            order_id: order.id_display(),
            verdict: Verdict::classify(&answer),
            answer,
        }
    }

    /// Plain-text body shared by every channel
    pub fn message(&self) -> String {
        format!(
            "判定结论: {} {}\n买家昵称: {}\n兑换礼品: {}\n订单编号: {}\n{}\n🤖 AI 审计报告：\n{}",
            self.verdict.emoji(),
            self.verdict.title(),
            self.buyer,
            self.gift,
            self.order_id,
            RULE,
            self.answer
        )
    }
}

/// A destination for audit reports
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name for logs
    fn name(&self) -> &str;

    async fn notify(&self, report: &AuditReport) -> Result<()>;
}

/// Notifiers enabled by `config`: console first, then the webhook
pub fn from_config(config: &NotifyConfig) -> Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if config.console {
        notifiers.push(Box::new(ConsoleNotifier::new()));
    }
    if let Some(url) = config.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        notifiers.push(Box::new(WebhookNotifier::new(url)?));
    }
    Ok(notifiers)
}
