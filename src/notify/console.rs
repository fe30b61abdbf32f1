//! Terminal report output

use async_trait::async_trait;
use colored::{ColoredString, Colorize};

use super::{AuditReport, Notifier};
use crate::error::Result;
use crate::verdict::Verdict;

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

fn paint(verdict: Verdict, text: &str) -> ColoredString {
    match verdict {
        Verdict::Violation => text.red().bold(),
        Verdict::HighRisk => text.yellow().bold(),
        Verdict::Compliant => text.green(),
        Verdict::Inconclusive => text.blue(),
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, report: &AuditReport) -> Result<()> {
        println!("状态判定: {}", paint(report.verdict, &report.verdict.to_string()));
        println!("买家昵称: {}", report.buyer.cyan());
        println!("兑换物品: {}", report.gift);
        println!("订单编号: {}", report.order_id.dimmed());
        println!("{}", "--- 🤖 详细审计报告 ---".bold());
        println!("{}", report.answer);
        println!("{}", "—".repeat(50).dimmed());
        Ok(())
    }
}
