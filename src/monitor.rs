//! Monitor - periodic order scanning
//!
//! Each scan pulls the newest redemption orders, audits them one at a time,
//! classifies each answer and hands the report to every notifier. Scans
//! repeat on a fixed interval until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::mall::{OrderSource, format_order_for_audit};
use crate::notify::{AuditReport, Notifier};
use crate::react::ReactEngine;

pub struct Monitor<L: LlmClient + ?Sized> {
    engine: ReactEngine<L>,
    source: Arc<dyn OrderSource>,
    notifiers: Vec<Box<dyn Notifier>>,
    orders_per_scan: u32,
    interval: Duration,
}

impl<L: LlmClient + ?Sized> Monitor<L> {
    /// Scan size from `mall.orders_per_scan`, interval from `monitor.check_interval_secs`
    pub fn with_config(
        engine: ReactEngine<L>,
        source: Arc<dyn OrderSource>,
        notifiers: Vec<Box<dyn Notifier>>,
        config: &Config,
    ) -> Self {
        Self {
            engine,
            source,
            notifiers,
            orders_per_scan: config.mall.orders_per_scan,
            interval: Duration::from_secs(config.monitor.check_interval_secs),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Audit the current batch of orders once
    ///
    /// A failed order fetch counts as an empty batch.
    pub async fn scan_once(&self) -> Vec<AuditReport> {
        log::info!("Scanning for the latest {} orders", self.orders_per_scan);

        let orders = match self.source.latest_orders(self.orders_per_scan).await {
            Ok(orders) => orders,
            Err(e) => {
                log::warn!("Failed to fetch orders, skipping this scan: {}", e);
                Vec::new()
            }
        };

        if orders.is_empty() {
            log::info!("No new orders");
            return Vec::new();
        }
        log::info!("Found {} orders, starting audits", orders.len());

        let mut reports = Vec::with_capacity(orders.len());
        for order in orders.iter().take(self.orders_per_scan as usize) {
            log::info!("Auditing order {} from {}", order.id_display(), order.buyer_name());

            let question = format_order_for_audit(order);
            let answer = self.engine.run_audit(&question).await;
            let report = AuditReport::new(order, answer);

            log::info!("Order {} verdict: {:?}", report.order_id, report.verdict);
            self.dispatch(&report).await;
            reports.push(report);
        }
        reports
    }

    async fn dispatch(&self, report: &AuditReport) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(report).await {
                log::error!("Notifier {} failed for order {}: {}", notifier.name(), report.order_id, e);
            }
        }
    }

    /// Scan now and then every interval until `shutdown` resolves.
    ///
    /// Returns the number of completed scans.
    pub async fn run_until<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut scans = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                reports = self.scan_once() => {
                    scans += 1;
                    log::info!(
                        "Scan {} complete ({} audited), next scan in {:.1} minutes",
                        scans,
                        reports.len(),
                        self.interval.as_secs_f64() / 60.0
                    );
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = sleep(self.interval) => {}
            }
        }

        log::info!("Monitor stopped after {} scans", scans);
        scans
    }

    /// Scan until Ctrl-C
    pub async fn run(&self) -> usize {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuditError, Result};
    use crate::llm::{LlmError, MockLlmClient};
    use crate::mall::Order;
    use crate::prompt::PromptRenderer;
    use crate::react::{BackoffPolicy, EngineConfig};
    use crate::tools::{FnTool, ToolExecutor};
    use crate::verdict::Verdict;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticOrders(Vec<Order>);

    #[async_trait]
    impl OrderSource for StaticOrders {
        async fn latest_orders(&self, _size: u32) -> Result<Vec<Order>> {
            Ok(self.0.clone())
        }
    }

    struct FailingOrders;

    #[async_trait]
    impl OrderSource for FailingOrders {
        async fn latest_orders(&self, _size: u32) -> Result<Vec<Order>> {
            Err(AuditError::Mall("order api returned 500".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        reports: Arc<Mutex<Vec<AuditReport>>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, report: &AuditReport) -> Result<()> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct BrokenNotifier;

    #[async_trait]
    impl Notifier for BrokenNotifier {
        fn name(&self) -> &str {
            "broken"
        }

        async fn notify(&self, _report: &AuditReport) -> Result<()> {
            Err(AuditError::Notify("connection refused".to_string()))
        }
    }

    fn order(buyer: &str) -> Order {
        serde_json::from_value(serde_json::json!({"id": 1, "buyer": buyer, "giftName": "水杯"})).unwrap()
    }

    fn engine(mock: &Arc<MockLlmClient>) -> ReactEngine<MockLlmClient> {
        let tools = ToolExecutor::from_tools(vec![Box::new(FnTool::new(
            "get_user_points",
            "Ledger lookup",
            |_: &str| Ok("[]".to_string()),
        ))]);
        let config = EngineConfig {
            backoff: BackoffPolicy::none(),
            ..EngineConfig::default()
        };
        ReactEngine::new(mock.clone(), tools, PromptRenderer::default(), config)
    }

    fn default_monitor(
        engine: ReactEngine<MockLlmClient>,
        source: Arc<dyn OrderSource>,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> Monitor<MockLlmClient> {
        Monitor::with_config(engine, source, notifiers, &Config::default())
    }

    #[tokio::test]
    async fn test_scan_audits_each_order() {
        let mock = Arc::new(MockLlmClient::with_replies(["Finish[[违规] 刷分]", "Finish[合规]"]));
        let recorder = RecordingNotifier::default();
        let seen = recorder.reports.clone();
        let monitor = default_monitor(
            engine(&mock),
            Arc::new(StaticOrders(vec![order("Alice"), order("Bob")])),
            vec![Box::new(recorder)],
        );

        let reports = monitor.scan_once().await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].buyer, "Alice");
        assert_eq!(reports[0].verdict, Verdict::Violation);
        assert_eq!(reports[1].buyer, "Bob");
        assert_eq!(reports[1].verdict, Verdict::Compliant);
        assert_eq!(*seen.lock().unwrap(), reports);

        // each audit is its own run with a fresh transcript
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].messages[1].content.contains("Alice"));
        assert_eq!(requests[1].messages.len(), 2);
        assert!(requests[1].messages[1].content.contains("Bob"));
    }

    #[tokio::test]
    async fn test_scan_respects_orders_per_scan() {
        let mock = Arc::new(MockLlmClient::with_replies(["Finish[合规]", "Finish[合规]"]));
        let mut config = Config::default();
        config.mall.orders_per_scan = 2;
        let orders = vec![order("A"), order("B"), order("C")];
        let monitor = Monitor::with_config(engine(&mock), Arc::new(StaticOrders(orders)), Vec::new(), &config);

        assert_eq!(monitor.scan_once().await.len(), 2);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_engine_fault_reports_inconclusive() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_error(LlmError::Api {
            status: 500,
            message: "upstream down".to_string(),
        });
        let monitor = default_monitor(engine(&mock), Arc::new(StaticOrders(vec![order("Dave")])), Vec::new());

        let reports = monitor.scan_once().await;

        assert_eq!(reports.len(), 1);
        assert!(reports[0].answer.starts_with("引擎内部故障"));
        assert_eq!(reports[0].verdict, Verdict::Inconclusive);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_scan() {
        let mock = Arc::new(MockLlmClient::new());
        let monitor = default_monitor(engine(&mock), Arc::new(FailingOrders), Vec::new());

        assert!(monitor.scan_once().await.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_stop_scan() {
        let mock = Arc::new(MockLlmClient::with_replies(["Finish[合规]", "Finish[合规]"]));
        let recorder = RecordingNotifier::default();
        let seen = recorder.reports.clone();
        let monitor = default_monitor(
            engine(&mock),
            Arc::new(StaticOrders(vec![order("A"), order("B")])),
            vec![Box::new(BrokenNotifier), Box::new(recorder)],
        );

        assert_eq!(monitor.scan_once().await.len(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_scans_on_interval() {
        let mock = Arc::new(MockLlmClient::with_replies(["Finish[合规]"; 3]));
        let monitor = default_monitor(engine(&mock), Arc::new(StaticOrders(vec![order("A")])), Vec::new());
        assert_eq!(monitor.interval(), Duration::from_secs(1800));

        let scans = monitor.run_until(sleep(Duration::from_secs(2 * 1800 + 1))).await;

        assert_eq!(scans, 3);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_run_until_immediate_shutdown() {
        let mock = Arc::new(MockLlmClient::new());
        let monitor = default_monitor(engine(&mock), Arc::new(StaticOrders(Vec::new())), Vec::new());

        assert_eq!(monitor.run_until(async {}).await, 0);
    }
}
