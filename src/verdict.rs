//! Verdict - coarse classification of a free-text audit report

use std::fmt;

use crate::react::{BUDGET_EXHAUSTED, ENGINE_FAULT_PREFIX};

/// Keyword-based outcome of an audit report.
///
/// The model is asked for `[合规]`, `[高风险]` or `[违规]` but replies are
/// free text, so classification is by substring: `违规` wins, then `异常` or
/// `风险`, anything else counts as compliant. Runs that ended on the step
/// budget or an engine fault never reached a conclusion and are inconclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Violation,
    HighRisk,
    Compliant,
    Inconclusive,
}

impl Verdict {
    pub fn classify(report: &str) -> Self {
        if report == BUDGET_EXHAUSTED || report.starts_with(ENGINE_FAULT_PREFIX) {
            Self::Inconclusive
        } else if report.contains("违规") {
            Self::Violation
        } else if report.contains("异常") || report.contains("风险") {
            Self::HighRisk
        } else {
            Self::Compliant
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Violation => "🚨 发现积分违规行为",
            Self::HighRisk => "⚠️ 风险待观察",
            Self::Compliant => "✅ 审计合规",
            Self::Inconclusive => "❔ 审计未完成",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Violation => "🔴",
            Self::HighRisk => "🟡",
            Self::Compliant => "🟢",
            Self::Inconclusive => "⚪",
        }
    }

    /// Whether the report should reach people rather than just the log
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Self::Compliant)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.title())
    }
}
