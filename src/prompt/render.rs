//! Prompt Renderer - fill `{name}` placeholders in the audit template
//!
//! Only placeholders the template actually declares are substituted. A
//! placeholder with no known value renders as `[name Missing]` so an edited
//! template degrades visibly instead of failing the audit.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::{Captures, Regex};

use super::loader::load_template;
use super::template::{AUDIT_TEMPLATE, DEFAULT_HISTORY, DEFAULT_TOOL_CATALOGUE};
use crate::config::AuditConfig;
use crate::error::Result;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern"));

/// Renders the initial user turn of an audit
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    template: String,
    gold_threshold: u32,
    exp_threshold: u32,
    tool_catalogue: String,
    history: String,
    date: Option<NaiveDate>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new(AUDIT_TEMPLATE)
    }
}

impl PromptRenderer {
    /// Create a renderer for `template` with default thresholds
    pub fn new(template: impl Into<String>) -> Self {
        let defaults = AuditConfig::default();
        Self {
            template: template.into(),
            gold_threshold: defaults.gold_threshold,
            exp_threshold: defaults.exp_threshold,
            tool_catalogue: DEFAULT_TOOL_CATALOGUE.to_string(),
            history: DEFAULT_HISTORY.to_string(),
            date: None,
        }
    }

    /// Build from the audit section of the config, loading a custom template if set
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let template = load_template(config.prompt_template.as_deref())?;
        Ok(Self::new(template).with_thresholds(config.gold_threshold, config.exp_threshold))
    }

    pub fn with_thresholds(mut self, gold_threshold: u32, exp_threshold: u32) -> Self {
        self.gold_threshold = gold_threshold;
        self.exp_threshold = exp_threshold;
        self
    }

    pub fn with_tool_catalogue(mut self, catalogue: impl Into<String>) -> Self {
        self.tool_catalogue = catalogue.into();
        self
    }

    /// Pin `{current_date}` instead of using today's local date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Values available to the template for one question
    pub fn values(&self, question: &str) -> HashMap<&'static str, String> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        HashMap::from([
            ("question", question.to_string()),
            ("history", self.history.clone()),
            ("tools", self.tool_catalogue.clone()),
            ("gold_threshold", self.gold_threshold.to_string()),
            ("exp_threshold", self.exp_threshold.to_string()),
            ("current_date", date.format("%Y-%m-%d").to_string()),
        ])
    }

    /// Render the template for a pre-formatted audit question
    pub fn render(&self, question: &str) -> String {
        render_template(&self.template, &self.values(question))
    }
}

/// Placeholder names declared by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitute every `{name}` in `template`; unknown names become `[name Missing]`
pub fn render_template(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .get(name)
                .cloned()
                .unwrap_or_else(|| format!("[{} Missing]", name))
        })
        .into_owned()
}
