//! Tool executor - tool registration and fault-isolated dispatch

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::{LatestOrdersTool, Tool, UserPointsTool};
use crate::mall::MallClient;

/// Maps tool names to tools; `execute` always yields an observation string
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create an empty executor (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Create an executor holding `tools`, logging what was registered
    pub fn from_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut executor = Self::new();
        for tool in tools {
            executor.add_tool(tool);
        }
        log::info!("Tool registry ready, loaded: {:?}", executor.tool_names());
        executor
    }

    /// The standard audit tool set backed by the mall client
    pub fn audit_tools(mall: Arc<MallClient>) -> Self {
        Self::from_tools(vec![
            Box::new(LatestOrdersTool::new(mall.clone())),
            Box::new(UserPointsTool::new(mall)),
        ])
    }

    /// Add a tool, replacing any tool with the same name
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// `- name: description` lines for every registered tool
    pub fn catalogue(&self) -> String {
        self.tool_names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name
    ///
    /// Unknown names, tool errors and tool panics all come back as
    /// observation text for the model.
    pub async fn execute(&self, tool_name: &str, tool_input: &str) -> String {
        let tool_name = tool_name.trim();
        log::info!("Dispatching tool: {}", tool_name);

        let Some(tool) = self.tools.get(tool_name) else {
            log::error!("Engine requested unregistered tool: {}", tool_name);
            return format!(
                "错误: 工具 '{}' 未注册。可用工具: [{}]",
                tool_name,
                self.tool_names().join(", ")
            );
        };

        match AssertUnwindSafe(tool.call(tool_input)).catch_unwind().await {
            Ok(Ok(observation)) => observation,
            Ok(Err(e)) => {
                log::error!("Tool {} failed: {}", tool_name, e);
                format!("工具执行出错: {}", e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                log::error!("Tool {} panicked: {}", tool_name, message);
                format!("工具执行出错: {}", message)
            }
        }
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool panicked".to_string()
    }
}
