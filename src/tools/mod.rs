//! Tool system for the audit engine
//!
//! A tool takes one string argument (whatever the model wrote between the
//! brackets of `Action: name[...]`) and returns a string observation.

mod executor;
mod orders;
mod points;

pub use executor::ToolExecutor;
pub use orders::LatestOrdersTool;
pub use points::{UserPointsTool, format_ledger};

use async_trait::async_trait;

/// A tool that can be called by the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as written in `Action: <name>[...]`
    fn name(&self) -> &str;

    /// Human-readable description for the tool catalogue
    fn description(&self) -> &str;

    /// Run the tool against its raw argument
    async fn call(&self, input: &str) -> Result<String, eyre::Error>;
}

/// Adapts a plain closure into a [`Tool`]
pub struct FnTool<F> {
    name: String,
    description: String,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&str) -> Result<String, eyre::Error> + Send + Sync,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&str) -> Result<String, eyre::Error> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, input: &str) -> Result<String, eyre::Error> {
        (self.func)(input)
    }
}

/// Trim an argument, then drop every quote character in it
///
/// Whitespace inside the quotes survives: `" Alice "` stays ` Alice `.
pub(crate) fn unquote(input: &str) -> String {
    input.trim().replace(['"', '\''], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_tool_call() {
        let tool = FnTool::new("echo", "Echo input", |input: &str| Ok(format!("got {}", input)));

        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "Echo input");
        assert_eq!(tool.call("x").await.unwrap(), "got x");
    }

    #[tokio::test]
    async fn test_fn_tool_error() {
        let tool = FnTool::new("fail", "Always fails", |_: &str| Err(eyre::eyre!("backend down")));
        let err = tool.call("x").await.unwrap_err();
        assert_eq!(err.to_string(), "backend down");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"Alice\""), "Alice");
        assert_eq!(unquote("  'Bob' "), "Bob");
        assert_eq!(unquote("\" Carol \""), " Carol ");
        assert_eq!(unquote("O'Brien"), "OBrien");
        assert_eq!(unquote("plain"), "plain");
    }
}
