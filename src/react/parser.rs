//! Reply parser - classify a model reply as finish, action or unparsed
//!
//! Grammar (free text around it is ignored):
//! - finish: the reply contains `Finish[` or `Final Answer:` anywhere
//! - action: `Action:` then an identifier, `[`, an argument that may span
//!   lines, and the first following `]`

use std::sync::LazyLock;

use regex::Regex;

use crate::tools::unquote;

const FINISH_MARKERS: [&str; 2] = ["Finish[", "Final Answer:"];

static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Action:\s*(\w+)\[(.*?)\]").expect("action pattern"));

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub tool_name: String,
    pub tool_input: String,
}

impl Action {
    pub fn new(tool_name: impl Into<String>, tool_input: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input: tool_input.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    /// The reply carries a finish marker and is the final answer
    Finish,
    /// The reply asks for a tool call
    Action(Action),
    /// Neither; the model needs a corrective nudge
    Unparsed,
}

pub fn is_finish(content: &str) -> bool {
    FINISH_MARKERS.iter().any(|marker| content.contains(marker))
}

/// First `Action: name[argument]` in the reply, argument unquoted
pub fn parse_action(content: &str) -> Option<Action> {
    ACTION
        .captures(content)
        .map(|caps| Action::new(&caps[1], unquote(&caps[2])))
}

/// Finish markers win over actions: a reply holding both ends the run
pub fn parse_reply(content: &str) -> ReplyKind {
    if is_finish(content) {
        return ReplyKind::Finish;
    }
    match parse_action(content) {
        Some(action) => ReplyKind::Action(action),
        None => ReplyKind::Unparsed,
    }
}
