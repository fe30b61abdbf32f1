//! Transcript - the append-only message list of one audit run

use crate::llm::Message;

/// Always opens with one system and one user message; grows only by
/// assistant/user pairs so every model turn gets exactly one reply turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(prompt)],
        }
    }

    /// Append a model reply and the user turn answering it
    pub fn push_exchange(&mut self, assistant: impl Into<String>, user: impl Into<String>) {
        self.messages.push(Message::assistant(assistant));
        self.messages.push(Message::user(user));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
