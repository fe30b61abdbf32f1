//! LLM Client Layer - chat-completion API integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait with a typed rate-limit error
//! - OpenAiClient implementation for OpenAI-compatible providers
//! - MockLlmClient for scripted tests

pub mod client;
pub mod openai;
pub mod types;

pub use client::{LlmClient, LlmError, MockLlmClient};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, Usage};
