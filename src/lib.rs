//! Auditr - an LLM auditor for points-mall redemption orders
//!
//! Auditr runs a bounded ReAct (reason + act) loop against an
//! OpenAI-compatible chat model: the model reasons about an order, calls
//! ledger lookup tools, and finishes with a compliance verdict.

pub mod config;
pub mod error;
pub mod llm;
pub mod mall;
pub mod monitor;
pub mod notify;
pub mod prompt;
pub mod react;
pub mod tools;
pub mod verdict;

pub use error::{AuditError, ConfigError, Result};
