//! Prompt System - template loading and rendering
//!
//! Builds the system turn and the rendered audit question that open every
//! ReAct transcript.

mod loader;
mod render;
pub mod template;

pub use loader::load_template;
pub use render::{PromptRenderer, placeholders, render_template};
pub use template::SYSTEM_PROMPT;
