//! ReAct audit loop
//!
//! Reply parsing, the transcript, step bookkeeping, pacing and the engine
//! that ties them together.

mod backoff;
mod engine;
mod parser;
mod step;
mod transcript;

pub use backoff::{BackoffPolicy, RateLimitState};
pub use engine::{
    BUDGET_EXHAUSTED, CORRECTIVE_PROMPT, ENGINE_FAULT_PREFIX, EngineConfig, OBSERVATION_PREFIX, ReactEngine,
};
pub use parser::{Action, ReplyKind, is_finish, parse_action, parse_reply};
pub use step::{AuditRun, Step, StepOutcome, Termination};
pub use transcript::Transcript;
