//! Step records and the result of a whole audit run

use std::time::Duration;

use super::transcript::Transcript;

/// What one loop iteration (or one rate-limited attempt of it) did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    ActionTaken,
    Reprompted,
    Finished,
    RateLimitedRetry,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 0-based iteration; rate-limited retries repeat the index
    pub index: u32,
    /// Time since the run started, when the outcome was known
    pub elapsed: Duration,
    pub outcome: StepOutcome,
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model emitted a finish marker
    Finished,
    /// The last allowed step was malformed; its raw reply is the answer
    MalformedFallback,
    /// The step budget ran out without a finish marker
    BudgetExhausted,
    /// A non-rate-limit completion failure ended the run
    EngineFault,
}

/// Full record of one audit run
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub answer: String,
    pub termination: Termination,
    pub transcript: Transcript,
    pub steps: Vec<Step>,
}

impl AuditRun {
    /// Iterations that consumed step budget
    pub fn budget_used(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome != StepOutcome::RateLimitedRetry)
            .count()
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }
}
