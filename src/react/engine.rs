//! ReAct engine - the bounded reason/act loop behind every audit.
//!
//! Each step sends the whole transcript to the model and acts on the reply:
//! a finish marker ends the run, an action is dispatched to the tool
//! registry and its observation appended, anything else gets a corrective
//! re-prompt. Rate-limited requests are re-sent after a cooldown without
//! spending a step.

use std::sync::Arc;

use tokio::time::{Instant, sleep};

use super::backoff::{BackoffPolicy, RateLimitState};
use super::parser::{ReplyKind, parse_reply};
use super::step::{AuditRun, Step, StepOutcome, Termination};
use super::transcript::Transcript;
use crate::config::{Config, FinalMalformedReply};
use crate::error::AuditError;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::mall::MallClient;
use crate::prompt::{PromptRenderer, SYSTEM_PROMPT};
use crate::tools::ToolExecutor;

/// User turn sent after a reply with neither an action nor a finish marker
pub const CORRECTIVE_PROMPT: &str = "请继续按照格式输出 Action 或直接给出 Finish[] 结论。";

/// Answer of a run that used its whole step budget
pub const BUDGET_EXHAUSTED: &str = "审计中止：超过最大推理步数。";

/// Prefix of the answer when the completion call fails for good
pub const ENGINE_FAULT_PREFIX: &str = "引擎内部故障: ";

pub const OBSERVATION_PREFIX: &str = "Observation: ";

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model: String,
    pub temperature: f32,
    pub max_steps: u32,
    pub backoff: BackoffPolicy,
    pub final_malformed_reply: FinalMalformedReply,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_steps: config.audit.max_steps,
            backoff: BackoffPolicy::from(&config.audit),
            final_malformed_reply: config.audit.final_malformed_reply,
        }
    }
}

/// Per-run bookkeeping; dropped when the run returns
struct RunState {
    started: Instant,
    transcript: Transcript,
    steps: Vec<Step>,
}

impl RunState {
    fn new(transcript: Transcript) -> Self {
        Self {
            started: Instant::now(),
            transcript,
            steps: Vec::new(),
        }
    }

    fn record(&mut self, index: u32, outcome: StepOutcome) {
        self.steps.push(Step {
            index,
            elapsed: self.started.elapsed(),
            outcome,
        });
    }

    fn finish(self, answer: String, termination: Termination) -> AuditRun {
        AuditRun {
            answer,
            termination,
            transcript: self.transcript,
            steps: self.steps,
        }
    }
}

/// Drives one audit question to a verdict.
///
/// Runs share nothing: the engine can serve sequential audits, and
/// independent engines can run side by side.
pub struct ReactEngine<L: LlmClient + ?Sized> {
    llm: Arc<L>,
    tools: ToolExecutor,
    renderer: PromptRenderer,
    config: EngineConfig,
}

impl<L: LlmClient + ?Sized> ReactEngine<L> {
    pub fn new(llm: Arc<L>, tools: ToolExecutor, renderer: PromptRenderer, config: EngineConfig) -> Self {
        Self {
            llm,
            tools,
            renderer,
            config,
        }
    }

    /// Engine for order audits: mall-backed tools behind the configured template.
    ///
    /// The prompt keeps the fixed `{tools}` catalogue, which documents only
    /// `get_user_points[userName]`; the order listing tool stays registered
    /// but is not advertised.
    pub fn for_audit(llm: Arc<L>, mall: Arc<MallClient>, config: &Config) -> Result<Self, AuditError> {
        let renderer = PromptRenderer::from_config(&config.audit)?;
        Ok(Self::new(
            llm,
            ToolExecutor::audit_tools(mall),
            renderer,
            EngineConfig::from(config),
        ))
    }

    pub fn tools(&self) -> &ToolExecutor {
        &self.tools
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Audit one question and return the answer text.
    ///
    /// Never fails: budget exhaustion and engine faults come back as
    /// [`BUDGET_EXHAUSTED`] and [`ENGINE_FAULT_PREFIX`]-prefixed text.
    pub async fn run_audit(&self, question: &str) -> String {
        self.run_audit_detailed(question).await.answer
    }

    /// Audit one question, keeping the transcript and step record
    pub async fn run_audit_detailed(&self, question: &str) -> AuditRun {
        let prompt = self.renderer.render(question);
        let mut run = RunState::new(Transcript::new(SYSTEM_PROMPT, prompt));
        let mut rate_limit = RateLimitState::new();
        let max_steps = self.config.max_steps;

        log::info!("Audit engine received task, starting ReAct loop (max {} steps)", max_steps);

        for index in 0..max_steps {
            if index > 0 {
                log::info!(
                    "Pacing: sleeping {}s before step {}",
                    self.config.backoff.step_cooldown.as_secs(),
                    index + 1
                );
                sleep(self.config.backoff.step_cooldown).await;
            }

            let content = match self.complete(&mut run, &mut rate_limit, index).await {
                Ok(content) => content,
                Err(e) => {
                    log::error!("Completion failed at step {}: {}", index + 1, e);
                    run.record(index, StepOutcome::Error);
                    return run.finish(format!("{}{}", ENGINE_FAULT_PREFIX, e), Termination::EngineFault);
                }
            };
            log::debug!("Step {} reply:\n{}", index + 1, content);

            match parse_reply(&content) {
                ReplyKind::Finish => {
                    log::info!("Audit finished at step {}", index + 1);
                    run.record(index, StepOutcome::Finished);
                    return run.finish(content, Termination::Finished);
                }
                ReplyKind::Action(action) => {
                    let observation = self.tools.execute(&action.tool_name, &action.tool_input).await;
                    run.transcript
                        .push_exchange(content, format!("{}{}", OBSERVATION_PREFIX, observation));
                    run.record(index, StepOutcome::ActionTaken);
                }
                ReplyKind::Unparsed if index + 1 < max_steps => {
                    log::warn!("Step {} reply has no action or finish marker, re-prompting", index + 1);
                    run.transcript.push_exchange(content, CORRECTIVE_PROMPT);
                    run.record(index, StepOutcome::Reprompted);
                }
                ReplyKind::Unparsed => {
                    log::warn!("Last step reply has no action or finish marker");
                    run.record(index, StepOutcome::Finished);
                    return match self.config.final_malformed_reply {
                        FinalMalformedReply::Raw => run.finish(content, Termination::MalformedFallback),
                        FinalMalformedReply::Sentinel => {
                            run.finish(BUDGET_EXHAUSTED.to_string(), Termination::BudgetExhausted)
                        }
                    };
                }
            }
        }

        log::warn!("Audit aborted: step budget of {} exhausted", max_steps);
        run.finish(BUDGET_EXHAUSTED.to_string(), Termination::BudgetExhausted)
    }

    /// Send the current transcript, re-sending it unchanged after each rate limit
    async fn complete(
        &self,
        run: &mut RunState,
        rate_limit: &mut RateLimitState,
        index: u32,
    ) -> Result<String, LlmError> {
        loop {
            let request = CompletionRequest::new(self.config.model.clone(), run.transcript.messages().to_vec())
                .with_temperature(self.config.temperature);

            match self.llm.complete(request).await {
                Ok(response) => {
                    rate_limit.record_success();
                    return Ok(response.content);
                }
                Err(LlmError::RateLimited { retry_after }) => {
                    let delay = rate_limit.record_rate_limit(&self.config.backoff, retry_after);
                    run.record(index, StepOutcome::RateLimitedRetry);
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
