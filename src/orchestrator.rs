//! Per-invocation wiring of the synthesis pipeline:
//! build prompt -> call provider -> parse -> classify -> confirm ->
//! execute -> report.
//!
//! Provider calls get a bounded retry with linear backoff, but only for
//! the retryable error kinds (network, quota). Auth and malformed-response
//! failures surface immediately with guidance.

use crate::core::error::{Result, ShellwrightError};
use crate::exec::{ExecutionOutcome, ExecutionRunner};
use crate::gate::{ConfirmationGate, Decision, Prompter};
use crate::provider::{Provider, SendOptions};
use crate::synth::prompt::PromptBuilder;
use crate::synth::{parser, risk, SynthesisRequest, SynthesisResult};
use std::time::Duration;

/// Bounded retry for provider calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base delay; attempt N waits N times this.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// What one invocation produced, for caller-side reporting.
#[derive(Debug)]
pub struct InvocationReport {
    pub result: SynthesisResult,
    pub outcomes: Vec<ExecutionOutcome>,
    /// True when the user rejected a candidate; everything after the
    /// rejection was skipped.
    pub rejected: bool,
}

pub struct Orchestrator {
    provider: Box<dyn Provider>,
    prompt_builder: PromptBuilder,
    send_options: SendOptions,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            prompt_builder: PromptBuilder::default(),
            send_options: SendOptions::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the prompt, call the provider, and parse the response.
    ///
    /// For command task kinds an empty candidate list is an error; the
    /// classifier, gate, and runner are never reached. Advisory kinds
    /// return whatever explanation text came back.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        let prompt = self.prompt_builder.build(request);
        tracing::debug!(
            task = ?request.task,
            provider = self.provider.name(),
            prompt_len = prompt.len(),
            "synthesizing"
        );

        let raw = self.call_with_retry(&prompt).await?;
        let result = parser::parse(&raw, request.task);

        if !request.task.is_advisory() && result.is_empty() {
            tracing::warn!(task = ?request.task, "provider response contained no command");
            return Err(ShellwrightError::EmptySynthesis);
        }
        Ok(result)
    }

    /// Full pipeline for command task kinds: synthesize, then gate and
    /// execute each candidate in order.
    ///
    /// A rejection is terminal for the whole batch; a failing command
    /// halts the rest (fail-fast, no rollback of what already ran).
    pub async fn run(
        &self,
        request: &SynthesisRequest,
        gate: &ConfirmationGate,
        runner: &ExecutionRunner,
        prompter: &mut dyn Prompter,
    ) -> Result<InvocationReport> {
        let result = self.synthesize(request).await?;
        let rationale = result.explanation.clone();

        let mut outcomes = Vec::new();
        let mut rejected = false;

        for candidate in &result.candidates {
            let assessment = risk::classify(candidate);
            match gate.review(candidate, &assessment, rationale.as_deref(), prompter)? {
                Decision::Confirmed { command } => {
                    let outcome = runner.run(&command).await?;
                    let failed = !outcome.success();
                    outcomes.push(outcome);
                    if failed {
                        tracing::warn!(command, "halting batch after failure");
                        break;
                    }
                }
                Decision::Rejected => {
                    tracing::info!(command = %candidate, "rejected at confirmation gate");
                    rejected = true;
                    break;
                }
            }
        }

        Ok(InvocationReport {
            result,
            outcomes,
            rejected,
        })
    }

    async fn call_with_retry(&self, prompt: &str) -> Result<String> {
        let mut attempt = 1u32;
        loop {
            match self.provider.send(prompt, &self.send_options).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff * attempt;
                    tracing::warn!(
                        provider = self.provider.name(),
                        attempt,
                        max = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "provider call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(provider = self.provider.name(), error = %err, "provider call failed");
                    return Err(err.into());
                }
            }
        }
    }
}
