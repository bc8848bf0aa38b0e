//! End-to-end pipeline tests with a scripted provider and prompter:
//! synthesis through confirmation to execution, without any network.

use async_trait::async_trait;
use shellwright::core::error::{ProviderError, ShellwrightError};
use shellwright::exec::ExecutionRunner;
use shellwright::gate::{ConfirmationGate, Prompter};
use shellwright::orchestrator::{Orchestrator, RetryPolicy};
use shellwright::provider::{Provider, SendOptions};
use shellwright::synth::{SynthesisRequest, TaskKind};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Provider returning a canned response, optionally after some failures.
struct CannedProvider {
    response: String,
    failures_before_success: u32,
    calls: AtomicU32,
}

impl CannedProvider {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        }
    }

    fn flaky(response: &str, failures: u32) -> Self {
        Self {
            response: response.to_string(),
            failures_before_success: failures,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Provider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn send(
        &self,
        _prompt: &str,
        _opts: &SendOptions,
    ) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            Err(ProviderError::Network("connection reset".into()))
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Prompter replaying scripted replies and recording everything shown.
struct ScriptedPrompter {
    replies: Vec<String>,
    shown: Vec<String>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().rev().map(|s| s.to_string()).collect(),
            shown: Vec::new(),
            questions: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        Ok(self.replies.pop().unwrap_or_else(|| "n".to_string()))
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(1),
    }
}

fn gate(auto_confirm_safe: bool) -> ConfirmationGate {
    ConfirmationGate {
        auto_confirm_safe,
        interactive: true,
    }
}

#[tokio::test]
async fn test_fenced_command_executes_verbatim() {
    let response = "Here is a command that lists recently modified files:\n\
                    ```sh\n\
                    echo pipeline-ran\n\
                    ```\n\
                    It prints a marker for this test.";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::FindFiles, "recently modified files")
        .with_context("root", ".");

    let mut prompter = ScriptedPrompter::new(&[]);
    let report = orchestrator
        .run(&request, &gate(true), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert!(!report.rejected);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].command, "echo pipeline-ran");
    assert_eq!(report.outcomes[0].stdout.trim(), "pipeline-ran");
    assert!(report.outcomes[0].success());
    // Safe tier plus auto-confirm: no prompt was shown.
    assert!(prompter.questions.is_empty());
    // Surrounding prose survives as the explanation.
    assert!(report.result.explanation.unwrap().contains("lists recently"));
}

#[tokio::test]
async fn test_prose_only_response_never_reaches_execution() {
    let response = "I cannot produce a command for that request.";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::NlToShell, "do something impossible");

    let mut prompter = ScriptedPrompter::new(&["y"]);
    let err = orchestrator
        .run(&request, &gate(true), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap_err();

    assert!(matches!(err, ShellwrightError::EmptySynthesis));
    assert!(prompter.questions.is_empty(), "gate must not be reached");
}

#[tokio::test]
async fn test_destructive_command_always_prompts() {
    let response = "```sh\nrm -rf ./scratch\n```";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::NlToShell, "clean the scratch dir");

    // Auto-confirm is on, but the tier is destructive: prompt and reject.
    let mut prompter = ScriptedPrompter::new(&["n"]);
    let report = orchestrator
        .run(&request, &gate(true), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert!(report.rejected);
    assert!(report.outcomes.is_empty(), "nothing may execute");
    assert_eq!(prompter.questions.len(), 1);
    assert!(prompter.shown.iter().any(|l| l.contains("destructive")));
}

#[tokio::test]
async fn test_rejection_halts_batch() {
    let response = "```sh\necho first\necho second\necho third\n```";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::NlToShell, "three steps");

    // Confirm the first, reject the second: the third is never offered.
    let mut prompter = ScriptedPrompter::new(&["y", "n"]);
    let report = orchestrator
        .run(&request, &gate(false), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert!(report.rejected);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].stdout.trim(), "first");
    assert_eq!(prompter.questions.len(), 2);
}

#[tokio::test]
async fn test_failing_command_halts_batch() {
    let response = "```sh\necho ok\nexit 9\necho unreachable\n```";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::NlToShell, "steps with a failure");

    let mut prompter = ScriptedPrompter::new(&["y", "y", "y"]);
    let report = orchestrator
        .run(&request, &gate(false), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert!(!report.rejected);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[1].exit_code, 9);
}

#[tokio::test]
async fn test_transient_failures_recover_within_retry_budget() {
    let provider = CannedProvider::flaky("`echo recovered`", 2);
    let orchestrator = Orchestrator::new(Box::new(provider)).with_retry(fast_retry());
    let request = SynthesisRequest::new(TaskKind::NlToShell, "say recovered");

    let mut prompter = ScriptedPrompter::new(&[]);
    let report = orchestrator
        .run(&request, &gate(true), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].stdout.trim(), "recovered");
}

#[tokio::test]
async fn test_edited_command_executes_instead_of_original() {
    let response = "```sh\necho original\n```";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::NlToShell, "print something");

    let mut prompter = ScriptedPrompter::new(&["e", "echo edited", "y"]);
    let report = orchestrator
        .run(&request, &gate(false), &ExecutionRunner::default(), &mut prompter)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].command, "echo edited");
    assert_eq!(report.outcomes[0].stdout.trim(), "edited");
}

#[tokio::test]
async fn test_advisory_task_skips_gate_and_runner() {
    let response = "Set RUST_LOG=debug for verbose output.";
    let orchestrator = Orchestrator::new(Box::new(CannedProvider::new(response)));
    let request = SynthesisRequest::new(TaskKind::EnvHint, "rust logging");

    let result = orchestrator.synthesize(&request).await.unwrap();
    assert!(result.candidates.is_empty());
    assert_eq!(result.explanation.unwrap(), response);
}
