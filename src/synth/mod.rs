//! Command synthesis: the data model shared by the prompt builder,
//! response parser, and risk classifier.

pub mod parser;
pub mod prompt;
pub mod risk;

use serde::{Deserialize, Serialize};

/// What the caller wants the provider to produce.
///
/// Command kinds yield executable candidates; advisory kinds yield prose
/// that is shown to the user and never executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// List/filter files matching an intent.
    ListFiles,
    /// Build a find/grep command from an intent.
    FindFiles,
    /// Translate an arbitrary instruction into shell command(s).
    NlToShell,
    /// Convert a natural-language schedule into a crontab line.
    CronLine,
    /// Explain a filesystem permission error and how to fix it.
    ExplainError,
    /// Predict runtime and side effects of a script.
    PredictRun,
    /// Package installation advice.
    PackageAdvice,
    /// Network diagnostics advice.
    NetworkAdvice,
    /// Environment variable suggestions.
    EnvHint,
    /// Conventional commit message from a diff.
    CommitMessage,
    /// System report advice.
    SystemAdvice,
    /// Compression format advice.
    CompressionAdvice,
    /// Safety analysis of a command before privileged execution.
    DryRunCheck,
    /// Summarize file contents.
    Summarize,
    /// Analyze a process listing.
    ProcessAnalysis,
}

impl TaskKind {
    /// Advisory kinds produce explanation text only; their output never
    /// enters the classify/confirm/execute path.
    pub fn is_advisory(&self) -> bool {
        !matches!(
            self,
            TaskKind::ListFiles | TaskKind::FindFiles | TaskKind::NlToShell | TaskKind::CronLine
        )
    }
}

/// One key/value context entry fed into the prompt.
///
/// Entries are ordered highest-priority first; the prompt builder drops
/// from the tail when the budget is exceeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: String,
}

impl ContextEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single synthesis invocation. Created per call, read-only.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub task: TaskKind,
    pub intent: String,
    pub context: Vec<ContextEntry>,
}

impl SynthesisRequest {
    pub fn new(task: TaskKind, intent: impl Into<String>) -> Self {
        Self {
            task,
            intent: intent.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push(ContextEntry::new(key, value));
        self
    }
}

/// Parsed provider output: candidate commands plus advisory text.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Candidate commands in execution order. Empty means the pipeline
    /// must not proceed to execution.
    pub candidates: Vec<String>,
    /// Prose surrounding the commands, kept for display.
    pub explanation: Option<String>,
    /// Untouched provider response, for diagnostics.
    pub raw: String,
}

impl SynthesisResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_split() {
        assert!(!TaskKind::ListFiles.is_advisory());
        assert!(!TaskKind::NlToShell.is_advisory());
        assert!(!TaskKind::CronLine.is_advisory());
        assert!(TaskKind::CommitMessage.is_advisory());
        assert!(TaskKind::PredictRun.is_advisory());
        assert!(TaskKind::SystemAdvice.is_advisory());
    }

    #[test]
    fn test_request_builder() {
        let req = SynthesisRequest::new(TaskKind::ListFiles, "python files modified today")
            .with_context("cwd", "/home/user/project");
        assert_eq!(req.context.len(), 1);
        assert_eq!(req.context[0].key, "cwd");
    }

    #[test]
    fn test_task_kind_serialization() {
        let json = serde_json::to_string(&TaskKind::ListFiles).unwrap();
        assert_eq!(json, "\"list-files\"");
        let kind: TaskKind = serde_json::from_str("\"commit-message\"").unwrap();
        assert_eq!(kind, TaskKind::CommitMessage);
    }
}
