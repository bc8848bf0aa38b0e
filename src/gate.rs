//! Confirmation gate: the human-in-the-loop checkpoint between synthesis
//! and execution.
//!
//! Modeled as an explicit state machine rather than a prompt-then-run
//! script so the Edited and Rejected paths stay testable:
//!
//! ```text
//! Proposed -> AwaitingConfirmation -> {Confirmed, Rejected, Edited}
//! Edited   -> AwaitingConfirmation   (after re-classification)
//! ```
//!
//! Confirmed and Rejected are terminal. A command never moves from
//! Proposed straight to execution.

use crate::core::error::Result;
use crate::synth::risk::{self, RiskAssessment, RiskTier};
use std::io::{self, BufRead, Write};

/// Gate states. `Proposed` never transitions directly to execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Proposed,
    AwaitingConfirmation,
    Confirmed,
    Rejected,
    Edited,
}

/// Terminal outcome of reviewing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Approved for execution, possibly after editing.
    Confirmed { command: String },
    /// Declined. Terminal: nothing after a rejection may execute.
    Rejected,
}

/// Interactive input seam, so tests can script decisions.
pub trait Prompter {
    /// Display text to the user.
    fn show(&mut self, text: &str);
    /// Ask a question and return the raw reply line.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Stdin/stdout prompter used by the CLI.
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn show(&mut self, text: &str) {
        println!("{text}");
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{question} ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    /// Allow the safe tier to skip the prompt. Off by default; never
    /// applies to destructive or privileged commands.
    pub auto_confirm_safe: bool,
    /// When false (scripted use), anything short of an explicit prior
    /// approval is a rejection; the gate never blocks on input.
    pub interactive: bool,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self {
            auto_confirm_safe: false,
            interactive: true,
        }
    }
}

impl ConfirmationGate {
    /// Run one candidate command through the state machine.
    pub fn review(
        &self,
        command: &str,
        assessment: &RiskAssessment,
        rationale: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Decision> {
        let mut current = command.to_string();
        let mut current_assessment = assessment.clone();
        let mut state = GateState::Proposed;

        loop {
            match state {
                GateState::Proposed => {
                    if current_assessment.tier == RiskTier::Safe && self.auto_confirm_safe {
                        tracing::debug!(command = %current, "safe tier auto-confirmed");
                        return Ok(Decision::Confirmed { command: current });
                    }
                    state = GateState::AwaitingConfirmation;
                }
                GateState::AwaitingConfirmation => {
                    if !self.interactive {
                        // No explicit yes available: reject rather than hang.
                        return Ok(Decision::Rejected);
                    }
                    self.display(&current, &current_assessment, rationale, prompter);
                    let reply = prompter.ask("Execute this command? [y]es / [n]o / [e]dit:")?;
                    match reply.to_lowercase().as_str() {
                        "y" | "yes" => state = GateState::Confirmed,
                        "e" | "edit" => {
                            let edited = prompter.ask("Edited command:")?;
                            if edited.trim().is_empty() {
                                state = GateState::Rejected;
                            } else {
                                current = edited.trim().to_string();
                                current_assessment = risk::classify(&current);
                                state = GateState::Edited;
                            }
                        }
                        _ => state = GateState::Rejected,
                    }
                }
                GateState::Edited => {
                    // Edited commands are re-displayed with their fresh
                    // classification before any approval.
                    state = GateState::AwaitingConfirmation;
                }
                GateState::Confirmed => return Ok(Decision::Confirmed { command: current }),
                GateState::Rejected => return Ok(Decision::Rejected),
            }
        }
    }

    fn display(
        &self,
        command: &str,
        assessment: &RiskAssessment,
        rationale: Option<&str>,
        prompter: &mut dyn Prompter,
    ) {
        prompter.show(&format!("Proposed command: {command}"));
        prompter.show(&format!(
            "Risk: {} ({})",
            assessment.tier, assessment.matched_rule
        ));
        if let Some(text) = rationale {
            prompter.show(&format!("Rationale: {text}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::risk::classify;

    /// Prompter that replays scripted replies and records the transcript.
    pub struct ScriptedPrompter {
        replies: Vec<String>,
        pub shown: Vec<String>,
        pub questions: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(replies: &[&str]) -> Self {
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

    #[test]
    fn test_confirm_path() {
        let gate = ConfirmationGate::default();
        let mut prompter = ScriptedPrompter::new(&["y"]);
        let assessment = classify("ls -la");
        let decision = gate
            .review("ls -la", &assessment, None, &mut prompter)
            .unwrap();
        assert_eq!(
            decision,
            Decision::Confirmed { command: "ls -la".into() }
        );
    }

    #[test]
    fn test_reject_path() {
        let gate = ConfirmationGate::default();
        let mut prompter = ScriptedPrompter::new(&["n"]);
        let assessment = classify("ls -la");
        let decision = gate
            .review("ls -la", &assessment, None, &mut prompter)
            .unwrap();
        assert_eq!(decision, Decision::Rejected);
    }

    #[test]
    fn test_unrecognized_reply_rejects() {
        let gate = ConfirmationGate::default();
        let mut prompter = ScriptedPrompter::new(&["maybe?"]);
        let assessment = classify("ls -la");
        let decision = gate
            .review("ls -la", &assessment, None, &mut prompter)
            .unwrap();
        assert_eq!(decision, Decision::Rejected);
    }

    #[test]
    fn test_safe_auto_confirm_skips_prompt() {
        let gate = ConfirmationGate {
            auto_confirm_safe: true,
            interactive: true,
        };
        let mut prompter = ScriptedPrompter::new(&[]);
        let assessment = classify("find . -name '*.py' -mtime 0");
        let decision = gate
            .review("find . -name '*.py' -mtime 0", &assessment, None, &mut prompter)
            .unwrap();
        assert!(matches!(decision, Decision::Confirmed { .. }));
        assert!(prompter.questions.is_empty());
    }

    #[test]
    fn test_destructive_never_auto_confirms() {
        let gate = ConfirmationGate {
            auto_confirm_safe: true,
            interactive: true,
        };
        let mut prompter = ScriptedPrompter::new(&["n"]);
        let assessment = classify("rm -rf /tmp/scratch");
        let decision = gate
            .review("rm -rf /tmp/scratch", &assessment, None, &mut prompter)
            .unwrap();
        assert_eq!(decision, Decision::Rejected);
        assert_eq!(prompter.questions.len(), 1, "must have prompted");
    }

    #[test]
    fn test_non_interactive_rejects_without_blocking() {
        let gate = ConfirmationGate {
            auto_confirm_safe: false,
            interactive: false,
        };
        let mut prompter = ScriptedPrompter::new(&["y"]);
        let assessment = classify("ls");
        let decision = gate.review("ls", &assessment, None, &mut prompter).unwrap();
        assert_eq!(decision, Decision::Rejected);
        assert!(prompter.questions.is_empty(), "must not prompt");
    }

    #[test]
    fn test_non_interactive_auto_confirm_still_passes_safe() {
        let gate = ConfirmationGate {
            auto_confirm_safe: true,
            interactive: false,
        };
        let mut prompter = ScriptedPrompter::new(&[]);
        let assessment = classify("ls");
        let decision = gate.review("ls", &assessment, None, &mut prompter).unwrap();
        assert!(matches!(decision, Decision::Confirmed { .. }));
    }

    #[test]
    fn test_edit_reclassifies_and_redisplays() {
        let gate = ConfirmationGate::default();
        // Edit the safe command into a destructive one, then confirm.
        let mut prompter = ScriptedPrompter::new(&["e", "rm -rf ./build", "y"]);
        let assessment = classify("ls build");
        let decision = gate
            .review("ls build", &assessment, None, &mut prompter)
            .unwrap();
        assert_eq!(
            decision,
            Decision::Confirmed { command: "rm -rf ./build".into() }
        );
        // The edited command was re-displayed with its new tier.
        let redisplay = prompter
            .shown
            .iter()
            .any(|line| line.contains("destructive"));
        assert!(redisplay, "edited command must show re-classified risk");
        assert_eq!(prompter.questions.len(), 3);
    }

    #[test]
    fn test_empty_edit_rejects() {
        let gate = ConfirmationGate::default();
        let mut prompter = ScriptedPrompter::new(&["e", "   "]);
        let assessment = classify("ls");
        let decision = gate.review("ls", &assessment, None, &mut prompter).unwrap();
        assert_eq!(decision, Decision::Rejected);
    }

    #[test]
    fn test_rationale_displayed_when_present() {
        let gate = ConfirmationGate::default();
        let mut prompter = ScriptedPrompter::new(&["y"]);
        let assessment = classify("ls");
        gate.review("ls", &assessment, Some("lists the build artifacts"), &mut prompter)
            .unwrap();
        assert!(prompter
            .shown
            .iter()
            .any(|line| line.contains("lists the build artifacts")));
    }
}
