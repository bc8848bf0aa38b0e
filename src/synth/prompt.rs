//! Prompt construction.
//!
//! Each task kind has a fixed template that states the expected output
//! format explicitly. Context values are sanitized before interpolation so
//! embedded fences or control characters cannot break the template, and
//! the total prompt is capped by a character budget. Truncation policy
//! lives here and nowhere else.

use crate::synth::{ContextEntry, SynthesisRequest, TaskKind};

pub const DEFAULT_PROMPT_BUDGET: usize = 8000;

const TRUNCATION_MARKER: &str = "\n[...truncated]";

/// Pure prompt builder: `build(task, intent, context) -> prompt text`.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    budget: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            budget: DEFAULT_PROMPT_BUDGET,
        }
    }
}

impl PromptBuilder {
    pub fn with_budget(budget: usize) -> Self {
        Self { budget }
    }

    pub fn build(&self, req: &SynthesisRequest) -> String {
        let mut prompt = instruction(req.task, &sanitize(&req.intent));

        if !req.context.is_empty() {
            let remaining = self.budget.saturating_sub(prompt.len() + 2);
            let context = render_context(&req.context, remaining);
            if !context.is_empty() {
                prompt.push_str("\n\n");
                prompt.push_str(&context);
            }
        }

        // Hard cap in case the instruction alone blew the budget.
        if prompt.len() > self.budget {
            let mut cut = self.budget.saturating_sub(TRUNCATION_MARKER.len());
            while !prompt.is_char_boundary(cut) {
                cut -= 1;
            }
            prompt.truncate(cut);
            prompt.push_str(TRUNCATION_MARKER);
        }

        prompt
    }
}

/// Strip control characters and neutralize code fences so a context value
/// cannot terminate or forge template structure.
fn sanitize(text: &str) -> String {
    text.replace("```", "'''")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Render context entries as labeled blocks, highest priority first.
/// Entries that do not fit the budget are truncated or dropped from the
/// tail.
fn render_context(entries: &[ContextEntry], budget: usize) -> String {
    let mut out = String::new();
    for entry in entries {
        let block = format!(
            "{}:\n{}\n",
            sanitize(&entry.key).to_uppercase(),
            sanitize(&entry.value)
        );
        if out.len() + block.len() <= budget {
            out.push_str(&block);
            continue;
        }
        // Partial fit: keep as much of this entry as the budget allows,
        // then stop. Everything after it is lower priority.
        let room = budget.saturating_sub(out.len());
        if room > TRUNCATION_MARKER.len() + 16 {
            let mut cut = room - TRUNCATION_MARKER.len() - 1;
            while !block.is_char_boundary(cut) {
                cut -= 1;
            }
            out.push_str(&block[..cut]);
            out.push_str(TRUNCATION_MARKER);
            out.push('\n');
        }
        break;
    }
    out
}

fn instruction(task: TaskKind, intent: &str) -> String {
    match task {
        TaskKind::ListFiles => format!(
            "You are a shell assistant. The user wants to list or filter files.\n\
             Intent: {intent}\n\
             Respond with exactly one safe POSIX shell command on a single line. \
             No prose, no code fences."
        ),
        TaskKind::FindFiles => format!(
            "Generate a safe find or grep command matching this intent: {intent}\n\
             Respond with exactly one shell command on a single line. No prose."
        ),
        TaskKind::NlToShell => format!(
            "Translate this instruction into POSIX shell commands. Prefer \
             non-destructive options. Respond with only the commands, one per \
             line; any remarks must be comment lines starting with '#'.\n\
             Instruction: {intent}"
        ),
        TaskKind::CronLine => format!(
            "Convert this natural-language schedule into a valid crontab entry: \
             {intent}\n\
             Respond with only the crontab line, nothing else."
        ),
        TaskKind::ExplainError => format!(
            "A user hit this filesystem permission error. Explain the cause and \
             give exact shell commands to fix it safely, one command per line. \
             If a fix would be unsafe, suggest a safe alternative.\n\
             Error:\n{intent}"
        ),
        TaskKind::PredictRun => format!(
            "Estimate the likely runtime, resource usage, and side effects of \
             the script provided in context. Be concise and call out dangerous \
             operations (file deletion, network calls, service management). \
             Task: {intent}"
        ),
        TaskKind::PackageAdvice => format!(
            "Provide recommended package manager commands to install '{intent}' \
             on Debian/Ubuntu (apt), CentOS/RHEL (dnf), and macOS (brew), and \
             list common dependency issues. Keep it short."
        ),
        TaskKind::NetworkAdvice => format!(
            "Diagnose a network issue from the ping/curl output in context. \
             Give likely causes and the next troubleshooting commands to try. \
             Target: {intent}"
        ),
        TaskKind::EnvHint => format!(
            "Given this application or context: {intent}\n\
             Suggest the environment variables and export commands needed to \
             run it locally. Provide commands only, one per line."
        ),
        TaskKind::CommitMessage => format!(
            "Generate a concise, conventional commit message (subject plus a \
             one-line body) for the staged diff in context. Use present tense. \
             Respond with the message only. {intent}"
        ),
        TaskKind::SystemAdvice => format!(
            "Analyze the system report in context and give short, practical \
             recommendations. {intent}"
        ),
        TaskKind::CompressionAdvice => format!(
            "For the files listed in context, recommend compression formats and \
             commands that maximize space savings while balancing \
             decompression speed. {intent}"
        ),
        TaskKind::DryRunCheck => format!(
            "Analyze whether the following shell command is safe to run and \
             list its exact effects. If it may be destructive, propose a safe \
             dry-run alternative.\n\
             Command:\n{intent}"
        ),
        TaskKind::Summarize => format!(
            "Summarize the text in context in at most 3 sentences. Be concise. \
             {intent}"
        ),
        TaskKind::ProcessAnalysis => format!(
            "Analyze the `ps aux` output in context for anomalies or resource \
             issues. List up to 5 processes worth investigating, each with a \
             short reason. {intent}"
        ),
    }
}
