//! Response parsing: extract candidate shell commands from raw provider
//! output, tolerating formatting noise.
//!
//! Policy: take the longest contiguous run of command-looking lines (or the
//! first fenced code block when present); everything else becomes advisory
//! explanation. When nothing qualifies, the candidate list is empty. A
//! command is never fabricated.

use crate::synth::{SynthesisResult, TaskKind};

/// Parse raw provider output for a task.
pub fn parse(raw: &str, task: TaskKind) -> SynthesisResult {
    let cleaned = raw.trim();

    if task.is_advisory() {
        return SynthesisResult {
            candidates: Vec::new(),
            explanation: non_empty(cleaned),
            raw: raw.to_string(),
        };
    }

    if let Some((block, prose)) = first_fenced_block(cleaned) {
        let candidates = command_lines(&block);
        // A fenced block full of prose yields nothing; fall through to the
        // bare-line scan rather than treating fences as authoritative.
        if !candidates.is_empty() {
            return SynthesisResult {
                candidates,
                explanation: non_empty(&prose),
                raw: raw.to_string(),
            };
        }
    }

    let (candidates, prose) = longest_command_span(cleaned);
    SynthesisResult {
        explanation: non_empty(&prose),
        candidates,
        raw: raw.to_string(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Language tags stripped from an opening fence; anything else on that
/// line is block content.
const FENCE_LANGUAGE_TAGS: &[&str] = &["bash", "sh", "shell", "zsh", "console", "text", "plaintext"];

/// Extract the first fenced code block and return (block, surrounding prose).
fn first_fenced_block(text: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = text.split("```").collect();
    if parts.len() < 3 {
        return None;
    }
    let mut block = parts[1];
    if let Some(newline) = block.find('\n') {
        let first = block[..newline].trim();
        if FENCE_LANGUAGE_TAGS.contains(&first.to_ascii_lowercase().as_str()) {
            block = &block[newline + 1..];
        }
    }
    let prose = parts
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 0)
        .map(|(_, p)| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Some((block.to_string(), prose))
}

/// Collect the command-looking lines from a block of text, stripped of
/// prompt glyphs and inline backticks.
fn command_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .filter_map(|line| {
            let normalized = normalize_line(line);
            is_command_looking(&normalized).then_some(normalized)
        })
        .collect()
}

/// Find the longest contiguous run of command-looking lines; the remaining
/// lines become prose.
fn longest_command_span(text: &str) -> (Vec<String>, String) {
    let lines: Vec<&str> = text.lines().collect();
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = None;

    for (i, line) in lines.iter().enumerate() {
        let normalized = normalize_line(line);
        if is_command_looking(&normalized) {
            run_start.get_or_insert(i);
        } else if !is_neutral(&normalized) {
            // Blank and comment lines do not break a run; prose does.
            if let Some(start) = run_start.take() {
                best = replace_if_longer(best, (start, i));
            }
        }
    }
    if let Some(start) = run_start {
        best = replace_if_longer(best, (start, lines.len()));
    }

    let Some((start, end)) = best else {
        return (Vec::new(), text.trim().to_string());
    };

    let candidates = command_lines(&lines[start..end].join("\n"));
    let prose: String = lines[..start]
        .iter()
        .chain(lines[end..].iter())
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (candidates, prose)
}

fn replace_if_longer(
    best: Option<(usize, usize)>,
    candidate: (usize, usize),
) -> Option<(usize, usize)> {
    match best {
        Some((s, e)) if e - s >= candidate.1 - candidate.0 => Some((s, e)),
        _ => Some(candidate),
    }
}

/// Strip provider-added shell-prompt glyphs and surrounding backticks.
fn normalize_line(line: &str) -> String {
    let mut text = line.trim();

    for glyph in ["$ ", "% "] {
        if let Some(rest) = text.strip_prefix(glyph) {
            text = rest.trim_start();
            break;
        }
    }

    // A `> ` prefix is a continuation prompt only when a command with
    // arguments follows; a single trailing token is a redirection target
    // (`> file` truncates the file).
    if let Some(rest) = text.strip_prefix("> ") {
        let rest = rest.trim_start();
        if rest.contains(char::is_whitespace) {
            text = rest;
        }
    }

    if text.len() > 2 && text.starts_with('`') && text.ends_with('`') {
        text = text[1..text.len() - 1].trim();
    }

    text.to_string()
}

/// Blank lines and comments neither extend nor break a command span.
fn is_neutral(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("//")
}

const CRON_KEYWORDS: &[&str] = &[
    "@reboot", "@yearly", "@annually", "@monthly", "@weekly", "@daily", "@hourly",
];

/// Five cron schedule fields (or an @-keyword shortcut) followed by a
/// command.
fn is_cron_entry(line: &str) -> bool {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() >= 2 && CRON_KEYWORDS.contains(&fields[0]) {
        return true;
    }
    fields.len() >= 6
        && fields[..5].iter().all(|f| {
            f.chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '*' | ',' | '/' | '-'))
        })
}

/// A line is command-looking if it is non-empty and does not start with a
/// markdown prose marker or read like a sentence.
fn is_command_looking(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    // Crontab entries open with schedule fields that read like bullets;
    // recognize them before the markdown checks below.
    if is_cron_entry(line) {
        return true;
    }
    // Comments and markdown structure markers.
    if line.starts_with('#')
        || line.starts_with("//")
        || line.starts_with("- ")
        || line.starts_with("* ")
    {
        return false;
    }
    // Prose heuristic: a capitalized first word ending the line in
    // sentence punctuation is explanation, not a command.
    let first_char = line.chars().next().unwrap_or(' ');
    if first_char.is_uppercase() && (line.ends_with('.') || line.ends_with(':')) {
        return false;
    }
    true
}
