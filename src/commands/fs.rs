//! Deterministic file operations with optional AI assistance: `show`,
//! `touch`, `delete`, `copy`, `move`, `zip`.
//!
//! These build their commands locally instead of asking the provider; the
//! AI only contributes summaries or advice when asked for.

use crate::core::error::Result;
use crate::core::exit;
use crate::exec::ExecutionRunner;
use crate::gate::StdioPrompter;
use crate::synth::TaskKind;
use std::path::Path;

/// Print file contents with optional head/tail windowing and AI summary.
pub async fn show(path: &Path, lines: Option<i64>, summarize: bool) -> Result<i32> {
    let content = std::fs::read_to_string(path)?;

    let shown: String = match lines {
        Some(n) if n >= 0 => content
            .lines()
            .take(n as usize)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(n) => {
            let all: Vec<&str> = content.lines().collect();
            let keep = n.unsigned_abs() as usize;
            let start = all.len().saturating_sub(keep);
            all[start..].join("\n")
        }
        None => content.clone(),
    };
    println!("{shown}");

    if summarize {
        let request = super::advisory_request(
            TaskKind::Summarize,
            &format!("Summarize the file {}", path.display()),
            "contents",
            &content,
        );
        let advice = super::advise(request).await?;
        super::print_advice("Summary", advice);
    }
    Ok(exit::SUCCESS)
}

/// Create an empty file, optionally with its parent directories.
pub fn touch(path: &Path, create_parents: bool) -> Result<i32> {
    if path.exists() {
        println!("Already exists: {}", path.display());
        return Ok(exit::SUCCESS);
    }
    if create_parents {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    println!("Created: {}", path.display());
    Ok(exit::SUCCESS)
}

/// Remove a file or directory after an explicit confirmation.
pub async fn delete(path: &Path, yes: bool) -> Result<i32> {
    if !path.exists() {
        eprintln!("No such path: {}", path.display());
        return Ok(exit::EXECUTION);
    }
    if !yes {
        let mut prompter = StdioPrompter;
        let question = format!("Remove {}? This cannot be undone.", path.display());
        if !super::confirm(&mut prompter, &question)? {
            println!("Aborted.");
            return Ok(exit::REJECTED);
        }
    }
    let command = format!("rm -rf -- {}", super::shell_quote(&path.display().to_string()));
    run_and_report(&command).await
}

/// Copy a file or directory.
pub async fn copy(src: &Path, dst: &Path, recursive: bool) -> Result<i32> {
    if !src.exists() {
        eprintln!("No such path: {}", src.display());
        return Ok(exit::EXECUTION);
    }
    let flag = if recursive || src.is_dir() { "-r " } else { "" };
    let command = format!(
        "cp {flag}-- {} {}",
        super::shell_quote(&src.display().to_string()),
        super::shell_quote(&dst.display().to_string()),
    );
    run_and_report(&command).await
}

/// Move or rename a file or directory.
pub async fn rename(src: &Path, dst: &Path) -> Result<i32> {
    if !src.exists() {
        eprintln!("No such path: {}", src.display());
        return Ok(exit::EXECUTION);
    }
    let command = format!(
        "mv -- {} {}",
        super::shell_quote(&src.display().to_string()),
        super::shell_quote(&dst.display().to_string()),
    );
    run_and_report(&command).await
}

/// Compress sources into a tar.gz archive, optionally asking the AI for
/// a better approach first.
pub async fn zip(dest: &str, sources: &[String], advice: bool, yes: bool) -> Result<i32> {
    if advice {
        let listing = sources.join("\n");
        let request = super::advisory_request(
            TaskKind::CompressionAdvice,
            "Recommend the best compression approach for these inputs",
            "inputs",
            &listing,
        );
        let text = super::advise(request).await?;
        super::print_advice("Compression advice", text);
    }

    let quoted: Vec<String> = sources.iter().map(|s| super::shell_quote(s)).collect();
    let command = format!(
        "tar -czf {} -- {}",
        super::shell_quote(dest),
        quoted.join(" "),
    );

    println!("Proposed: {command}");
    if !yes {
        let mut prompter = StdioPrompter;
        if !super::confirm(&mut prompter, "Create the archive?")? {
            println!("Aborted.");
            return Ok(exit::REJECTED);
        }
    }
    run_and_report(&command).await
}

async fn run_and_report(command: &str) -> Result<i32> {
    let runner = ExecutionRunner::default();
    let outcome = runner.run(command).await?;
    if !outcome.stdout.is_empty() {
        print!("{}", outcome.stdout);
    }
    if !outcome.stderr.is_empty() {
        eprint!("{}", outcome.stderr);
    }
    if outcome.success() {
        Ok(exit::SUCCESS)
    } else {
        Ok(exit::EXECUTION)
    }
}
