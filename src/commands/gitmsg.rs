//! Commit message generation from the staged diff.

use crate::core::error::Result;
use crate::core::exit;
use crate::exec::ExecutionRunner;
use crate::synth::TaskKind;

pub async fn run() -> Result<i32> {
    let runner = ExecutionRunner::default();
    let outcome = runner
        .run("git --no-pager diff --staged --stat && git --no-pager diff --staged")
        .await?;
    if !outcome.success() {
        eprint!("{}", outcome.stderr);
        eprintln!("Not a git repository, or git is unavailable.");
        return Ok(exit::EXECUTION);
    }
    if outcome.stdout.trim().is_empty() {
        println!("No staged changes. Stage files with 'git add' first.");
        return Ok(exit::SUCCESS);
    }

    let request = super::advisory_request(
        TaskKind::CommitMessage,
        "Write a conventional commit message for these staged changes",
        "diff",
        &outcome.stdout,
    );
    let advice = super::advise(request).await?;
    super::print_advice("Suggested commit message", advice);
    Ok(exit::SUCCESS)
}
