//! Subcommand handlers: thin wrappers that gather local context, feed the
//! synthesis pipeline, and report results.
//!
//! Each handler returns the process exit code it wants; `main` passes it
//! straight to `std::process::exit`.

pub mod ask;
pub mod configure;
pub mod fs;
pub mod gitmsg;
pub mod system;

use crate::cli::Command;
use crate::core::config;
use crate::core::error::Result;
use crate::core::exit;
use crate::exec::ExecutionRunner;
use crate::gate::{ConfirmationGate, Prompter, StdioPrompter};
use crate::orchestrator::{InvocationReport, Orchestrator};
use crate::provider;
use crate::synth::{SynthesisRequest, TaskKind};
use std::path::PathBuf;

pub async fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Config => configure::run(),
        Command::Ask { nl, execute, yes } => ask::ask(&nl, execute, yes).await,
        Command::List { intent, cwd, yes } => ask::list(&intent, &cwd, yes).await,
        Command::Find { intent, root, yes } => ask::find(&intent, &root, yes).await,
        Command::Show {
            path,
            lines,
            summarize,
        } => fs::show(&path, lines, summarize).await,
        Command::Touch {
            path,
            create_parents,
        } => fs::touch(&path, create_parents),
        Command::Delete { path, yes } => fs::delete(&path, yes).await,
        Command::Copy {
            src,
            dst,
            recursive,
        } => fs::copy(&src, &dst, recursive).await,
        Command::Move { src, dst } => fs::rename(&src, &dst).await,
        Command::Ps { analyze } => system::ps(analyze).await,
        Command::Kill { pid, force, yes } => system::kill(pid, force, yes).await,
        Command::Run {
            script,
            predict,
            yes,
        } => system::run_script(&script, predict, yes).await,
        Command::Install { pkg } => system::install(&pkg).await,
        Command::Perfix { error_text } => system::perfix(&error_text).await,
        Command::Net { target } => system::net(&target).await,
        Command::Envhint { context } => system::envhint(&context).await,
        Command::Git => gitmsg::run().await,
        Command::Sysinfo => system::sysinfo().await,
        Command::Zip {
            dest,
            sources,
            advice,
            yes,
        } => fs::zip(&dest, &sources, advice, yes).await,
        Command::Schedule { nl } => system::schedule(&nl).await,
        Command::Sudo { command } => system::sudo_check(&command).await,
    }
}

/// Build an orchestrator from the persisted configuration.
pub(crate) fn orchestrator() -> Result<Orchestrator> {
    let cfg = config::global()?;
    let provider = provider::from_config(cfg)?;
    Ok(Orchestrator::new(provider))
}

/// Run an advisory task and return its explanation text, if any.
pub(crate) async fn advise(request: SynthesisRequest) -> Result<Option<String>> {
    debug_assert!(request.task.is_advisory());
    let orchestrator = orchestrator()?;
    let result = orchestrator.synthesize(&request).await?;
    Ok(result.explanation)
}

/// Run a command task through the full gate-and-execute pipeline and map
/// the report to an exit code.
pub(crate) async fn run_pipeline(request: SynthesisRequest, auto_confirm: bool) -> Result<i32> {
    let orchestrator = orchestrator()?;
    let gate = ConfirmationGate {
        auto_confirm_safe: auto_confirm,
        interactive: true,
    };
    let runner = ExecutionRunner::default();
    let mut prompter = StdioPrompter;
    let report = orchestrator
        .run(&request, &gate, &runner, &mut prompter)
        .await?;
    Ok(report_exit(&report))
}

/// Print a report's captured output and derive the process exit code.
pub(crate) fn report_exit(report: &InvocationReport) -> i32 {
    for outcome in &report.outcomes {
        if !outcome.stdout.is_empty() {
            print!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprint!("{}", outcome.stderr);
        }
        if outcome.timed_out {
            eprintln!("command timed out: {}", outcome.command);
        }
    }
    if report.rejected {
        return exit::REJECTED;
    }
    if report.outcomes.iter().any(|o| !o.success()) {
        return exit::EXECUTION;
    }
    exit::SUCCESS
}

/// Print advisory text under a header, or a fallback note when the
/// provider had nothing to say.
pub(crate) fn print_advice(header: &str, advice: Option<String>) {
    match advice {
        Some(text) if !text.trim().is_empty() => {
            println!("--- {header} ---");
            println!("{}", text.trim());
        }
        _ => println!("(no advice returned)"),
    }
}

/// Quote an argument for `sh -c` interpolation.
pub(crate) fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%_-+=:,./".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Locate an executable on PATH.
pub(crate) fn which(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Yes/no question with a default of no.
pub(crate) fn confirm(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    let reply = prompter.ask(&format!("{question} [y/N]:"))?;
    Ok(matches!(reply.to_lowercase().as_str(), "y" | "yes"))
}

/// Advisory request that carries one labeled context blob.
pub(crate) fn advisory_request(
    task: TaskKind,
    intent: &str,
    key: &str,
    value: &str,
) -> SynthesisRequest {
    SynthesisRequest::new(task, intent).with_context(key, value)
}
