//! System-facing subcommands: processes, scripts, packages, network,
//! environment, scheduling, and privileged execution checks.

use crate::core::error::Result;
use crate::core::exit;
use crate::exec::ExecutionRunner;
use crate::gate::StdioPrompter;
use crate::synth::{SynthesisRequest, TaskKind};
use std::path::Path;

/// Process listing sorted by memory, with optional AI analysis.
pub async fn ps(analyze: bool) -> Result<i32> {
    let runner = ExecutionRunner::default();
    let outcome = runner.run("ps aux --sort=-%mem").await?;
    if !outcome.success() {
        eprint!("{}", outcome.stderr);
        return Ok(exit::EXECUTION);
    }
    print!("{}", outcome.stdout);

    if analyze {
        let request = super::advisory_request(
            TaskKind::ProcessAnalysis,
            "Flag anything unusual in this process listing",
            "processes",
            &outcome.stdout,
        );
        let advice = super::advise(request).await?;
        super::print_advice("Process analysis", advice);
    }
    Ok(exit::SUCCESS)
}

/// Signal a process by pid, with confirmation.
pub async fn kill(pid: i32, force: bool, yes: bool) -> Result<i32> {
    let signal = if force { "-9 " } else { "" };
    let command = format!("kill {signal}{pid}");

    if !yes {
        let mut prompter = StdioPrompter;
        if !super::confirm(&mut prompter, &format!("Run '{command}'?"))? {
            println!("Aborted.");
            return Ok(exit::REJECTED);
        }
    }
    run_and_report(&command).await
}

/// Execute a script, optionally predicting its behavior first.
pub async fn run_script(script: &Path, predict: bool, yes: bool) -> Result<i32> {
    let source = std::fs::read_to_string(script)?;

    if predict {
        let request = super::advisory_request(
            TaskKind::PredictRun,
            &format!("Predict what running {} will do", script.display()),
            "script",
            &source,
        );
        let advice = super::advise(request).await?;
        super::print_advice("Prediction", advice);
    }

    if !yes {
        let mut prompter = StdioPrompter;
        let question = format!("Execute {}?", script.display());
        if !super::confirm(&mut prompter, &question)? {
            println!("Aborted.");
            return Ok(exit::REJECTED);
        }
    }

    let command = format!("bash {}", super::shell_quote(&script.display().to_string()));
    run_and_report(&command).await
}

/// Package installation advice, with an optional apt install follow-up.
pub async fn install(pkg: &str) -> Result<i32> {
    let request = SynthesisRequest::new(
        TaskKind::PackageAdvice,
        format!("How should I install '{pkg}' on this system?"),
    );
    let advice = super::advise(request).await?;
    super::print_advice("Install advice", advice);

    if super::which("apt").is_some() || super::which("apt-get").is_some() {
        let command = format!("sudo apt update && sudo apt install -y {}", super::shell_quote(pkg));
        let mut prompter = StdioPrompter;
        if super::confirm(&mut prompter, &format!("Run '{command}'?"))? {
            return run_and_report(&command).await;
        }
        println!("Skipped installation.");
    }
    Ok(exit::SUCCESS)
}

/// Explain a permission error and suggest a fix.
pub async fn perfix(error_text: &str) -> Result<i32> {
    let request = SynthesisRequest::new(TaskKind::ExplainError, error_text);
    let advice = super::advise(request).await?;
    super::print_advice("Diagnosis", advice);
    Ok(exit::SUCCESS)
}

/// Ping and probe a target, then ask the AI to interpret the results.
pub async fn net(target: &str) -> Result<i32> {
    let runner = ExecutionRunner::default();
    let quoted = super::shell_quote(target);

    let ping = runner.run(&format!("ping -c 4 -W 2 {quoted}")).await?;
    println!("--- ping ---");
    print!("{}", if ping.success() { &ping.stdout } else { &ping.stderr });

    let probe = runner
        .run(&format!("curl -Is --max-time 5 {quoted}"))
        .await?;
    println!("--- http ---");
    print!("{}", if probe.success() { &probe.stdout } else { &probe.stderr });

    let diagnostics = format!(
        "ping exit {}:\n{}\n{}\ncurl exit {}:\n{}\n{}",
        ping.exit_code, ping.stdout, ping.stderr, probe.exit_code, probe.stdout, probe.stderr,
    );
    let request = super::advisory_request(
        TaskKind::NetworkAdvice,
        &format!("Interpret these network diagnostics for {target}"),
        "diagnostics",
        &diagnostics,
    );
    let advice = super::advise(request).await?;
    super::print_advice("Network advice", advice);
    Ok(exit::SUCCESS)
}

/// Environment variable suggestions for an application or task.
pub async fn envhint(context: &str) -> Result<i32> {
    let request = SynthesisRequest::new(TaskKind::EnvHint, context);
    let advice = super::advise(request).await?;
    super::print_advice("Environment hints", advice);
    Ok(exit::SUCCESS)
}

/// Gather a system report and ask the AI for advice on it.
pub async fn sysinfo() -> Result<i32> {
    let runner = ExecutionRunner::default();
    let report_cmd = "uname -a; echo; df -h; echo; free -h";
    let outcome = runner.run(report_cmd).await?;
    print!("{}", outcome.stdout);
    if !outcome.stderr.is_empty() {
        eprint!("{}", outcome.stderr);
    }

    let request = super::advisory_request(
        TaskKind::SystemAdvice,
        "Review this system report and flag anything needing attention",
        "report",
        &outcome.stdout,
    );
    let advice = super::advise(request).await?;
    super::print_advice("System advice", advice);
    Ok(exit::SUCCESS)
}

/// Turn a natural-language schedule into a crontab entry and install it.
pub async fn schedule(nl: &str) -> Result<i32> {
    let orchestrator = super::orchestrator()?;
    let request = SynthesisRequest::new(TaskKind::CronLine, nl);
    let result = orchestrator.synthesize(&request).await?;

    // Command task kinds guarantee at least one candidate.
    let entry = result.candidates[0].clone();
    println!("Proposed crontab entry:");
    println!("  {entry}");

    let mut prompter = StdioPrompter;
    if !super::confirm(&mut prompter, "Install this entry for the current user?")? {
        println!("Aborted.");
        return Ok(exit::REJECTED);
    }

    let command = format!(
        "(crontab -l 2>/dev/null; echo {}) | crontab -",
        super::shell_quote(&entry),
    );
    run_and_report(&command).await
}

/// Safety-check a command with the AI before running it under sudo.
pub async fn sudo_check(command: &str) -> Result<i32> {
    let request = SynthesisRequest::new(
        TaskKind::DryRunCheck,
        format!("Assess the safety of running with elevated privileges: {command}"),
    );
    let advice = super::advise(request).await?;
    super::print_advice("Safety analysis", advice);

    let elevated = format!("sudo {command}");
    let mut prompter = StdioPrompter;
    if !super::confirm(&mut prompter, &format!("Run '{elevated}'?"))? {
        println!("Aborted.");
        return Ok(exit::REJECTED);
    }
    run_and_report(&elevated).await
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
