//! Natural-language command synthesis: `ask`, `list`, and `find`.

use crate::core::error::Result;
use crate::core::exit;
use crate::synth::{SynthesisRequest, TaskKind};

/// Translate an instruction into shell command(s). Without `--execute`
/// the candidates are only printed; nothing runs.
pub async fn ask(nl: &str, execute: bool, yes: bool) -> Result<i32> {
    let request = SynthesisRequest::new(TaskKind::NlToShell, nl);

    if !execute {
        let orchestrator = super::orchestrator()?;
        let result = orchestrator.synthesize(&request).await?;
        println!("--- Generated command(s) ---");
        for candidate in &result.candidates {
            println!("{candidate}");
        }
        if let Some(explanation) = &result.explanation {
            println!();
            println!("{explanation}");
        }
        println!();
        println!("Re-run with --execute to review and run.");
        return Ok(exit::SUCCESS);
    }

    super::run_pipeline(request, yes).await
}

/// Generate and run a listing command scoped to a directory.
pub async fn list(intent: &str, cwd: &str, yes: bool) -> Result<i32> {
    let request = SynthesisRequest::new(TaskKind::ListFiles, intent).with_context("cwd", cwd);
    super::run_pipeline(request, yes).await
}

/// Generate and run a find/grep command rooted at a directory.
pub async fn find(intent: &str, root: &str, yes: bool) -> Result<i32> {
    let request = SynthesisRequest::new(TaskKind::FindFiles, intent).with_context("root", root);
    super::run_pipeline(request, yes).await
}
