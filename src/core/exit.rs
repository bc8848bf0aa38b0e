//! Stable process exit codes.
//!
//! These are part of the CLI contract and must not be renumbered:
//! scripts key on them to distinguish provider failures from user
//! rejection from execution failures.

use crate::core::error::ShellwrightError;

pub const SUCCESS: i32 = 0;
/// Missing or invalid configuration.
pub const CONFIG: i32 = 2;
/// Provider call failed after retries.
pub const PROVIDER: i32 = 3;
/// The provider response contained no usable command.
pub const NO_COMMAND: i32 = 4;
/// The user rejected the proposed command at the confirmation gate.
pub const REJECTED: i32 = 5;
/// A confirmed command failed to execute or exited non-zero.
pub const EXECUTION: i32 = 6;

/// Map an error to its exit code.
pub fn code_for(err: &ShellwrightError) -> i32 {
    match err {
        ShellwrightError::Config(_) => CONFIG,
        ShellwrightError::Provider { .. } => PROVIDER,
        ShellwrightError::EmptySynthesis => NO_COMMAND,
        ShellwrightError::NonZeroExit { .. }
        | ShellwrightError::ExecutionTimeout { .. }
        | ShellwrightError::SpawnFailure(_) => EXECUTION,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProviderError;

    #[test]
    fn test_codes_are_distinct_and_stable() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(CONFIG, 2);
        assert_eq!(PROVIDER, 3);
        assert_eq!(NO_COMMAND, 4);
        assert_eq!(REJECTED, 5);
        assert_eq!(EXECUTION, 6);
    }

    #[test]
    fn test_mapping() {
        assert_eq!(code_for(&ShellwrightError::Config("x".into())), CONFIG);
        assert_eq!(
            code_for(&ShellwrightError::from(ProviderError::Network("t".into()))),
            PROVIDER
        );
        assert_eq!(code_for(&ShellwrightError::EmptySynthesis), NO_COMMAND);
        assert_eq!(
            code_for(&ShellwrightError::NonZeroExit { command: "x".into(), code: 1 }),
            EXECUTION
        );
    }
}
