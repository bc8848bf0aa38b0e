//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-powered terminal assistant: natural-language intent in, confirmed
/// shell actions out.
#[derive(Parser, Debug)]
#[command(name = "shellwright", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure the AI provider, model, and API key
    Config,

    /// Translate a natural-language instruction into shell command(s)
    Ask {
        /// The instruction, in plain language
        nl: String,
        /// Confirm and execute the generated command(s)
        #[arg(long)]
        execute: bool,
        /// Auto-confirm safe-tier commands (riskier tiers still prompt)
        #[arg(long)]
        yes: bool,
    },

    /// Generate and run a file-listing command from an intent
    List {
        /// What you want to see, e.g. "python files modified today"
        #[arg(short, long)]
        intent: String,
        /// Directory to run in
        #[arg(short = 'C', long, default_value = ".")]
        cwd: String,
        /// Auto-confirm safe-tier commands
        #[arg(long)]
        yes: bool,
    },

    /// Find files or directories from a natural-language description
    Find {
        /// What to look for
        intent: String,
        /// Root directory
        #[arg(short = 'C', long, default_value = ".")]
        root: String,
        /// Auto-confirm safe-tier commands
        #[arg(long)]
        yes: bool,
    },

    /// Display file contents, optionally with an AI summary
    Show {
        path: PathBuf,
        /// Head/tail line count (positive = head, negative = tail)
        #[arg(short = 'n', long, allow_hyphen_values = true)]
        lines: Option<i64>,
        /// Summarize the contents with AI
        #[arg(short, long)]
        summarize: bool,
    },

    /// Create an empty file
    Touch {
        path: PathBuf,
        /// Create missing parent directories
        #[arg(long)]
        create_parents: bool,
    },

    /// Remove a file or directory, with confirmation
    Delete {
        path: PathBuf,
        /// Remove without confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Copy a file or directory
    Copy {
        src: PathBuf,
        dst: PathBuf,
        /// Recursive copy
        #[arg(short, long)]
        recursive: bool,
    },

    /// Move or rename a file or directory
    Move { src: PathBuf, dst: PathBuf },

    /// List running processes, optionally with AI analysis
    Ps {
        /// Ask AI to analyze the process list
        #[arg(long)]
        analyze: bool,
    },

    /// Send a signal to a process, with confirmation
    Kill {
        pid: i32,
        /// Use SIGKILL
        #[arg(short = '9', long)]
        force: bool,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Execute a script, optionally predicting its behavior first
    Run {
        script: PathBuf,
        /// Ask AI to predict runtime and side effects before running
        #[arg(long)]
        predict: bool,
        /// Run without confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Get AI advice on installing a package, then optionally install it
    Install { pkg: String },

    /// Explain a filesystem permission error and suggest a fix
    Perfix { error_text: String },

    /// Run network diagnostics against a host and get AI advice
    Net {
        /// Host or URL
        #[arg(short, long)]
        target: String,
    },

    /// Suggest environment variables for an application or task
    Envhint { context: String },

    /// Generate a conventional commit message for staged changes
    Git,

    /// Gather a system report and get AI advice
    Sysinfo,

    /// Compress files into a tar.gz archive
    Zip {
        /// Destination archive path
        dest: String,
        /// Files and directories to compress
        #[arg(required = true)]
        sources: Vec<String>,
        /// Ask AI for the best compression approach first
        #[arg(long)]
        advice: bool,
        /// Run without confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Create a cron job from a natural-language schedule
    Schedule { nl: String },

    /// Analyze a command with AI before running it with sudo
    Sudo { command: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["shellwright", "ask", "free disk space", "--execute"]);
        match cli.command {
            Command::Ask { nl, execute, yes } => {
                assert_eq!(nl, "free disk space");
                assert!(execute);
                assert!(!yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_lines() {
        let cli = Cli::parse_from(["shellwright", "show", "file.txt", "-n", "-20"]);
        match cli.command {
            Command::Show { lines, .. } => assert_eq!(lines, Some(-20)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_zip_sources() {
        let cli = Cli::parse_from(["shellwright", "zip", "out.tar.gz", "a.txt", "b.txt"]);
        match cli.command {
            Command::Zip { dest, sources, .. } => {
                assert_eq!(dest, "out.tar.gz");
                assert_eq!(sources, vec!["a.txt", "b.txt"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
