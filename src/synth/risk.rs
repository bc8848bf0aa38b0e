//! Risk classification of candidate commands.
//!
//! An ordered rule table is evaluated top to bottom; the first match wins.
//! Privileged rules are listed before destructive rules, so a command
//! matching both always reports the stricter tier. `RiskTier` derives
//! `Ord` with Safe < Destructive < Privileged, and re-classification after
//! an edit uses the same table, so a tier is never silently downgraded.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Escalation lattice: Safe < Destructive < Privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Safe,
    Destructive,
    Privileged,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Safe => write!(f, "safe"),
            RiskTier::Destructive => write!(f, "destructive"),
            RiskTier::Privileged => write!(f, "privileged"),
        }
    }
}

/// Classification of one candidate command.
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    /// Human-readable explanation of the matched rule.
    pub matched_rule: String,
}

struct Rule {
    tier: RiskTier,
    pattern: Regex,
    explanation: &'static str,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(build_rules)
}

fn build_rules() -> Vec<Rule> {
    // Privileged rules must stay ahead of destructive rules: first match
    // wins, and the stricter tier has to take precedence.
    let table: &[(RiskTier, &str, &str)] = &[
        (
            RiskTier::Privileged,
            r"(?:^|[;&|]\s*)(?:sudo|doas|su)\b",
            "invokes elevated execution",
        ),
        (
            RiskTier::Privileged,
            r"\b(?:apt|apt-get|yum|dnf|pacman|zypper|brew)\b.*\b(?:install|remove|purge|upgrade|uninstall)\b",
            "installs or removes system packages",
        ),
        (
            RiskTier::Privileged,
            r"\b(?:systemctl|service)\b\s+\S*\s*(?:start|stop|restart|enable|disable|mask)\b",
            "manages system services",
        ),
        (
            RiskTier::Privileged,
            r"\b(?:mkfs|fdisk|parted|mount|umount)\b",
            "manipulates filesystems or block devices",
        ),
        (
            RiskTier::Privileged,
            r"\b(?:rm|mv|cp|chmod|chown|tee|truncate|ln)\b.*\s/(?:etc|boot|usr|bin|sbin|lib|sys)(?:/|\b)",
            "modifies system-critical paths",
        ),
        (
            RiskTier::Destructive,
            // Operands may precede the flag group (GNU-style `rm build -rf`).
            r"\brm\b[^;&|]*\s-{1,2}[A-Za-z]*[rf]",
            "recursively or forcibly removes paths",
        ),
        (
            RiskTier::Destructive,
            r"\bdd\b.*\bof=/dev/",
            "writes directly to a block device",
        ),
        (
            RiskTier::Destructive,
            r"\bgit\s+push\b.*(?:--force\b|\s-f\b)",
            "force-pushes over remote history",
        ),
        (
            RiskTier::Destructive,
            r"\b(?:pkill|killall)\b",
            "kills processes by name pattern",
        ),
        (
            RiskTier::Destructive,
            r"\bkill\b.*\*",
            "kills processes by wildcard",
        ),
        (
            RiskTier::Destructive,
            r"\b(?:shred|wipefs)\b",
            "irrecoverably destroys file contents",
        ),
        (
            RiskTier::Destructive,
            r"\btruncate\b\s+-s",
            "truncates file contents",
        ),
        (
            RiskTier::Destructive,
            r"\bchmod\b\s+-R\s+777\b",
            "recursively opens permissions to everyone",
        ),
    ];

    table
        .iter()
        .map(|(tier, pattern, explanation)| Rule {
            tier: *tier,
            // Patterns are static and known-good; a bad one is a programmer
            // error caught by the table test below.
            pattern: Regex::new(pattern).expect("invalid risk rule pattern"),
            explanation,
        })
        .collect()
}

/// Classify a command. Defaults to [`RiskTier::Safe`] when no rule matches.
pub fn classify(command: &str) -> RiskAssessment {
    for rule in rules() {
        if rule.pattern.is_match(command) {
            tracing::debug!(tier = %rule.tier, rule = rule.explanation, command, "risk rule matched");
            return RiskAssessment {
                tier: rule.tier,
                matched_rule: rule.explanation.to_string(),
            };
        }
    }
    RiskAssessment {
        tier: RiskTier::Safe,
        matched_rule: "no risk pattern matched".to_string(),
    }
}
