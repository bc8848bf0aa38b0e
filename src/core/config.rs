//! Provider configuration: which AI backend to call and with what credential.
//!
//! The config is persisted as TOML under `~/.shellwright/config.toml`, loaded
//! once at startup, and treated as read-only for the rest of the process.

use crate::core::error::{Result, ShellwrightError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Known providers and the models offered for each in the interactive setup.
///
/// The list is advisory: any model identifier the provider accepts can be
/// written to the config file by hand.
pub const PROVIDERS: &[(&str, &[&str])] = &[
    ("anthropic", &["claude-sonnet-4-20250514", "claude-3-5-haiku-20241022"]),
    ("openai", &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"]),
    ("gemini", &["gemini-1.5-pro", "gemini-1.5-flash"]),
    ("deepseek", &["deepseek-chat", "deepseek-reasoner"]),
    ("mistral", &["mistral-large-latest", "mistral-medium-latest"]),
    ("together", &["meta-llama/Llama-3-70b-chat-hf", "mistralai/Mixtral-8x22B-Instruct-v0.1"]),
];

/// Immutable provider selection for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier, one of the names in [`PROVIDERS`].
    pub provider: String,
    /// Model identifier passed through to the provider.
    pub model: String,
    /// API credential for the provider.
    pub api_key: String,
}

/// Directory holding persisted state (`~/.shellwright`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShellwrightError::Config("could not determine home directory".into()))?;
    Ok(home.join(".shellwright"))
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load a config from an explicit path.
pub fn load_from(path: &Path) -> Result<ProviderConfig> {
    if !path.exists() {
        return Err(ShellwrightError::Config(
            "missing configuration. Run 'shellwright config' to set up your AI provider and API key"
                .into(),
        ));
    }
    let text = std::fs::read_to_string(path)?;
    let cfg: ProviderConfig = toml::from_str(&text)?;
    if cfg.provider.is_empty() || cfg.model.is_empty() || cfg.api_key.is_empty() {
        return Err(ShellwrightError::Config(
            "incomplete configuration. Run 'shellwright config' to set up your AI provider and API key"
                .into(),
        ));
    }
    Ok(cfg)
}

/// Load the persisted config from the default location.
pub fn load() -> Result<ProviderConfig> {
    load_from(&config_path()?)
}

/// Persist a config to an explicit path, creating parent directories.
pub fn save_to(path: &Path, cfg: &ProviderConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(cfg)?;
    std::fs::write(path, text)?;
    tracing::info!(path = %path.display(), "configuration saved");
    Ok(())
}

/// Persist a config to the default location.
pub fn save(cfg: &ProviderConfig) -> Result<()> {
    save_to(&config_path()?, cfg)
}

static CONFIG: OnceLock<ProviderConfig> = OnceLock::new();

/// Process-wide config, loaded on first access and read-only thereafter.
pub fn global() -> Result<&'static ProviderConfig> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let loaded = load()?;
    Ok(CONFIG.get_or_init(|| loaded))
}

/// Look up the advertised models for a provider name.
pub fn models_for(provider: &str) -> Option<&'static [&'static str]> {
    PROVIDERS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, models)| *models)
}
