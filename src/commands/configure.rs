//! Interactive provider setup: `shellwright config`.

use crate::core::config::{self, ProviderConfig, PROVIDERS};
use crate::core::error::{Result, ShellwrightError};
use crate::core::exit;
use crate::gate::{Prompter, StdioPrompter};

pub fn run() -> Result<i32> {
    let mut prompter = StdioPrompter;
    let cfg = gather(&mut prompter)?;
    config::save(&cfg)?;
    println!("Configuration saved for provider '{}'.", cfg.provider);
    Ok(exit::SUCCESS)
}

fn gather(prompter: &mut dyn Prompter) -> Result<ProviderConfig> {
    prompter.show("Available providers:");
    for (name, _) in PROVIDERS {
        prompter.show(&format!("  {name}"));
    }

    let provider = prompter.ask("Provider:")?.trim().to_lowercase();
    let models = config::models_for(&provider).ok_or_else(|| {
        ShellwrightError::Config(format!("unknown provider '{provider}'"))
    })?;

    prompter.show(&format!("Models for {provider}:"));
    for model in models {
        prompter.show(&format!("  {model}"));
    }
    let mut model = prompter.ask(&format!("Model [{}]:", models[0]))?.trim().to_string();
    if model.is_empty() {
        model = models[0].to_string();
    }

    let api_key = prompter.ask("API key:")?.trim().to_string();
    if api_key.is_empty() {
        return Err(ShellwrightError::Config("API key must not be empty".into()));
    }

    Ok(ProviderConfig {
        provider,
        model,
        api_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Scripted {
        replies: Vec<String>,
    }

    impl Scripted {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: replies.iter().rev().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Prompter for Scripted {
        fn show(&mut self, _text: &str) {}

        fn ask(&mut self, _question: &str) -> io::Result<String> {
            Ok(self.replies.pop().unwrap_or_default())
        }
    }

    #[test]
    fn test_gather_full_answers() {
        let mut prompter = Scripted::new(&["anthropic", "claude-3-5-haiku-20241022", "sk-test"]);
        let cfg = gather(&mut prompter).unwrap();
        assert_eq!(cfg.provider, "anthropic");
        assert_eq!(cfg.model, "claude-3-5-haiku-20241022");
        assert_eq!(cfg.api_key, "sk-test");
    }

    #[test]
    fn test_gather_defaults_model() {
        let mut prompter = Scripted::new(&["openai", "", "sk-test"]);
        let cfg = gather(&mut prompter).unwrap();
        assert_eq!(cfg.model, "gpt-4o");
    }

    #[test]
    fn test_gather_rejects_unknown_provider() {
        let mut prompter = Scripted::new(&["clippy"]);
        assert!(gather(&mut prompter).is_err());
    }

    #[test]
    fn test_gather_rejects_empty_key() {
        let mut prompter = Scripted::new(&["gemini", "gemini-1.5-flash", ""]);
        assert!(gather(&mut prompter).is_err());
    }
}
