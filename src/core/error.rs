use thiserror::Error;

/// Failures at the provider boundary.
///
/// Only `Network` and `Quota` are retryable; `Auth` and
/// `MalformedResponse` surface to the caller immediately.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("rate limit or quota exceeded: {0}")]
    Quota(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether the orchestrator may retry this failure locally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::Quota(_))
    }

    /// Short guidance appended to user-facing error output.
    pub fn guidance(&self) -> &'static str {
        match self {
            ProviderError::Auth(_) => {
                "Check your API key and run 'shellwright config' to update it."
            }
            ProviderError::Network(_) => "Check your network connection and try again.",
            ProviderError::Quota(_) => {
                "Your provider is rate limiting requests. Wait a moment or check your plan."
            }
            ProviderError::MalformedResponse(_) => {
                "The provider returned an unusable response. Try a different model."
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ShellwrightError {
    #[error("{source}\n{guidance}", guidance = .source.guidance())]
    Provider {
        #[from]
        source: ProviderError,
    },

    #[error("could not derive a command from the provider response")]
    EmptySynthesis,

    #[error("command exited with status {code}: {command}")]
    NonZeroExit { command: String, code: i32 },

    #[error("command timed out after {seconds}s: {command}")]
    ExecutionTimeout { command: String, seconds: u64 },

    #[error("failed to spawn command: {0}")]
    SpawnFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ShellwrightError>;
