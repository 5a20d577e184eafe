use thiserror::Error;

/// Unified error type for chrn operations
#[derive(Error, Debug)]
pub enum ChrnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forge request failed: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in chrn
pub type Result<T> = std::result::Result<T, ChrnError>;

impl ChrnError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChrnError::Config(msg.into())
    }

    /// Create an authentication error with context
    pub fn auth(msg: impl Into<String>) -> Self {
        ChrnError::Auth(msg.into())
    }

    /// Create a forge/network error with context
    pub fn network(msg: impl Into<String>) -> Self {
        ChrnError::Network(msg.into())
    }

    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        ChrnError::Parse(msg.into())
    }

    /// Create a remote (fetch/push) error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ChrnError::Remote(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Every failure is fatal; the kinds only differ in how they are reported.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<octocrab::Error> for ChrnError {
    fn from(err: octocrab::Error) -> Self {
        ChrnError::Network(err.to_string())
    }
}
