use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Email or password missing after argument parsing and prompting
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("failed to read password: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Errors that should be answered with the usage line rather than a bare message
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ProvisionError::MissingArgument(_) | ProvisionError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
