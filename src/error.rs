//! Error types for the to-do list.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 1-based task number outside the list.
    #[error("Invalid task number, please try again.")]
    InvalidIndex(i64),

    /// Menu or sort choice with no matching option.
    #[error("Invalid choice, please try again.")]
    InvalidChoice(i64),

    /// Text typed where a whole number was expected.
    #[error("'{0}' is not a number, please try again.")]
    NotANumber(String),

    /// Input stream closed.
    #[error("End of input")]
    EndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to load settings from {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Read(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// Errors the command loop reports and then carries on from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidIndex(_) | Error::InvalidChoice(_) | Error::NotANumber(_)
        )
    }
}
