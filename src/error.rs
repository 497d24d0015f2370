use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepoTableError>;

#[derive(Error, Debug)]
pub enum RepoTableError {
    #[error("Failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command `{command}` exited with {status}: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("Command `{command}` timed out after {timeout:?}")]
    CommandTimedOut { command: String, timeout: Duration },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<tempfile::PersistError> for RepoTableError {
    fn from(err: tempfile::PersistError) -> Self {
        RepoTableError::Io(err.error)
    }
}
