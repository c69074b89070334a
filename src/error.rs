// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Document is empty: {0}")]
    EmptyDocument(PathBuf),

    #[error("Markdown rendering failed for {file}: {message}")]
    Render { file: String, message: String },

    #[error("Publishing API error: {0}")]
    Api(#[from] ApiError),

    #[error("Archive error for {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by a [`crate::publishing::PublishingApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Step of a publishing attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parsed,
    FieldsResolved,
    Rendered,
    Submitted,
    Archived,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Parsed => "parse",
            Stage::FieldsResolved => "resolve",
            Stage::Rendered => "render",
            Stage::Submitted => "submit",
            Stage::Archived => "archive",
        };
        f.write_str(name)
    }
}

impl PipelineError {
    /// The attempt stage this error stops at, if it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::FileOperation { .. } | PipelineError::EmptyDocument(_) => {
                Some(Stage::Read)
            }
            PipelineError::Render { .. } => Some(Stage::Rendered),
            PipelineError::Api(_) => Some(Stage::Submitted),
            PipelineError::Archive { .. } => Some(Stage::Archived),
            _ => None,
        }
    }

    /// Whether the attempt was ignored rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, PipelineError::EmptyDocument(_))
    }
}
