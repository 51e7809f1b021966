use thiserror::Error;

use crate::gateway::Denial;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("remote api error: {0}")]
    RemoteApi(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("user {0} not found")]
    UserNotFound(u64),

    #[error("project {0} not found")]
    ProjectNotFound(String),

    #[error("`{command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Denied(#[from] Denial),
}

impl Error {
    /// Returns the denial reason when the error is an access refusal rather
    /// than a failure.
    #[must_use]
    pub fn denial(&self) -> Option<Denial> {
        match self {
            Self::Denied(denial) => Some(*denial),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
