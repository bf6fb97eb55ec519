use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the grading endpoint sends with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("malformed grading reply (status {status}): {source}")]
    Malformed {
        status: u16,
        source: serde_json::Error,
    },
    #[error("grading endpoint returned status {status} without an error message")]
    MissingErrorBody { status: u16 },
}

impl ReplyError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Malformed { status, .. } | Self::MissingErrorBody { status } => *status,
        }
    }
}
