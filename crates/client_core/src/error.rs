use shared::error::ReplyError;
use thiserror::Error;

/// Grading call failed outright. An incorrect answer is not an error; it
/// arrives as a graded `SubmissionResult`.
#[derive(Debug, Error)]
pub enum GradingError {
    #[error("grading endpoint rejected submission (status {status}): {message}")]
    Server { status: u16, message: String },
    #[error("grading request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Reply(#[from] ReplyError),
}

impl GradingError {
    /// Text for the transient message area. Server-supplied text is passed
    /// through verbatim and may contain markup.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Transport(_) => "Unable to reach the grading service.".to_string(),
            Self::Reply(ReplyError::MissingErrorBody { status }) => {
                format!("Submission failed (HTTP {status}).")
            }
            Self::Reply(ReplyError::Malformed { .. }) => {
                "The grading service sent an unreadable response.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for GradingError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("submission is locked")]
    Locked,
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("submit control is disabled")]
    SubmitDisabled,
    #[error("reordering is disabled")]
    ReorderDisabled,
    #[error("no reorder in progress")]
    NoDragInProgress,
    #[error("position {position} is out of range for {len} items")]
    PositionOutOfRange { position: usize, len: usize },
}
