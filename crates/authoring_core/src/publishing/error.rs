//! Phase-tagged publishing failures.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Step of a reconciliation call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishingPhase {
    FetchFailed,
    DeleteFailed,
    PostFailed,
}

impl PublishingPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::DeleteFailed => "delete_failed",
            Self::PostFailed => "post_failed",
        }
    }
}

/// What went wrong within a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishingFailure {
    /// The service answered with a status other than the expected one.
    UnexpectedStatus { status: u16, body: String },
    /// The request never produced a response.
    Transport(String),
    /// A body could not be encoded or decoded.
    MalformedBody(String),
}

/// Error raised by role, licensor and ACL synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishingError {
    pub phase: PublishingPhase,
    pub failure: PublishingFailure,
}

impl PublishingError {
    pub fn new(phase: PublishingPhase, failure: PublishingFailure) -> Self {
        Self { phase, failure }
    }

    pub fn unexpected_status(phase: PublishingPhase, status: u16, body: impl Into<String>) -> Self {
        Self::new(
            phase,
            PublishingFailure::UnexpectedStatus {
                status,
                body: body.into(),
            },
        )
    }

    /// HTTP status when the service responded.
    pub fn status(&self) -> Option<u16> {
        match &self.failure {
            PublishingFailure::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for PublishingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let phase = self.phase.as_str();
        match &self.failure {
            PublishingFailure::UnexpectedStatus { status, body } => {
                write!(f, "publishing {phase}: status {status}: {body}")
            }
            PublishingFailure::Transport(message) => {
                write!(f, "publishing {phase}: transport error: {message}")
            }
            PublishingFailure::MalformedBody(message) => {
                write!(f, "publishing {phase}: malformed body: {message}")
            }
        }
    }
}

impl Error for PublishingError {}
