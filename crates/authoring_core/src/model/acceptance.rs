//! Tri-state acceptance flag.
//!
//! # Responsibility
//! - Record a user's response to a role assignment or license.
//! - Keep "pending" a first-class state so callers match it exhaustively.
//!
//! # Invariants
//! - Wire form is `true` / `false` / `null`; a missing field is `Pending`.
//! - The three states are never conflated (no truthiness shortcuts).

use serde::{Deserialize, Serialize};

/// User response to a role assignment or license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Acceptance {
    Accepted,
    Rejected,
    /// No response recorded yet.
    #[default]
    Pending,
}

impl Acceptance {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }

    pub fn is_rejected(self) -> bool {
        self == Self::Rejected
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl From<Option<bool>> for Acceptance {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Accepted,
            Some(false) => Self::Rejected,
            None => Self::Pending,
        }
    }
}

impl From<Acceptance> for Option<bool> {
    fn from(value: Acceptance) -> Self {
        match value {
            Acceptance::Accepted => Some(true),
            Acceptance::Rejected => Some(false),
            Acceptance::Pending => None,
        }
    }
}
