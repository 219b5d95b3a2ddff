use std::fmt;

use crate::engine::state_machine::MatchTrigger;
use crate::models::MatchStatus;

/// Guard failures raised by the scoring session.
///
/// Every variant except the serialization pair and `CorruptState` is a
/// caller-guard condition: the operation that produced it left the match state
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    ReadOnly,
    Blocked { operation: &'static str, status: MatchStatus },
    EmptyUndo,
    InvalidTransition { from: MatchStatus, trigger: MatchTrigger },
    InvalidSetup(String),
    InvalidToss(String),
    InvalidDelivery(String),
    /// A state received from outside breaks a structural limit.
    CorruptState(String),
    SerializationError(String),
    DeserializationError(String),
}

impl MatchError {
    /// True for rejections that leave state unchanged and need no recovery.
    pub fn is_guard(&self) -> bool {
        !matches!(
            self,
            MatchError::SerializationError(_)
                | MatchError::DeserializationError(_)
                | MatchError::CorruptState(_)
        )
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::ReadOnly => write!(f, "Read-only session: only the scorer may change the match"),
            MatchError::Blocked { operation, status } => {
                write!(f, "Operation '{}' is blocked while match is {}", operation, status)
            }
            MatchError::EmptyUndo => write!(f, "Nothing to undo: current innings has no deliveries"),
            MatchError::InvalidTransition { from, trigger } => {
                write!(f, "Invalid transition: {} is not allowed from {}", trigger, from)
            }
            MatchError::InvalidSetup(msg) => write!(f, "Invalid match setup: {}", msg),
            MatchError::InvalidToss(msg) => write!(f, "Invalid toss: {}", msg),
            MatchError::InvalidDelivery(msg) => write!(f, "Invalid delivery: {}", msg),
            MatchError::CorruptState(msg) => write!(f, "Corrupt match state: {}", msg),
            MatchError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            MatchError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            MatchError::DeserializationError(err.to_string())
        } else {
            MatchError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
