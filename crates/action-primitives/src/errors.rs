//! Error types for action parsing

use thiserror::Error;

/// Reasons an untyped action payload could not become a [`crate::BrowserAction`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    /// The payload was not a JSON object
    #[error("action payload is not an object")]
    NotAnObject,

    /// The object carried no string `type` discriminator
    #[error("action payload has no type")]
    MissingType,

    /// The discriminator names an action this environment does not know
    #[error("unknown action type: {0}")]
    UnknownType(String),

    /// The discriminator is known but the fields do not fit it
    #[error("invalid {kind}: {reason}")]
    Invalid { kind: String, reason: String },
}

impl ActionParseError {
    pub fn invalid(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
