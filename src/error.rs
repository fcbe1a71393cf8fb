use thiserror::Error;

use crate::document::InputPosition;

/// Everything that can go wrong while formatting.
///
/// A format call either returns a complete output string or fails with one
/// of these; there is no partial output. Batch behavior (keep going after a
/// bad file) belongs to callers such as the `refract` binary.
#[derive(Debug, Clone, Error)]
pub enum RefractError {
    /// Malformed token stream or grammar violation.
    #[error("{message} at row {}, column {} (offset {})", .position.row, .position.column, .position.index)]
    Syntax {
        message: String,
        position: InputPosition,
    },

    /// A comment was found while the comment policy forbids comments.
    #[error("comment not allowed by the current comment policy at row {}, column {}", .position.row, .position.column)]
    Comment { position: InputPosition },

    /// Invalid option combination, reported before any input is parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A value could not be converted for the serde entry point.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl RefractError {
    pub(crate) fn syntax(message: impl Into<String>, position: InputPosition) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    /// The input position the error refers to, when it has one.
    pub fn position(&self) -> Option<InputPosition> {
        match self {
            Self::Syntax { position, .. } | Self::Comment { position } => Some(*position),
            _ => None,
        }
    }
}
