//! Error types for the board engine

use crate::order::OrderError;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// The session user does not own the board
    #[error("forbidden: {user} does not own board {board}")]
    Forbidden { user: String, board: String },

    /// Board names are unique per owner
    #[error("board {name} already exists")]
    DuplicateName { name: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error(transparent)]
    Order(#[from] OrderError),

    /// Lock is held by another operation
    #[error("lock busy - another operation in progress")]
    LockBusy,

    #[error("lock timeout after {elapsed_ms}ms")]
    LockTimeout { elapsed_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(user: impl ToString, board: impl ToString) -> Self {
        Self::Forbidden {
            user: user.to_string(),
            board: board.to_string(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy | Self::LockTimeout { .. })
    }

    /// Missing or inaccessible scope: the request is rejected and nothing
    /// was written
    pub fn is_not_found_or_forbidden(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound { .. }
                | Self::ColumnNotFound { .. }
                | Self::CardNotFound { .. }
                | Self::Forbidden { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::CardNotFound {
            id: "itm_abc".into(),
        };
        assert_eq!(err.to_string(), "card not found: itm_abc");
    }

    #[test]
    fn test_order_error_is_transparent() {
        let err: BoardError = OrderError::Misordered {
            before: 2.0,
            after: 1.0,
        }
        .into();
        assert_eq!(err.to_string(), "before bound 2 is not below after bound 1");
    }

    #[test]
    fn test_retryable() {
        assert!(BoardError::LockBusy.is_retryable());
        assert!(BoardError::LockTimeout { elapsed_ms: 5 }.is_retryable());
        assert!(!BoardError::forbidden("usr_a", "brd_b").is_retryable());
    }

    #[test]
    fn test_scope_rejections() {
        assert!(BoardError::forbidden("usr_a", "brd_b").is_not_found_or_forbidden());
        assert!(BoardError::ColumnNotFound { id: "col_x".into() }.is_not_found_or_forbidden());
        assert!(!BoardError::invalid_value("before", "x").is_not_found_or_forbidden());
    }
}
