//! Error types for the document store access layer.
//!
//! Every operation yields exactly one of three error kinds: not-found,
//! conflict, or transport. Transport is a catch-all for connection,
//! deadline, decode and backend failures; the [`TransportError`] detail is
//! kept for logging but callers only need to branch on the kind.

use std::fmt;
use std::time::Duration;

/// Errors that can occur during document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id lookup found nothing where an existing document was required.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection that was searched.
        collection: String,
        /// Id of the missing document.
        id: String,
    },

    /// The id lookup found a document where absence was required.
    #[error("conflict: document already exists: {collection}/{id}")]
    Conflict {
        /// Collection that was searched.
        collection: String,
        /// Id of the existing document.
        id: String,
    },

    /// Connection, deadline, decode or backend failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Detail carried by [`StoreError::Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Establishing or using the connection failed.
    #[error("connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The operation deadline elapsed before the store answered.
    #[error("operation timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// A stored document could not be encoded or decoded.
    #[error("document codec error: {message}")]
    Decode {
        /// Description of the codec failure.
        message: String,
    },

    /// Any other failure reported by the backing store.
    #[error("store error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a transport error for a connection failure.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::Connection {
            message: message.into(),
        })
    }

    /// Creates a transport error for an elapsed deadline.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Transport(TransportError::Timeout { timeout })
    }

    /// Creates a transport error for a cancelled operation.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Transport(TransportError::Cancelled)
    }

    /// Creates a transport error for a codec failure.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::Decode {
            message: message.into(),
        })
    }

    /// Creates a transport error for a generic backend failure.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::Backend {
            message: message.into(),
        })
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is a transport error.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the error category for logging and span status.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Transport(_) => ErrorCategory::Transport,
        }
    }
}

/// Categories of store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Document not found.
    NotFound,
    /// Document already exists.
    Conflict,
    /// Connection, timeout, decode or backend failure.
    Transport,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found("beds", "bed-1");
        assert_eq!(err.to_string(), "document not found: beds/bed-1");

        let err = StoreError::conflict("beds", "bed-1");
        assert_eq!(
            err.to_string(),
            "conflict: document already exists: beds/bed-1"
        );

        let err = StoreError::timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "operation timed out after 250ms");

        let err = StoreError::cancelled();
        assert_eq!(err.to_string(), "operation cancelled");
    }

    #[test]
    fn test_error_predicates() {
        let err = StoreError::not_found("beds", "x");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
        assert!(!err.is_transport());

        let err = StoreError::decode("missing field `name`");
        assert!(err.is_transport());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StoreError::not_found("patients", "p").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StoreError::conflict("patients", "p").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StoreError::connection("refused").category(),
            ErrorCategory::Transport
        );
        assert_eq!(ErrorCategory::Transport.to_string(), "transport");
    }
}
