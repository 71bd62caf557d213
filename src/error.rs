//! Unified error types for talkpack.
//!
//! This module provides a single [`TalkpackError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Fatal** failures (`UnsupportedEncoding`, `UnrecognizedFormat`,
//!   `SelfNameNotFound`, `ParticipantNotFound`) abort the whole ingestion call
//!   and are surfaced to the caller — never folded into a partially-populated
//!   success.
//! - **Degraded** records (a header with an unparseable timestamp, a latency
//!   sample outside plausible bounds) are not errors at all: the content is
//!   kept, the underivable field is omitted, and processing continues.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for talkpack operations.
///
/// # Example
///
/// ```rust
/// use talkpack::error::Result;
/// use talkpack::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, TalkpackError>;

/// The error type for all talkpack operations.
///
/// Each variant carries enough context to tell the user *which* of their
/// inputs was wrong: the file itself (`UnsupportedEncoding`,
/// `UnrecognizedFormat`) or a name they typed (`SelfNameNotFound`,
/// `ParticipantNotFound`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TalkpackError {
    /// An I/O error occurred while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No candidate encoding decoded the byte stream cleanly.
    ///
    /// Decoding is all-or-nothing: a file that decodes only partially is
    /// rejected rather than returned as mojibake.
    #[error("unsupported encoding: tried {}", attempted.join(", "))]
    UnsupportedEncoding {
        /// Names of the encodings that were attempted, in order.
        attempted: Vec<&'static str>,
    },

    /// The text decoded but no message-header pattern was recognized
    /// anywhere in the file.
    #[error("unrecognized chat export format: {detail}")]
    UnrecognizedFormat {
        /// Description of what was expected.
        detail: String,
    },

    /// The declared self name matched no observed speaker.
    ///
    /// Role resolution (and everything downstream) is undefined without a
    /// self identity, so this is fatal rather than defaulting to an
    /// arbitrary speaker.
    #[error("self name '{self_name}' not found among participants: {}", participants.join(", "))]
    SelfNameNotFound {
        /// The self name the caller supplied.
        self_name: String,
        /// Observed speaker names, most talkative first.
        participants: Vec<String>,
    },

    /// A `target_person` filter named someone not present in the chat.
    #[error("participant '{name}' not found in this conversation")]
    ParticipantNotFound {
        /// The name the caller supplied.
        name: String,
    },

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TalkpackError {
    /// Creates an unsupported-encoding error from the attempted candidates.
    pub fn unsupported_encoding(attempted: Vec<&'static str>) -> Self {
        TalkpackError::UnsupportedEncoding { attempted }
    }

    /// Creates an unrecognized-format error.
    pub fn unrecognized_format(detail: impl Into<String>) -> Self {
        TalkpackError::UnrecognizedFormat {
            detail: detail.into(),
        }
    }

    /// Creates a self-name-not-found error.
    pub fn self_name_not_found(self_name: impl Into<String>, participants: Vec<String>) -> Self {
        TalkpackError::SelfNameNotFound {
            self_name: self_name.into(),
            participants,
        }
    }

    /// Creates a participant-not-found error.
    pub fn participant_not_found(name: impl Into<String>) -> Self {
        TalkpackError::ParticipantNotFound { name: name.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TalkpackError::Io(_))
    }

    /// Returns `true` if this is an unsupported-encoding error.
    pub fn is_unsupported_encoding(&self) -> bool {
        matches!(self, TalkpackError::UnsupportedEncoding { .. })
    }

    /// Returns `true` if this is an unrecognized-format error.
    pub fn is_unrecognized_format(&self) -> bool {
        matches!(self, TalkpackError::UnrecognizedFormat { .. })
    }

    /// Returns `true` if this is a self-name resolution failure.
    pub fn is_self_name_not_found(&self) -> bool {
        matches!(self, TalkpackError::SelfNameNotFound { .. })
    }

    /// Returns `true` if this is a target-person resolution failure.
    pub fn is_participant_not_found(&self) -> bool {
        matches!(self, TalkpackError::ParticipantNotFound { .. })
    }

    /// Returns `true` if the error means the *file* was unreadable, as
    /// opposed to a name the caller should re-check.
    pub fn is_file_unreadable(&self) -> bool {
        self.is_unsupported_encoding() || self.is_unrecognized_format()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = TalkpackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_unsupported_encoding_display() {
        let err = TalkpackError::unsupported_encoding(vec!["UTF-8", "EUC-KR"]);
        let display = err.to_string();
        assert!(display.contains("unsupported encoding"));
        assert!(display.contains("UTF-8, EUC-KR"));
    }

    #[test]
    fn test_unrecognized_format_display() {
        let err = TalkpackError::unrecognized_format("no message header found");
        let display = err.to_string();
        assert!(display.contains("unrecognized chat export format"));
        assert!(display.contains("no message header found"));
    }

    #[test]
    fn test_self_name_not_found_display() {
        let err = TalkpackError::self_name_not_found("나", vec!["Alice".into(), "Bob".into()]);
        let display = err.to_string();
        assert!(display.contains("나"));
        assert!(display.contains("Alice, Bob"));
    }

    #[test]
    fn test_participant_not_found_display() {
        let err = TalkpackError::participant_not_found("Charlie");
        assert!(err.to_string().contains("Charlie"));
    }

    #[test]
    fn test_is_methods() {
        let io_err = TalkpackError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert!(io_err.is_io());
        assert!(!io_err.is_unsupported_encoding());
        assert!(!io_err.is_self_name_not_found());

        let enc_err = TalkpackError::unsupported_encoding(vec!["UTF-8"]);
        assert!(enc_err.is_unsupported_encoding());
        assert!(enc_err.is_file_unreadable());
        assert!(!enc_err.is_io());

        let fmt_err = TalkpackError::unrecognized_format("nope");
        assert!(fmt_err.is_unrecognized_format());
        assert!(fmt_err.is_file_unreadable());

        let name_err = TalkpackError::self_name_not_found("x", vec![]);
        assert!(name_err.is_self_name_not_found());
        assert!(!name_err.is_file_unreadable());

        let target_err = TalkpackError::participant_not_found("y");
        assert!(target_err.is_participant_not_found());
        assert!(!target_err.is_file_unreadable());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = TalkpackError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let err = TalkpackError::unrecognized_format("bad");
        let debug = format!("{:?}", err);
        assert!(debug.contains("UnrecognizedFormat"));
    }
}
