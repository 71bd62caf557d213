//! One-call ingestion pipeline.
//!
//! Composes the four engine stages — decode, segment, resolve, analyze —
//! into a single function over a raw byte buffer:
//!
//! ```text
//! bytes → EncodingDetector → MessageSegmenter → ParticipantResolver → TimingAnalyzer
//! ```
//!
//! Each stage is a synchronous pure function over in-memory data; ingestion
//! calls for different files may run concurrently with no coordination.
//! Fatal stage errors abort the call; degraded records (missing timestamps,
//! discarded outlier samples) fold into a successful result.
//!
//! # Example
//!
//! ```rust
//! use talkpack::config::IngestConfig;
//! use talkpack::ingest::ingest;
//!
//! let export = "2024년 1월 15일 오후 3:45, 영희 : 뭐해?\n\
//!               2024년 1월 15일 오후 3:50, 나 : 일하는 중";
//! let result = ingest(export.as_bytes(), &IngestConfig::new("나"))?;
//!
//! assert_eq!(result.messages.len(), 2);
//! assert!(!result.participants.is_group);
//! assert_eq!(result.timing.sample_count(), 1);
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

use serde::Serialize;

use crate::config::IngestConfig;
use crate::encoding;
use crate::error::Result;
use crate::participants::{ParticipantSet, resolve_roles};
use crate::record::MessageRecord;
use crate::segmenter::segment;
use crate::timing::{TimingProfile, analyze};

/// Everything the engine recovers from one export file.
///
/// `messages` is the role-annotated sequence for style learning; `timing`
/// carries both per-bucket aggregates and the raw samples an external store
/// needs for merge-on-write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingestion {
    /// Role-annotated messages, in original file order.
    pub messages: Vec<MessageRecord>,
    /// Who spoke, how often, and whether this was a group chat.
    pub participants: ParticipantSet,
    /// Response-timing profile derived from the annotated sequence.
    pub timing: TimingProfile,
    /// Name of the encoding that decoded the input bytes.
    pub encoding: &'static str,
}

/// Runs the full pipeline over raw export bytes.
///
/// # Errors
///
/// Propagates the fatal errors of each stage:
/// [`UnsupportedEncoding`](crate::TalkpackError::UnsupportedEncoding),
/// [`UnrecognizedFormat`](crate::TalkpackError::UnrecognizedFormat),
/// [`SelfNameNotFound`](crate::TalkpackError::SelfNameNotFound), and
/// [`ParticipantNotFound`](crate::TalkpackError::ParticipantNotFound).
pub fn ingest(bytes: &[u8], config: &IngestConfig) -> Result<Ingestion> {
    let decoded = encoding::decode(bytes)?;
    ingest_text(&decoded.text, decoded.encoding, config)
}

/// Runs the pipeline over text that is already decoded.
///
/// Useful when the caller has its own decoding step. Line endings are still
/// normalized before segmentation.
pub fn ingest_str(text: &str, config: &IngestConfig) -> Result<Ingestion> {
    let normalized = encoding::normalize(text);
    ingest_text(&normalized, "UTF-8", config)
}

fn ingest_text(text: &str, encoding: &'static str, config: &IngestConfig) -> Result<Ingestion> {
    let records = segment(text, &config.segmenter)?;
    let resolved = resolve_roles(records, &config.resolve)?;
    let timing = analyze(&resolved.records, &config.timing);

    Ok(Ingestion {
        messages: resolved.records,
        participants: resolved.participants,
        timing,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Role;
    use crate::timing::TimeOfDay;

    const EXPORT: &str = "\
2024년 1월 15일 오전 9:00, 영희 : 일어났어?
2024년 1월 15일 오전 9:20, 나 : 방금 일어남
2024년 1월 15일 오후 7:00, 영희 : 저녁 먹자
2024년 1월 15일 오후 7:05, 나 : 좋아";

    #[test]
    fn test_full_pipeline() {
        let result = ingest(EXPORT.as_bytes(), &IngestConfig::new("나")).unwrap();
        assert_eq!(result.encoding, "UTF-8");
        assert_eq!(result.messages.len(), 4);
        assert!(!result.participants.is_group);
        assert_eq!(result.timing.sample_count(), 2);
        assert!(result.timing.bucket(TimeOfDay::Morning).is_some());
        assert!(result.timing.bucket(TimeOfDay::Evening).is_some());
    }

    #[test]
    fn test_roles_annotated() {
        let result = ingest(EXPORT.as_bytes(), &IngestConfig::new("나")).unwrap();
        let roles: Vec<&Role> = result.messages.iter().filter_map(|m| m.role()).collect();
        assert_eq!(roles, vec![&Role::Other, &Role::Me, &Role::Other, &Role::Me]);
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let bad_bytes = ingest(&[0xFF, 0xFF, 0xFF], &IngestConfig::new("나")).unwrap_err();
        assert!(bad_bytes.is_unsupported_encoding());

        let bad_format = ingest(b"hello world", &IngestConfig::new("나")).unwrap_err();
        assert!(bad_format.is_unrecognized_format());

        let bad_name = ingest(EXPORT.as_bytes(), &IngestConfig::new("없는이름")).unwrap_err();
        assert!(bad_name.is_self_name_not_found());
    }

    #[test]
    fn test_ingest_str_normalizes_line_endings() {
        let crlf = EXPORT.replace('\n', "\r\n");
        let result = ingest_str(&crlf, &IngestConfig::new("나")).unwrap();
        assert_eq!(result.messages.len(), 4);
    }

    #[test]
    fn test_reruns_are_pure() {
        let first = ingest(EXPORT.as_bytes(), &IngestConfig::new("나")).unwrap();
        let second = ingest(EXPORT.as_bytes(), &IngestConfig::new("영희")).unwrap();
        // Same bytes, different self: roles flip, nothing carries over.
        assert_eq!(first.messages.len(), second.messages.len());
        assert_eq!(second.messages[0].role, Some(Role::Me));
        assert_eq!(first.messages[0].role, Some(Role::Other));
    }
}
