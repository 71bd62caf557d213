//! # Talkpack
//!
//! A Rust library for turning raw KakaoTalk chat exports into structured,
//! role-annotated message sequences and response-timing statistics, ready
//! for downstream persona/style learning and timing recommendation.
//!
//! ## Overview
//!
//! KakaoTalk's export feature produces semi-structured plain text with no
//! schema guarantees: encodings vary by device, two structurally different
//! line layouts exist, messages span multiple lines, and timestamps are
//! locale-formatted. Talkpack recovers a reliable structured model from
//! that text in four stages:
//!
//! 1. [`encoding`] — detect the byte encoding and normalize line endings
//! 2. [`segmenter`] — split text into discrete multi-line-aware messages
//! 3. [`participants`] — resolve who is who (1:1 vs group, self vs other)
//! 4. [`timing`] — derive response-latency statistics by time of day
//!
//! ## Quick Start
//!
//! The [`ingest`](ingest::ingest) function runs the whole pipeline:
//!
//! ```rust
//! use talkpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let bytes = "2024년 1월 15일 오후 3:45, 영희 : 뭐해?\n\
//!                  2024년 1월 15일 오후 3:50, 나 : 쉬는 중"
//!         .as_bytes();
//!
//!     let result = ingest(bytes, &IngestConfig::new("나"))?;
//!
//!     for message in &result.messages {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//!     println!("samples: {}", result.timing.sample_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Stage-by-stage usage
//!
//! Each stage is an independent pure function, so callers that need only a
//! part of the pipeline (or want to re-resolve the same parse with a
//! different self name) can compose them directly:
//!
//! ```rust
//! use talkpack::config::{ResolveConfig, SegmenterConfig};
//! use talkpack::encoding::decode;
//! use talkpack::participants::resolve_roles;
//! use talkpack::segmenter::segment;
//!
//! # fn main() -> talkpack::error::Result<()> {
//! let decoded = decode("2024년 1월 15일 오후 3:45, 나 : 안녕".as_bytes())?;
//! let records = segment(&decoded.text, &SegmenterConfig::new())?;
//! let resolved = resolve_roles(records, &ResolveConfig::new("나"))?;
//! assert_eq!(resolved.records.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fatal conditions come back as typed [`TalkpackError`] variants the caller
//! can match on: the *file* was unreadable ([`UnsupportedEncoding`],
//! [`UnrecognizedFormat`]) versus a *name* needs re-checking
//! ([`SelfNameNotFound`], [`ParticipantNotFound`]). Degraded records — a
//! header whose timestamp would not parse, a latency outlier — never abort
//! ingestion; the content is kept and the underivable field omitted.
//!
//! [`UnsupportedEncoding`]: TalkpackError::UnsupportedEncoding
//! [`UnrecognizedFormat`]: TalkpackError::UnrecognizedFormat
//! [`SelfNameNotFound`]: TalkpackError::SelfNameNotFound
//! [`ParticipantNotFound`]: TalkpackError::ParticipantNotFound
//!
//! ## Module Structure
//!
//! - [`ingest`] — one-call pipeline ([`ingest::ingest`], [`Ingestion`](ingest::Ingestion))
//! - [`encoding`] — encoding detection ([`decode`](encoding::decode), [`DecodedText`](encoding::DecodedText))
//! - [`segmenter`] — message-boundary parsing ([`segment`](segmenter::segment))
//! - [`participants`] — role resolution ([`resolve_roles`](participants::resolve_roles), [`ParticipantSet`](participants::ParticipantSet))
//! - [`timing`] — latency analysis ([`analyze`](timing::analyze), [`TimingProfile`](timing::TimingProfile))
//! - [`config`] — per-stage and combined configuration
//! - [`record`] — [`MessageRecord`] and [`Role`]
//! - [`error`] — [`TalkpackError`] and [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod ingest;
pub mod participants;
pub mod record;
pub mod segmenter;
pub mod timing;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TalkpackError};
pub use record::{MessageRecord, Role};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use talkpack::prelude::*;
/// ```
pub mod prelude {
    // Core record types
    pub use crate::record::{MessageRecord, Role};

    // Error types
    pub use crate::error::{Result, TalkpackError};

    // Pipeline
    pub use crate::ingest::{Ingestion, ingest, ingest_str};

    // Stage configs
    pub use crate::config::{IngestConfig, ResolveConfig, SegmenterConfig, TimingConfig};

    // Stage entry points
    pub use crate::encoding::{DecodedText, decode};
    pub use crate::participants::{ParticipantSet, ResolvedConversation, resolve_roles};
    pub use crate::segmenter::segment;
    pub use crate::timing::{BucketStats, TimeOfDay, TimingProfile, TimingSample, analyze};
}
