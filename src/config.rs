//! Configuration types for the ingestion pipeline.
//!
//! Each stage has its own configuration struct, and [`IngestConfig`] composes
//! them for the one-call [`ingest`](crate::ingest::ingest) pipeline:
//!
//! - [`SegmenterConfig`] — message-boundary parsing settings
//! - [`ResolveConfig`] — self identity and optional group-chat target filter
//! - [`TimingConfig`] — response-latency sampling bounds
//!
//! # Example
//!
//! ```rust
//! use talkpack::config::IngestConfig;
//!
//! let config = IngestConfig::new("나")
//!     .with_target_person("김영희")
//!     .with_outlier_cap_minutes(720);
//!
//! assert_eq!(config.resolve.self_name, "나");
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for message segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Skip KakaoTalk system notifications (join/leave, media placeholders,
    /// export banners) instead of emitting them as messages (default: true).
    pub skip_system_messages: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            skip_system_messages: true,
        }
    }
}

impl SegmenterConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }
}

/// Configuration for participant resolution.
///
/// `self_name` is required — every role decision depends on knowing which
/// observed speaker is the persona owner. `target_person` is an optional
/// group-chat filter producing a synthetic 1:1 view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// The persona owner's display name as it appears in the export.
    pub self_name: String,

    /// In a group chat, keep only messages between self and this person.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target_person: Option<String>,
}

impl ResolveConfig {
    /// Creates a configuration for the given self name.
    pub fn new(self_name: impl Into<String>) -> Self {
        Self {
            self_name: self_name.into(),
            target_person: None,
        }
    }

    /// Sets the group-chat target filter.
    #[must_use]
    pub fn with_target_person(mut self, name: impl Into<String>) -> Self {
        self.target_person = Some(name.into());
        self
    }
}

/// Configuration for response-timing analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Latency samples above this many minutes are discarded as outliers
    /// (clock artifacts, multi-day export gaps). Default: 1440 (24 hours).
    pub outlier_cap_minutes: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            outlier_cap_minutes: 1440,
        }
    }
}

impl TimingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outlier cap in minutes.
    #[must_use]
    pub fn with_outlier_cap_minutes(mut self, minutes: i64) -> Self {
        self.outlier_cap_minutes = minutes;
        self
    }
}

/// Combined configuration for the full ingestion pipeline.
///
/// # Example
///
/// ```rust
/// use talkpack::config::IngestConfig;
///
/// let config = IngestConfig::new("나")
///     .with_skip_system_messages(false)
///     .with_target_person("철수");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Segmentation settings.
    pub segmenter: SegmenterConfig,
    /// Role resolution settings.
    pub resolve: ResolveConfig,
    /// Timing analysis settings.
    pub timing: TimingConfig,
}

impl IngestConfig {
    /// Creates a pipeline configuration for the given self name, with
    /// defaults everywhere else.
    pub fn new(self_name: impl Into<String>) -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            resolve: ResolveConfig::new(self_name),
            timing: TimingConfig::default(),
        }
    }

    /// Sets the group-chat target filter.
    #[must_use]
    pub fn with_target_person(mut self, name: impl Into<String>) -> Self {
        self.resolve.target_person = Some(name.into());
        self
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.segmenter.skip_system_messages = skip;
        self
    }

    /// Sets the latency outlier cap in minutes.
    #[must_use]
    pub fn with_outlier_cap_minutes(mut self, minutes: i64) -> Self {
        self.timing.outlier_cap_minutes = minutes;
        self
    }
}
