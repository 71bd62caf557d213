//! Response-timing analysis over role-annotated records.
//!
//! For every incoming (`other`) message that the persona owner eventually
//! answered, the elapsed time until that answer is one latency sample. The
//! sample is bucketed by the *triggering* message's hour of day, because the
//! interesting question is "how fast do they reply to a message that arrives
//! in the evening", not when the reply itself lands.
//!
//! Buckets follow fixed clock windows:
//!
//! | Bucket | Hours |
//! |--------------|-------------|
//! | early_morning| 06:00–09:00 |
//! | morning | 09:00–12:00 |
//! | afternoon | 12:00–18:00 |
//! | evening | 18:00–22:00 |
//! | night | 22:00–06:00 (wraps midnight) |
//!
//! Buckets with zero samples are simply absent from the profile —
//! "insufficient data" is a distinct state, never a fabricated default.
//! Raw samples are kept on the profile so an external store can merge a new
//! ingestion into a previously saved profile; [`TimingProfile::merge`] is the
//! pure form of that operation.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;
use crate::record::MessageRecord;

/// One of five fixed time-of-day windows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 06:00–09:00
    EarlyMorning,
    /// 09:00–12:00
    Morning,
    /// 12:00–18:00
    Afternoon,
    /// 18:00–22:00
    Evening,
    /// 22:00–06:00, wrapping midnight
    Night,
}

impl TimeOfDay {
    /// Buckets an hour of day (0–23) into its window.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=8 => TimeOfDay::EarlyMorning,
            9..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// All buckets in clock order.
    pub fn all() -> &'static [TimeOfDay; 5] {
        &[
            TimeOfDay::EarlyMorning,
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
            TimeOfDay::Night,
        ]
    }

    /// The snake_case name used in serialized profiles.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "early_morning",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single response-latency observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    /// Window of the triggering incoming message.
    pub bucket: TimeOfDay,
    /// Elapsed minutes until the self reply.
    pub minutes: f64,
}

/// Aggregate statistics for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Number of samples observed in this bucket.
    pub sample_count: usize,
    /// Mean latency in minutes.
    pub mean_minutes: f64,
    /// Fastest observed reply in minutes.
    pub min_minutes: f64,
    /// Slowest observed reply in minutes.
    pub max_minutes: f64,
}

impl BucketStats {
    /// Human-readable natural response range, e.g. `"2-35m"`.
    pub fn natural_range(&self) -> String {
        format!(
            "{}-{}m",
            self.min_minutes.round() as i64,
            self.max_minutes.round() as i64
        )
    }

    fn from_one(minutes: f64) -> Self {
        Self {
            sample_count: 1,
            mean_minutes: minutes,
            min_minutes: minutes,
            max_minutes: minutes,
        }
    }

    fn absorb(&mut self, minutes: f64) {
        let total = self.mean_minutes * self.sample_count as f64 + minutes;
        self.sample_count += 1;
        self.mean_minutes = total / self.sample_count as f64;
        self.min_minutes = self.min_minutes.min(minutes);
        self.max_minutes = self.max_minutes.max(minutes);
    }

    /// Combines two aggregates, weighting means by sample count.
    fn combine(a: &BucketStats, b: &BucketStats) -> BucketStats {
        let count = a.sample_count + b.sample_count;
        BucketStats {
            sample_count: count,
            mean_minutes: (a.mean_minutes * a.sample_count as f64
                + b.mean_minutes * b.sample_count as f64)
                / count as f64,
            min_minutes: a.min_minutes.min(b.min_minutes),
            max_minutes: a.max_minutes.max(b.max_minutes),
        }
    }
}

/// Per-bucket response-timing statistics for one persona.
///
/// `buckets` holds aggregates only for windows that actually produced
/// samples. `samples` holds every raw observation so that profiles can be
/// merged by an external store without losing information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimingProfile {
    /// Aggregates per time-of-day window; absent key = insufficient data.
    pub buckets: BTreeMap<TimeOfDay, BucketStats>,
    /// Raw samples behind the aggregates, in observation order.
    pub samples: Vec<TimingSample>,
}

impl TimingProfile {
    /// Builds a profile by aggregating raw samples.
    pub fn from_samples(samples: Vec<TimingSample>) -> Self {
        let mut buckets: BTreeMap<TimeOfDay, BucketStats> = BTreeMap::new();
        for sample in &samples {
            buckets
                .entry(sample.bucket)
                .and_modify(|stats| stats.absorb(sample.minutes))
                .or_insert_with(|| BucketStats::from_one(sample.minutes));
        }
        Self { buckets, samples }
    }

    /// Total number of samples across all buckets.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no bucket has any samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Aggregate for one window, or `None` when there is insufficient data.
    pub fn bucket(&self, bucket: TimeOfDay) -> Option<&BucketStats> {
        self.buckets.get(&bucket)
    }

    /// Whole-day aggregate across every bucket, or `None` when empty.
    pub fn overall(&self) -> Option<BucketStats> {
        let mut iter = self.samples.iter();
        let first = iter.next()?;
        let mut stats = BucketStats::from_one(first.minutes);
        for sample in iter {
            stats.absorb(sample.minutes);
        }
        Some(stats)
    }

    /// Merges two profiles into a third, weighting each bucket's mean by its
    /// sample count. Neither input is modified; serialization of concurrent
    /// writers is the storage collaborator's job.
    pub fn merge(&self, other: &TimingProfile) -> TimingProfile {
        let mut buckets = self.buckets.clone();
        for (bucket, stats) in &other.buckets {
            buckets
                .entry(*bucket)
                .and_modify(|existing| *existing = BucketStats::combine(existing, stats))
                .or_insert(*stats);
        }
        let mut samples = self.samples.clone();
        samples.extend_from_slice(&other.samples);
        TimingProfile { buckets, samples }
    }
}

/// Derives a timing profile from role-annotated records.
///
/// Scans the sequence in file order. The most recent timestamped
/// counterparty message is the pending trigger; the next self-roled record
/// closes it (timed or not) and, when both ends carry timestamps, yields one
/// latency sample. Records without timestamps never contribute samples but
/// do not break the scan. Samples that are non-positive or exceed
/// [`TimingConfig::outlier_cap_minutes`] are discarded as clock artifacts.
///
/// # Example
///
/// ```rust
/// use talkpack::config::TimingConfig;
/// use talkpack::timing::{TimeOfDay, analyze};
/// use talkpack::{MessageRecord, Role};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let records = vec![
///     MessageRecord::new("영희", "밥 먹었어?")
///         .with_timestamp(day.and_hms_opt(9, 0, 0).unwrap())
///         .with_role(Role::Other),
///     MessageRecord::new("나", "응!")
///         .with_timestamp(day.and_hms_opt(9, 20, 0).unwrap())
///         .with_role(Role::Me),
/// ];
///
/// let profile = analyze(&records, &TimingConfig::new());
/// let morning = profile.bucket(TimeOfDay::Morning).unwrap();
/// assert_eq!(morning.sample_count, 1);
/// assert!((morning.mean_minutes - 20.0).abs() < f64::EPSILON);
/// ```
pub fn analyze(records: &[MessageRecord], config: &TimingConfig) -> TimingProfile {
    let cap = config.outlier_cap_minutes as f64;
    let mut samples = Vec::new();
    let mut pending: Option<NaiveDateTime> = None;

    for record in records {
        let Some(role) = record.role.as_ref() else {
            continue;
        };
        if role.is_self() {
            if let (Some(trigger), Some(reply)) = (pending, record.timestamp) {
                let minutes = (reply - trigger).num_seconds() as f64 / 60.0;
                if minutes > 0.0 && minutes <= cap {
                    samples.push(TimingSample {
                        bucket: TimeOfDay::from_hour(trigger.hour()),
                        minutes,
                    });
                }
            }
            // A self message answers the pending trigger even when it cannot
            // be timed; the next trigger starts fresh.
            pending = None;
        } else if let Some(ts) = record.timestamp {
            pending = Some(ts);
        }
    }

    TimingProfile::from_samples(samples)
}
