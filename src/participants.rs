//! Participant tally and role resolution.
//!
//! Given the ordered record sequence and a caller-declared self name, this
//! module works out who is in the conversation ([`ParticipantSet`]), whether
//! it is a group chat, and which role each record carries
//! ([`Role`](crate::Role)).
//!
//! Self matching is deliberately forgiving — export display names drift
//! between devices — but never silent: exact match is tried first, then
//! trimmed/case-insensitive equality, then containment (for nicknames). If
//! nothing matches, resolution fails with
//! [`SelfNameNotFound`](crate::TalkpackError::SelfNameNotFound) because every
//! downstream role decision depends on the self identity.
//!
//! Resolution is a pure function of its inputs: it is safe to call repeatedly
//! with different `self_name` / `target_person` values against clones of the
//! same parsed file.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ResolveConfig;
use crate::error::{Result, TalkpackError};
use crate::record::{MessageRecord, Role};

/// The set of distinct speakers observed in one export file.
///
/// Derived once per file and read-only afterwards. `participants` maps the
/// canonical display form of each speaker (first seen, trimmed) to their
/// message count; identity is case- and whitespace-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSet {
    /// Speaker display name → number of messages.
    pub participants: HashMap<String, usize>,
    /// `true` when more than one distinct non-self speaker was observed.
    pub is_group: bool,
}

impl ParticipantSet {
    /// Number of distinct speakers (including self).
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if no speakers were observed.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Message count for a speaker, by canonical display name.
    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.participants.get(name).copied()
    }

    /// Speakers ranked by message count, most talkative first.
    ///
    /// Useful for "which of these is you?" prompts in calling code. Ties
    /// break alphabetically so the ranking is deterministic.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .participants
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// A record sequence with roles assigned, plus the participant metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConversation {
    /// The records, in original file order, each with `role` set.
    pub records: Vec<MessageRecord>,
    /// Participant tally for the whole file (unaffected by target filtering).
    pub participants: ParticipantSet,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Finds the normalized speaker keys matching a declared name.
///
/// Tiered: exact display match, then normalized equality, then containment
/// either way (nicknames, decorated names). Earlier tiers win outright.
fn match_speakers(display: &HashMap<String, String>, name: &str) -> HashSet<String> {
    let exact: HashSet<String> = display
        .iter()
        .filter(|(_, d)| d.as_str() == name)
        .map(|(k, _)| k.clone())
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let norm = normalize(name);
    let relaxed: HashSet<String> = display.keys().filter(|k| **k == norm).cloned().collect();
    if !relaxed.is_empty() {
        return relaxed;
    }

    if norm.is_empty() {
        return HashSet::new();
    }
    display
        .keys()
        .filter(|k| k.contains(&norm) || norm.contains(k.as_str()))
        .cloned()
        .collect()
}

/// Assigns a role to every record and derives the participant metadata.
///
/// In a 1:1 conversation roles are [`Role::Me`] and [`Role::Other`]. In a
/// group chat without a target filter, each counterparty keeps their literal
/// identity as [`Role::Participant`]. With
/// [`target_person`](ResolveConfig::target_person) set, only messages from
/// self and the target are retained — a synthetic 1:1 view of the group —
/// and roles collapse to `Me`/`Other`.
///
/// # Errors
///
/// - [`TalkpackError::SelfNameNotFound`] when `self_name` matches no
///   observed speaker.
/// - [`TalkpackError::ParticipantNotFound`] when a supplied `target_person`
///   matches no non-self speaker.
pub fn resolve_roles(
    records: Vec<MessageRecord>,
    config: &ResolveConfig,
) -> Result<ResolvedConversation> {
    // Tally distinct speakers, case- and whitespace-normalized, keeping the
    // first-seen display form as the canonical one.
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut display: HashMap<String, String> = HashMap::new();
    for record in &records {
        let norm = normalize(&record.speaker_name);
        *counts.entry(norm.clone()).or_insert(0) += 1;
        display
            .entry(norm)
            .or_insert_with(|| record.speaker_name.trim().to_string());
    }

    let self_keys = match_speakers(&display, &config.self_name);

    let non_self_count = counts.keys().filter(|k| !self_keys.contains(*k)).count();
    let participants = ParticipantSet {
        participants: counts
            .iter()
            .map(|(norm, count)| (display[norm].clone(), *count))
            .collect(),
        is_group: non_self_count > 1,
    };

    if self_keys.is_empty() {
        let names = participants
            .ranked()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(TalkpackError::self_name_not_found(
            config.self_name.clone(),
            names,
        ));
    }

    let target_keys = match &config.target_person {
        Some(target) => {
            let mut keys = match_speakers(&display, target);
            keys.retain(|k| !self_keys.contains(k));
            if keys.is_empty() {
                return Err(TalkpackError::participant_not_found(target.clone()));
            }
            Some(keys)
        }
        None => None,
    };

    let group_roles = participants.is_group && target_keys.is_none();

    let records: Vec<MessageRecord> = records
        .into_iter()
        .filter_map(|mut record| {
            let norm = normalize(&record.speaker_name);
            if self_keys.contains(&norm) {
                record.role = Some(Role::Me);
                return Some(record);
            }
            if let Some(targets) = &target_keys {
                if !targets.contains(&norm) {
                    return None;
                }
                record.role = Some(Role::Other);
                return Some(record);
            }
            record.role = Some(if group_roles {
                Role::Participant(display[&norm].clone())
            } else {
                Role::Other
            });
            Some(record)
        })
        .collect();

    Ok(ResolvedConversation {
        records,
        participants,
    })
}
