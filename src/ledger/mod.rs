//! Ledger data model - the single persisted aggregate for XP and unlocks.
//!
//! One [`Ledger`] value holds every reward entry, namespaced per kind
//! (`visit:`, `success:`, `achievement:`), plus the running XP total. It is
//! stored as JSON under a single storage key so that one write is one atomic
//! logical update.

mod codec;

pub use codec::{decode, encode, migrate};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current on-disk schema version. v1 stored achievement entries under bare
/// ids; v2 namespaces every key.
pub const SCHEMA_VERSION: u32 = 2;

/// Logical namespace for a reward key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Screen was mounted at least once
    Visit,
    /// Screen's exercise was completed at least once
    Success,
    /// Unlockable badge
    Achievement,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Visit => "visit",
            Namespace::Success => "success",
            Namespace::Achievement => "achievement",
        }
    }

    /// Build the namespaced ledger key for an id, e.g.
    /// `achievement:wo_object_particle`.
    pub fn key(self, id: &str) -> String {
        format!("{}:{}", self.prefix(), id)
    }
}

/// State of one reward key.
///
/// `times_triggered` keeps counting after the unlock (visits and completions
/// stay interesting for diagnostics) but `unlocked_at` is written at most
/// once, and only that first write moves `total_xp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Namespaced reward key, duplicated from the map for self-describing JSON
    pub key: String,
    /// Millisecond timestamp of the first successful grant
    #[serde(default)]
    pub unlocked_at: Option<i64>,
    /// How often the triggering event fired, granted or not
    #[serde(default)]
    pub times_triggered: u64,
    #[serde(default)]
    pub last_triggered_at: i64,
    /// Caller-supplied context (level, score, subtitle); never interpreted here
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub meta: serde_json::Value,
}

impl LedgerEntry {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            unlocked_at: None,
            times_triggered: 0,
            last_triggered_at: 0,
            meta: serde_json::Value::Null,
        }
    }
}

/// The persisted aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub schema_version: u32,
    /// Running sum of all XP ever granted; monotonically non-decreasing
    #[serde(default)]
    pub total_xp: u64,
    /// BTreeMap keeps `encode` output deterministic
    #[serde(default)]
    pub entries: BTreeMap<String, LedgerEntry>,
}

impl Ledger {
    /// Fresh ledger at the current schema version, as created on first launch.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_xp: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Locate or create the entry for a namespaced key.
    pub fn entry_mut(&mut self, key: &str) -> &mut LedgerEntry {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| LedgerEntry::new(key))
    }

    pub fn entry(&self, key: &str) -> Option<&LedgerEntry> {
        self.entries.get(key)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_keys() {
        assert_eq!(Namespace::Visit.key("lesson_hiragana_1"), "visit:lesson_hiragana_1");
        assert_eq!(Namespace::Success.key("quiz_kanji_n5"), "success:quiz_kanji_n5");
        assert_eq!(
            Namespace::Achievement.key("wo_object_particle"),
            "achievement:wo_object_particle"
        );
    }

    #[test]
    fn test_entry_mut_creates_locked_entry() {
        let mut ledger = Ledger::empty();
        let entry = ledger.entry_mut("visit:lesson_1");
        assert_eq!(entry.key, "visit:lesson_1");
        assert!(entry.unlocked_at.is_none());
        assert_eq!(entry.times_triggered, 0);
    }
}
