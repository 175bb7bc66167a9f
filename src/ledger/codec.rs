//! (De)serialization and schema migration for the persisted ledger.
//!
//! Corrupted state must never crash the learner's app: a value that fails to
//! parse is logged and treated as "no data", yielding a fresh empty ledger.

use tracing::warn;

use super::{Ledger, SCHEMA_VERSION};

/// Decode a raw stored value into a ledger.
///
/// Absent and unparsable values both produce an empty ledger at the current
/// schema version; this function never fails.
pub fn decode(raw: Option<&str>) -> Ledger {
    let Some(raw) = raw else {
        return Ledger::empty();
    };

    match serde_json::from_str::<Ledger>(raw) {
        Ok(ledger) => ledger,
        Err(err) => {
            warn!(error = %err, "ledger value failed to parse, starting fresh");
            Ledger::empty()
        }
    }
}

/// Deterministic JSON serialization of the ledger.
pub fn encode(ledger: &Ledger) -> Result<String, serde_json::Error> {
    serde_json::to_string(ledger)
}

/// Apply forward-only schema migrations and bump the version.
///
/// v1 -> v2: achievement entries used to be stored under their bare ids;
/// move them into the `achievement:` namespace. Already-namespaced keys
/// (containing `:`) are left alone. Versions at or beyond the current one
/// pass through untouched - there is no downgrade logic.
pub fn migrate(mut ledger: Ledger) -> Ledger {
    if ledger.schema_version >= SCHEMA_VERSION {
        return ledger;
    }

    if ledger.schema_version < 2 {
        let legacy: Vec<String> = ledger
            .entries
            .keys()
            .filter(|k| !k.contains(':'))
            .cloned()
            .collect();
        for old_key in legacy {
            if let Some(mut entry) = ledger.entries.remove(&old_key) {
                let new_key = format!("achievement:{old_key}");
                entry.key = new_key.clone();
                ledger.entries.insert(new_key, entry);
            }
        }
    }

    ledger.schema_version = SCHEMA_VERSION;
    ledger
}
