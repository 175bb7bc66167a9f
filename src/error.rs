//! Error taxonomy for award operations.
//!
//! Decode failures are deliberately absent here: a corrupted ledger value is
//! recovered locally (empty ledger, logged) and never surfaced to callers.

use crate::store::StorageError;

/// Why an award operation failed to take effect.
///
/// On failure the persisted ledger is whatever it last successfully was; the
/// write is a single value, so there is no partial state. Operations are
/// idempotent, so callers may simply re-invoke later.
#[derive(Debug, thiserror::Error)]
pub enum AwardError {
    #[error("failed to persist ledger: {0}")]
    Persistence(#[from] StorageError),

    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}
