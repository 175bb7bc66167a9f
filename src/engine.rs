//! Award engine - idempotent XP grants and achievement unlocks.
//!
//! Every operation is one read-modify-write cycle over the single ledger
//! storage key, serialized through an in-process mutex held across both store
//! awaits. Two screens racing their grants are therefore applied one at a
//! time, never interleaved (the lost-update hazard of a shared last-write-wins
//! store).

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::LedgerConfig;
use crate::error::AwardError;
use crate::ledger::{self, Ledger, Namespace};
use crate::store::{KvStore, SqliteStore, StorageError};

/// Storage key holding the JSON-encoded ledger.
pub const DEFAULT_STORAGE_KEY: &str = "ledger:v1";

/// What an award operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardOutcome {
    /// Whether this call performed the one-time grant for its key
    pub first_time: bool,
    /// XP added by this call (one-time grant or revisit reward)
    pub xp_granted: u32,
    /// Running total after this call
    pub total_xp: u64,
}

/// Parameters for [`AwardEngine::record_enter`].
#[derive(Debug, Clone, Default)]
pub struct EnterParams {
    /// One-time XP for the first visit
    pub xp_on_enter: u32,
    /// XP added on every visit after the first (0 = no revisit reward)
    pub repeat_xp: u32,
    pub meta: Option<Value>,
}

/// Parameters for [`AwardEngine::record_success`].
#[derive(Debug, Clone, Default)]
pub struct SuccessParams {
    /// One-time XP for the first completion; repeats are never rewarded
    pub xp_on_success: u32,
    pub meta: Option<Value>,
}

/// Parameters for [`AwardEngine::award_achievement`].
#[derive(Debug, Clone, Default)]
pub struct AchievementParams {
    pub xp: u32,
    /// Human-readable subtitle shown in the reward modal, kept in `meta`
    pub sub: String,
    pub meta: Option<Value>,
}

/// The gamification core: three idempotent operations over one persisted
/// ledger.
///
/// Grants are "first time" at most once per key no matter how often a screen
/// is revisited, how often a success condition fires, or whether the app was
/// killed between a read and its write.
pub struct AwardEngine {
    store: Arc<dyn KvStore>,
    storage_key: String,
    /// Serializes read-modify-write cycles across their I/O awaits
    write_lock: Mutex<()>,
}

impl AwardEngine {
    /// Create an engine over an injected store (tests use [`MemoryStore`]).
    ///
    /// [`MemoryStore`]: crate::store::MemoryStore
    pub fn new(store: Arc<dyn KvStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open an engine over the SQLite store at a specific path.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let store = SqliteStore::open(db_path)?;
        Ok(Self::new(Arc::new(store), DEFAULT_STORAGE_KEY))
    }

    /// Open an engine from the app configuration (default `~/.kotoba/`).
    pub fn from_config(config: &LedgerConfig) -> Result<Self, StorageError> {
        let store = SqliteStore::open(&config.db_path)?;
        Ok(Self::new(Arc::new(store), config.storage_key.clone()))
    }

    /// Record a screen mount under `visit:<screen_key>`.
    ///
    /// Always counts the visit. The first visit grants `xp_on_enter`; later
    /// visits grant `repeat_xp` each time it is positive, otherwise nothing.
    pub async fn record_enter(
        &self,
        screen_key: &str,
        params: EnterParams,
    ) -> Result<AwardOutcome, AwardError> {
        let key = Namespace::Visit.key(screen_key);
        self.apply(move |ledger, now| {
            grant(ledger, &key, params.xp_on_enter, params.repeat_xp, params.meta, now)
        })
        .await
    }

    /// Record a completed exercise under `success:<screen_key>`.
    ///
    /// Safe to call on every quiz finish; only the first completion grants
    /// `xp_on_success`.
    pub async fn record_success(
        &self,
        screen_key: &str,
        params: SuccessParams,
    ) -> Result<AwardOutcome, AwardError> {
        let key = Namespace::Success.key(screen_key);
        self.apply(move |ledger, now| {
            grant(ledger, &key, params.xp_on_success, 0, params.meta, now)
        })
        .await
    }

    /// Unlock an achievement under `achievement:<achievement_id>`.
    ///
    /// Callers invoke this unconditionally whenever the success condition is
    /// met; the returned `first_time` tells the UI whether to show the "new
    /// achievement" modal. The subtitle is stored in the entry's `meta` under
    /// `"sub"`.
    pub async fn award_achievement(
        &self,
        achievement_id: &str,
        params: AchievementParams,
    ) -> Result<AwardOutcome, AwardError> {
        let key = Namespace::Achievement.key(achievement_id);
        let meta = merge_sub(params.meta, &params.sub);
        self.apply(move |ledger, now| grant(ledger, &key, params.xp, 0, Some(meta), now))
            .await
    }

    /// Current XP total (0 when no ledger exists yet).
    pub async fn total_xp(&self) -> Result<u64, AwardError> {
        Ok(self.snapshot().await?.total_xp)
    }

    /// Read-only copy of the persisted ledger, for diagnostics and profile UI.
    pub async fn snapshot(&self) -> Result<Ledger, AwardError> {
        let _guard = self.write_lock.lock().await;
        let raw = self
            .store
            .get(&self.storage_key)
            .await
            .map_err(AwardError::Persistence)?;
        Ok(ledger::migrate(ledger::decode(raw.as_deref())))
    }

    /// Shared read-modify-write cycle: load (or create) the ledger, migrate,
    /// mutate, persist. Holding the lock across both awaits keeps each key's
    /// history in call order.
    async fn apply<F>(&self, mutate: F) -> Result<AwardOutcome, AwardError>
    where
        F: FnOnce(&mut Ledger, i64) -> (bool, u32),
    {
        let _guard = self.write_lock.lock().await;

        let raw = self
            .store
            .get(&self.storage_key)
            .await
            .map_err(AwardError::Persistence)?;
        let mut ledger = ledger::migrate(ledger::decode(raw.as_deref()));

        let now = chrono::Utc::now().timestamp_millis();
        let (first_time, xp_granted) = mutate(&mut ledger, now);

        let encoded = ledger::encode(&ledger)?;
        self.store
            .set(&self.storage_key, &encoded)
            .await
            .map_err(AwardError::Persistence)?;

        Ok(AwardOutcome {
            first_time,
            xp_granted,
            total_xp: ledger.total_xp,
        })
    }
}

/// The grant rule shared by all three operations.
///
/// Triggers are always counted; XP moves only on the first grant, or by
/// `repeat_xp` per call once already unlocked.
fn grant(
    ledger: &mut Ledger,
    key: &str,
    one_time_xp: u32,
    repeat_xp: u32,
    meta: Option<Value>,
    now: i64,
) -> (bool, u32) {
    let entry = ledger.entry_mut(key);
    entry.times_triggered += 1;
    entry.last_triggered_at = now;
    if let Some(meta) = meta {
        entry.meta = meta;
    }

    if entry.unlocked_at.is_none() {
        entry.unlocked_at = Some(now);
        ledger.total_xp += u64::from(one_time_xp);
        (true, one_time_xp)
    } else if repeat_xp > 0 {
        ledger.total_xp += u64::from(repeat_xp);
        (false, repeat_xp)
    } else {
        (false, 0)
    }
}

/// Fold the achievement subtitle into the caller's meta object.
fn merge_sub(meta: Option<Value>, sub: &str) -> Value {
    let mut meta = match meta {
        Some(Value::Object(map)) => Value::Object(map),
        // Non-object meta still gets kept, nested under its own field
        Some(other) => serde_json::json!({ "context": other }),
        None => serde_json::json!({}),
    };
    if let Value::Object(map) = &mut meta {
        map.insert("sub".to_string(), Value::String(sub.to_string()));
    }
    meta
}
