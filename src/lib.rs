//! Kotoba gamification ledger
//!
//! Kotoba's lesson and quiz screens award experience points and unlock
//! achievements as learners progress. This crate is the persistent ledger
//! behind those rewards: every grant happens **at most once** per reward key,
//! no matter how many times a screen is revisited, how often a success
//! condition fires, or whether the app is killed mid-operation.
//!
//! ## Architecture
//!
//! ```text
//! lesson screen ──> ScreenAwards ──> AwardEngine ──> codec ──> KvStore
//!   (UI, out of      (lifecycle       (idempotent     (JSON +    (SQLite /
//!    scope here)       adapter)        grants)         migrate)   memory)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let engine = Arc::new(AwardEngine::from_config(&LedgerConfig::load()?)?);
//! let awards = ScreenAwards::new(engine);
//!
//! // On mount (fire-and-forget):
//! awards.award_on_enter("lesson_particles", EnterParams { xp_on_enter: 5, ..Default::default() });
//!
//! // On quiz completion:
//! awards.award_on_success("lesson_particles", SuccessParams { xp_on_success: 5, meta: None }).await?;
//! let outcome = awards
//!     .award_achievement("wo_object_particle", AchievementParams {
//!         xp: 10,
//!         sub: "Partícula を".into(),
//!         meta: None,
//!     })
//!     .await?;
//! if outcome.first_time {
//!     // show the reward modal with outcome.xp_granted
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod screen;
pub mod store;

pub use config::LedgerConfig;
pub use engine::{
    AchievementParams, AwardEngine, AwardOutcome, EnterParams, SuccessParams,
    DEFAULT_STORAGE_KEY,
};
pub use error::AwardError;
pub use ledger::{Ledger, LedgerEntry, Namespace, SCHEMA_VERSION};
pub use screen::ScreenAwards;
pub use store::{KvStore, MemoryStore, SqliteStore, StorageError};
