//! Screen lifecycle adapter - the surface lesson screens actually call.
//!
//! Hundreds of near-identical lesson/quiz screens consume the ledger through
//! three entry points: a fire-and-forget visit award on mount, a success
//! award when a quiz finishes, and an unconditional achievement award whose
//! result drives the reward modal. Gamification must never block or fail
//! lesson content, so the mount hook spawns its work and only logs errors.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{AchievementParams, AwardEngine, AwardOutcome, EnterParams, SuccessParams};
use crate::error::AwardError;

/// Cheap-to-clone handle each screen holds onto.
#[derive(Clone)]
pub struct ScreenAwards {
    engine: Arc<AwardEngine>,
}

impl ScreenAwards {
    pub fn new(engine: Arc<AwardEngine>) -> Self {
        Self { engine }
    }

    /// Call once per screen mount. Fire-and-forget: the grant runs in the
    /// background and a failure is logged, not surfaced.
    pub fn award_on_enter(&self, screen_key: &str, params: EnterParams) {
        let engine = Arc::clone(&self.engine);
        let screen_key = screen_key.to_string();
        tokio::spawn(async move {
            if let Err(err) = engine.record_enter(&screen_key, params).await {
                debug!(screen = %screen_key, error = %err, "enter award skipped");
            }
        });
    }

    /// Call every time the screen's quiz finishes, repeats included.
    pub async fn award_on_success(
        &self,
        screen_key: &str,
        params: SuccessParams,
    ) -> Result<AwardOutcome, AwardError> {
        self.engine.record_success(screen_key, params).await
    }

    /// Call unconditionally whenever the achievement's condition is met; the
    /// outcome's `first_time`/`xp_granted` decide whether to show the modal.
    pub async fn award_achievement(
        &self,
        achievement_id: &str,
        params: AchievementParams,
    ) -> Result<AwardOutcome, AwardError> {
        self.engine.award_achievement(achievement_id, params).await
    }
}
