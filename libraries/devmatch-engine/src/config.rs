//! Engine timing and refill configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the engine's timers and the discovery refill policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Time a swipe spends animating before the decision is sent
    pub swipe_animation_ms: u64,

    /// Delay between a successful account deletion and the login redirect
    pub delete_redirect_delay_ms: u64,

    /// Spawn a background refetch when this many candidates or fewer remain
    pub refill_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            swipe_animation_ms: 300,
            delete_redirect_delay_ms: 1500,
            refill_threshold: 1,
        }
    }
}

impl EngineConfig {
    pub fn swipe_animation(&self) -> Duration {
        Duration::from_millis(self.swipe_animation_ms)
    }

    pub fn delete_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.delete_redirect_delay_ms)
    }
}
