//! Frame-loop timing settings
//!
//! Intervals for the periodic tasks the player evaluates once per frame.
//! Stored in milliseconds/seconds in the config file and exposed as
//! [`Duration`]s to the scheduler.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Periodic task intervals for the frame loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// End-of-frame pacing delay (~60 FPS)
    pub frame_ms: u64,

    /// Interval between `update()` ticks over the whole scene
    pub update_ms: u64,

    /// Interval of the demonstration temperature control step
    pub control_ms: u64,

    /// Interval between snapshot flushes
    pub autosave_secs: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            update_ms: 100,
            control_ms: 200,
            autosave_secs: 30,
        }
    }
}

impl TimingSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }

    pub fn control_interval(&self) -> Duration {
        Duration::from_millis(self.control_ms)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }
}
