//! Director tuning loaded from settings files.

use std::time::Duration;

use dust_devil_core::{DEFAULT_GROUP_BUDGET, DEFAULT_MAX_RETRIES};
use dust_devil_system_cohesion::Config as CohesionConfig;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the enemy director. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Difficulty fed into the scaling curves.
    pub global_difficulty: f32,
    /// Seed of the director's random stream.
    pub seed: u64,
    /// Rejected picks tolerated before random allocation stops.
    pub max_retries: u32,
    /// Budget ceiling used when the group-size curve is missing.
    pub fallback_budget: f32,
    /// Milliseconds between two cohesion updates.
    pub tick_interval_ms: u64,
    /// Distance at which a group notices the pursued entity.
    pub detection_radius: f32,
    /// Maximum offset between a group's pursuit target and its centroid.
    pub max_leash_distance: f32,
    /// Spawn search radius granted per unit of budget ceiling.
    pub spawn_radius_per_budget: f32,
    /// Upper bound of the spawn search radius.
    pub max_spawn_radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global_difficulty: 1.0,
            seed: 0x4455_5354_4445_5649,
            max_retries: DEFAULT_MAX_RETRIES,
            fallback_budget: DEFAULT_GROUP_BUDGET,
            tick_interval_ms: 100,
            detection_radius: 1_000.0,
            max_leash_distance: 10_000.0,
            spawn_radius_per_budget: 100.0,
            max_spawn_radius: 10_000.0,
        }
    }
}

impl Config {
    /// Cohesion settings shared by every group the director creates.
    #[must_use]
    pub fn cohesion(&self) -> CohesionConfig {
        CohesionConfig::new(
            Duration::from_millis(self.tick_interval_ms),
            self.detection_radius,
            self.max_leash_distance,
        )
    }

    /// Radius around the spawn location in which members of a group appear.
    #[must_use]
    pub fn spawn_radius(&self, ceiling: f32) -> f32 {
        (ceiling * self.spawn_radius_per_budget)
            .min(self.max_spawn_radius)
            .max(0.0)
    }
}
