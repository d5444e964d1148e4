#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dust Devil enemy director.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that adapters use
//! to materialise, animate and tear down enemies. Systems never hold live
//! engine objects; they work on ids, templates and points.

use std::time::Duration;

pub use glam::Vec3;
use serde::{Deserialize, Serialize};

mod curve;
mod template;

pub use curve::{Curve, CurveKey, CurveName, CurveProvider, CurveTable, Interpolation};
pub use template::{
    BaseStats, Catalog, ResolvedStats, RosterEntry, Tier, TypeMask, UnitTemplate,
};

/// Default number of rejected picks tolerated before a random allocation stops.
pub const DEFAULT_MAX_RETRIES: u32 = 128;

/// Budget ceiling used when the group-size curve is unavailable.
pub const DEFAULT_GROUP_BUDGET: f32 = 10.0;

/// Unique identifier assigned to an attack group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a new group identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a group member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(u32);

impl MemberId {
    /// Creates a new member identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Resolves a point to the ground beneath it.
///
/// Returning `None` means the probe hit nothing; callers keep their last
/// known result.
pub trait GroundProbe {
    /// Projects `point` onto world geometry.
    fn probe(&self, point: Vec3) -> Option<Vec3>;
}

impl<F> GroundProbe for F
where
    F: Fn(Vec3) -> Option<Vec3>,
{
    fn probe(&self, point: Vec3) -> Option<Vec3> {
        self(point)
    }
}

/// Input describing a single group allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationRequest {
    /// Locomotion whitelist; empty means "pick one at random".
    pub whitelist: TypeMask,
    /// Budget ceiling used when the group-size curve is unavailable.
    pub budget: f32,
    /// Explicit roster. When non-empty every entry is spawned and filtering is bypassed.
    pub preset: Vec<UnitTemplate>,
    /// Number of rejected picks tolerated before the random loop stops.
    pub max_retries: u32,
}

impl AllocationRequest {
    /// Creates a random-mode request for the provided whitelist.
    #[must_use]
    pub fn random(whitelist: TypeMask) -> Self {
        Self {
            whitelist,
            budget: DEFAULT_GROUP_BUDGET,
            preset: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Creates a preset-mode request spawning exactly `preset`.
    #[must_use]
    pub fn preset(preset: Vec<UnitTemplate>) -> Self {
        Self {
            preset,
            ..Self::random(TypeMask::empty())
        }
    }

    /// Replaces the fallback budget.
    #[must_use]
    pub fn with_budget(mut self, budget: f32) -> Self {
        self.budget = budget;
        self
    }

    /// Replaces the retry bound.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Whether the request bypasses random selection.
    #[must_use]
    pub fn is_preset(&self) -> bool {
        !self.preset.is_empty()
    }
}

/// Roster produced by an allocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Selected entries in acceptance order.
    pub entries: Vec<RosterEntry>,
    /// Whitelist actually applied, after randomisation.
    pub whitelist: TypeMask,
    /// Budget ceiling resolved for the group.
    pub ceiling: f32,
    /// Budget left over once selection stopped.
    pub remaining_budget: f32,
}

impl AllocationResult {
    /// Whether no template was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Summed cost of every selected entry.
    #[must_use]
    pub fn total_cost(&self) -> f32 {
        self.entries.iter().map(|entry| entry.template.cost).sum()
    }
}

/// Where an adapter should materialise a newly allocated member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlacement {
    /// Centre of the spawnable area.
    pub origin: Vec3,
    /// Radius around `origin` within which a navigable point should be chosen.
    pub search_radius: f32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests creation of a new attack group around a spawn location.
    CreateAttackGroup {
        /// Locomotion whitelist; empty randomises it.
        whitelist: TypeMask,
        /// Centre of the spawnable area.
        spawn_location: Vec3,
        /// Explicit roster bypassing random selection when non-empty.
        preset: Vec<UnitTemplate>,
    },
    /// Requests removal of a member, typically because it died.
    RemoveMember {
        /// Group the member belongs to.
        group: GroupId,
        /// Member to remove.
        member: MemberId,
    },
    /// Updates the global difficulty used by future allocations.
    SetGlobalDifficulty {
        /// New difficulty value.
        difficulty: f32,
    },
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new attack group was registered.
    AttackGroupCreated {
        /// Identifier assigned to the group.
        group: GroupId,
        /// Whitelist applied when assembling the group.
        whitelist: TypeMask,
        /// Number of members allocated to the group.
        members: usize,
    },
    /// Reports that an allocation produced no members and the group was discarded.
    AttackGroupEmpty {
        /// Whitelist applied when assembling the group.
        whitelist: TypeMask,
    },
    /// Requests that an adapter materialise a group member.
    MemberSpawned {
        /// Group the member belongs to.
        group: GroupId,
        /// Identifier assigned to the member.
        member: MemberId,
        /// Selected template and its scaled stats.
        entry: RosterEntry,
        /// Area in which the member should appear.
        placement: SpawnPlacement,
    },
    /// Announces that a group noticed its pursuit anchor and began pursuing.
    GroupTriggered {
        /// Group that transitioned.
        group: GroupId,
    },
    /// Confirms that a member left its group.
    MemberRemoved {
        /// Group the member belonged to.
        group: GroupId,
        /// Member that was removed.
        member: MemberId,
    },
    /// Announces that a group lost its final member.
    GroupDissolved {
        /// Group that dissolved.
        group: GroupId,
    },
    /// Confirms that the global difficulty changed.
    GlobalDifficultyChanged {
        /// Difficulty now in effect.
        difficulty: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn random_request_uses_reference_defaults() {
        let request = AllocationRequest::random(TypeMask::GROUND);
        assert_eq!(request.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(request.budget, DEFAULT_GROUP_BUDGET);
        assert!(!request.is_preset());
    }

    #[test]
    fn preset_request_reports_preset_mode() {
        let request = AllocationRequest::preset(vec![UnitTemplate::new(
            "hive_queen",
            50.0,
            Tier::Boss,
            TypeMask::GROUND,
        )]);
        assert!(request.is_preset());
    }

    #[test]
    fn allocation_result_sums_costs() {
        let entry = |cost: f32| RosterEntry {
            template: UnitTemplate::new("crawler", cost, Tier::Fodder, TypeMask::GROUND),
            stats: ResolvedStats {
                health: 1.0,
                armor: 0.0,
                damage: 1.0,
                attack_speed: 1.0,
                attack_cooldown: 1.0,
                speed: 600.0,
                bio_matter: 1.0,
                nuclear_chance: 0.0,
                chitin_chance: 0.0,
                scale: 0.8,
            },
        };
        let result = AllocationResult {
            entries: vec![entry(1.0), entry(2.5)],
            whitelist: TypeMask::GROUND,
            ceiling: 4.0,
            remaining_budget: 0.5,
        };
        assert_eq!(result.len(), 2);
        assert!((result.total_cost() - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn group_id_round_trips_through_bincode() {
        assert_round_trip(&GroupId::new(7));
    }

    #[test]
    fn template_round_trips_through_bincode() {
        let template =
            UnitTemplate::new("skimmer", 2.0, Tier::Elite, TypeMask::AIR | TypeMask::GROUND)
                .with_scale(1.5);
        assert_round_trip(&template);
    }
}
