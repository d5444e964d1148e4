//! Catalog entries describing spawnable enemy units.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Locomotion capabilities of an enemy, used to filter random group selection.
    ///
    /// Unknown bits are retained so that randomised whitelists outside the
    /// named range keep their exact value.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TypeMask: u8 {
        /// Enemy crawls on the ground.
        const GROUND = 1 << 0;
        /// Enemy flies through the air.
        const AIR = 1 << 1;
        /// Enemy burrows underground.
        const BURROW = 1 << 2;
    }
}

impl TypeMask {
    /// Number of named locomotion bits.
    pub const TYPE_BITS: u32 = 3;

    /// Reports whether the mask shares at least one bit with `whitelist`.
    #[must_use]
    pub const fn shares_any(self, whitelist: TypeMask) -> bool {
        self.bits() & whitelist.bits() != 0
    }

    /// Whether the ground bit is set.
    #[must_use]
    pub const fn ground(self) -> bool {
        self.contains(Self::GROUND)
    }

    /// Whether the air bit is set.
    #[must_use]
    pub const fn air(self) -> bool {
        self.contains(Self::AIR)
    }

    /// Whether the burrow bit is set.
    #[must_use]
    pub const fn burrow(self) -> bool {
        self.contains(Self::BURROW)
    }
}

/// Coarse power classification of an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Weakest enemies, eligible for random selection.
    Fodder,
    /// Regular enemies, eligible for random selection.
    #[default]
    Standard,
    /// Tougher enemies, eligible for random selection.
    Elite,
    /// Never selected randomly; only spawned through preset rosters.
    Boss,
    /// Never selected randomly; only spawned through preset rosters.
    Special,
}

impl Tier {
    /// Reports whether the tier may appear in randomly assembled groups.
    #[must_use]
    pub const fn is_randomly_spawnable(self) -> bool {
        !matches!(self, Tier::Boss | Tier::Special)
    }
}

/// Stats of an enemy before difficulty scaling is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    /// Hit points at difficulty zero.
    pub health: f32,
    /// Flat damage mitigation.
    pub armor: f32,
    /// Damage dealt per attack.
    pub damage: f32,
    /// Attacks per second.
    pub attack_speed: f32,
    /// Movement speed in world units per second.
    pub base_speed: f32,
    /// Bio matter dropped on death.
    pub base_bio_matter: f32,
    /// Probability in `[0, 1]` of dropping nuclear material.
    pub nuclear_chance: f32,
    /// Probability in `[0, 1]` of dropping mutated chitin.
    pub chitin_chance: f32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            health: 1.0,
            armor: 0.0,
            damage: 1.0,
            attack_speed: 1.0,
            base_speed: 600.0,
            base_bio_matter: 1.0,
            nuclear_chance: 0.0,
            chitin_chance: 0.0,
        }
    }
}

impl BaseStats {
    /// Returns a copy with the drop chances clamped into `[0, 1]`.
    #[must_use]
    pub fn with_clamped_chances(mut self) -> Self {
        self.nuclear_chance = self.nuclear_chance.clamp(0.0, 1.0);
        self.chitin_chance = self.chitin_chance.clamp(0.0, 1.0);
        self
    }
}

/// Immutable catalog entry describing a spawnable enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Row name used to look the template up.
    pub name: String,
    /// Budget consumed when the template is selected.
    pub cost: f32,
    /// Power classification.
    #[serde(default)]
    pub tier: Tier,
    /// Locomotion capabilities.
    #[serde(default)]
    pub types: TypeMask,
    /// Multiplier applied to the global difficulty before curve evaluation.
    #[serde(default = "unit")]
    pub difficulty_coefficient: f32,
    /// Configured physical scale; difficulty scaling never exceeds it.
    #[serde(default = "unit")]
    pub scale: f32,
    /// Unscaled stats.
    #[serde(default)]
    pub stats: BaseStats,
}

fn unit() -> f32 {
    1.0
}

impl UnitTemplate {
    /// Creates a template with default stats, coefficient and scale.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: f32, tier: Tier, types: TypeMask) -> Self {
        Self {
            name: name.into(),
            cost,
            tier,
            types,
            difficulty_coefficient: 1.0,
            scale: 1.0,
            stats: BaseStats::default(),
        }
    }

    /// Replaces the base stats.
    #[must_use]
    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.stats = stats;
        self
    }

    /// Replaces the difficulty coefficient.
    #[must_use]
    pub fn with_difficulty_coefficient(mut self, coefficient: f32) -> Self {
        self.difficulty_coefficient = coefficient;
        self
    }

    /// Replaces the configured physical scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Read-only collection of unit templates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    templates: Vec<UnitTemplate>,
}

impl Catalog {
    /// Creates a catalog from the provided templates.
    #[must_use]
    pub fn new(templates: Vec<UnitTemplate>) -> Self {
        Self { templates }
    }

    /// Every template in load order.
    #[must_use]
    pub fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    /// Looks up a template by its row name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&UnitTemplate> {
        self.templates.iter().find(|template| template.name == name)
    }

    /// Number of templates in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Stats of a single roster entry after difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStats {
    /// Scaled hit points.
    pub health: f32,
    /// Flat damage mitigation, unscaled.
    pub armor: f32,
    /// Damage per attack, unscaled.
    pub damage: f32,
    /// Attacks per second, unscaled.
    pub attack_speed: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
    /// Scaled movement speed.
    pub speed: f32,
    /// Bio matter dropped on death, unscaled.
    pub bio_matter: f32,
    /// Nuclear drop chance including the innate difficulty bonus.
    pub nuclear_chance: f32,
    /// Chitin drop chance including the innate difficulty bonus.
    pub chitin_chance: f32,
    /// Physical scale, grows with health but never beyond the template scale.
    pub scale: f32,
}

/// A template chosen for a group together with its scaled stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The catalog entry that was selected.
    pub template: UnitTemplate,
    /// Stats after difficulty scaling.
    pub stats: ResolvedStats,
}
