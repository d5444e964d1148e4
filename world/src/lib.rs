#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative enemy director state for Dust Devil.
//!
//! The world owns the unit catalog, the difficulty curves, the global
//! difficulty and one cohesion tracker per live attack group. Mutations go
//! through [`apply`]; group updates are driven by [`pursue`].

mod config;
mod groups;

use dust_devil_core::{
    AllocationRequest, Catalog, Command, CurveTable, Event, GroundProbe, MemberId, SpawnPlacement,
    TypeMask, UnitTemplate, Vec3,
};
use dust_devil_system_allocation::GroupBudgetAllocator;
use dust_devil_system_cohesion::CohesionTracker;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::Config;
use groups::GroupRegistry;

/// Represents the authoritative enemy director state.
#[derive(Debug)]
pub struct World {
    config: Config,
    catalog: Catalog,
    curves: CurveTable,
    global_difficulty: f32,
    allocator: GroupBudgetAllocator,
    rng: ChaCha8Rng,
    groups: GroupRegistry,
}

impl World {
    /// Creates a director over the provided catalog and curves.
    #[must_use]
    pub fn new(config: Config, catalog: Catalog, curves: CurveTable) -> Self {
        Self {
            global_difficulty: config.global_difficulty,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            catalog,
            curves,
            allocator: GroupBudgetAllocator::new(),
            groups: GroupRegistry::new(),
        }
    }

    fn create_attack_group(
        &mut self,
        whitelist: TypeMask,
        spawn_location: Vec3,
        preset: Vec<UnitTemplate>,
        out_events: &mut Vec<Event>,
    ) {
        let request = AllocationRequest {
            whitelist,
            budget: self.config.fallback_budget,
            preset,
            max_retries: self.config.max_retries,
        };
        let result = self.allocator.allocate(
            &request,
            self.catalog.templates(),
            self.global_difficulty,
            &self.curves,
            &mut self.rng,
        );

        if result.is_empty() {
            tracing::info!(
                whitelist = result.whitelist.bits(),
                "allocation produced no members, discarding group"
            );
            out_events.push(Event::AttackGroupEmpty {
                whitelist: result.whitelist,
            });
            return;
        }

        let group = self.groups.allocate_group_id();
        let placement = SpawnPlacement {
            origin: spawn_location,
            search_radius: self.config.spawn_radius(result.ceiling),
        };

        out_events.push(Event::AttackGroupCreated {
            group,
            whitelist: result.whitelist,
            members: result.len(),
        });

        let mut members: Vec<MemberId> = Vec::with_capacity(result.len());
        for entry in result.entries {
            let member = self.groups.allocate_member_id();
            members.push(member);
            out_events.push(Event::MemberSpawned {
                group,
                member,
                entry,
                placement,
            });
        }

        tracing::info!(
            group = group.get(),
            members = members.len(),
            ceiling = result.ceiling,
            "attack group created"
        );
        self.groups.insert(CohesionTracker::new(
            group,
            spawn_location,
            members,
            self.config.cohesion(),
        ));
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::CreateAttackGroup {
            whitelist,
            spawn_location,
            preset,
        } => {
            world.create_attack_group(whitelist, spawn_location, preset, out_events);
        }
        Command::RemoveMember { group, member } => {
            let Some(tracker) = world.groups.get_mut(group) else {
                tracing::warn!(
                    group = group.get(),
                    member = member.get(),
                    "remove requested for unknown group"
                );
                return;
            };

            let _ = tracker.remove_member(member, out_events);
            if tracker.is_dissolved() {
                let _ = world.groups.remove(group);
                tracing::info!(group = group.get(), "attack group dissolved");
            }
        }
        Command::SetGlobalDifficulty { difficulty } => {
            if !difficulty.is_finite() || difficulty < 0.0 {
                tracing::warn!(difficulty, "rejected invalid global difficulty");
                return;
            }
            world.global_difficulty = difficulty;
            out_events.push(Event::GlobalDifficultyChanged { difficulty });
        }
    }
}

/// Forwards world events to every live group so they can update their pursuit targets.
///
/// `positions` reports where each member currently is; `anchor` is the
/// position of the pursued entity, if any.
pub fn pursue<F, P>(
    world: &mut World,
    events: &[Event],
    positions: F,
    anchor: Option<Vec3>,
    probe: &P,
    out_events: &mut Vec<Event>,
) where
    F: Fn(MemberId) -> Option<Vec3>,
    P: GroundProbe + ?Sized,
{
    for tracker in world.groups.iter_mut() {
        tracker.handle(events, &positions, anchor, probe, out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dust_devil_core::{Catalog, GroupId, UnitTemplate};
    use dust_devil_system_cohesion::{CohesionState, Group};

    use super::World;

    /// Retrieves a live group by identifier.
    #[must_use]
    pub fn group(world: &World, id: GroupId) -> Option<&Group> {
        world.groups.get(id).map(|tracker| tracker.group())
    }

    /// Reports the trigger state of a live group.
    #[must_use]
    pub fn group_state(world: &World, id: GroupId) -> Option<CohesionState> {
        world.groups.get(id).map(|tracker| tracker.state())
    }

    /// Iterates over every live group in identifier order.
    pub fn groups(world: &World) -> impl Iterator<Item = &Group> {
        world.groups.iter().map(|tracker| tracker.group())
    }

    /// Number of live groups.
    #[must_use]
    pub fn group_count(world: &World) -> usize {
        world.groups.len()
    }

    /// Looks up a catalog template by its row name.
    #[must_use]
    pub fn template_by_name<'a>(world: &'a World, name: &str) -> Option<&'a UnitTemplate> {
        let template = world.catalog.find(name);
        if template.is_none() {
            tracing::warn!(name, "template not found in catalog");
        }
        template
    }

    /// Provides read-only access to the catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Difficulty currently fed into the scaling curves.
    #[must_use]
    pub fn global_difficulty(world: &World) -> f32 {
        world.global_difficulty
    }
}
