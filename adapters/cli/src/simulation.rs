//! Headless pursuit run for the `simulate` subcommand.
//!
//! Members walk straight at their group's pursuit target once the group has
//! triggered, on flat ground at `z = 0`. Any member that comes within the
//! strike radius of the anchor is removed, which eventually dissolves the
//! group.

use std::{collections::BTreeMap, time::Duration};

use dust_devil_core::{
    Command, Event, GroupId, MemberId, SpawnPlacement, TypeMask, UnitTemplate, Vec3,
};
use dust_devil_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Inputs of a single simulated encounter.
#[derive(Debug)]
pub(crate) struct Scenario {
    pub(crate) whitelist: TypeMask,
    pub(crate) preset: Vec<UnitTemplate>,
    pub(crate) frames: u32,
    pub(crate) frame: Duration,
    pub(crate) spawn_location: Vec3,
    pub(crate) anchor: Vec3,
    pub(crate) anchor_velocity: Vec3,
    pub(crate) strike_radius: f32,
    pub(crate) seed: u64,
}

/// Summary printed once the run ends.
#[derive(Debug, Default, Serialize)]
pub(crate) struct SimulationReport {
    frames: u32,
    spawned: usize,
    removed: usize,
    triggered_at_frame: Option<u32>,
    dissolved_at_frame: Option<u32>,
    anchor: Vec3,
    groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Serialize)]
struct GroupSnapshot {
    group: u32,
    members: usize,
    triggered: bool,
    centroid: Vec3,
    pursuit_target: Vec3,
}

#[derive(Debug)]
struct Walker {
    group: GroupId,
    position: Vec3,
    speed: f32,
}

/// Spawns one group and advances it until it dissolves or the frames run out.
pub(crate) fn run(world: &mut World, scenario: &Scenario) -> SimulationReport {
    let mut rng = ChaCha8Rng::seed_from_u64(scenario.seed);
    let mut walkers: BTreeMap<MemberId, Walker> = BTreeMap::new();
    let mut events = Vec::new();
    let mut report = SimulationReport::default();

    world::apply(
        world,
        Command::CreateAttackGroup {
            whitelist: scenario.whitelist,
            spawn_location: scenario.spawn_location,
            preset: scenario.preset.clone(),
        },
        &mut events,
    );
    for event in &events {
        if let Event::MemberSpawned {
            group,
            member,
            entry,
            placement,
        } = event
        {
            let _ = walkers.insert(
                *member,
                Walker {
                    group: *group,
                    position: scatter(placement, &mut rng),
                    speed: entry.stats.speed,
                },
            );
        }
    }
    report.spawned = walkers.len();
    if walkers.is_empty() {
        tracing::warn!("no attack group was spawned");
        return report;
    }

    let dt = scenario.frame.as_secs_f32();
    let mut anchor = scenario.anchor;
    for frame in 0..scenario.frames {
        report.frames = frame + 1;
        events.clear();
        world::apply(world, Command::Tick { dt: scenario.frame }, &mut events);
        let ticked = events.clone();
        world::pursue(
            world,
            &ticked,
            |member: MemberId| walkers.get(&member).map(|walker| walker.position),
            Some(anchor),
            &flat_ground,
            &mut events,
        );

        advance(world, &mut walkers, dt);
        strike(world, &mut walkers, anchor, scenario.strike_radius, &mut events);
        record(&events, frame, &mut report);

        if query::group_count(world) == 0 {
            break;
        }
        anchor += scenario.anchor_velocity * dt;
    }

    report.anchor = anchor;
    report.groups = query::groups(world)
        .map(|group| GroupSnapshot {
            group: group.id().get(),
            members: group.members().len(),
            triggered: group.triggered(),
            centroid: group.centroid(),
            pursuit_target: group.pursuit_target(),
        })
        .collect();
    report
}

fn flat_ground(point: Vec3) -> Option<Vec3> {
    Some(Vec3::new(point.x, point.y, 0.0))
}

fn scatter(placement: &SpawnPlacement, rng: &mut ChaCha8Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = placement.search_radius * rng.gen::<f32>().sqrt();
    let point = placement.origin + Vec3::new(angle.cos(), angle.sin(), 0.0) * distance;
    Vec3::new(point.x, point.y, 0.0)
}

fn advance(world: &World, walkers: &mut BTreeMap<MemberId, Walker>, dt: f32) {
    for walker in walkers.values_mut() {
        let Some(group) = query::group(world, walker.group) else {
            continue;
        };
        if !group.triggered() {
            continue;
        }
        let offset = group.pursuit_target() - walker.position;
        let step = walker.speed * dt;
        walker.position = if offset.length() <= step {
            group.pursuit_target()
        } else {
            walker.position + offset.normalize() * step
        };
    }
}

fn strike(
    world: &mut World,
    walkers: &mut BTreeMap<MemberId, Walker>,
    anchor: Vec3,
    radius: f32,
    out_events: &mut Vec<Event>,
) {
    let struck: Vec<(MemberId, GroupId)> = walkers
        .iter()
        .filter(|(_, walker)| walker.position.distance(anchor) <= radius)
        .map(|(member, walker)| (*member, walker.group))
        .collect();
    for (member, group) in struck {
        let _ = walkers.remove(&member);
        world::apply(world, Command::RemoveMember { group, member }, out_events);
    }
}

fn record(events: &[Event], frame: u32, report: &mut SimulationReport) {
    for event in events {
        match event {
            Event::GroupTriggered { group } => {
                tracing::info!(group = group.get(), frame, "group triggered");
                let _ = report.triggered_at_frame.get_or_insert(frame);
            }
            Event::MemberRemoved { group, member } => {
                tracing::debug!(
                    group = group.get(),
                    member = member.get(),
                    frame,
                    "member removed"
                );
                report.removed += 1;
            }
            Event::GroupDissolved { group } => {
                tracing::info!(group = group.get(), frame, "group dissolved");
                report.dissolved_at_frame = Some(frame);
            }
            _ => {}
        }
    }
}
