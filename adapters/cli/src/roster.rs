//! Allocation reports for the `allocate` subcommand.

use dust_devil_core::{Command, Event, ResolvedStats, Tier, TypeMask, UnitTemplate, Vec3};
use dust_devil_world::{self as world, World};
use serde::Serialize;

/// One allocated group as printed by the CLI.
#[derive(Debug, Default, PartialEq, Serialize)]
pub(crate) struct GroupReport {
    group: Option<u32>,
    whitelist: TypeMask,
    spawn_radius: f32,
    total_cost: f32,
    members: Vec<MemberReport>,
}

#[derive(Debug, PartialEq, Serialize)]
struct MemberReport {
    member: u32,
    template: String,
    tier: Tier,
    cost: f32,
    stats: ResolvedStats,
}

impl GroupReport {
    fn from_events(events: &[Event]) -> Self {
        let mut report = Self::default();
        for event in events {
            match event {
                Event::AttackGroupCreated {
                    group, whitelist, ..
                } => {
                    report.group = Some(group.get());
                    report.whitelist = *whitelist;
                }
                Event::AttackGroupEmpty { whitelist } => report.whitelist = *whitelist,
                Event::MemberSpawned {
                    member,
                    entry,
                    placement,
                    ..
                } => {
                    report.spawn_radius = placement.search_radius;
                    report.total_cost += entry.template.cost;
                    report.members.push(MemberReport {
                        member: member.get(),
                        template: entry.template.name.clone(),
                        tier: entry.template.tier,
                        cost: entry.template.cost,
                        stats: entry.stats,
                    });
                }
                _ => {}
            }
        }
        report
    }
}

/// Allocates `groups` attack groups at the origin and reports their rosters.
pub(crate) fn allocate(
    world: &mut World,
    whitelist: TypeMask,
    preset: &[UnitTemplate],
    groups: u32,
) -> Vec<GroupReport> {
    let mut events = Vec::new();
    (0..groups)
        .map(|_| {
            events.clear();
            world::apply(
                world,
                Command::CreateAttackGroup {
                    whitelist,
                    spawn_location: Vec3::ZERO,
                    preset: preset.to_vec(),
                },
                &mut events,
            );
            GroupReport::from_events(&events)
        })
        .collect()
}
