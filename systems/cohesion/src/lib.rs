#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Periodic cohesion updates for attack groups.
//!
//! Members path towards their group's pursuit target instead of the pursued
//! entity directly. The tracker keeps that target on the line from the group
//! centroid towards the pursuit anchor, never further than the leash distance,
//! and announces dissolution once the last member is removed.

use std::time::Duration;

use dust_devil_core::{Event, GroundProbe, GroupId, MemberId, Vec3};

/// Configuration parameters required to construct a cohesion tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    tick_interval: Duration,
    detection_radius: f32,
    max_leash_distance: f32,
}

impl Config {
    /// Creates a new configuration using the provided cadence and distances.
    #[must_use]
    pub const fn new(
        tick_interval: Duration,
        detection_radius: f32,
        max_leash_distance: f32,
    ) -> Self {
        Self {
            tick_interval,
            detection_radius,
            max_leash_distance,
        }
    }

    /// Simulated time between two cohesion updates.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Distance below which the pursuit anchor triggers the group.
    #[must_use]
    pub const fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Maximum offset between the pursuit target and the centroid.
    #[must_use]
    pub const fn max_leash_distance(&self) -> f32 {
        self.max_leash_distance
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 1_000.0, 10_000.0)
    }
}

/// Whether a group is still waiting for its anchor or actively pursuing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CohesionState {
    /// The anchor has not yet come within the detection radius.
    Idle,
    /// The anchor was detected; the group follows it for the rest of its life.
    Pursuing,
}

/// Mutable aggregate describing a single attack group.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    id: GroupId,
    members: Vec<MemberId>,
    centroid: Vec3,
    pursuit_target: Vec3,
    triggered: bool,
    detection_radius: f32,
    max_leash_distance: f32,
}

impl Group {
    /// Identifier of the group.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Current members.
    #[must_use]
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Whether the member belongs to the group.
    #[must_use]
    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// Mean position of the members at the last update.
    #[must_use]
    pub const fn centroid(&self) -> Vec3 {
        self.centroid
    }

    /// Point the members should path towards.
    #[must_use]
    pub const fn pursuit_target(&self) -> Vec3 {
        self.pursuit_target
    }

    /// Whether the group has detected its pursuit anchor.
    #[must_use]
    pub const fn triggered(&self) -> bool {
        self.triggered
    }

    /// Distance below which the pursuit anchor triggers the group.
    #[must_use]
    pub const fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Maximum offset between the pursuit target and the centroid.
    #[must_use]
    pub const fn max_leash_distance(&self) -> f32 {
        self.max_leash_distance
    }
}

/// Owns a [`Group`] and advances it on a fixed cadence.
#[derive(Debug)]
pub struct CohesionTracker {
    group: Group,
    tick_interval: Duration,
    accumulator: Duration,
    leash_candidate: Option<Vec3>,
    dissolved: bool,
}

impl CohesionTracker {
    /// Creates a tracker whose centroid and pursuit target start at `spawn_location`.
    #[must_use]
    pub fn new<I>(id: GroupId, spawn_location: Vec3, members: I, config: Config) -> Self
    where
        I: IntoIterator<Item = MemberId>,
    {
        let mut unique = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }

        Self {
            group: Group {
                id,
                members: unique,
                centroid: spawn_location,
                pursuit_target: spawn_location,
                triggered: false,
                detection_radius: config.detection_radius,
                max_leash_distance: config.max_leash_distance,
            },
            tick_interval: config.tick_interval,
            accumulator: Duration::ZERO,
            leash_candidate: None,
            dissolved: false,
        }
    }

    /// Read-only view of the tracked group.
    #[must_use]
    pub const fn group(&self) -> &Group {
        &self.group
    }

    /// Current state of the trigger state machine.
    #[must_use]
    pub const fn state(&self) -> CohesionState {
        if self.group.triggered {
            CohesionState::Pursuing
        } else {
            CohesionState::Idle
        }
    }

    /// Whether the group lost its last member and the tracker became inert.
    #[must_use]
    pub const fn is_dissolved(&self) -> bool {
        self.dissolved
    }

    /// Leash-clamped point handed to the ground probe during the last update,
    /// or `None` when the anchor was within leash range.
    #[must_use]
    pub const fn leash_candidate(&self) -> Option<Vec3> {
        self.leash_candidate
    }

    /// Adds a member to the group. Returns `false` for duplicates or dissolved groups.
    pub fn add_member(&mut self, member: MemberId) -> bool {
        if self.dissolved || self.group.contains(member) {
            return false;
        }
        self.group.members.push(member);
        true
    }

    /// Consumes world events and runs one update per elapsed tick interval.
    ///
    /// A zero interval runs a single update for every frame that advanced time.
    pub fn handle<F, P>(
        &mut self,
        events: &[Event],
        positions: F,
        anchor: Option<Vec3>,
        probe: &P,
        out: &mut Vec<Event>,
    ) where
        F: Fn(MemberId) -> Option<Vec3>,
        P: GroundProbe + ?Sized,
    {
        if self.dissolved {
            return;
        }

        let mut advanced = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
                advanced = true;
            }
        }

        if !advanced {
            return;
        }

        if self.tick_interval.is_zero() {
            self.accumulator = Duration::ZERO;
            self.update(&positions, anchor, probe, out);
            return;
        }

        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            self.update(&positions, anchor, probe, out);
        }
    }

    /// Runs a single cohesion update immediately.
    pub fn update<F, P>(
        &mut self,
        positions: F,
        anchor: Option<Vec3>,
        probe: &P,
        out: &mut Vec<Event>,
    ) where
        F: Fn(MemberId) -> Option<Vec3>,
        P: GroundProbe + ?Sized,
    {
        if self.dissolved {
            return;
        }

        self.recompute_centroid(positions);

        let Some(anchor) = anchor else {
            tracing::warn!(group = self.group.id.get(), "pursuit anchor unavailable");
            return;
        };

        let centroid = self.group.centroid;
        let distance = centroid.distance(anchor);

        if !self.group.triggered && distance < self.group.detection_radius {
            self.group.triggered = true;
            tracing::debug!(group = self.group.id.get(), distance, "group triggered");
            out.push(Event::GroupTriggered { group: self.group.id });
        }

        if !self.group.triggered {
            return;
        }

        if distance > self.group.max_leash_distance {
            let direction = (anchor - centroid).normalize_or_zero();
            let candidate = centroid + direction * self.group.max_leash_distance;
            self.leash_candidate = Some(candidate);
            match probe.probe(candidate) {
                Some(ground) => self.group.pursuit_target = ground,
                None => {
                    tracing::warn!(
                        group = self.group.id.get(),
                        "ground probe missed, keeping previous pursuit target"
                    );
                }
            }
        } else {
            self.leash_candidate = None;
            self.group.pursuit_target = anchor;
        }
    }

    /// Removes a member, announcing the removal and, for the last member, dissolution.
    ///
    /// Returns `false` without emitting anything when the member is unknown or
    /// the group already dissolved.
    pub fn remove_member(&mut self, member: MemberId, out: &mut Vec<Event>) -> bool {
        if self.dissolved {
            tracing::debug!(group = self.group.id.get(), "group already dissolved");
            return false;
        }

        let Some(index) = self.group.members.iter().position(|&m| m == member) else {
            tracing::debug!(
                group = self.group.id.get(),
                member = member.get(),
                "member not in group"
            );
            return false;
        };

        let _ = self.group.members.remove(index);
        out.push(Event::MemberRemoved {
            group: self.group.id,
            member,
        });

        if self.group.members.is_empty() {
            self.dissolved = true;
            self.accumulator = Duration::ZERO;
            out.push(Event::GroupDissolved {
                group: self.group.id,
            });
        }

        true
    }

    fn recompute_centroid<F>(&mut self, positions: F)
    where
        F: Fn(MemberId) -> Option<Vec3>,
    {
        let mut total = Vec3::ZERO;
        let mut counted = 0u32;
        for &member in &self.group.members {
            match positions(member) {
                Some(position) => {
                    total += position;
                    counted += 1;
                }
                None => {
                    tracing::warn!(
                        group = self.group.id.get(),
                        member = member.get(),
                        "member position unavailable"
                    );
                }
            }
        }

        if counted > 0 {
            self.group.centroid = total / counted as f32;
        }
    }
}
