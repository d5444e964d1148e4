use std::{cell::Cell, collections::HashMap, time::Duration};

use dust_devil_core::{Event, GroupId, MemberId, Vec3};
use dust_devil_system_cohesion::{CohesionState, CohesionTracker, Config};

fn ground(point: Vec3) -> Option<Vec3> {
    Some(Vec3::new(point.x, point.y, 0.0))
}

fn miss(_: Vec3) -> Option<Vec3> {
    None
}

fn square_around_origin() -> HashMap<MemberId, Vec3> {
    HashMap::from([
        (MemberId::new(1), Vec3::new(100.0, 100.0, 0.0)),
        (MemberId::new(2), Vec3::new(-100.0, 100.0, 0.0)),
        (MemberId::new(3), Vec3::new(-100.0, -100.0, 0.0)),
        (MemberId::new(4), Vec3::new(100.0, -100.0, 0.0)),
    ])
}

fn tracker_for(positions: &HashMap<MemberId, Vec3>, config: Config) -> CohesionTracker {
    let mut members: Vec<MemberId> = positions.keys().copied().collect();
    members.sort();
    CohesionTracker::new(GroupId::new(7), Vec3::ZERO, members, config)
}

fn tick(dt: Duration) -> [Event; 1] {
    [Event::TimeAdvanced { dt }]
}

#[test]
fn leash_clamps_target_toward_distant_anchor() {
    let positions = square_around_origin();
    let config = Config::new(Duration::from_millis(100), 30_000.0, 10_000.0);
    let mut tracker = tracker_for(&positions, config);
    let anchor = Vec3::new(20_000.0, 0.0, 0.0);
    let mut events = Vec::new();

    tracker.update(|m: MemberId| positions.get(&m).copied(), Some(anchor), &ground, &mut events);

    assert_eq!(tracker.group().centroid(), Vec3::ZERO);
    assert_eq!(tracker.state(), CohesionState::Pursuing);
    let candidate = tracker.leash_candidate().expect("anchor beyond leash");
    assert!((candidate.distance(Vec3::ZERO) - 10_000.0).abs() < 1e-2);
    assert!((candidate - Vec3::new(10_000.0, 0.0, 0.0)).length() < 1e-2);
    assert_eq!(tracker.group().pursuit_target(), Vec3::new(10_000.0, 0.0, 0.0));
    assert_eq!(events, vec![Event::GroupTriggered { group: GroupId::new(7) }]);
}

#[test]
fn idle_group_keeps_its_target() {
    let positions = square_around_origin();
    let config = Config::new(Duration::from_millis(100), 500.0, 10_000.0);
    let mut tracker = tracker_for(&positions, config);
    let mut events = Vec::new();

    tracker.update(
        |m: MemberId| positions.get(&m).copied(),
        Some(Vec3::new(5_000.0, 0.0, 0.0)),
        &ground,
        &mut events,
    );

    assert_eq!(tracker.state(), CohesionState::Idle);
    assert_eq!(tracker.group().pursuit_target(), Vec3::ZERO);
    assert!(events.is_empty());
}

#[test]
fn nearby_anchor_becomes_the_target() {
    let positions = square_around_origin();
    let mut tracker = tracker_for(&positions, Config::default());
    let anchor = Vec3::new(300.0, 200.0, 50.0);
    let mut events = Vec::new();

    tracker.update(|m: MemberId| positions.get(&m).copied(), Some(anchor), &ground, &mut events);

    assert_eq!(tracker.group().pursuit_target(), anchor);
    assert!(tracker.leash_candidate().is_none());
}

#[test]
fn trigger_never_resets() {
    let positions = square_around_origin();
    let mut tracker = tracker_for(&positions, Config::default());
    let mut events = Vec::new();

    tracker.update(
        |m: MemberId| positions.get(&m).copied(),
        Some(Vec3::new(10.0, 0.0, 0.0)),
        &ground,
        &mut events,
    );
    assert!(tracker.group().triggered());

    for step in 1..20 {
        let far = Vec3::new(step as f32 * 50_000.0, 0.0, 0.0);
        tracker.update(|m: MemberId| positions.get(&m).copied(), Some(far), &ground, &mut events);
        assert!(tracker.group().triggered());
        let candidate = tracker.leash_candidate().expect("anchor beyond leash");
        assert!(candidate.distance(tracker.group().centroid()) <= 10_000.0 + 1e-2);
    }

    let triggers = events
        .iter()
        .filter(|event| matches!(event, Event::GroupTriggered { .. }))
        .count();
    assert_eq!(triggers, 1, "trigger is announced once");
}

#[test]
fn probe_miss_keeps_previous_target() {
    let positions = square_around_origin();
    let mut tracker = tracker_for(&positions, Config::default());
    let mut events = Vec::new();
    let near = Vec3::new(200.0, 0.0, 0.0);

    tracker.update(|m: MemberId| positions.get(&m).copied(), Some(near), &ground, &mut events);
    tracker.update(
        |m: MemberId| positions.get(&m).copied(),
        Some(Vec3::new(90_000.0, 0.0, 0.0)),
        &miss,
        &mut events,
    );

    assert_eq!(tracker.group().pursuit_target(), near);
}

#[test]
fn missing_anchor_skips_trigger_and_target() {
    let positions = square_around_origin();
    let mut tracker = tracker_for(&positions, Config::default());
    let mut events = Vec::new();

    tracker.update(|m: MemberId| positions.get(&m).copied(), None, &ground, &mut events);

    assert_eq!(tracker.state(), CohesionState::Idle);
    assert_eq!(tracker.group().pursuit_target(), Vec3::ZERO);
}

#[test]
fn handle_runs_one_update_per_interval() {
    let positions = square_around_origin();
    let mut tracker = tracker_for(&positions, Config::default());
    let anchor = Vec3::new(50.0, 0.0, 0.0);
    let mut events = Vec::new();

    tracker.handle(
        &tick(Duration::from_millis(60)),
        |m: MemberId| positions.get(&m).copied(),
        Some(anchor),
        &ground,
        &mut events,
    );
    assert_eq!(tracker.state(), CohesionState::Idle, "no update before a full interval");

    tracker.handle(
        &tick(Duration::from_millis(60)),
        |m: MemberId| positions.get(&m).copied(),
        Some(anchor),
        &ground,
        &mut events,
    );
    assert_eq!(tracker.state(), CohesionState::Pursuing);
    assert_eq!(tracker.group().pursuit_target(), anchor);
}

fn lone_member_tracker(tick_interval: Duration) -> CohesionTracker {
    CohesionTracker::new(
        GroupId::new(5),
        Vec3::ZERO,
        [MemberId::new(1)],
        Config::new(tick_interval, 1_000.0, 10_000.0),
    )
}

#[test]
fn long_frame_runs_one_update_per_elapsed_interval() {
    let mut tracker = lone_member_tracker(Duration::from_millis(100));
    let updates = Cell::new(0u32);
    let mut events = Vec::new();

    tracker.handle(
        &tick(Duration::from_millis(350)),
        |_: MemberId| {
            updates.set(updates.get() + 1);
            Some(Vec3::ZERO)
        },
        None,
        &ground,
        &mut events,
    );
    assert_eq!(updates.get(), 3);

    tracker.handle(
        &tick(Duration::from_millis(50)),
        |_: MemberId| {
            updates.set(updates.get() + 1);
            Some(Vec3::ZERO)
        },
        None,
        &ground,
        &mut events,
    );
    assert_eq!(updates.get(), 4, "the 50 ms remainder carries over");
}

#[test]
fn zero_interval_updates_once_per_advancing_frame() {
    let mut tracker = lone_member_tracker(Duration::ZERO);
    let updates = Cell::new(0u32);
    let mut events = Vec::new();

    for frame in [Duration::from_millis(16), Duration::from_millis(500)] {
        tracker.handle(
            &tick(frame),
            |_: MemberId| {
                updates.set(updates.get() + 1);
                Some(Vec3::ZERO)
            },
            None,
            &ground,
            &mut events,
        );
    }
    assert_eq!(updates.get(), 2);

    tracker.handle(
        &[],
        |_: MemberId| {
            updates.set(updates.get() + 1);
            Some(Vec3::ZERO)
        },
        None,
        &ground,
        &mut events,
    );
    assert_eq!(updates.get(), 2, "frames without time advancing do not update");
}

#[test]
fn removing_last_member_dissolves_once() {
    let mut tracker = CohesionTracker::new(
        GroupId::new(3),
        Vec3::ZERO,
        [MemberId::new(1), MemberId::new(2)],
        Config::default(),
    );
    let mut events = Vec::new();

    assert!(!tracker.remove_member(MemberId::new(99), &mut events));
    assert!(events.is_empty(), "unknown members are ignored");

    assert!(tracker.remove_member(MemberId::new(1), &mut events));
    assert!(!tracker.is_dissolved());
    assert!(tracker.remove_member(MemberId::new(2), &mut events));
    assert!(tracker.is_dissolved());
    assert!(!tracker.remove_member(MemberId::new(2), &mut events));
    assert!(!tracker.add_member(MemberId::new(5)));

    assert_eq!(
        events,
        vec![
            Event::MemberRemoved {
                group: GroupId::new(3),
                member: MemberId::new(1),
            },
            Event::MemberRemoved {
                group: GroupId::new(3),
                member: MemberId::new(2),
            },
            Event::GroupDissolved {
                group: GroupId::new(3),
            },
        ]
    );
}

#[test]
fn dissolved_tracker_stops_ticking() {
    let mut tracker = CohesionTracker::new(
        GroupId::new(3),
        Vec3::ZERO,
        [MemberId::new(1)],
        Config::default(),
    );
    let mut events = Vec::new();
    assert!(tracker.remove_member(MemberId::new(1), &mut events));
    events.clear();

    tracker.handle(
        &tick(Duration::from_secs(1)),
        |_: MemberId| Some(Vec3::ZERO),
        Some(Vec3::new(1.0, 0.0, 0.0)),
        &ground,
        &mut events,
    );

    assert!(events.is_empty());
    assert!(!tracker.group().triggered());
}
