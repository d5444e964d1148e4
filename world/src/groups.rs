//! Live attack group bookkeeping.

use std::collections::BTreeMap;

use dust_devil_core::{GroupId, MemberId};
use dust_devil_system_cohesion::CohesionTracker;

/// Registry that stores live trackers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct GroupRegistry {
    trackers: BTreeMap<GroupId, CohesionTracker>,
    next_group_id: GroupId,
    next_member_id: MemberId,
}

impl GroupRegistry {
    /// Creates an empty registry with reset identifier counters.
    pub(crate) fn new() -> Self {
        Self {
            trackers: BTreeMap::new(),
            next_group_id: GroupId::new(0),
            next_member_id: MemberId::new(0),
        }
    }

    /// Reserves the identifier for the next group.
    pub(crate) fn allocate_group_id(&mut self) -> GroupId {
        let id = self.next_group_id;
        self.next_group_id = GroupId::new(id.get().wrapping_add(1));
        id
    }

    /// Reserves the identifier for the next member.
    pub(crate) fn allocate_member_id(&mut self) -> MemberId {
        let id = self.next_member_id;
        self.next_member_id = MemberId::new(id.get().wrapping_add(1));
        id
    }

    pub(crate) fn insert(&mut self, tracker: CohesionTracker) {
        let id = tracker.group().id();
        let _ = self.trackers.insert(id, tracker);
    }

    pub(crate) fn get(&self, id: GroupId) -> Option<&CohesionTracker> {
        self.trackers.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> Option<&mut CohesionTracker> {
        self.trackers.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: GroupId) -> Option<CohesionTracker> {
        self.trackers.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CohesionTracker> {
        self.trackers.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CohesionTracker> {
        self.trackers.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.trackers.len()
    }
}
