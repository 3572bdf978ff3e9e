//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use path_defence_core::{FieldPoint, TowerId, TowerRules, TowerSnapshot};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) position: FieldPoint,
    size: u32,
    range: u32,
    fire_rate: u32,
    cooldown: u32,
}

impl Tower {
    pub(crate) fn new(id: TowerId, position: FieldPoint, rules: &TowerRules) -> Self {
        Self {
            id,
            position,
            size: rules.size,
            range: rules.range,
            fire_rate: rules.fire_rate,
            cooldown: 0,
        }
    }

    /// Counts the cooldown down by one tick. Returns `false` if the tower was already ready.
    pub(crate) fn cool_down(&mut self) -> bool {
        if self.cooldown == 0 {
            return false;
        }
        self.cooldown -= 1;
        true
    }

    pub(crate) const fn is_ready(&self) -> bool {
        self.cooldown == 0
    }

    /// Restarts the cooldown after a shot.
    pub(crate) fn rearm(&mut self) {
        self.cooldown = self.fire_rate;
    }

    /// Squared distance to `point` if it lies within half the tower's size.
    pub(crate) fn hover_distance(&self, point: FieldPoint) -> Option<i64> {
        let distance_squared = self.position.distance_squared(point);
        let half_size = f64::from(self.size) / 2.0;
        ((distance_squared as f64) <= half_size * half_size).then_some(distance_squared)
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            size: self.size,
            range: self.range,
            fire_rate: self.fire_rate,
            cooldown: self.cooldown,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
///
/// Identifiers are allocated monotonically, so iterating the registry yields
/// towers in placement order.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, position: FieldPoint, rules: &TowerRules) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, Tower::new(id, position, rules));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }
}
