#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use path_defence_core::{EnemyId, EnemyView, FieldPoint, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
///
/// Each tower picks the first living enemy, in spawn order, whose position
/// lies within its range. Distance does not influence the choice, so the
/// oldest enemy in range is always preferred.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers without an enemy in range produce no entry.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let range = i64::from(tower.range);
            let max_distance = range * range;

            let found = self
                .enemy_workspace
                .iter()
                .find(|candidate| tower.position.distance_squared(candidate.position) <= max_distance);

            if let Some(candidate) = found {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.id,
                    tower_position: tower.position,
                    enemy_position: candidate.position,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|snapshot| !snapshot.reached_end)
                .map(|snapshot| EnemyCandidate {
                    id: snapshot.id,
                    position: snapshot.position,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: FieldPoint,
}
