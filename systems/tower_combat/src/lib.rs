#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits cooldown and firing commands from targeting data.

use path_defence_core::{Command, TowerId, TowerTarget, TowerView};

/// Tower combat system that decides, per tower, whether it cools down or fires.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one command per tower that has something to do, in placement order.
    ///
    /// A tower with a pending cooldown emits `Command::CoolTower` and never
    /// fires on the same tick. A ready tower emits `Command::FireBullet` when a
    /// target was assigned to it and nothing otherwise, keeping its cooldown at
    /// zero.
    pub fn handle(&mut self, towers: &TowerView, tower_targets: &[TowerTarget], out: &mut Vec<Command>) {
        if towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter() {
            if !tower.is_ready() {
                self.scratch.push(Command::CoolTower { tower: tower.id });
                continue;
            }

            if let Some(target) = find_target(tower_targets, tower.id) {
                self.scratch.push(Command::FireBullet {
                    tower: tower.id,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_target(targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    targets.iter().find(|target| target.tower == tower)
}
