//! Projectiles pursuing their target enemy.

use glam::Vec2;
use path_defence_core::{BulletId, BulletRules, BulletSnapshot, EnemyId, FieldPoint};

use crate::{enemies::Enemy, Path};

/// Result of advancing a bullet by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BulletStatus {
    /// The bullet is still travelling toward its target.
    InFlight,
    /// The bullet reached its target and applied damage.
    Hit,
    /// The target left play before the bullet arrived.
    Whiffed,
}

/// Bullet travelling in a straight line toward the current position of its target.
#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    pub(crate) target: EnemyId,
    position: Vec2,
    speed: f32,
    size: u32,
    damage: u32,
    hit_radius: f32,
}

impl Bullet {
    pub(crate) fn new(id: BulletId, origin: FieldPoint, target: EnemyId, rules: &BulletRules) -> Self {
        Self {
            id,
            target,
            position: origin.to_vec2(),
            speed: rules.speed,
            size: rules.size,
            damage: rules.damage,
            hit_radius: rules.hit_radius,
        }
    }

    pub(crate) const fn damage(&self) -> u32 {
        self.damage
    }

    /// Pursues `target`, which is `None` once the enemy has been removed from play.
    pub(crate) fn update(&mut self, target: Option<&mut Enemy>, path: &Path) -> BulletStatus {
        let Some(enemy) = target.filter(|enemy| !enemy.reached_end() && !enemy.health().is_zero())
        else {
            return BulletStatus::Whiffed;
        };

        let offset = enemy.position(path).to_vec2() - self.position;
        if offset.length() < self.hit_radius {
            enemy.take_damage(self.damage);
            return BulletStatus::Hit;
        }

        self.position += offset.normalize_or_zero() * self.speed;
        BulletStatus::InFlight
    }

    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            position: self.position,
            size: self.size,
            target: self.target,
        }
    }
}
