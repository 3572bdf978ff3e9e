//! Enemy state advanced by the world every tick.

use path_defence_core::{EnemyId, EnemySnapshot, FieldPoint, Health};

use crate::Path;

/// Enemy travelling along the shared path.
///
/// Segment changes are counted in whole steps, while the interpolation
/// parameter `t` accumulates `1 / ticks_per_segment` each tick so positions
/// truncate the same way as a floating-point walker would.
/// Killed and escaped enemies share the `reached_end` flag; the world tells
/// them apart by their remaining health when resolving them.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    segment: usize,
    step: u32,
    ticks_per_segment: u32,
    t: f64,
    health: Health,
    max_health: Health,
    reached_end: bool,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, max_health: Health, ticks_per_segment: u32) -> Self {
        Self {
            id,
            segment: 0,
            step: 0,
            ticks_per_segment: ticks_per_segment.max(1),
            t: 0.0,
            health: max_health,
            max_health,
            reached_end: false,
        }
    }

    /// Advances the enemy by one tick, marking it terminal after the last segment.
    pub(crate) fn update(&mut self, path: &Path) {
        if self.reached_end {
            return;
        }

        self.step += 1;
        self.t += 1.0 / f64::from(self.ticks_per_segment);
        if self.step >= self.ticks_per_segment {
            self.step = 0;
            self.t = 0.0;
            self.segment += 1;
            if self.segment >= path.segment_count() {
                self.reached_end = true;
            }
        }
    }

    /// Applies damage, marking the enemy terminal once its health is depleted.
    pub(crate) fn take_damage(&mut self, amount: u32) {
        if self.reached_end {
            return;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health.is_zero() {
            self.reached_end = true;
        }
    }

    pub(crate) fn position(&self, path: &Path) -> FieldPoint {
        path.interpolate(self.segment, self.progress())
    }

    pub(crate) const fn progress(&self) -> f64 {
        self.t
    }

    pub(crate) const fn health(&self) -> Health {
        self.health
    }

    pub(crate) const fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Reports whether the enemy was killed rather than escaping.
    pub(crate) const fn is_killed(&self) -> bool {
        self.reached_end && self.health.is_zero()
    }

    pub(crate) fn snapshot(&self, path: &Path) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position(path),
            health: self.health,
            max_health: self.max_health,
            reached_end: self.reached_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_segments() -> Path {
        Path::from_points(vec![
            FieldPoint::new(0, 0),
            FieldPoint::new(40, 0),
            FieldPoint::new(40, 40),
        ])
        .expect("valid path")
    }

    fn enemy(ticks_per_segment: u32) -> Enemy {
        Enemy::new(EnemyId::new(0), Health::new(50), ticks_per_segment)
    }

    #[test]
    fn update_advances_along_segment() {
        let path = two_segments();
        let mut enemy = enemy(4);
        enemy.update(&path);
        assert_eq!(enemy.position(&path), FieldPoint::new(10, 0));
        enemy.update(&path);
        assert!((enemy.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn completing_a_segment_moves_to_the_next_one() {
        let path = two_segments();
        let mut enemy = enemy(4);
        for _ in 0..4 {
            enemy.update(&path);
        }
        assert_eq!(enemy.position(&path), FieldPoint::new(40, 0));
        assert_eq!(enemy.progress(), 0.0);
        assert!(!enemy.reached_end());
    }

    #[test]
    fn finishing_the_last_segment_escapes_with_full_health() {
        let path = two_segments();
        let mut enemy = enemy(4);
        for _ in 0..8 {
            enemy.update(&path);
        }
        assert!(enemy.reached_end());
        assert!(!enemy.is_killed());
        assert_eq!(enemy.health(), Health::new(50));

        let parked = enemy.position(&path);
        enemy.update(&path);
        assert_eq!(enemy.position(&path), parked, "terminal enemies stay put");
    }

    #[test]
    fn accumulated_progress_truncates_like_repeated_addition() {
        let path = Path::from_points(vec![FieldPoint::new(0, 0), FieldPoint::new(100, 0)])
            .expect("valid path");
        let mut enemy = enemy(200);
        for _ in 0..12 {
            enemy.update(&path);
        }
        assert_eq!(enemy.position(&path), FieldPoint::new(5, 0));

        for _ in 12..200 {
            enemy.update(&path);
        }
        assert!(enemy.reached_end());
    }

    #[test]
    fn damage_clamps_and_kills() {
        let mut enemy = enemy(4);
        enemy.take_damage(30);
        assert_eq!(enemy.health(), Health::new(20));
        enemy.take_damage(30);
        assert_eq!(enemy.health(), Health::ZERO);
        assert!(enemy.reached_end());
        assert!(enemy.is_killed());
    }

    #[test]
    fn terminal_enemies_ignore_damage() {
        let path = two_segments();
        let mut enemy = enemy(1);
        enemy.update(&path);
        enemy.update(&path);
        assert!(enemy.reached_end());
        enemy.take_damage(10);
        assert_eq!(enemy.health(), Health::new(50));
    }

    #[test]
    fn zero_ticks_per_segment_still_moves() {
        let path = two_segments();
        let mut enemy = enemy(0);
        enemy.update(&path);
        assert_eq!(enemy.position(&path), FieldPoint::new(40, 0));
    }
}
