#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.

mod bullets;
mod enemies;
mod explosions;
mod path;
mod session;
mod towers;

pub use path::Path;

use bullets::{Bullet, BulletStatus};
use enemies::Enemy;
use explosions::Explosion;
use path_defence_core::{
    BulletId, Command, EnemyId, Event, FieldPoint, GamePhase, Outcome, PlacementError, Rules,
    TowerId, WELCOME_BANNER,
};
use session::{Session, WaveAdvance};
use towers::TowerRegistry;

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    path: Path,
    session: Session,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    bullets: Vec<Bullet>,
    explosions: Vec<Explosion>,
    next_enemy_id: u32,
    next_bullet_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world on the standard path with the standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(Rules::default(), Path::standard())
    }

    /// Creates a new world using the provided rules and enemy route.
    #[must_use]
    pub fn with_layout(rules: Rules, path: Path) -> Self {
        Self {
            banner: WELCOME_BANNER,
            session: Session::new(&rules),
            rules,
            path,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            next_enemy_id: 0,
            next_bullet_id: 0,
            tick_index: 0,
        }
    }

    fn reset(&mut self) {
        self.session = Session::new(&self.rules);
        self.enemies.clear();
        self.towers = TowerRegistry::new();
        self.bullets.clear();
        self.explosions.clear();
        self.next_enemy_id = 0;
        self.next_bullet_id = 0;
        self.tick_index = 0;
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
    }

    fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) {
        if !self.session.can_spawn() {
            return;
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        let max_health = self.session.spawn_health(&self.rules.enemy);
        self.enemies
            .push(Enemy::new(id, max_health, self.rules.enemy.ticks_per_segment));
        self.session.record_spawn();
        out_events.push(Event::EnemySpawned {
            enemy: id,
            max_health,
        });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            enemy.update(&self.path);
        }

        for enemy in self.enemies.iter().filter(|enemy| enemy.reached_end()) {
            if enemy.is_killed() {
                let position = enemy.position(&self.path);
                let reward = self.rules.economy.kill_reward;
                self.session.record_kill(reward);
                self.explosions
                    .push(Explosion::new(position, &self.rules.explosion));
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    position,
                    reward,
                });
            } else {
                let lives = self.session.record_escape();
                out_events.push(Event::EnemyEscaped {
                    enemy: enemy.id,
                    lives,
                });
            }
        }
        self.enemies.retain(|enemy| !enemy.reached_end());

        if self.session.check_defeat() {
            out_events.push(Event::GameOver {
                outcome: Outcome::Lost,
            });
        }
    }

    fn fire_bullet(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemy_index(target) else {
            return;
        };
        let enemy = &self.enemies[index];
        if enemy.reached_end() || enemy.health().is_zero() {
            return;
        }
        let enemy_position = enemy.position(&self.path);

        let Some(shooter) = self.towers.get_mut(tower) else {
            return;
        };
        if !shooter.is_ready() {
            return;
        }
        let range = i64::from(shooter.snapshot().range);
        if shooter.position.distance_squared(enemy_position) > range * range {
            return;
        }

        shooter.rearm();
        let origin = shooter.position;
        let bullet = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.saturating_add(1);
        self.bullets
            .push(Bullet::new(bullet, origin, target, &self.rules.bullet));
        out_events.push(Event::BulletFired {
            bullet,
            tower,
            target,
        });
    }

    fn advance_bullets(&mut self, out_events: &mut Vec<Event>) {
        let enemies = &mut self.enemies;
        let path = &self.path;
        self.bullets.retain_mut(|bullet| {
            let target = match enemies.binary_search_by_key(&bullet.target, |enemy| enemy.id) {
                Ok(index) => enemies.get_mut(index),
                Err(_) => None,
            };
            match bullet.update(target, path) {
                BulletStatus::InFlight => true,
                BulletStatus::Hit => {
                    out_events.push(Event::BulletHit {
                        bullet: bullet.id,
                        target: bullet.target,
                        damage: bullet.damage(),
                    });
                    false
                }
                BulletStatus::Whiffed => {
                    out_events.push(Event::BulletWhiffed {
                        bullet: bullet.id,
                        target: bullet.target,
                    });
                    false
                }
            }
        });
    }

    fn place_tower(&mut self, position: FieldPoint, out_events: &mut Vec<Event>) {
        if let Err(reason) = query::placement_check(self, position) {
            out_events.push(Event::TowerPlacementRejected { position, reason });
            return;
        }
        if !self.session.try_purchase(self.rules.economy.tower_cost) {
            out_events.push(Event::TowerPlacementRejected {
                position,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }

        let tower = self.towers.insert(position, &self.rules.tower);
        out_events.push(Event::TowerPlaced { tower, position });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not valid in the current state are ignored without
/// emitting events, with the exception of tower placement, which reports
/// rejections through [`Event::TowerPlacementRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.session.phase.is_over() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SpawnEnemy => world.spawn_enemy(out_events),
        Command::ClearWave => {
            if world.session.can_clear_wave() {
                world.session.clear_wave();
                out_events.push(Event::WaveCleared {
                    wave: world.session.wave,
                });
            }
        }
        Command::StartNextWave => {
            if world.session.phase != GamePhase::WaveCooldown {
                return;
            }
            match world.session.advance_wave(&world.rules.waves) {
                WaveAdvance::Started {
                    wave,
                    enemies,
                    health_boost,
                } => out_events.push(Event::WaveStarted {
                    wave,
                    enemies,
                    health_boost,
                }),
                WaveAdvance::Won => out_events.push(Event::GameOver {
                    outcome: Outcome::Won,
                }),
            }
        }
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::CoolTower { tower } => {
            if let Some(tower) = world.towers.get_mut(tower) {
                let _ = tower.cool_down();
            }
        }
        Command::FireBullet { tower, target } => world.fire_bullet(tower, target, out_events),
        Command::AdvanceBullets => world.advance_bullets(out_events),
        Command::AdvanceExplosions => world.explosions.retain_mut(|explosion| !explosion.update()),
        Command::PlaceTower { position } => world.place_tower(position, out_events),
        Command::Restart => {
            world.reset();
            out_events.push(Event::SessionRestarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Path, World};
    use path_defence_core::{
        BulletSnapshot, EnemyView, ExplosionSnapshot, FieldPoint, GamePhase, PlacementError,
        Rules, SessionSnapshot, TowerId, TowerSnapshot, TowerView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rule set the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Route followed by every enemy.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Captures the economy and wave counters of the running session.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        world.session.snapshot()
    }

    /// Current state of the wave machine.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.session.phase
    }

    /// Number of ticks simulated since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of the enemies in play, in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(&world.path))
                .collect(),
        )
    }

    /// Captures a read-only view of the placed towers, in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Looks up a single tower.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(tower).map(|tower| tower.snapshot())
    }

    /// Snapshots of every bullet in flight, in firing order.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<BulletSnapshot> {
        world.bullets.iter().map(|bullet| bullet.snapshot()).collect()
    }

    /// Snapshots of every explosion that has not faded yet.
    #[must_use]
    pub fn explosions(world: &World) -> Vec<ExplosionSnapshot> {
        world
            .explosions
            .iter()
            .map(|explosion| explosion.snapshot())
            .collect()
    }

    /// Finds the tower under `point`.
    ///
    /// A tower qualifies when its centre lies within half its size of the
    /// point. The nearest qualifying tower wins; ties keep the earliest placed.
    #[must_use]
    pub fn tower_at(world: &World, point: FieldPoint) -> Option<TowerId> {
        let mut best: Option<(i64, TowerId)> = None;
        for tower in world.towers.iter() {
            let Some(distance) = tower.hover_distance(point) else {
                continue;
            };
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, tower.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Reports whether a tower could be placed at `point` right now.
    ///
    /// Checks run in order: session state, path clearance, then funds.
    pub fn placement_check(world: &World, point: FieldPoint) -> Result<(), PlacementError> {
        if world.session.phase.is_over() {
            return Err(PlacementError::SessionOver);
        }
        if world
            .path
            .is_on_path(point, world.rules.economy.path_clearance)
        {
            return Err(PlacementError::OnPath);
        }
        if world.session.money < world.rules.economy.tower_cost {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(())
    }
}
