#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Number of simulation ticks executed per second of wall-clock time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Advances the simulation clock by a single fixed tick.
    Tick,
    /// Requests that a new enemy enters the path at its first waypoint.
    SpawnEnemy,
    /// Marks the active wave as cleared, entering the inter-wave cooldown.
    ClearWave,
    /// Starts the next wave, or ends the session as won after the final wave.
    StartNextWave,
    /// Moves every enemy and resolves those that were killed or escaped.
    AdvanceEnemies,
    /// Counts down the cooldown of a tower that is not ready to fire.
    CoolTower {
        /// Tower whose cooldown should decrease.
        tower: TowerId,
    },
    /// Requests that a ready tower fires a bullet at the provided enemy.
    FireBullet {
        /// Tower firing the bullet.
        tower: TowerId,
        /// Enemy the bullet will pursue.
        target: EnemyId,
    },
    /// Moves every bullet toward its target, resolving hits and whiffs.
    AdvanceBullets,
    /// Grows and fades every explosion, removing finished ones.
    AdvanceExplosions,
    /// Requests placement of a tower centred at the provided point.
    PlaceTower {
        /// Centre of the requested tower in field coordinates.
        position: FieldPoint,
    },
    /// Discards the current session and starts a fresh one.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started, counted from session start.
        tick: u64,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Maximum health fixed for the enemy at spawn time.
        max_health: Health,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Last position of the enemy, where its explosion appears.
        position: FieldPoint,
        /// Money awarded for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the path alive.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Lives remaining after the escape was accounted for.
        lives: i32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Centre of the tower in field coordinates.
        position: FieldPoint,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Position provided in the placement request.
        position: FieldPoint,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower released a bullet.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Tower that fired the bullet.
        tower: TowerId,
        /// Enemy pursued by the bullet.
        target: EnemyId,
    },
    /// Reports that a bullet reached its target and applied damage.
    BulletHit {
        /// Identifier of the bullet that hit.
        bullet: BulletId,
        /// Enemy that received the damage.
        target: EnemyId,
        /// Damage applied to the enemy.
        damage: u32,
    },
    /// Reports that a bullet lost its target before impact.
    BulletWhiffed {
        /// Identifier of the discarded bullet.
        bullet: BulletId,
        /// Enemy the bullet was pursuing.
        target: EnemyId,
    },
    /// Announces that every enemy of the wave left play.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
    },
    /// Announces that a new wave started.
    WaveStarted {
        /// Number of the wave that started, counted from one.
        wave: u32,
        /// Number of enemies that will spawn during the wave.
        enemies: u32,
        /// Health added to every enemy spawned from now on.
        health_boost: u32,
    },
    /// Announces that the session reached its terminal state.
    GameOver {
        /// Whether the player won or lost.
        outcome: Outcome,
    },
    /// Confirms that the world discarded the previous session.
    SessionRestarted,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the bullet identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer position on the playing field, measured in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    x: i32,
    y: i32,
}

impl FieldPoint {
    /// Creates a new field point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Squared Euclidean distance between two points, computed without rounding.
    #[must_use]
    pub fn distance_squared(self, other: FieldPoint) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }

    /// Converts the point into continuous coordinates.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Health pool of an enemy expressed in whole points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Health value representing a destroyed enemy.
    pub const ZERO: Self = Self(0);

    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the number of remaining health points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no health points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }

    /// Fraction of `maximum` that remains, clamped to `0.0..=1.0`.
    ///
    /// A zero maximum reports an empty bar.
    #[must_use]
    pub fn fraction_of(self, maximum: Health) -> f32 {
        if maximum.0 == 0 {
            return 0.0;
        }
        (self.0 as f32 / maximum.0 as f32).clamp(0.0, 1.0)
    }
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every wave was survived.
    Won,
    /// The player ran out of lives.
    Lost,
}

/// State of the wave machine driving the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Enemies of the current wave are spawning or still in play.
    WaveActive,
    /// The wave was cleared and the next one is counting down.
    WaveCooldown,
    /// The session ended; only a restart leaves this state.
    GameOver(Outcome),
}

impl GamePhase {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }

    /// Returns the terminal outcome, if the session has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::GameOver(outcome) => Some(*outcome),
            Self::WaveActive | Self::WaveCooldown => None,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested point lies too close to a path segment.
    OnPath,
    /// The player cannot afford another tower.
    InsufficientFunds,
    /// The session already ended.
    SessionOver,
}

/// Money, lives and placement rules of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EconomyRules {
    /// Money available when a session starts.
    pub starting_money: u32,
    /// Lives available when a session starts.
    pub starting_lives: i32,
    /// Money deducted for every placed tower.
    pub tower_cost: u32,
    /// Money awarded for every killed enemy.
    pub kill_reward: u32,
    /// Towers closer than this distance to any path segment are rejected.
    pub path_clearance: f64,
}

/// Pacing of waves and spawns, measured in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveRules {
    /// Ticks between two consecutive spawns within a wave.
    pub spawn_interval_ticks: u32,
    /// Ticks between clearing a wave and starting the next one.
    pub ticks_between_waves: u32,
    /// Enemies spawned during the first wave.
    pub first_wave_enemies: u32,
    /// Constant part of the enemy count for later waves.
    pub base_enemies: u32,
    /// Enemies added per wave number for later waves.
    pub enemies_per_wave: u32,
    /// Last wave of the session; clearing it wins the game.
    pub final_wave: u32,
    /// Health added to newly spawned enemies at every wave start after the first.
    pub health_boost_per_wave: u32,
}

impl WaveRules {
    /// Number of enemies spawned during the provided wave.
    ///
    /// The first wave uses a fixed count; later waves scale linearly with the
    /// wave number.
    #[must_use]
    pub const fn enemies_for_wave(&self, wave: u32) -> u32 {
        if wave <= 1 {
            self.first_wave_enemies
        } else {
            self.base_enemies + self.enemies_per_wave * wave
        }
    }
}

/// Enemy attributes shared by every spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyRules {
    /// Health of an enemy before the wave boost is applied.
    pub base_health: u32,
    /// Ticks an enemy needs to traverse one path segment.
    pub ticks_per_segment: u32,
    /// Visual diameter of an enemy.
    pub size: u32,
}

/// Tower attributes shared by every placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerRules {
    /// Visual diameter of a tower, also used for hover hit-testing.
    pub size: u32,
    /// Targeting radius measured from the tower centre.
    pub range: u32,
    /// Ticks a tower waits after firing before it becomes ready again.
    pub fire_rate: u32,
}

/// Bullet attributes shared by every fired bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletRules {
    /// Distance travelled per tick.
    pub speed: f32,
    /// Visual diameter of a bullet.
    pub size: u32,
    /// Damage applied on impact.
    pub damage: u32,
    /// A bullet closer than this distance to its target hits.
    pub hit_radius: f32,
}

/// Explosion animation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplosionRules {
    /// Radius growth per tick.
    pub radius_growth: i32,
    /// Opacity of a freshly spawned explosion, in `0..=255`.
    pub initial_alpha: i32,
    /// Opacity lost per tick.
    pub alpha_decay: i32,
}

/// Complete rule set of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    /// Money, lives and placement rules.
    pub economy: EconomyRules,
    /// Wave pacing.
    pub waves: WaveRules,
    /// Enemy attributes.
    pub enemy: EnemyRules,
    /// Tower attributes.
    pub tower: TowerRules,
    /// Bullet attributes.
    pub bullet: BulletRules,
    /// Explosion animation.
    pub explosion: ExplosionRules,
}

impl Rules {
    /// The standard rule set.
    pub const STANDARD: Self = Self {
        economy: EconomyRules {
            starting_money: 100,
            starting_lives: 20,
            tower_cost: 30,
            kill_reward: 10,
            path_clearance: 20.0,
        },
        waves: WaveRules {
            spawn_interval_ticks: 60,
            ticks_between_waves: 180,
            first_wave_enemies: 5,
            base_enemies: 5,
            enemies_per_wave: 2,
            final_wave: 5,
            health_boost_per_wave: 10,
        },
        enemy: EnemyRules {
            base_health: 50,
            ticks_per_segment: 200,
            size: 20,
        },
        tower: TowerRules {
            size: 30,
            range: 120,
            fire_rate: 40,
        },
        bullet: BulletRules {
            speed: 4.0,
            size: 8,
            damage: 10,
            hit_radius: 5.0,
        },
        explosion: ExplosionRules {
            radius_growth: 2,
            initial_alpha: 255,
            alpha_decay: 10,
        },
    };
}

impl Default for Rules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position on the path.
    pub position: FieldPoint,
    /// Remaining health.
    pub health: Health,
    /// Health the enemy spawned with.
    pub max_health: Health,
    /// Whether the enemy was killed or escaped and awaits removal.
    pub reached_end: bool,
}

/// Read-only snapshot describing all enemies in play.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Snapshots are ordered by identifier, which matches spawn order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Centre of the tower.
    pub position: FieldPoint,
    /// Visual diameter of the tower.
    pub size: u32,
    /// Targeting radius.
    pub range: u32,
    /// Ticks the tower waits between shots.
    pub fire_rate: u32,
    /// Ticks remaining until the tower may fire; zero means ready.
    pub cooldown: u32,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire on this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown == 0
    }
}

/// Read-only snapshot describing all towers placed on the field.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier allocated to the bullet.
    pub id: BulletId,
    /// Current position of the bullet.
    pub position: Vec2,
    /// Visual diameter of the bullet.
    pub size: u32,
    /// Enemy pursued by the bullet.
    pub target: EnemyId,
}

/// Immutable representation of a fading explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSnapshot {
    /// Centre of the explosion.
    pub position: Vec2,
    /// Current radius.
    pub radius: i32,
    /// Current opacity in `0..=255`.
    pub alpha: u8,
}

/// Economy and wave counters of the running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    /// Current state of the wave machine.
    pub phase: GamePhase,
    /// Money available for towers.
    pub money: u32,
    /// Lives remaining; the session is lost at zero or below.
    pub lives: i32,
    /// Current wave number, counted from one.
    pub wave: u32,
    /// Enemies the current wave spawns in total.
    pub enemies_to_spawn: u32,
    /// Enemies of the current wave spawned so far.
    pub enemies_spawned: u32,
    /// Enemies of the current wave that left play, killed or escaped.
    pub enemies_resolved: u32,
    /// Enemies killed over the whole session.
    pub enemies_killed: u32,
    /// Health added to enemies spawned from now on.
    pub health_boost: u32,
}

impl SessionSnapshot {
    /// Reports whether every enemy of the wave spawned and left play.
    #[must_use]
    pub const fn wave_cleared(&self) -> bool {
        self.enemies_spawned == self.enemies_to_spawn
            && self.enemies_resolved == self.enemies_to_spawn
    }
}

/// Target assignment produced by the tower targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected by the tower.
    pub enemy: EnemyId,
    /// Centre of the tower.
    pub tower_position: FieldPoint,
    /// Position of the enemy when it was selected.
    pub enemy_position: FieldPoint,
}
