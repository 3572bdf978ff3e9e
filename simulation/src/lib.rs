#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-tick orchestration of the Path Defence world and its systems.
//!
//! [`Simulation::step`] runs exactly one tick in a fixed order: the wave
//! machine, enemy movement and resolution, tower targeting and combat,
//! bullets, then explosions. Player actions are applied between ticks.

use path_defence_core::{
    Command, Event, FieldPoint, GamePhase, PlacementError, Rules, SessionSnapshot, TowerId,
    TowerTarget,
};
use path_defence_system_builder::{Builder, BuilderInput};
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_system_waves::{Config as WavesConfig, Waves};
use path_defence_world::{self as world, query, Path, World};
use tracing::{debug, info, trace};

/// Owns the world and every system, advancing them one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: Waves,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    journal: Vec<Event>,
    input_events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    hovered: Option<TowerId>,
}

impl Simulation {
    /// Creates a simulation on the standard path with the standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(Rules::default(), Path::standard())
    }

    /// Creates a simulation using the provided rules and enemy route.
    #[must_use]
    pub fn with_layout(rules: Rules, path: Path) -> Self {
        Self {
            waves: Waves::new(WavesConfig::from(&rules.waves)),
            world: World::with_layout(rules, path),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder: Builder::new(),
            journal: Vec::new(),
            input_events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            hovered: None,
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Economy and wave counters of the running session.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        query::session(&self.world)
    }

    /// Current state of the wave machine.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Events emitted since the most recent tick started, including player
    /// actions applied after it.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.journal
    }

    /// Advances the simulation by one fixed tick.
    ///
    /// Does nothing once the session has ended.
    pub fn step(&mut self) {
        self.journal.clear();
        if self.phase().is_over() {
            return;
        }

        let start = self.journal.len();
        self.apply(Command::Tick);
        let session = self.session();
        self.commands.clear();
        self.waves
            .handle(&self.journal[start..], &session, &mut self.commands);
        self.apply_pending_commands();

        self.apply(Command::AdvanceEnemies);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.commands.clear();
        self.combat.handle(&towers, &self.targets, &mut self.commands);
        self.apply_pending_commands();

        self.apply(Command::AdvanceBullets);
        self.apply(Command::AdvanceExplosions);
    }

    /// Attempts to place a tower centred at `position`.
    pub fn place_tower(&mut self, position: FieldPoint) -> Result<TowerId, PlacementError> {
        let start = self.journal.len();
        self.apply(Command::PlaceTower { position });
        self.journal[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::SessionOver))
    }

    /// Finds the tower under `point`, preferring the nearest one.
    #[must_use]
    pub fn hover(&self, point: FieldPoint) -> Option<TowerId> {
        query::tower_at(&self.world, point)
    }

    /// Tower selected by the most recent [`Simulation::handle_input`] call.
    #[must_use]
    pub fn hovered(&self) -> Option<TowerId> {
        self.hovered
    }

    /// Discards the current session and starts a fresh one.
    pub fn restart(&mut self) {
        let start = self.journal.len();
        self.apply(Command::Restart);
        let session = self.session();
        self.commands.clear();
        self.waves
            .handle(&self.journal[start..], &session, &mut self.commands);
        self.hovered = None;
    }

    /// Ticks remaining until the next wave starts, while the session is between waves.
    #[must_use]
    pub fn next_wave_in(&self) -> Option<u32> {
        self.waves.next_wave_in(&self.session())
    }

    /// Applies one frame of player input between ticks.
    pub fn handle_input(&mut self, input: BuilderInput) {
        let mut commands = Vec::new();
        let world = &self.world;
        self.hovered = self.builder.handle(
            &self.input_events,
            input,
            |point| query::tower_at(world, point),
            &mut commands,
        );
        self.input_events.clear();

        for command in commands {
            match command {
                Command::Restart => self.restart(),
                Command::PlaceTower { position } => {
                    if let Err(reason) = self.place_tower(position) {
                        trace!(?reason, "click did not place a tower");
                    }
                }
                other => self.apply(other),
            }
        }
    }

    fn apply_pending_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            self.apply(command);
        }
        self.commands = commands;
    }

    fn apply(&mut self, command: Command) {
        let start = self.journal.len();
        world::apply(&mut self.world, command, &mut self.journal);
        for event in &self.journal[start..] {
            log_event(event);
        }
        self.input_events.extend(
            self.journal[start..]
                .iter()
                .filter(|event| {
                    matches!(event, Event::GameOver { .. } | Event::SessionRestarted)
                })
                .cloned(),
        );
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

fn log_event(event: &Event) {
    match event {
        Event::EnemySpawned { enemy, max_health } => {
            debug!(enemy = enemy.get(), max_health = max_health.get(), "enemy spawned");
        }
        Event::EnemyKilled {
            enemy,
            position,
            reward,
        } => {
            debug!(
                enemy = enemy.get(),
                x = position.x(),
                y = position.y(),
                reward,
                "enemy killed"
            );
        }
        Event::EnemyEscaped { enemy, lives } => {
            debug!(enemy = enemy.get(), lives, "enemy escaped");
        }
        Event::TowerPlaced { tower, position } => {
            debug!(
                tower = tower.get(),
                x = position.x(),
                y = position.y(),
                "tower placed"
            );
        }
        Event::TowerPlacementRejected { position, reason } => {
            debug!(x = position.x(), y = position.y(), ?reason, "tower placement rejected");
        }
        Event::WaveCleared { wave } => info!(wave, "wave cleared"),
        Event::WaveStarted {
            wave,
            enemies,
            health_boost,
        } => info!(wave, enemies, health_boost, "wave started"),
        Event::GameOver { outcome } => info!(?outcome, "game over"),
        Event::SessionRestarted => info!("session restarted"),
        Event::BulletFired { .. }
        | Event::BulletHit { .. }
        | Event::BulletWhiffed { .. }
        | Event::TimeAdvanced { .. } => trace!(?event, "world event"),
    }
}
