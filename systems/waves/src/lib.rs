#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave system responsible for pacing spawns and wave transitions.

use path_defence_core::{Command, Event, GamePhase, SessionSnapshot, WaveRules};

/// Configuration parameters required to construct the wave system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval_ticks: u32,
    ticks_between_waves: u32,
}

impl Config {
    /// Creates a new configuration using the provided spawn and wave cadence.
    #[must_use]
    pub const fn new(spawn_interval_ticks: u32, ticks_between_waves: u32) -> Self {
        Self {
            spawn_interval_ticks,
            ticks_between_waves,
        }
    }
}

impl From<&WaveRules> for Config {
    fn from(rules: &WaveRules) -> Self {
        Self::new(rules.spawn_interval_ticks, rules.ticks_between_waves)
    }
}

/// Pure system that drives the wave state machine one tick at a time.
///
/// The spawn timer keeps counting across wave boundaries, so a wave that took
/// longer than one spawn interval to clear releases its successor's first
/// enemy on the first active tick. Only a restart rewinds both counters.
#[derive(Debug)]
pub struct Waves {
    config: Config,
    spawn_timer: u32,
    wave_cooldown: u32,
}

impl Waves {
    /// Creates a new wave system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            spawn_timer: 0,
            wave_cooldown: 0,
        }
    }

    /// Consumes the events of the current tick and the session counters to emit wave commands.
    ///
    /// Nothing is emitted unless the events contain [`Event::TimeAdvanced`].
    pub fn handle(&mut self, events: &[Event], session: &SessionSnapshot, out: &mut Vec<Command>) {
        let mut ticked = false;
        for event in events {
            match event {
                Event::SessionRestarted => self.reset(),
                Event::TimeAdvanced { .. } => ticked = true,
                _ => {}
            }
        }

        if !ticked {
            return;
        }

        match session.phase {
            GamePhase::WaveActive => self.advance_active(session, out),
            GamePhase::WaveCooldown => {
                self.wave_cooldown = self.wave_cooldown.saturating_sub(1);
                if self.wave_cooldown == 0 {
                    out.push(Command::StartNextWave);
                }
            }
            GamePhase::GameOver(_) => {}
        }
    }

    /// Ticks remaining until the next wave starts, while the session is between waves.
    #[must_use]
    pub fn next_wave_in(&self, session: &SessionSnapshot) -> Option<u32> {
        (session.phase == GamePhase::WaveCooldown).then_some(self.wave_cooldown)
    }

    /// Ticks elapsed since the last spawn.
    #[must_use]
    pub const fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    fn advance_active(&mut self, session: &SessionSnapshot, out: &mut Vec<Command>) {
        self.spawn_timer = self.spawn_timer.saturating_add(1);

        let mut spawned = session.enemies_spawned;
        if self.spawn_timer >= self.config.spawn_interval_ticks
            && spawned < session.enemies_to_spawn
        {
            out.push(Command::SpawnEnemy);
            self.spawn_timer = 0;
            spawned += 1;
        }

        if spawned == session.enemies_to_spawn && session.enemies_resolved == session.enemies_to_spawn
        {
            out.push(Command::ClearWave);
            self.wave_cooldown = self.config.ticks_between_waves;
        }
    }

    fn reset(&mut self) {
        self.spawn_timer = 0;
        self.wave_cooldown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_rewinds_both_counters() {
        let mut waves = Waves::new(Config::new(60, 180));
        waves.spawn_timer = 42;
        waves.wave_cooldown = 17;
        waves.reset();
        assert_eq!(waves.spawn_timer, 0);
        assert_eq!(waves.wave_cooldown, 0);
    }
}
