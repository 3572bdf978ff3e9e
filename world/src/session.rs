//! Economy and wave counters of a running session.

use path_defence_core::{
    EnemyRules, GamePhase, Health, Outcome, Rules, SessionSnapshot, WaveRules,
};

/// Outcome of asking the session to move past the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WaveAdvance {
    Started {
        wave: u32,
        enemies: u32,
        health_boost: u32,
    },
    Won,
}

#[derive(Clone, Debug)]
pub(crate) struct Session {
    pub(crate) phase: GamePhase,
    pub(crate) money: u32,
    pub(crate) lives: i32,
    pub(crate) wave: u32,
    pub(crate) enemies_to_spawn: u32,
    pub(crate) enemies_spawned: u32,
    pub(crate) enemies_resolved: u32,
    pub(crate) enemies_killed: u32,
    pub(crate) health_boost: u32,
}

impl Session {
    pub(crate) fn new(rules: &Rules) -> Self {
        Self {
            phase: GamePhase::WaveActive,
            money: rules.economy.starting_money,
            lives: rules.economy.starting_lives,
            wave: 1,
            enemies_to_spawn: rules.waves.enemies_for_wave(1),
            enemies_spawned: 0,
            enemies_resolved: 0,
            enemies_killed: 0,
            health_boost: 0,
        }
    }

    pub(crate) fn can_spawn(&self) -> bool {
        self.phase == GamePhase::WaveActive && self.enemies_spawned < self.enemies_to_spawn
    }

    /// Health of an enemy spawned right now, including the wave boost.
    pub(crate) fn spawn_health(&self, rules: &EnemyRules) -> Health {
        Health::new(rules.base_health.saturating_add(self.health_boost))
    }

    pub(crate) fn record_spawn(&mut self) {
        self.enemies_spawned += 1;
    }

    pub(crate) fn record_kill(&mut self, reward: u32) {
        self.money = self.money.saturating_add(reward);
        self.enemies_killed += 1;
        self.enemies_resolved += 1;
    }

    /// Accounts for an escaped enemy and returns the remaining lives.
    pub(crate) fn record_escape(&mut self) -> i32 {
        self.lives -= 1;
        self.enemies_resolved += 1;
        self.lives
    }

    /// Deducts `cost` if the player can afford it.
    pub(crate) fn try_purchase(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn can_clear_wave(&self) -> bool {
        self.phase == GamePhase::WaveActive && self.snapshot().wave_cleared()
    }

    pub(crate) fn clear_wave(&mut self) {
        self.phase = GamePhase::WaveCooldown;
    }

    /// Starts the following wave, or ends the session once the final wave was cleared.
    pub(crate) fn advance_wave(&mut self, rules: &WaveRules) -> WaveAdvance {
        if self.wave >= rules.final_wave {
            self.phase = GamePhase::GameOver(Outcome::Won);
            return WaveAdvance::Won;
        }

        self.wave += 1;
        self.enemies_to_spawn = rules.enemies_for_wave(self.wave);
        self.enemies_spawned = 0;
        self.enemies_resolved = 0;
        self.health_boost = self.health_boost.saturating_add(rules.health_boost_per_wave);
        self.phase = GamePhase::WaveActive;
        WaveAdvance::Started {
            wave: self.wave,
            enemies: self.enemies_to_spawn,
            health_boost: self.health_boost,
        }
    }

    /// Ends the session as lost once every life is gone. Returns `true` on the transition.
    pub(crate) fn check_defeat(&mut self) -> bool {
        if self.phase.is_over() || self.lives > 0 {
            return false;
        }
        self.phase = GamePhase::GameOver(Outcome::Lost);
        true
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            money: self.money,
            lives: self.lives,
            wave: self.wave,
            enemies_to_spawn: self.enemies_to_spawn,
            enemies_spawned: self.enemies_spawned,
            enemies_resolved: self.enemies_resolved,
            enemies_killed: self.enemies_killed,
            health_boost: self.health_boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_uses_starting_economy() {
        let session = Session::new(&Rules::default());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.money, 100);
        assert_eq!(snapshot.lives, 20);
        assert_eq!(snapshot.wave, 1);
        assert_eq!(snapshot.enemies_to_spawn, 5);
        assert_eq!(snapshot.health_boost, 0);
        assert_eq!(snapshot.phase, GamePhase::WaveActive);
    }

    #[test]
    fn purchase_is_refused_without_funds() {
        let mut session = Session::new(&Rules::default());
        session.money = 29;
        assert!(!session.try_purchase(30));
        assert_eq!(session.money, 29);
        session.money = 30;
        assert!(session.try_purchase(30));
        assert_eq!(session.money, 0);
    }

    #[test]
    fn advancing_waves_raises_boost_and_resets_counters() {
        let rules = Rules::default();
        let mut session = Session::new(&rules);
        session.enemies_spawned = 5;
        session.enemies_resolved = 5;
        session.clear_wave();

        let advance = session.advance_wave(&rules.waves);
        assert_eq!(
            advance,
            WaveAdvance::Started {
                wave: 2,
                enemies: 9,
                health_boost: 10,
            }
        );
        assert_eq!(session.enemies_spawned, 0);
        assert_eq!(session.enemies_resolved, 0);
        assert_eq!(session.spawn_health(&rules.enemy), Health::new(60));
    }

    #[test]
    fn advancing_past_the_final_wave_wins() {
        let rules = Rules::default();
        let mut session = Session::new(&rules);
        session.wave = rules.waves.final_wave;
        assert_eq!(session.advance_wave(&rules.waves), WaveAdvance::Won);
        assert_eq!(session.phase, GamePhase::GameOver(Outcome::Won));
        assert_eq!(session.wave, 5);
    }

    #[test]
    fn defeat_triggers_once_lives_run_out() {
        let mut session = Session::new(&Rules::default());
        session.lives = 1;
        assert!(!session.check_defeat());
        assert_eq!(session.record_escape(), 0);
        assert!(session.check_defeat());
        assert!(!session.check_defeat(), "transition happens once");
        assert_eq!(session.phase, GamePhase::GameOver(Outcome::Lost));
    }
}
