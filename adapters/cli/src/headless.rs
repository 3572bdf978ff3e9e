//! Windowless runner used for scripted sessions and quick balance checks.

use path_defence_core::{FieldPoint, Outcome};
use path_defence_rendering::FieldPresentation;
use path_defence_simulation::Simulation;
use path_defence_world::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, warn};

/// Random points tried per tick when looking for a legal autoplace spot.
const AUTOPLACE_ATTEMPTS: u32 = 32;

/// Parameters of a headless session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessOptions {
    pub(crate) ticks: u64,
    pub(crate) towers: Vec<FieldPoint>,
    pub(crate) autoplace: bool,
    pub(crate) seed: u64,
}

/// Counters reported once a headless session stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    pub(crate) outcome: Option<Outcome>,
    pub(crate) ticks: u64,
    pub(crate) wave: u32,
    pub(crate) money: u32,
    pub(crate) lives: i32,
    pub(crate) kills: u32,
    pub(crate) towers: usize,
}

impl fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.outcome {
            Some(Outcome::Won) => "won",
            Some(Outcome::Lost) => "lost",
            None => "running",
        };
        write!(
            f,
            "outcome={outcome} ticks={} wave={} money={} lives={} kills={} towers={}",
            self.ticks, self.wave, self.money, self.lives, self.kills, self.towers
        )
    }
}

/// Runs a session without a window until `ticks` elapse or the session ends.
pub(crate) fn run(options: &HeadlessOptions) -> HeadlessSummary {
    let mut simulation = Simulation::new();
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);

    for &point in &options.towers {
        if let Err(reason) = simulation.place_tower(point) {
            warn!(x = point.x(), y = point.y(), ?reason, "requested tower was not placed");
        }
    }

    let mut ticks = 0;
    while ticks < options.ticks && !simulation.phase().is_over() {
        if options.autoplace {
            autoplace(&mut simulation, &mut rng);
        }
        simulation.step();
        ticks += 1;
    }

    let session = simulation.session();
    HeadlessSummary {
        outcome: session.phase.outcome(),
        ticks,
        wave: session.wave,
        money: session.money,
        lives: session.lives,
        kills: session.enemies_killed,
        towers: query::tower_view(simulation.world()).len(),
    }
}

/// Places towers at random legal points while the player can afford them.
fn autoplace(simulation: &mut Simulation, rng: &mut ChaCha8Rng) {
    let cost = query::rules(simulation.world()).economy.tower_cost;
    while simulation.session().money >= cost {
        let Some(point) = random_legal_point(simulation, rng) else {
            return;
        };
        match simulation.place_tower(point) {
            Ok(tower) => {
                debug!(
                    tower = tower.get(),
                    x = point.x(),
                    y = point.y(),
                    "autoplaced tower"
                );
            }
            Err(_) => return,
        }
    }
}

fn random_legal_point(simulation: &Simulation, rng: &mut ChaCha8Rng) -> Option<FieldPoint> {
    let width = FieldPresentation::STANDARD_WIDTH as i32;
    let height = FieldPresentation::STANDARD_HEIGHT as i32;
    (0..AUTOPLACE_ATTEMPTS)
        .map(|_| FieldPoint::new(rng.gen_range(0..width), rng.gen_range(0..height)))
        .find(|&point| query::placement_check(simulation.world(), point).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ticks: u64) -> HeadlessOptions {
        HeadlessOptions {
            ticks,
            towers: Vec::new(),
            autoplace: false,
            seed: 7,
        }
    }

    #[test]
    fn stops_after_the_requested_ticks() {
        let summary = run(&options(120));

        assert_eq!(summary.ticks, 120);
        assert_eq!(summary.outcome, None);
        assert_eq!(summary.wave, 1);
        assert_eq!(summary.money, 100);
        assert_eq!(
            summary.to_string(),
            "outcome=running ticks=120 wave=1 money=100 lives=20 kills=0 towers=0"
        );
    }

    #[test]
    fn undefended_sessions_end_early_in_defeat() {
        let summary = run(&options(1_000_000));

        assert_eq!(summary.outcome, Some(Outcome::Lost));
        assert!(summary.ticks < 1_000_000);
        assert!(summary.lives <= 0);
    }

    #[test]
    fn requested_towers_are_placed_before_the_first_tick() {
        let summary = run(&HeadlessOptions {
            towers: vec![
                FieldPoint::new(100, 180),
                FieldPoint::new(150, 140),
                FieldPoint::new(250, 100),
            ],
            ..options(0)
        });

        assert_eq!(summary.towers, 2, "the on-path request is rejected");
        assert_eq!(summary.money, 40);
    }

    #[test]
    fn autoplace_spends_money_and_is_reproducible() {
        let first = run(&HeadlessOptions {
            autoplace: true,
            ..options(600)
        });
        let second = run(&HeadlessOptions {
            autoplace: true,
            ..options(600)
        });

        assert_eq!(first, second);
        assert!(first.towers >= 3);
        assert!(first.money < 30 + 10 * first.kills);
    }
}
