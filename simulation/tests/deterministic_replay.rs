use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use path_defence_core::{Event, FieldPoint, GamePhase};
use path_defence_simulation::Simulation;
use path_defence_system_builder::BuilderInput;
use path_defence_world::query;

#[derive(Clone, Copy, Debug)]
enum Action {
    Step(u32),
    Click(FieldPoint),
    Restart,
}

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(&scripted_actions());
    let second = replay(&scripted_actions());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { .. })));
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::TowerPlacementRejected { .. })));
    assert_eq!(
        first
            .events
            .iter()
            .filter(|event| matches!(event, Event::SessionRestarted))
            .count(),
        1
    );
}

#[test]
fn identical_scripts_reach_identical_outcomes() {
    let mut simulation = Simulation::new();
    let mut twin = Simulation::new();
    for simulation in [&mut simulation, &mut twin] {
        for x in [100, 250] {
            let _ = simulation.place_tower(FieldPoint::new(x, 190));
        }
        while !simulation.phase().is_over() {
            simulation.step();
        }
    }

    assert_eq!(simulation.session(), twin.session());
    assert!(matches!(simulation.phase(), GamePhase::GameOver(_)));
    assert_eq!(
        query::tick_index(simulation.world()),
        query::tick_index(twin.world())
    );
}

fn scripted_actions() -> Vec<Action> {
    vec![
        Action::Click(FieldPoint::new(100, 180)),
        Action::Click(FieldPoint::new(250, 140)),
        Action::Click(FieldPoint::new(250, 100)),
        Action::Step(900),
        Action::Click(FieldPoint::new(300, 290)),
        Action::Step(1_200),
        Action::Restart,
        Action::Click(FieldPoint::new(200, 190)),
        Action::Step(600),
    ]
}

fn replay(actions: &[Action]) -> ReplayOutcome {
    let mut simulation = Simulation::new();
    let mut events = Vec::new();
    let mut sessions = Vec::new();

    for action in actions {
        match *action {
            Action::Step(ticks) => {
                for _ in 0..ticks {
                    simulation.step();
                    events.extend_from_slice(simulation.last_events());
                }
            }
            Action::Click(point) => {
                let before = simulation.last_events().len();
                simulation.handle_input(BuilderInput::new(true, false, Some(point)));
                events.extend_from_slice(&simulation.last_events()[before..]);
            }
            Action::Restart => {
                let before = simulation.last_events().len();
                simulation.handle_input(BuilderInput::new(false, true, None));
                events.extend_from_slice(&simulation.last_events()[before..]);
            }
        }
        sessions.push(simulation.session());
    }

    ReplayOutcome { events, sessions }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    events: Vec<Event>,
    sessions: Vec<path_defence_core::SessionSnapshot>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
