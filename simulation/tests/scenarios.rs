use path_defence_core::{
    EconomyRules, EnemyId, Event, FieldPoint, GamePhase, Health, Outcome, PlacementError, Rules,
    TowerId,
};
use path_defence_simulation::Simulation;
use path_defence_world::{query, Path};
use std::collections::HashMap;

fn short_path() -> Path {
    Path::from_points(vec![FieldPoint::new(0, 100), FieldPoint::new(100, 100)])
        .expect("valid path")
}

fn generous_rules() -> Rules {
    Rules {
        economy: EconomyRules {
            starting_lives: 1_000,
            ..Rules::default().economy
        },
        ..Rules::default()
    }
}

/// Steps until `predicate` matches an event of the tick, returning the tick index.
fn step_until<F>(simulation: &mut Simulation, limit: u32, mut predicate: F) -> Option<u64>
where
    F: FnMut(&Event) -> bool,
{
    for _ in 0..limit {
        simulation.step();
        if simulation.last_events().iter().any(&mut predicate) {
            return Some(query::tick_index(simulation.world()));
        }
    }
    None
}

#[test]
fn placement_costs_money_and_path_points_are_rejected() {
    let mut simulation = Simulation::new();

    assert!(simulation.place_tower(FieldPoint::new(300, 100)).is_ok());
    assert_eq!(simulation.session().money, 70);

    assert_eq!(
        simulation.place_tower(FieldPoint::new(150, 140)),
        Err(PlacementError::OnPath)
    );
    assert_eq!(simulation.session().money, 70);
    assert_eq!(query::tower_view(simulation.world()).len(), 1);
}

#[test]
fn funds_run_out_after_three_towers() {
    let mut simulation = Simulation::new();
    for x in [300, 340, 380] {
        assert!(simulation.place_tower(FieldPoint::new(x, 60)).is_ok());
    }
    assert_eq!(
        simulation.place_tower(FieldPoint::new(420, 60)),
        Err(PlacementError::InsufficientFunds)
    );
    assert_eq!(simulation.session().money, 10);
}

#[test]
fn five_hits_kill_an_enemy_and_pay_out_on_resolution() {
    let mut simulation = Simulation::new();
    let _ = simulation
        .place_tower(FieldPoint::new(100, 180))
        .expect("legal placement");
    let _ = simulation
        .place_tower(FieldPoint::new(250, 100))
        .expect("legal placement");
    let first = EnemyId::new(0);

    let mut hits = Vec::new();
    let mut kill = None;
    for _ in 0..3_000 {
        let money_before = simulation.session().money;
        simulation.step();
        let tick = query::tick_index(simulation.world());
        for event in simulation.last_events() {
            match event {
                Event::BulletHit { target, damage, .. } if *target == first => {
                    assert_eq!(*damage, 10);
                    hits.push(tick);
                }
                Event::EnemyKilled {
                    enemy,
                    position,
                    reward,
                } if *enemy == first => {
                    kill = Some((tick, *position, *reward, money_before));
                }
                _ => {}
            }
        }
        if kill.is_some() {
            break;
        }
    }

    let (kill_tick, position, reward, money_before) = kill.expect("first enemy was killed");
    assert_eq!(hits.len(), 5, "50 health takes exactly five hits of 10");
    assert_eq!(hits.last().copied(), Some(kill_tick - 1));
    assert_eq!(reward, 10);
    assert!(simulation.session().money >= money_before + 10);
    assert_eq!(simulation.session().enemies_killed, 1);

    let explosions = query::explosions(simulation.world());
    assert!(explosions
        .iter()
        .any(|explosion| explosion.position == position.to_vec2()));
    assert!(query::enemy_view(simulation.world()).get(first).is_none());
}

#[test]
fn unhindered_enemy_escapes_without_explosion() {
    let mut simulation = Simulation::new();
    let escape_tick = step_until(&mut simulation, 2_000, |event| {
        matches!(event, Event::EnemyEscaped { .. })
    })
    .expect("enemy escaped");

    assert_eq!(escape_tick, 60 + 8 * 200 - 1);
    assert_eq!(simulation.session().lives, 19);
    assert_eq!(simulation.session().enemies_killed, 0);
    assert!(query::explosions(simulation.world()).is_empty());
    assert!(simulation.last_events().contains(&Event::EnemyEscaped {
        enemy: EnemyId::new(0),
        lives: 19,
    }));
}

#[test]
fn enemies_keep_full_health_without_towers() {
    let mut simulation = Simulation::new();
    for _ in 0..500 {
        simulation.step();
        for enemy in query::enemy_view(simulation.world()).iter() {
            assert_eq!(enemy.health, enemy.max_health);
            assert!(!enemy.reached_end);
        }
    }
}

#[test]
fn damaged_enemies_never_heal_and_stay_terminal() {
    let mut simulation = Simulation::new();
    for point in [
        FieldPoint::new(100, 180),
        FieldPoint::new(250, 100),
        FieldPoint::new(300, 100),
    ] {
        let _ = simulation.place_tower(point).expect("legal placement");
    }

    let mut observed: HashMap<EnemyId, (Health, bool)> = HashMap::new();
    let mut saw_damage = false;
    let mut saw_terminal = false;
    for _ in 0..3_000 {
        simulation.step();
        for enemy in query::enemy_view(simulation.world()).iter() {
            if let Some(&(health, reached_end)) = observed.get(&enemy.id) {
                assert!(enemy.health <= health, "{:?} regained health", enemy.id);
                assert!(
                    enemy.reached_end || !reached_end,
                    "{:?} left its terminal state",
                    enemy.id
                );
            }
            saw_damage |= enemy.health < enemy.max_health;
            saw_terminal |= enemy.reached_end;
            let _ = observed.insert(enemy.id, (enemy.health, enemy.reached_end));
        }
    }

    assert!(saw_damage);
    assert!(saw_terminal);
    assert!(simulation.session().enemies_killed > 0);
}

#[test]
fn next_wave_only_starts_after_every_enemy_resolved() {
    let mut simulation = Simulation::with_layout(generous_rules(), short_path());
    let waves = Rules::default().waves;
    let mut spawned = 0;
    let mut resolved = 0;
    let mut wave = 1;

    for _ in 0..20_000 {
        simulation.step();
        for event in simulation.last_events() {
            match event {
                Event::EnemySpawned { .. } => spawned += 1,
                Event::EnemyKilled { .. } | Event::EnemyEscaped { .. } => resolved += 1,
                Event::WaveCleared { wave: cleared } => {
                    assert_eq!(*cleared, wave);
                    assert_eq!(spawned, waves.enemies_for_wave(wave));
                    assert_eq!(resolved, waves.enemies_for_wave(wave));
                }
                Event::WaveStarted { wave: started, .. } => {
                    assert_eq!(*started, wave + 1);
                    wave = *started;
                    spawned = 0;
                    resolved = 0;
                }
                _ => {}
            }
        }
        if simulation.phase().is_over() {
            break;
        }
    }

    assert_eq!(simulation.phase(), GamePhase::GameOver(Outcome::Won));
}

#[test]
fn clearing_the_final_wave_wins_instead_of_starting_wave_six() {
    let mut simulation = Simulation::with_layout(generous_rules(), short_path());
    let mut started = Vec::new();
    let outcome_tick = step_until(&mut simulation, 20_000, |event| {
        if let Event::WaveStarted { wave, .. } = event {
            started.push(*wave);
        }
        matches!(event, Event::GameOver { .. })
    })
    .expect("session ended");

    assert_eq!(started, vec![2, 3, 4, 5]);
    assert_eq!(simulation.phase(), GamePhase::GameOver(Outcome::Won));
    let session = simulation.session();
    assert_eq!(session.wave, 5);
    assert_eq!(session.lives, 1_000 - (5 + 9 + 11 + 13 + 15));

    simulation.step();
    assert!(simulation.last_events().is_empty(), "finished sessions stop ticking");
    assert_eq!(query::tick_index(simulation.world()), outcome_tick);
}

#[test]
fn health_boost_grows_per_wave_and_resets_on_restart() {
    let mut simulation = Simulation::with_layout(generous_rules(), short_path());
    let mut wave = 1;
    let mut checked_waves = Vec::new();

    for _ in 0..20_000 {
        simulation.step();
        for event in simulation.last_events() {
            match event {
                Event::WaveStarted { wave: started, .. } => wave = *started,
                Event::EnemySpawned { max_health, .. } => {
                    assert_eq!(*max_health, Health::new(50 + 10 * (wave - 1)));
                    if !checked_waves.contains(&wave) {
                        checked_waves.push(wave);
                    }
                }
                _ => {}
            }
        }
        if simulation.phase().is_over() {
            break;
        }
    }
    assert_eq!(checked_waves, vec![1, 2, 3, 4, 5]);
    assert_eq!(simulation.session().health_boost, 40);

    simulation.restart();
    assert_eq!(simulation.session().health_boost, 0);
    let spawned = step_until(&mut simulation, 60, |event| {
        matches!(event, Event::EnemySpawned { .. })
    });
    assert_eq!(spawned, Some(60));
    assert!(simulation.last_events().contains(&Event::EnemySpawned {
        enemy: EnemyId::new(0),
        max_health: Health::new(50),
    }));
}

#[test]
fn running_out_of_lives_loses_and_freezes_the_session() {
    let mut simulation = Simulation::new();
    let over_tick = step_until(&mut simulation, 20_000, |event| {
        matches!(event, Event::GameOver { .. })
    })
    .expect("session ended");

    assert_eq!(simulation.phase(), GamePhase::GameOver(Outcome::Lost));
    assert!(simulation.session().lives <= 0);
    assert!(simulation.last_events().contains(&Event::GameOver {
        outcome: Outcome::Lost,
    }));

    let enemies_before = query::enemy_view(simulation.world()).into_vec();
    simulation.step();
    assert_eq!(query::tick_index(simulation.world()), over_tick);
    assert_eq!(query::enemy_view(simulation.world()).into_vec(), enemies_before);
}

#[test]
fn ready_tower_fires_once_then_cools_down_for_fire_rate_ticks() {
    let mut simulation = Simulation::new();
    let tower = simulation
        .place_tower(FieldPoint::new(150, 180))
        .expect("legal placement");

    let mut fire_ticks = Vec::new();
    for _ in 0..400 {
        simulation.step();
        let tick = query::tick_index(simulation.world());
        let fired = simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::BulletFired { tower: t, .. } if *t == tower))
            .count();
        assert!(fired <= 1, "a tower fires at most once per tick");
        if fired == 1 {
            fire_ticks.push(tick);
            let snapshot = query::tower(simulation.world(), tower).expect("tower exists");
            assert_eq!(snapshot.cooldown, 40);
        }
    }

    assert!(fire_ticks.len() >= 2, "tower engaged the first wave");
    assert_eq!(fire_ticks[0], 60, "fires on the tick the first enemy appears");
    for pair in fire_ticks.windows(2) {
        assert!(pair[1] - pair[0] >= 41, "cooling towers never fire");
    }
    assert!(fire_ticks.windows(2).any(|pair| pair[1] - pair[0] == 41));
}

#[test]
fn restart_reinitialises_the_session() {
    let mut simulation = Simulation::new();
    let _ = simulation
        .place_tower(FieldPoint::new(150, 180))
        .expect("legal placement");
    for _ in 0..300 {
        simulation.step();
    }
    assert!(!query::enemy_view(simulation.world()).is_empty());

    simulation.restart();

    let session = simulation.session();
    assert_eq!(session.money, 100);
    assert_eq!(session.lives, 20);
    assert_eq!(session.wave, 1);
    assert_eq!(session.enemies_spawned, 0);
    assert_eq!(session.phase, GamePhase::WaveActive);
    assert!(query::enemy_view(simulation.world()).is_empty());
    assert!(query::tower_view(simulation.world()).is_empty());
    assert!(query::bullets(simulation.world()).is_empty());
    assert_eq!(simulation.hover(FieldPoint::new(150, 180)), None);
    assert_eq!(
        simulation.place_tower(FieldPoint::new(150, 180)),
        Ok(TowerId::new(0)),
        "identifiers restart from zero"
    );
}
