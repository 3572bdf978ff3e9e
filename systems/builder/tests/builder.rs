use path_defence_core::{Command, Event, FieldPoint, Outcome, TowerId};
use path_defence_system_builder::{Builder, BuilderInput};

#[test]
fn click_emits_place_command_at_cursor() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let _ = builder.handle(
        &[],
        BuilderInput {
            place_action: true,
            cursor: Some(FieldPoint::new(300, 100)),
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            position: FieldPoint::new(300, 100),
        }],
        "builder should forward every click while the session runs",
    );
}

#[test]
fn click_without_cursor_is_ignored() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let hovered = builder.handle(
        &[],
        BuilderInput::new(true, false, None),
        |_| Some(TowerId::new(1)),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(hovered, None);
}

#[test]
fn hover_reports_tower_under_cursor() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let cursor = FieldPoint::new(12, 34);
    let mut looked_up = None;

    let hovered = builder.handle(
        &[],
        BuilderInput::new(false, false, Some(cursor)),
        |point| {
            looked_up = Some(point);
            Some(TowerId::new(7))
        },
        &mut commands,
    );

    assert_eq!(looked_up, Some(cursor));
    assert_eq!(hovered, Some(TowerId::new(7)));
    assert!(commands.is_empty(), "hovering never emits commands");
}

#[test]
fn placement_is_suppressed_after_game_over() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let _ = builder.handle(
        &[Event::GameOver {
            outcome: Outcome::Lost,
        }],
        BuilderInput::new(true, false, Some(FieldPoint::new(300, 100))),
        |_| None,
        &mut commands,
    );

    assert!(builder.session_over());
    assert!(
        commands.is_empty(),
        "finished sessions accept no placements"
    );
}

#[test]
fn restart_emits_command_and_reopens_placement() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let _ = builder.handle(
        &[Event::GameOver {
            outcome: Outcome::Won,
        }],
        BuilderInput::new(true, true, Some(FieldPoint::new(300, 100))),
        |_| None,
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::Restart],
        "restart takes precedence over placement"
    );

    commands.clear();
    let _ = builder.handle(
        &[Event::SessionRestarted],
        BuilderInput::new(true, false, Some(FieldPoint::new(300, 100))),
        |_| None,
        &mut commands,
    );
    assert!(!builder.session_over());
    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            position: FieldPoint::new(300, 100),
        }]
    );
}
