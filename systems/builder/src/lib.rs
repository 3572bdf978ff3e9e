#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system responsible for turning player input into placement and restart commands.

use path_defence_core::{Command, Event, FieldPoint, TowerId};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player clicked the playing field on this frame.
    pub place_action: bool,
    /// Indicates whether the player requested a new session on this frame.
    pub restart_action: bool,
    /// Cursor position in field coordinates, if the cursor is over the field.
    pub cursor: Option<FieldPoint>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(place_action: bool, restart_action: bool, cursor: Option<FieldPoint>) -> Self {
        Self {
            place_action,
            restart_action,
            cursor,
        }
    }
}

/// System that translates input into commands and reports the hovered tower.
///
/// Placement requests are forwarded for every click while the session runs;
/// the world decides whether the point is legal and reports rejections itself.
/// Once the session ends only a restart request produces a command.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    session_over: bool,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session_over: false,
        }
    }

    /// Consumes world events and adapter-derived input to emit commands.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper so the system can identify the hovered tower,
    /// which is returned to the caller.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) -> Option<TowerId>
    where
        F: FnMut(FieldPoint) -> Option<TowerId>,
    {
        for event in events {
            match event {
                Event::GameOver { .. } => self.session_over = true,
                Event::SessionRestarted => self.session_over = false,
                _ => {}
            }
        }

        if input.restart_action {
            out.push(Command::Restart);
            return None;
        }

        let cursor = input.cursor?;

        if input.place_action && !self.session_over {
            out.push(Command::PlaceTower { position: cursor });
        }

        tower_at(cursor)
    }

    /// Reports whether the last observed event stream ended the session.
    #[must_use]
    pub const fn session_over(&self) -> bool {
        self.session_over
    }
}
