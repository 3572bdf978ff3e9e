#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.
//!
//! Everything here is expressed in field units, the same coordinate space the
//! simulation uses. Backends scale the field to their window.

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{FieldPoint, Outcome, TowerId};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba_u8(red, green, blue, 255)
    }

    /// Creates a color from byte RGBA values.
    #[must_use]
    pub const fn from_rgba_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Cursor position in field coordinates, absent while the cursor is off the field.
    pub cursor_field_space: Option<FieldPoint>,
    /// Whether the player clicked the field on this frame.
    pub place_action: bool,
    /// Whether the player asked for a new session on this frame.
    pub restart_action: bool,
    /// Whether the player asked to close the window.
    pub quit_requested: bool,
}

/// Dimensions and ground color of the playing field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Width of the field in field units.
    pub width: u32,
    /// Height of the field in field units.
    pub height: u32,
    /// Ground color drawn beneath everything else.
    pub ground: Color,
}

impl FieldPresentation {
    /// Width of the standard field.
    pub const STANDARD_WIDTH: u32 = 800;
    /// Height of the standard field.
    pub const STANDARD_HEIGHT: u32 = 600;

    /// Creates a field descriptor, rejecting empty dimensions.
    pub fn new(width: u32, height: u32, ground: Color) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyField { width, height });
        }

        Ok(Self {
            width,
            height,
            ground,
        })
    }

    /// Size of the field as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Converts a position expressed in field units into a field point.
    ///
    /// Returns `None` when the position lies outside the field.
    #[must_use]
    pub fn field_point(&self, position: Vec2) -> Option<FieldPoint> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        if position.x >= self.width as f32 || position.y >= self.height as f32 {
            return None;
        }

        Some(FieldPoint::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
        ))
    }
}

/// Polyline followed by enemies.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoints in travel order.
    pub points: Vec<Vec2>,
    /// Width of the drawn road.
    pub width: f32,
    /// Color of the road surface.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a new path descriptor.
    #[must_use]
    pub fn new(points: Vec<Vec2>, width: f32, color: Color) -> Self {
        Self {
            points,
            width,
            color,
        }
    }

    /// Iterator over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Enemy drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Centre of the enemy.
    pub position: Vec2,
    /// Diameter of the enemy.
    pub size: f32,
    /// Remaining health as a fraction of its maximum, in `0.0..=1.0`.
    pub health_fraction: f32,
}

impl SceneEnemy {
    /// Creates a new enemy descriptor.
    #[must_use]
    pub fn new(position: Vec2, size: f32, health_fraction: f32) -> Self {
        Self {
            position,
            size,
            health_fraction: health_fraction.clamp(0.0, 1.0),
        }
    }
}

/// Tower drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Centre of the tower.
    pub position: Vec2,
    /// Diameter of the tower.
    pub size: f32,
    /// Targeting radius, shown while the tower is hovered.
    pub range: f32,
    /// Whether the cursor rests on this tower.
    pub hovered: bool,
}

impl SceneTower {
    /// Creates a new tower descriptor.
    #[must_use]
    pub const fn new(id: TowerId, position: Vec2, size: f32, range: f32, hovered: bool) -> Self {
        Self {
            id,
            position,
            size,
            range,
            hovered,
        }
    }
}

/// Bullet drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBullet {
    /// Centre of the bullet.
    pub position: Vec2,
    /// Diameter of the bullet.
    pub size: f32,
}

impl SceneBullet {
    /// Creates a new bullet descriptor.
    #[must_use]
    pub const fn new(position: Vec2, size: f32) -> Self {
        Self { position, size }
    }
}

/// Fading explosion drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneExplosion {
    /// Centre of the explosion.
    pub position: Vec2,
    /// Current radius.
    pub radius: f32,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

impl SceneExplosion {
    /// Creates a new explosion descriptor from a byte opacity.
    #[must_use]
    pub fn new(position: Vec2, radius: f32, alpha: u8) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            alpha: f32::from(alpha) / 255.0,
        }
    }
}

/// Heads-up display values shown above the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Money available for towers.
    pub money: u32,
    /// Lives remaining.
    pub lives: i32,
    /// Current wave number.
    pub wave: u32,
    /// Whole seconds until the next wave, while the session is between waves.
    pub seconds_to_next_wave: Option<u32>,
    /// Result of the session once it ended.
    pub outcome: Option<Outcome>,
}

impl Hud {
    /// Creates a new HUD descriptor.
    #[must_use]
    pub const fn new(
        money: u32,
        lives: i32,
        wave: u32,
        seconds_to_next_wave: Option<u32>,
        outcome: Option<Outcome>,
    ) -> Self {
        Self {
            money,
            lives,
            wave,
            seconds_to_next_wave,
            outcome,
        }
    }

    /// Status line listing money, lives, wave and the next wave countdown.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Money: {}   Lives: {}   Wave: {}",
            self.money, self.lives, self.wave
        );
        if let Some(seconds) = self.seconds_to_next_wave {
            line.push_str(&format!("   Next wave in: {seconds}"));
        }
        line
    }

    /// Banner announcing the session result, if the session ended.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        match self.outcome {
            Some(Outcome::Won) => Some("YOU WIN!"),
            Some(Outcome::Lost) => Some("GAME OVER"),
            None => None,
        }
    }
}

/// Scene description combining the field, the path and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playing field dimensions.
    pub field: FieldPresentation,
    /// Road followed by enemies.
    pub path: PathPresentation,
    /// Enemies currently in play.
    pub enemies: Vec<SceneEnemy>,
    /// Towers in placement order.
    pub towers: Vec<SceneTower>,
    /// Bullets in flight.
    pub bullets: Vec<SceneBullet>,
    /// Explosions still fading.
    pub explosions: Vec<SceneExplosion>,
    /// Session counters.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        field: FieldPresentation,
        path: PathPresentation,
        enemies: Vec<SceneEnemy>,
        towers: Vec<SceneTower>,
        bullets: Vec<SceneBullet>,
        explosions: Vec<SceneExplosion>,
        hud: Hud,
    ) -> Self {
        Self {
            field,
            path,
            enemies,
            towers,
            bullets,
            explosions,
            hud,
        }
    }

    /// Tower under the cursor, if any.
    #[must_use]
    pub fn hovered_tower(&self) -> Option<&SceneTower> {
        self.towers.iter().find(|tower| tower.hovered)
    }

    /// Reports whether the session shown by the scene ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.hud.outcome.is_some()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Path Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and rebuilds the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The field must cover at least one unit in each direction.
    #[error("field dimensions must be positive (received {width}x{height})")]
    EmptyField {
        /// Provided width.
        width: u32,
        /// Provided height.
        height: u32,
    },
}
