#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Path Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The game-over panel uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module.

mod ui;

use self::ui::{draw_game_over_ui, GameOverUiContext, GameOverUiResult};
use anyhow::Result;
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
};
use path_defence_rendering::{
    Color, FrameInput, Hud, PathPresentation, Presentation, RenderingBackend, Scene, SceneBullet,
    SceneEnemy, SceneExplosion, SceneTower,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::info;

/// Height of the HUD strip drawn across the top of the field, in field units.
const HUD_HEIGHT: f32 = 40.0;
/// Font size of the HUD status line, in field units.
const HUD_FONT_SIZE: f32 = 18.0;
/// Font size of the game-over banner, in field units.
const BANNER_FONT_SIZE: f32 = 40.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayInputState {
    restart_latched: bool,
}

impl OverlayInputState {
    /// Returns whether the UI requested a restart and clears the latch so the
    /// action fires only once.
    pub fn take_restart(&mut self) -> bool {
        let latched = self.restart_latched;
        self.restart_latched = false;
        latched
    }

    /// Records that the game-over button requested a restart this frame.
    pub fn register_restart(&mut self) {
        self.restart_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` starts a fresh session.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            restart: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_update = self.update_accum / frames.max(1);
        let avg_render = self.render_accum / frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(scene.field.width).unwrap_or(i32::MAX),
            window_height: i32::try_from(scene.field.height).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut overlay_input = OverlayInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let ui_restart = overlay_input.take_restart();
                let frame_input =
                    gather_frame_input(&scene, &metrics_before, ui_restart, keyboard);

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                if frame_input.quit_requested {
                    break;
                }

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_field(&scene, &metrics);
                draw_path(&scene.path, &metrics);
                if let Some(tower) = scene.hovered_tower() {
                    draw_tower_range_indicator(tower, &metrics);
                }
                draw_enemies(&scene.enemies, &metrics);
                draw_towers(&scene.towers, &metrics);
                draw_bullets(&scene.bullets, &metrics);
                draw_explosions(&scene.explosions, &metrics);
                draw_hud(&scene.hud, &metrics);

                if let Some(panel_context) =
                    draw_game_over_overlay(&scene, &metrics, screen_width, screen_height)
                {
                    let mut overlay_ui = macroquad::ui::root_ui();
                    let GameOverUiResult { restart_pressed } =
                        draw_game_over_ui(&mut overlay_ui, panel_context);
                    if restart_pressed {
                        overlay_input.register_restart();
                    }
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = per_second,
                            fps_10s = trailing_ten_seconds,
                            update_ms = avg_update.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps field units onto the window, preserving the field's aspect ratio.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    field_width_scaled: f32,
    field_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let field = scene.field.size();
        let scale = if field.x <= f32::EPSILON || field.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / field.x).min(screen_height / field.y).max(0.0)
        };

        let field_width_scaled = field.x * scale;
        let field_height_scaled = field.y * scale;
        let offset_x = ((screen_width - field_width_scaled) * 0.5).max(0.0);
        let offset_y = ((screen_height - field_height_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            field_width_scaled,
            field_height_scaled,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_field(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }

    fn length(&self, field_units: f32) -> f32 {
        field_units * self.scale
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    ui_restart: bool,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let click = is_mouse_button_pressed(MouseButton::Left);
    gather_frame_input_from_observations(
        scene,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        click,
        ui_restart || keyboard.restart,
        keyboard.quit_requested,
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    click: bool,
    restart: bool,
    quit_requested: bool,
) -> FrameInput {
    let cursor_field_space = metrics
        .to_field(cursor_position)
        .and_then(|position| scene.field.field_point(position));

    FrameInput {
        cursor_field_space,
        place_action: click && cursor_field_space.is_some() && !scene.is_over(),
        restart_action: restart,
        quit_requested,
    }
}

fn draw_field(scene: &Scene, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.field_width_scaled,
        metrics.field_height_scaled,
        to_macroquad_color(scene.field.ground),
    );
}

fn draw_path(path: &PathPresentation, metrics: &SceneMetrics) {
    let kerb = to_macroquad_color(Color::from_rgb_u8(100, 100, 100));
    let road = to_macroquad_color(path.color);
    let centre_line = to_macroquad_color(Color::from_rgb_u8(64, 64, 64));

    let layers = [
        (metrics.length(path.width + 10.0), kerb),
        (metrics.length(path.width), road),
    ];
    for (thickness, color) in layers {
        for (from, to) in path.segments() {
            let from = metrics.to_screen(from);
            let to = metrics.to_screen(to);
            macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
        }
        for point in &path.points {
            let joint = metrics.to_screen(*point);
            macroquad::shapes::draw_circle(joint.x, joint.y, thickness * 0.5, color);
        }
    }

    let thickness = metrics.length(2.0).max(1.0);
    for (from, to) in path.segments() {
        let from = metrics.to_screen(from);
        let to = metrics.to_screen(to);
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, centre_line);
    }
}

fn draw_tower_range_indicator(tower: &SceneTower, metrics: &SceneMetrics) {
    let radius = metrics.length(tower.range);
    if radius <= f32::EPSILON {
        return;
    }

    let center = metrics.to_screen(tower.position);
    let fill = to_macroquad_color(Color::from_rgba_u8(0, 0, 255, 40));
    let outline = to_macroquad_color(Color::from_rgb_u8(0, 0, 180));
    let outline_thickness = metrics.length(1.5).max(1.0);

    macroquad::shapes::draw_circle(center.x, center.y, radius, fill);
    macroquad::shapes::draw_circle_lines(center.x, center.y, radius, outline_thickness, outline);
}

fn draw_shadow(center: Vec2, radius: f32, metrics: &SceneMetrics) {
    let shadow = to_macroquad_color(Color::from_rgba_u8(0, 0, 0, 60));
    macroquad::shapes::draw_circle(
        center.x,
        center.y + metrics.length(6.0),
        radius * 0.8,
        shadow,
    );
}

fn draw_enemies(enemies: &[SceneEnemy], metrics: &SceneMetrics) {
    let body = to_macroquad_color(Color::from_rgb_u8(200, 50, 50));
    let bar_empty = to_macroquad_color(Color::from_rgb_u8(255, 0, 0));
    let bar_full = to_macroquad_color(Color::from_rgb_u8(0, 255, 0));
    let bar_width = metrics.length(30.0);
    let bar_height = metrics.length(5.0).max(2.0);
    let outline_thickness = metrics.length(1.0).max(1.0);

    for enemy in enemies {
        let center = metrics.to_screen(enemy.position);
        let radius = metrics.length(enemy.size * 0.5);
        if radius <= f32::EPSILON {
            continue;
        }

        draw_shadow(center, radius, metrics);
        macroquad::shapes::draw_circle(center.x, center.y, radius, body);
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, outline_thickness, BLACK);

        let bar_left = center.x - bar_width * 0.5;
        let bar_top = center.y - radius - metrics.length(10.0);
        macroquad::shapes::draw_rectangle(bar_left, bar_top, bar_width, bar_height, bar_empty);
        let fill_width = bar_width * enemy.health_fraction;
        if fill_width > f32::EPSILON {
            macroquad::shapes::draw_rectangle(bar_left, bar_top, fill_width, bar_height, bar_full);
        }
        macroquad::shapes::draw_rectangle_lines(
            bar_left,
            bar_top,
            bar_width,
            bar_height,
            outline_thickness,
            BLACK,
        );
    }
}

fn draw_towers(towers: &[SceneTower], metrics: &SceneMetrics) {
    let base_color = Color::from_rgb_u8(80, 80, 200);
    let fill = to_macroquad_color(base_color);
    let hovered_fill = to_macroquad_color(base_color.lighten(0.3));
    let outline_thickness = metrics.length(1.5).max(1.0);

    for tower in towers {
        let center = metrics.to_screen(tower.position);
        let radius = metrics.length(tower.size * 0.5);
        if radius <= f32::EPSILON {
            continue;
        }

        draw_shadow(center, radius, metrics);
        let body = if tower.hovered { hovered_fill } else { fill };
        macroquad::shapes::draw_circle(center.x, center.y, radius, body);
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, outline_thickness, BLACK);
    }
}

fn draw_bullets(bullets: &[SceneBullet], metrics: &SceneMetrics) {
    let glow = to_macroquad_color(Color::from_rgba_u8(255, 255, 100, 120));
    let core = to_macroquad_color(Color::from_rgb_u8(255, 255, 0));
    let rim = to_macroquad_color(Color::from_rgb_u8(255, 200, 0));
    let outline_thickness = metrics.length(1.0).max(1.0);

    for bullet in bullets {
        let center = metrics.to_screen(bullet.position);
        let radius = metrics.length(bullet.size * 0.5).max(1.0);
        macroquad::shapes::draw_circle(center.x, center.y, radius * 2.0, glow);
        macroquad::shapes::draw_circle(center.x, center.y, radius, core);
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, outline_thickness, rim);
    }
}

fn draw_explosions(explosions: &[SceneExplosion], metrics: &SceneMetrics) {
    let outline_thickness = metrics.length(2.0).max(1.0);

    for explosion in explosions {
        if explosion.alpha <= f32::EPSILON {
            continue;
        }
        let center = metrics.to_screen(explosion.position);
        let radius = metrics.length(explosion.radius);
        let fill = Color::from_rgb_u8(255, 150, 0).with_alpha(explosion.alpha);
        let outline = Color::from_rgb_u8(255, 80, 0).with_alpha(explosion.alpha);

        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(fill));
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            outline_thickness,
            to_macroquad_color(outline),
        );
    }
}

fn draw_hud(hud: &Hud, metrics: &SceneMetrics) {
    let strip = to_macroquad_color(Color::from_rgb_u8(30, 30, 30));
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.field_width_scaled,
        metrics.length(HUD_HEIGHT),
        strip,
    );

    let origin = metrics.to_screen(Vec2::new(20.0, 25.0));
    let _ = macroquad::text::draw_text(
        &hud.status_line(),
        origin.x,
        origin.y,
        metrics.length(HUD_FONT_SIZE),
        WHITE,
    );
}

/// Dims the field and announces the outcome once the session ended, returning
/// the layout of the restart panel.
fn draw_game_over_overlay(
    scene: &Scene,
    metrics: &SceneMetrics,
    screen_width: f32,
    screen_height: f32,
) -> Option<GameOverUiContext> {
    let banner = scene.hud.banner()?;

    let veil = to_macroquad_color(Color::from_rgba_u8(0, 0, 0, 150));
    macroquad::shapes::draw_rectangle(0.0, 0.0, screen_width, screen_height, veil);

    let font_size = metrics.length(BANNER_FONT_SIZE).max(1.0);
    let dimensions = macroquad::text::measure_text(banner, None, font_size as u16, 1.0);
    let center = metrics.to_screen(Vec2::new(scene.field.width as f32 * 0.5, 250.0));
    let _ = macroquad::text::draw_text(
        banner,
        center.x - dimensions.width * 0.5,
        center.y,
        font_size,
        WHITE,
    );

    let size = MacroquadVec2::new(metrics.length(240.0), metrics.length(120.0));
    let origin = MacroquadVec2::new(center.x - size.x * 0.5, center.y + metrics.length(30.0));

    Some(GameOverUiContext {
        origin,
        size,
        background: to_macroquad_color(Color::from_rgb_u8(30, 30, 30)),
        banner,
    })
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
