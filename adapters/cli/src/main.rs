#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Path Defence experience.

mod clock;
mod config;
mod headless;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::FieldPoint;
use path_defence_rendering::{Color, Presentation, RenderingBackend};
use path_defence_rendering_macroquad::MacroquadBackend;
use path_defence_simulation::Simulation;
use path_defence_system_builder::BuilderInput;
use path_defence_world::query;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use self::{
    clock::FixedClock,
    config::{FileConfig, Overrides, Settings},
    headless::HeadlessOptions,
};

/// Command-line arguments accepted by the Path Defence binary.
#[derive(Debug, Parser)]
#[command(name = "path-defence", about = "Defend the road against waves of enemies")]
struct CliArgs {
    /// Optional TOML file with `[window]` and `[logging]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Runs the simulation without opening a window.
    #[arg(long)]
    headless: bool,
    /// Ticks simulated by the headless runner before it reports.
    #[arg(long, default_value_t = 60 * 60 * 5)]
    ticks: u64,
    /// Tower placed before the first headless tick, as `x,y`. May be repeated.
    #[arg(long = "tower", value_parser = parse_field_point)]
    towers: Vec<FieldPoint>,
    /// Places towers at random legal points whenever money allows (headless only).
    #[arg(long)]
    autoplace: bool,
    /// Seed of the autoplace random number generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: Option<bool>,
    /// Logs frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Default log level when `RUST_LOG` is unset.
    #[arg(long)]
    log_level: Option<String>,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            vsync: self.vsync,
            show_fps: self.show_fps,
            log_level: self.log_level.clone(),
        }
    }
}

fn parse_field_point(value: &str) -> Result<FieldPoint, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, received `{value}`"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|error| format!("invalid x coordinate `{x}`: {error}"))?;
    let y = y
        .trim()
        .parse()
        .map_err(|error| format!("invalid y coordinate `{y}`: {error}"))?;
    Ok(FieldPoint::new(x, y))
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = file_config
        .resolve(&args.overrides())
        .context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(settings.log_level.into())
                .from_env_lossy(),
        )
        .init();

    if args.headless {
        let summary = headless::run(&HeadlessOptions {
            ticks: args.ticks,
            towers: args.towers,
            autoplace: args.autoplace,
            seed: args.seed,
        });
        println!("{summary}");
        return Ok(());
    }

    run_windowed(settings)
}

fn run_windowed(settings: Settings) -> Result<()> {
    let mut simulation = Simulation::new();
    info!("{}", query::welcome_banner(simulation.world()));

    let scene = scene::build_scene(&simulation).context("failed to build the initial scene")?;
    let presentation = Presentation::new("Path Defence", Color::from_rgb_u8(30, 30, 30), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps);

    let mut clock = FixedClock::new(settings.max_ticks_per_frame);
    backend.run(presentation, move |frame, input, scene| {
        simulation.handle_input(BuilderInput::new(
            input.place_action,
            input.restart_action,
            input.cursor_field_space,
        ));
        for _ in 0..clock.advance(frame) {
            simulation.step();
        }
        scene::populate_scene(&simulation, scene);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_points_parse_from_comma_separated_pairs() {
        assert_eq!(parse_field_point("100,180"), Ok(FieldPoint::new(100, 180)));
        assert_eq!(parse_field_point(" 5 , -3 "), Ok(FieldPoint::new(5, -3)));
        assert!(parse_field_point("100").is_err());
        assert!(parse_field_point("a,1").is_err());
    }

    #[test]
    fn repeated_tower_flags_collect_in_order() {
        let args = CliArgs::try_parse_from([
            "path-defence",
            "--headless",
            "--tower",
            "100,180",
            "--tower",
            "250,100",
            "--seed",
            "9",
        ])
        .expect("valid arguments");

        assert!(args.headless);
        assert_eq!(
            args.towers,
            vec![FieldPoint::new(100, 180), FieldPoint::new(250, 100)]
        );
        assert_eq!(args.seed, 9);
        assert_eq!(args.ticks, 18_000);
    }

    #[test]
    fn command_line_flags_become_overrides() {
        let args = CliArgs::try_parse_from([
            "path-defence",
            "--vsync",
            "false",
            "--show-fps",
            "--log-level",
            "debug",
        ])
        .expect("valid arguments");

        assert_eq!(
            args.overrides(),
            Overrides {
                vsync: Some(false),
                show_fps: true,
                log_level: Some("debug".to_owned()),
            }
        );
    }
}
