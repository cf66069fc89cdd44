#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Bomb Maze experience.

mod config;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bomb_maze_core::{Event, Key};
use bomb_maze_rendering::{
    text, BoardPresentation, Presentation, RenderingBackend, Scene, BACKGROUND_COLOR,
};
use bomb_maze_rendering_macroquad::MacroquadBackend;
use bomb_maze_system_pacing::{FrameClock, Pacing};
use bomb_maze_system_session::Session;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use self::config::GameConfig;

const WINDOW_TITLE: &str = "Bomb Maze";

/// Command-line options accepted by the game binary.
#[derive(Debug, Parser)]
#[command(name = "bomb-maze", version, about = "Place bombs, dodge fire, outlast the monsters")]
struct CliArgs {
    /// TOML file providing game settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Layout file with one row of tile codes per line.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Seed for pickup drops.
    #[arg(long)]
    seed: Option<u64>,
    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,
    /// Automaton ticks per second.
    #[arg(long)]
    tps: Option<u32>,
    /// Tile edge length in pixels.
    #[arg(long)]
    tile_size: Option<u32>,
    /// Bombs held at spawn.
    #[arg(long)]
    starting_bombs: Option<u32>,
    /// Probability that a blasted stone drops an extra bomb.
    #[arg(long)]
    pickup_chance: Option<f64>,
    /// Run without a window, replaying `--script` and printing the final board.
    #[arg(long)]
    headless: bool,
    /// Frames to simulate in headless mode; defaults to the script length.
    #[arg(long, requires = "headless")]
    frames: Option<u64>,
    /// Keys to replay in headless mode, one frame per symbol.
    #[arg(long, requires = "headless")]
    script: Option<String>,
    /// Raise the default log level to debug.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Bomb Maze command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let pacing = config.validate().context("invalid game configuration")?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let level = config.load_level()?;
    let session = Session::new(level, config.world_config(seed), pacing)
        .context("failed to start game session")?;

    let board = BoardPresentation::new(
        session.grid().columns(),
        session.grid().rows(),
        config.tile_size as f32,
    )
    .context("invalid board dimensions")?;

    tracing::info!(
        target: "bomb_maze::cli",
        seed,
        headless = args.headless,
        "game.starting"
    );

    if args.headless {
        let frames = script::parse(args.script.as_deref().unwrap_or_default())
            .context("invalid --script")?;
        let output = run_headless(session, board, &frames, args.frames);
        print!("{output}");
        Ok(())
    } else {
        run_windowed(session, board, pacing)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn resolve_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(tps) = args.tps {
        config.tps = tps;
    }
    if let Some(tile_size) = args.tile_size {
        config.tile_size = tile_size;
    }
    if let Some(starting_bombs) = args.starting_bombs {
        config.starting_bombs = starting_bombs;
    }
    if let Some(pickup_chance) = args.pickup_chance {
        config.pickup_chance = pickup_chance;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.level.is_some() {
        config.level = args.level.clone();
    }
    Ok(config)
}

/// Replays `script` and renders the final board, inventory and outcome.
fn run_headless(
    mut session: Session,
    board: BoardPresentation,
    script: &[Vec<Key>],
    frames: Option<u64>,
) -> String {
    let total = frames.unwrap_or(script.len() as u64);
    let mut events = Vec::new();

    for (frame, keys) in (0..total).zip(script.iter().map(Some).chain(std::iter::repeat(None))) {
        for key in keys.into_iter().flatten() {
            let _ = session.push_key(*key);
        }
        events.clear();
        let report = session.run_frame(&mut events);
        log_events(&events);
        tracing::trace!(
            target: "bomb_maze::cli",
            frame,
            ticked = report.ticked,
            "headless.frame"
        );
    }

    let mut scene = Scene::new(board);
    snapshot(&session, &mut scene);

    let mut output = format!("{}\n", session.welcome_banner());
    output.push_str(&text::render(&scene));
    output.push_str(&format!("bombs: {}\n", session.bombs()));
    if session.is_game_over() {
        output.push_str("game over\n");
    }
    output
}

fn run_windowed(session: Session, board: BoardPresentation, pacing: Pacing) -> Result<()> {
    tracing::info!(target: "bomb_maze::cli", "{}", session.welcome_banner());

    let mut scene = Scene::new(board);
    snapshot(&session, &mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, BACKGROUND_COLOR, scene);

    let mut session = session;
    let mut clock = FrameClock::new(pacing.frame_period());
    let mut events = Vec::new();

    MacroquadBackend::new()
        .with_vsync(true)
        .run(presentation, move |dt, input, scene| {
            if input.quit {
                tracing::info!(
                    target: "bomb_maze::cli",
                    frames = session.frames(),
                    "session.quit"
                );
                return;
            }

            for key in input.keys {
                let _ = session.push_key(key);
            }
            for _ in 0..clock.advance(dt) {
                events.clear();
                let _ = session.run_frame(&mut events);
                log_events(&events);
            }
            snapshot(&session, scene);
        })
}

fn snapshot(session: &Session, scene: &mut Scene) {
    scene.update(
        session.grid().iter(),
        session.player(),
        session.bombs(),
        session.is_game_over(),
    );
}

fn log_events(events: &[Event]) {
    for event in events {
        tracing::debug!(target: "bomb_maze::cli", ?event, "world.event");
    }
}
