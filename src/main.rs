//! # Aetheric Notes
//!
//! Opens a window on the note-reading level. Walk with WASD or the arrow
//! keys and move the mouse sideways to turn. Click a marked object to read
//! it. Escape closes the note and R reloads the level files.

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;

use aetheric_notes::game::{bind_controls, ConsolePanel, GameScene, LevelScene, LevelSource, NoteAction};
use aetheric_notes::{Config, EngineBuilder, Result};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "aetheric-notes")]
#[command(about = "First-person note reading prototype")]
#[command(version)]
struct Args {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level file (TOML). The built-in room is used when omitted.
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Directory of note files (*.toml)
    #[arg(short, long)]
    notes: Option<PathBuf>,

    /// Walking speed in units per second, overriding the config
    #[arg(long)]
    speed: Option<f32>,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    info!("Starting Aetheric Notes v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;

    let mut source = LevelSource::builtin();
    if let Some(level) = &args.level {
        source = source.with_level(level);
    }
    if let Some(notes) = &args.notes {
        source = source.with_notes(notes);
    }

    let scene = LevelScene::new(
        GameScene::Level,
        source,
        config.player.clone(),
        config.window.aspect_ratio(),
        ConsolePanel::new(),
    )?;

    EngineBuilder::<GameScene, NoteAction>::from_config(&config)
        .build()
        .init(|systems| {
            bind_controls(&mut systems.input, &config.input);
            systems.scene_manager.register_default(GameScene::Level, scene);
        })
        .run()
}

/// Reads the config file, if any, and applies command-line overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };

    if let Some(speed) = args.speed {
        config.player.move_speed = speed;
    }

    config.validate()?;
    Ok(config)
}
