//! Beer main entry point.
//!
//! Opens a raylib window, loads a tile map and an optional player character
//! from JSON descriptors, and runs the frame loop:
//!
//! 1. Initialize logging, parse the command line, load `config.ini`
//! 2. Open the window and build the [`Scene`] from the descriptors
//! 3. Each frame: poll key edges, steer and step the player, draw
//! 4. Unload the scene (detaching every sprite) before the window closes
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib -- --map assets/maps/defense.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use beer::native::raylib::RaylibBackend;
use beer::resources::descriptors::{CharacterDescriptor, TileMapDescriptor};
use beer::resources::gameconfig::GameConfig;
use beer::scene::{Scene, SceneError, SceneSignal};
use clap::Parser;

/// Beer 2D
#[derive(Parser)]
#[command(version, about = "Tile-stepping 2D scene viewer")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Tile map descriptor; overrides the config file.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Player character descriptor; overrides the config file.
    #[arg(long, value_name = "PATH")]
    character: Option<PathBuf>,
}

fn run(config: &GameConfig) -> Result<(), SceneError> {
    let backend = Rc::new(RaylibBackend::init(config));

    let map = TileMapDescriptor::load_from_file(&config.map_path)?;
    let character = config
        .character_path
        .as_ref()
        .map(CharacterDescriptor::load_from_file)
        .transpose()?;

    let mut scene = Scene::load(backend.clone(), &map, character.as_ref(), config.stride)?;
    scene.set_time_scale(config.time_scale);

    while !backend.should_close() {
        let dt = backend.frame_time();
        if scene.update(&*backend, dt)? == SceneSignal::Quit {
            log::info!("Quit requested");
            break;
        }
        backend.present();
    }

    scene.unload();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(map) = cli.map {
        config.map_path = map;
    }
    if let Some(character) = cli.character {
        config.character_path = Some(character);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
