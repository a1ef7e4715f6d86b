#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A voxel world engine: procedurally generated terrain stored in fixed-size
//! chunks, streamed around a walking or flying player body, with surface
//! meshes handed to an external renderer.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration and input handling
//! * `engine_state` - The world, the player body, the camera and the tick
//! * `error` - The error type returned by engine startup
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = voxel_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```
//!
//! The engine itself never opens a window. Embedders supply a
//! [`engine_state::rendering::RenderSink`] and drive
//! [`engine_state::EngineState::tick`] from their own loop.

use application_state::config::EngineConfig;
use application_state::input_manager::InputManager;
use engine_state::rendering::HeadlessRenderer;
use engine_state::EngineState;
use log::info;
use winit::keyboard::KeyCode;

pub mod application_state;
pub mod engine_state;
pub mod error;

use error::EngineResult;

/// Ticks simulated by the headless driver.
pub const HEADLESS_TICKS: u32 = 600;
/// Fixed tick length used by the headless driver, in seconds.
pub const HEADLESS_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Runs the headless driver.
///
/// Loads the configuration from the path given as the first argument (or the
/// defaults), applies environment overrides, then walks the player forward
/// for a fixed number of ticks and logs what happened.
pub fn run() -> EngineResult<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    }
    .with_env()?;

    let mut engine = EngineState::new(config, HeadlessRenderer::new())?;
    let mut input = InputManager::new();
    input.intake_key(KeyCode::KeyW, true);

    let started = web_time::Instant::now();
    for _ in 0..HEADLESS_TICKS {
        let snapshot = input.snapshot();
        engine.tick(HEADLESS_TICK_SECONDS, &snapshot);
    }
    let elapsed = started.elapsed();

    let position = engine.player().position;
    let renderer = engine.renderer();
    info!(
        "Ran {} ticks in {:.2?}: player at ({:.2}, {:.2}, {:.2}), {} chunks loaded, {} meshes registered ({} faces, {} uploads, {} removals)",
        engine.ticks(),
        elapsed,
        position.x,
        position.y,
        position.z,
        engine.world().loaded_count(),
        renderer.mesh_count(),
        renderer.total_faces(),
        renderer.total_uploads(),
        renderer.total_removals()
    );

    Ok(())
}
