//! # Voxel World Headless Driver
//!
//! Calls into the library's `run()` function, which loads configuration,
//! starts the engine and simulates a fixed number of ticks.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{err}");
        eprintln!("voxel-world: {err}");
        std::process::exit(1);
    }
}
