//! # Engine State Module
//!
//! The core engine module that owns the world, the player body, the camera and
//! the rendering collaborator, and advances them together one tick at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Camera pose and projection derived from the body
//! * `player_state` - Walking/flying motion and block collision
//! * `rendering` - Mesh buffers and the `RenderSink` interface
//! * `voxels` - Blocks, chunks, terrain generation and chunk streaming
//!
//! ## Tick Order
//!
//! Every tick runs the same three steps, in this order:
//!
//! 1. Streaming: load and unload chunks around the body's current position
//! 2. Motion: apply the tick's actions, gravity and collisions to the body
//! 3. Hand-off: deliver queued mesh updates and the new camera pose to the
//!    render sink
//!
//! Nothing runs between ticks, so every subsystem observes a consistent world.

use cgmath::Point3;
use log::{debug, info};

use crate::application_state::config::EngineConfig;
use crate::application_state::input_state::{InputSnapshot, Intent};
use crate::error::EngineResult;
use camera_state::{CameraPose, CameraState};
use player_state::MotionController;
use rendering::{RenderSink, Viewport};
use voxels::block::{block_type::BlockType, BlockRegistry};
use voxels::terrain::TerrainGenerator;
use voxels::world::WorldStreamer;

pub mod camera_state;
pub mod player_state;
pub mod rendering;
pub mod voxels;

/// Viewport assumed until the first resize arrives.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};

/// Represents player actions derived from input
///
/// Movement flags are true while the key is down. `jump` and `toggle_flight`
/// are edges and are true only on the tick the key went down.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerAction {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Ascend while flying
    pub move_up: bool,
    /// Descend while flying
    pub move_down: bool,
    pub jump: bool,
    pub toggle_flight: bool,
    /// View rotation - Some if look is captured and the pointer moved
    pub rotate_view: Option<(f64, f64)>,
}

/// Translates an input snapshot into player actions.
///
/// The up intent doubles as jump: held it ascends in flight, pressed it jumps
/// on the ground.
pub fn translate_input(input: &InputSnapshot) -> PlayerAction {
    PlayerAction {
        move_forward: input.is_active(Intent::Forward),
        move_backward: input.is_active(Intent::Backward),
        move_left: input.is_active(Intent::Left),
        move_right: input.is_active(Intent::Right),
        move_up: input.is_active(Intent::Up),
        move_down: input.is_active(Intent::Down),
        jump: input.just_pressed(Intent::Up),
        toggle_flight: input.just_pressed(Intent::ToggleFly),
        rotate_view: input.look(),
    }
}

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use voxel_world::application_state::config::EngineConfig;
/// use voxel_world::application_state::input_state::InputSnapshot;
/// use voxel_world::engine_state::rendering::HeadlessRenderer;
/// use voxel_world::engine_state::EngineState;
///
/// let config = EngineConfig { seed: 7, render_distance: 1 };
/// let mut engine = EngineState::new(config, HeadlessRenderer::new()).unwrap();
/// engine.tick(1.0 / 60.0, &InputSnapshot::default());
/// assert_eq!(engine.renderer().mesh_count(), 9);
/// ```
pub struct EngineState<R: RenderSink> {
    /// Chunk storage and streaming window
    world: WorldStreamer,
    /// The player's body
    player: MotionController,
    camera_state: CameraState,
    /// Rendering collaborator receiving meshes and camera poses
    renderer: R,
    config: EngineConfig,
    ticks: u64,
}

impl<R: RenderSink> EngineState<R> {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// Validates the configuration and the block registry, loads the chunks
    /// around the origin and places the body on the terrain surface there.
    ///
    /// # Arguments
    ///
    /// * `config` - Seed and render distance
    /// * `renderer` - The rendering collaborator
    ///
    /// # Returns
    ///
    /// A fully initialized `EngineState`, or the first startup error.
    pub fn new(config: EngineConfig, mut renderer: R) -> EngineResult<Self> {
        config.validate()?;
        let registry = BlockRegistry::standard()?;

        let generator = TerrainGenerator::new(config.seed);
        let mut world = WorldStreamer::new(generator, registry, config.render_distance);
        let report = world.set_active_center(Point3::new(0.0, 0.0, 0.0));

        let spawn_y = world.spawn_height(0, 0).unwrap_or(1);
        let player = MotionController::new(Point3::new(0.5, spawn_y as f32, 0.5));

        let camera_state = CameraState::new(DEFAULT_VIEWPORT);
        renderer.resize(DEFAULT_VIEWPORT);

        info!(
            "Engine started with seed {} and render distance {}: {} chunks loaded, spawn at y={}",
            config.seed,
            config.render_distance,
            report.loaded.len(),
            spawn_y
        );

        Ok(Self {
            world,
            player,
            camera_state,
            renderer,
            config,
            ticks: 0,
        })
    }

    /// Advances the engine by one tick.
    ///
    /// # Arguments
    ///
    /// * `dt` - Tick duration in seconds
    /// * `input` - The input for this tick
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) {
        if let Some(report) = self.world.update(self.player.position) {
            debug!(
                "Streaming moved to {:?}: {} loaded, {} unloaded",
                self.world.center(),
                report.loaded.len(),
                report.unloaded.len()
            );
        }

        let actions = translate_input(input);
        self.player.update(dt, &actions, &self.world);

        self.world.flush_mesh_updates(&mut self.renderer);
        let pose = self
            .camera_state
            .follow(self.player.position, self.player.yaw, self.player.pitch);
        self.renderer.update_camera(&pose);

        self.ticks += 1;
    }

    /// Resizes the projection and tells the renderer.
    pub fn resize(&mut self, viewport: Viewport) {
        self.camera_state.resize(viewport);
        self.renderer.resize(viewport);
    }

    /// Places a block at world coordinates. The affected meshes reach the
    /// renderer on the next tick.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        self.world.set_block(x, y, z, block_type);
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn world(&self) -> &WorldStreamer {
        &self.world
    }

    pub fn player(&self) -> &MotionController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut MotionController {
        &mut self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The camera pose as of the last tick.
    pub fn camera_pose(&self) -> CameraPose {
        self.camera_state.pose()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
