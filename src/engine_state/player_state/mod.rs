//! # Player State
//!
//! The player's body and how it moves.
//!
//! ## Key Components
//! - `MotionController`: Turns player actions into velocity, applies gravity and
//!   hands the move to the collision resolver
//! - `CollisionResolver`: Axis-separated sweep against the block grid
//!
//! ## Motion Modes
//!
//! The body is either walking or flying, switched only by an explicit toggle.
//! Walking bodies fall, jump, and collide with blocks. Flying bodies have no
//! gravity, move up and down on demand and pass through blocks.

use cgmath::{InnerSpace, Point3, Rad, Vector3, Zero};
use log::debug;

use super::camera_state::SAFE_FRAC_PI_2;
use super::voxels::world::BlockQuery;
use super::PlayerAction;
use collision::{CollisionResolver, SweepMode};

pub mod collision;

/// Movement constants, in blocks and seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionTuning {
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Fastest possible fall speed
    pub terminal_fall_speed: f32,
    /// Horizontal speed on the ground
    pub walk_speed: f32,
    /// Horizontal speed while airborne
    pub air_speed: f32,
    /// Horizontal and vertical speed while flying
    pub fly_speed: f32,
    /// Upward speed given by a jump
    pub jump_speed: f32,
    /// Vertical velocity kept per 1/60 s in flight when neither up nor down is held
    pub fly_damping: f32,
    /// Radians of rotation per unit of look delta
    pub look_sensitivity: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        MotionTuning {
            gravity: 20.0,
            terminal_fall_speed: 50.0,
            walk_speed: 10.0,
            air_speed: 8.0,
            fly_speed: 15.0,
            jump_speed: 10.0,
            fly_damping: 0.9,
            look_sensitivity: 0.002,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionMode {
    Walking,
    Flying,
}

/// Owns the body's position, velocity and orientation.
#[derive(Debug)]
pub struct MotionController {
    /// Feet position in world space
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    /// Yaw 0 faces +X, positive yaw turns toward +Z
    pub yaw: Rad<f32>,
    /// Positive pitch looks up
    pub pitch: Rad<f32>,
    on_ground: bool,
    mode: MotionMode,
    tuning: MotionTuning,
    resolver: CollisionResolver,
}

impl MotionController {
    /// Creates a walking body standing at `position`, at rest.
    pub fn new(position: Point3<f32>) -> Self {
        Self::with_tuning(position, MotionTuning::default())
    }

    pub fn with_tuning(position: Point3<f32>, tuning: MotionTuning) -> Self {
        MotionController {
            position,
            velocity: Vector3::zero(),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            on_ground: false,
            mode: MotionMode::Walking,
            tuning,
            resolver: CollisionResolver::default(),
        }
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    /// Switches between walking and flying.
    ///
    /// Entering flight cancels any fall; leaving it lets gravity take over on
    /// the next update.
    pub fn toggle_flight(&mut self) {
        self.mode = match self.mode {
            MotionMode::Walking => {
                self.velocity.y = 0.0;
                MotionMode::Flying
            }
            MotionMode::Flying => MotionMode::Walking,
        };
        self.on_ground = false;
        debug!("Motion mode is now {:?}", self.mode);
    }

    /// Applies a look delta (usually raw mouse motion).
    pub fn look(&mut self, delta_x: f64, delta_y: f64) {
        let sensitivity = self.tuning.look_sensitivity;
        self.yaw += Rad(delta_x as f32 * sensitivity);
        self.pitch -= Rad(delta_y as f32 * sensitivity);
        self.pitch = Rad(self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }

    /// Advances the body by one tick.
    ///
    /// # Arguments
    /// * `dt` - Tick duration in seconds
    /// * `actions` - What the player asked for this tick
    /// * `world` - Block source used for collisions
    pub fn update<Q: BlockQuery + ?Sized>(&mut self, dt: f32, actions: &PlayerAction, world: &Q) {
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.look(delta_x, delta_y);
        }
        if actions.toggle_flight {
            self.toggle_flight();
        }

        let wish = self.wish_direction(actions);

        let sweep_mode = match self.mode {
            MotionMode::Walking => {
                let speed = if self.on_ground {
                    self.tuning.walk_speed
                } else {
                    self.tuning.air_speed
                };
                self.velocity.x = wish.x * speed;
                self.velocity.z = wish.z * speed;

                if actions.jump && self.on_ground {
                    self.velocity.y = self.tuning.jump_speed;
                } else if !self.on_ground {
                    self.velocity.y = (self.velocity.y - self.tuning.gravity * dt)
                        .max(-self.tuning.terminal_fall_speed);
                }
                SweepMode::Solid
            }
            MotionMode::Flying => {
                self.velocity.x = wish.x * self.tuning.fly_speed;
                self.velocity.z = wish.z * self.tuning.fly_speed;

                if actions.move_up {
                    self.velocity.y = self.tuning.fly_speed;
                } else if actions.move_down {
                    self.velocity.y = -self.tuning.fly_speed;
                } else {
                    self.velocity.y *= self.tuning.fly_damping.powf(dt * 60.0);
                }
                SweepMode::Passthrough
            }
        };

        let resolution = self
            .resolver
            .resolve(self.position, self.velocity, dt, sweep_mode, world);
        self.position = resolution.position;
        self.velocity = resolution.velocity;
        self.on_ground = resolution.on_ground;
    }

    /// Unit horizontal direction the player wants to move in, or zero.
    fn wish_direction(&self, actions: &PlayerAction) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);

        let mut wish = Vector3::zero();
        if actions.move_forward {
            wish += forward;
        }
        if actions.move_backward {
            wish -= forward;
        }
        if actions.move_right {
            wish += right;
        }
        if actions.move_left {
            wish -= right;
        }

        if wish.magnitude2() > f32::EPSILON {
            wish.normalize()
        } else {
            Vector3::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};

    /// A flat stone floor whose top surface is at y = 65.
    struct FlatWorld {
        holes: HashSet<(i32, i32)>,
    }

    impl FlatWorld {
        fn new() -> Self {
            FlatWorld {
                holes: HashSet::new(),
            }
        }
    }

    impl BlockQuery for FlatWorld {
        fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
            ((0..=64).contains(&y) && !self.holes.contains(&(x, z)))
                .then(|| Block::new(BlockType::STONE, x, y, z))
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn settled_body(world: &FlatWorld) -> MotionController {
        let mut body = MotionController::new(Point3::new(0.5, 65.0, 0.5));
        body.update(DT, &PlayerAction::default(), world);
        assert!(body.on_ground());
        body
    }

    #[test]
    fn jump_only_on_the_rising_edge() {
        let world = FlatWorld::new();
        let mut body = settled_body(&world);

        let held = PlayerAction {
            move_up: true,
            ..Default::default()
        };
        body.update(DT, &held, &world);
        assert!(body.on_ground());
        assert_eq!(body.position.y, 65.0);

        let pressed = PlayerAction {
            move_up: true,
            jump: true,
            ..Default::default()
        };
        body.update(DT, &pressed, &world);
        assert!(!body.on_ground());
        assert!(body.position.y > 65.0);
        assert_eq!(body.velocity.y, 10.0);
    }

    #[test]
    fn jump_arc_returns_to_the_ground() {
        let world = FlatWorld::new();
        let mut body = settled_body(&world);
        let jump = PlayerAction {
            jump: true,
            ..Default::default()
        };
        body.update(DT, &jump, &world);

        let mut peak: f32 = body.position.y;
        for _ in 0..120 {
            body.update(DT, &PlayerAction::default(), &world);
            peak = peak.max(body.position.y);
            if body.on_ground() {
                break;
            }
        }
        assert!(body.on_ground());
        assert_eq!(body.position.y, 65.0);
        // v^2 / 2g = 2.5 blocks.
        assert!(peak > 67.0 && peak < 67.7, "peak {peak}");
    }

    #[test]
    fn diagonal_speed_matches_axis_speed() {
        let world = FlatWorld::new();
        let mut straight = settled_body(&world);
        let mut diagonal = settled_body(&world);

        straight.update(
            DT,
            &PlayerAction {
                move_forward: true,
                ..Default::default()
            },
            &world,
        );
        diagonal.update(
            DT,
            &PlayerAction {
                move_forward: true,
                move_right: true,
                ..Default::default()
            },
            &world,
        );

        let speed = |v: Vector3<f32>| Vector3::new(v.x, 0.0, v.z).magnitude();
        assert!((speed(straight.velocity) - 10.0).abs() < 1e-4);
        assert!((speed(diagonal.velocity) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn forward_follows_yaw() {
        let world = FlatWorld::new();
        let mut body = settled_body(&world);
        body.yaw = Rad(std::f32::consts::FRAC_PI_2);
        body.update(
            DT,
            &PlayerAction {
                move_forward: true,
                ..Default::default()
            },
            &world,
        );
        assert!(body.velocity.x.abs() < 1e-4);
        assert!((body.velocity.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn body_over_a_hole_falls() {
        let mut world = FlatWorld::new();
        world.holes.insert((0, 0));
        let mut body = MotionController::new(Point3::new(0.5, 65.0, 0.5));

        body.update(
            DT,
            &PlayerAction {
                move_forward: true,
                ..Default::default()
            },
            &world,
        );
        assert!(!body.on_ground());

        body.update(DT, &PlayerAction::default(), &world);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn fall_speed_is_capped() {
        let world = FlatWorld::new();
        let mut body = MotionController::new(Point3::new(0.5, 120.0, 0.5));
        body.velocity.y = -49.9;
        body.update(DT, &PlayerAction::default(), &world);
        assert_eq!(body.velocity.y, -50.0);
    }

    #[test]
    fn flight_ignores_gravity_and_blocks() {
        let world = FlatWorld::new();
        let mut body = settled_body(&world);
        body.update(
            DT,
            &PlayerAction {
                toggle_flight: true,
                ..Default::default()
            },
            &world,
        );
        assert_eq!(body.mode(), MotionMode::Flying);

        let start = body.position.y;
        for _ in 0..30 {
            body.update(DT, &PlayerAction::default(), &world);
        }
        assert_eq!(body.position.y, start);

        // Descending goes straight into the stone.
        let down = PlayerAction {
            move_down: true,
            ..Default::default()
        };
        for _ in 0..20 {
            body.update(DT, &down, &world);
        }
        assert!(body.position.y < 62.0);
    }

    #[test]
    fn flight_vertical_speed_decays_when_released() {
        let world = FlatWorld::new();
        let mut body = MotionController::new(Point3::new(0.5, 80.0, 0.5));
        body.toggle_flight();

        body.update(
            DT,
            &PlayerAction {
                move_up: true,
                ..Default::default()
            },
            &world,
        );
        assert_eq!(body.velocity.y, 15.0);

        body.update(DT, &PlayerAction::default(), &world);
        assert!((body.velocity.y - 13.5).abs() < 1e-4);

        body.toggle_flight();
        assert_eq!(body.mode(), MotionMode::Walking);
    }

    #[test]
    fn look_is_scaled_and_pitch_clamped() {
        let mut body = MotionController::new(Point3::new(0.0, 70.0, 0.0));
        body.look(100.0, 50.0);
        assert!((body.yaw.0 - 0.2).abs() < 1e-6);
        assert!((body.pitch.0 + 0.1).abs() < 1e-6);

        body.look(0.0, -10_000.0);
        assert_eq!(body.pitch.0, SAFE_FRAC_PI_2);
    }
}
