//! # Collision Resolution
//!
//! Axis-separated sweep of the player's body against the block grid.
//!
//! The body is approximated by a handful of sample points relative to the
//! feet. A move is tried one axis at a time, in the order X, Z, Y, so ground
//! detection runs against the already resolved horizontal position. An axis
//! move is rejected (reverted and its velocity zeroed) when any sample would
//! end up inside a solid cell. Water never blocks.
//!
//! The resolver holds no state; the same inputs always give the same result.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::BlockQuery;

/// Body sample points relative to the feet: feet, center, head and the four
/// horizontal corners at center height.
pub const BODY_SAMPLE_OFFSETS: [[f32; 3]; 7] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.9, 0.0],
    [0.0, 1.7, 0.0],
    [0.3, 0.9, 0.3],
    [-0.3, 0.9, 0.3],
    [0.3, 0.9, -0.3],
    [-0.3, 0.9, -0.3],
];

/// Lowest y the feet may reach. Being held here counts as ground contact.
pub const WORLD_FLOOR_Y: f32 = 1.0;

/// Longest distance moved on one axis before re-testing for collisions.
/// Kept under half a block so a fast body cannot skip over a cell.
pub const MAX_SWEEP_STEP: f32 = 0.45;

/// How far below the feet to look for support when the body is not moving up.
pub const GROUND_PROBE_DEPTH: f32 = 0.05;

/// Whether blocks stop the body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepMode {
    /// Normal movement: blocks are obstacles.
    Solid,
    /// Flight: the displacement is applied as is, only the world floor holds.
    Passthrough,
}

/// Outcome of one collision pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    pub on_ground: bool,
}

#[derive(Clone, Debug)]
pub struct CollisionResolver {
    samples: Vec<Vector3<f32>>,
    /// Smallest vertical sample offset, the body's lowest point
    lowest_sample: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(&BODY_SAMPLE_OFFSETS)
    }
}

impl CollisionResolver {
    /// Creates a resolver for a body described by sample offsets from its feet.
    pub fn new(offsets: &[[f32; 3]]) -> Self {
        let samples: Vec<Vector3<f32>> = offsets.iter().map(|&o| Vector3::from(o)).collect();
        let lowest_sample = samples.iter().map(|s| s.y).fold(0.0_f32, f32::min);
        CollisionResolver {
            samples,
            lowest_sample,
        }
    }

    /// Moves a body by `velocity * dt`, stopping it at solid blocks.
    ///
    /// # Arguments
    /// * `position` - Feet position before the move
    /// * `velocity` - Velocity for this tick
    /// * `dt` - Tick duration in seconds
    /// * `mode` - Whether blocks are obstacles
    /// * `world` - Source of block data
    ///
    /// # Returns
    /// The allowed position, the velocity with blocked axes zeroed, and
    /// whether the body ended the tick supported from below.
    pub fn resolve<Q: BlockQuery + ?Sized>(
        &self,
        position: Point3<f32>,
        velocity: Vector3<f32>,
        dt: f32,
        mode: SweepMode,
        world: &Q,
    ) -> Resolution {
        let mut position = position;
        let mut velocity = velocity;
        let mut on_ground = false;

        match mode {
            SweepMode::Passthrough => position += velocity * dt,
            SweepMode::Solid => {
                for axis in [0, 2, 1] {
                    let displacement = velocity[axis] * dt;
                    if self.sweep_axis(&mut position, axis, displacement, world) {
                        continue;
                    }
                    if axis == 1 && displacement < 0.0 {
                        on_ground = true;
                    }
                    velocity[axis] = 0.0;
                }

                if !on_ground && velocity.y <= 0.0 && self.is_supported(position, world) {
                    let probe_y = position.y - GROUND_PROBE_DEPTH;
                    self.settle(&mut position, probe_y, world);
                    on_ground = true;
                    velocity.y = 0.0;
                }
            }
        }

        if position.y <= WORLD_FLOOR_Y {
            position.y = WORLD_FLOOR_Y;
            velocity.y = velocity.y.max(0.0);
            on_ground = true;
        }

        Resolution {
            position,
            velocity,
            on_ground,
        }
    }

    /// Whether any body sample at `position` is inside a solid cell.
    pub fn collides<Q: BlockQuery + ?Sized>(&self, position: Point3<f32>, world: &Q) -> bool {
        self.samples.iter().any(|offset| {
            let p = position + *offset;
            world.is_solid(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
        })
    }

    /// Whether a body at `position` has a solid cell just under it.
    pub fn is_supported<Q: BlockQuery + ?Sized>(&self, position: Point3<f32>, world: &Q) -> bool {
        let probe = Point3::new(position.x, position.y - GROUND_PROBE_DEPTH, position.z);
        self.collides(probe, world)
    }

    /// Moves along one axis in slices of at most `MAX_SWEEP_STEP`.
    ///
    /// # Returns
    /// `true` if the full displacement was applied, `false` if a slice was
    /// rejected. A rejected downward move still lands the body on top of the
    /// blocking cell when that spot is free.
    fn sweep_axis<Q: BlockQuery + ?Sized>(
        &self,
        position: &mut Point3<f32>,
        axis: usize,
        displacement: f32,
        world: &Q,
    ) -> bool {
        if displacement == 0.0 {
            return true;
        }

        let steps = (displacement.abs() / MAX_SWEEP_STEP).ceil().max(1.0) as u32;
        let slice = displacement / steps as f32;

        for _ in 0..steps {
            let mut tentative = *position;
            tentative[axis] += slice;

            if !self.collides(tentative, world) {
                *position = tentative;
                continue;
            }

            if axis == 1 && slice < 0.0 {
                self.settle(position, tentative.y, world);
            }
            return false;
        }
        true
    }

    /// Drops the body onto the top of the cell its lowest sample would occupy
    /// at `blocked_y`, if that spot is free and not above the current one.
    fn settle<Q: BlockQuery + ?Sized>(&self, position: &mut Point3<f32>, blocked_y: f32, world: &Q) {
        let landing_y = (blocked_y + self.lowest_sample).floor() + 1.0 - self.lowest_sample;
        let landing = Point3::new(position.x, landing_y, position.z);
        if landing_y <= position.y && !self.collides(landing, world) {
            *position = landing;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};

    #[derive(Default)]
    struct TestWorld {
        blocks: HashMap<(i32, i32, i32), BlockType>,
    }

    impl TestWorld {
        fn with(mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> Self {
            self.blocks.insert((x, y, z), block_type);
            self
        }
    }

    impl BlockQuery for TestWorld {
        fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
            self.blocks
                .get(&(x, y, z))
                .map(|&block_type| Block::new(block_type, x, y, z))
        }
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn falling_body_lands_exactly_on_block_top() {
        let world = TestWorld::default().with(0, 64, 0, BlockType::STONE);
        let resolver = CollisionResolver::default();

        let mut position = Point3::new(0.5, 66.3, 0.5);
        let mut velocity = Vector3::new(0.0, -12.0, 0.0);
        let mut landed = None;
        for tick in 0..120 {
            let r = resolver.resolve(position, velocity, DT, SweepMode::Solid, &world);
            position = r.position;
            velocity = r.velocity;
            if r.on_ground {
                landed = Some(tick);
                break;
            }
        }

        assert!(landed.is_some());
        assert_eq!(position.y, 65.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn landing_happens_on_the_tick_of_impact() {
        let world = TestWorld::default().with(0, 64, 0, BlockType::STONE);
        let resolver = CollisionResolver::default();

        let r = resolver.resolve(
            Point3::new(0.5, 65.1, 0.5),
            Vector3::new(0.0, -10.0, 0.0),
            DT,
            SweepMode::Solid,
            &world,
        );
        assert!(r.on_ground);
        assert_eq!(r.position.y, 65.0);
        assert_eq!(r.velocity.y, 0.0);
    }

    #[test]
    fn head_bump_stops_upward_motion() {
        let world = TestWorld::default().with(0, 67, 0, BlockType::DIRT);
        let resolver = CollisionResolver::default();

        let start = Point3::new(0.5, 65.2, 0.5);
        let r = resolver.resolve(start, Vector3::new(0.0, 10.0, 0.0), DT, SweepMode::Solid, &world);
        assert_eq!(r.position.y, start.y);
        assert_eq!(r.velocity.y, 0.0);
        assert!(!r.on_ground);
    }

    #[test]
    fn walls_block_only_their_axis() {
        let world = TestWorld::default()
            .with(1, 65, 0, BlockType::STONE)
            .with(0, 64, 0, BlockType::STONE)
            .with(0, 64, 1, BlockType::STONE);
        let resolver = CollisionResolver::default();

        let start = Point3::new(0.5, 65.0, 0.5);
        let r = resolver.resolve(start, Vector3::new(30.0, 0.0, 6.0), DT, SweepMode::Solid, &world);

        assert_eq!(r.position.x, start.x);
        assert_eq!(r.velocity.x, 0.0);
        assert!((r.position.z - (start.z + 0.1)).abs() < 1e-5);
        assert_eq!(r.velocity.z, 6.0);
        assert!(r.on_ground);
    }

    #[test]
    fn water_does_not_block() {
        let world = TestWorld::default()
            .with(0, 64, 0, BlockType::WATER)
            .with(0, 65, 0, BlockType::WATER);
        let resolver = CollisionResolver::default();

        let r = resolver.resolve(
            Point3::new(0.5, 65.5, 0.5),
            Vector3::new(0.0, -6.0, 0.0),
            DT,
            SweepMode::Solid,
            &world,
        );
        assert!((r.position.y - 65.4).abs() < 1e-5);
        assert!(!r.on_ground);
    }

    #[test]
    fn fast_fall_does_not_tunnel_through_a_thin_floor() {
        let world = TestWorld::default().with(0, 40, 0, BlockType::STONE);
        let resolver = CollisionResolver::default();

        // 3 blocks per tick, far more than one cell.
        let r = resolver.resolve(
            Point3::new(0.5, 42.5, 0.5),
            Vector3::new(0.0, -180.0, 0.0),
            DT,
            SweepMode::Solid,
            &world,
        );
        assert_eq!(r.position.y, 41.0);
        assert!(r.on_ground);
    }

    #[test]
    fn resting_body_stays_grounded() {
        let world = TestWorld::default().with(0, 64, 0, BlockType::GRASS);
        let resolver = CollisionResolver::default();

        let r = resolver.resolve(
            Point3::new(0.5, 65.0, 0.5),
            Vector3::new(0.0, 0.0, 0.0),
            DT,
            SweepMode::Solid,
            &world,
        );
        assert!(r.on_ground);
        assert_eq!(r.position.y, 65.0);
    }

    #[test]
    fn world_floor_counts_as_ground() {
        let world = TestWorld::default();
        let resolver = CollisionResolver::default();

        let r = resolver.resolve(
            Point3::new(0.5, 1.1, 0.5),
            Vector3::new(0.0, -30.0, 0.0),
            DT,
            SweepMode::Solid,
            &world,
        );
        assert_eq!(r.position.y, WORLD_FLOOR_Y);
        assert_eq!(r.velocity.y, 0.0);
        assert!(r.on_ground);
    }

    #[test]
    fn passthrough_ignores_blocks_but_not_the_floor() {
        let world = TestWorld::default().with(1, 65, 0, BlockType::STONE);
        let resolver = CollisionResolver::default();

        let r = resolver.resolve(
            Point3::new(0.5, 65.0, 0.5),
            Vector3::new(60.0, 0.0, 0.0),
            DT,
            SweepMode::Passthrough,
            &world,
        );
        assert!((r.position.x - 1.5).abs() < 1e-5);
        assert!(!r.on_ground);

        let r = resolver.resolve(
            Point3::new(0.5, 1.2, 0.5),
            Vector3::new(0.0, -60.0, 0.0),
            DT,
            SweepMode::Passthrough,
            &world,
        );
        assert_eq!(r.position.y, WORLD_FLOOR_Y);
        assert!(r.on_ground);
    }
}
