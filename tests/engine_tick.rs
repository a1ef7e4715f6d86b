//! Whole-engine behavior: input in, body motion and renderer state out.

use voxel_world::application_state::config::EngineConfig;
use voxel_world::application_state::input_manager::InputManager;
use voxel_world::engine_state::player_state::MotionMode;
use voxel_world::engine_state::rendering::HeadlessRenderer;
use voxel_world::engine_state::voxels::world::ChunkKey;
use voxel_world::engine_state::EngineState;
use winit::keyboard::KeyCode;

const DT: f32 = 1.0 / 60.0;

fn engine(seed: u32) -> EngineState<HeadlessRenderer> {
    let config = EngineConfig {
        seed,
        render_distance: 2,
    };
    EngineState::new(config, HeadlessRenderer::new()).unwrap()
}

fn run(engine: &mut EngineState<HeadlessRenderer>, input: &mut InputManager, ticks: usize) {
    for _ in 0..ticks {
        let snapshot = input.snapshot();
        engine.tick(DT, &snapshot);
    }
}

#[test]
fn same_seed_same_world() {
    let mut a = engine(1234);
    let mut b = engine(1234);
    let mut input = InputManager::new();
    run(&mut a, &mut input, 1);
    run(&mut b, &mut input, 1);

    assert_eq!(a.player().position, b.player().position);
    assert_eq!(a.renderer().total_faces(), b.renderer().total_faces());
    assert_eq!(a.renderer().mesh_count(), 25);
}

#[test]
fn flying_across_chunks_streams_the_world() {
    let mut engine = engine(8);
    let mut input = InputManager::new();

    input.intake_key(KeyCode::KeyF, true);
    run(&mut engine, &mut input, 1);
    input.intake_key(KeyCode::KeyF, false);
    assert_eq!(engine.player().mode(), MotionMode::Flying);

    // Yaw 0 faces +X. Fly for four seconds at 15 blocks per second.
    input.intake_key(KeyCode::KeyW, true);
    run(&mut engine, &mut input, 240);
    input.intake_key(KeyCode::KeyW, false);

    let position = engine.player().position;
    assert!((position.x - 60.5).abs() < 0.01, "x = {}", position.x);
    assert!((position.z - 0.5).abs() < 1e-4);

    // The window follows on the tick after the body enters a new chunk.
    run(&mut engine, &mut input, 1);
    assert_eq!(engine.world().center(), Some(ChunkKey::new(3, 0)));

    let mut registered: Vec<ChunkKey> = engine.renderer().registered_keys().copied().collect();
    registered.sort();
    assert_eq!(registered, engine.world().loaded_keys());
    assert!(!engine.world().is_loaded(ChunkKey::new(-2, 0)));
}

#[test]
fn leaving_flight_drops_the_body_back_to_the_ground() {
    let mut engine = engine(77);
    let mut input = InputManager::new();
    let spawn = engine.player().position;

    input.intake_key(KeyCode::KeyF, true);
    run(&mut engine, &mut input, 1);
    input.intake_key(KeyCode::KeyF, false);

    input.intake_key(KeyCode::Space, true);
    run(&mut engine, &mut input, 40);
    input.intake_key(KeyCode::Space, false);
    assert!(engine.player().position.y > spawn.y + 8.0);

    input.intake_key(KeyCode::KeyF, true);
    run(&mut engine, &mut input, 1);
    input.intake_key(KeyCode::KeyF, false);
    assert_eq!(engine.player().mode(), MotionMode::Walking);

    run(&mut engine, &mut input, 300);
    let landed = engine.player().position;
    assert!(engine.player().on_ground());
    assert_eq!(landed.y, spawn.y);
    assert_eq!(engine.player().velocity.y, 0.0);
}

#[test]
fn look_only_turns_while_captured() {
    let mut engine = engine(3);
    let mut input = InputManager::new();

    input.intake_mouse_motion((200.0, 0.0));
    run(&mut engine, &mut input, 1);
    assert_eq!(engine.player().yaw.0, 0.0);

    input.set_look_captured(true);
    input.intake_mouse_motion((200.0, -100.0));
    run(&mut engine, &mut input, 1);
    assert!((engine.player().yaw.0 - 0.4).abs() < 1e-5);
    assert!((engine.player().pitch.0 - 0.2).abs() < 1e-5);

    let pose = engine.renderer().camera().copied().unwrap();
    assert!((pose.yaw - 0.4).abs() < 1e-5);
}
