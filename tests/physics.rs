//! Integration tests for the ball integrator and the per-tick world update

use gravity_ball::sim::physics::{is_on_ground, move_clamped};
use gravity_ball::sim::{
    Intent, PhysicsParams, PhysicsState, Playfield, Shape, SharedShape, World,
};

const RADIUS: f32 = 10.0;
const FLOOR: f32 = 748.0;

fn field() -> Playfield {
    Playfield::new(1024.0, 768.0)
}

fn published(position: [f32; 2]) -> SharedShape {
    let shared = SharedShape::new();
    shared.publish(Shape::new(position, RADIUS, [0.0, 1.0, 0.0]));
    shared
}

#[test]
fn test_clamping_keeps_ball_on_screen() {
    let max = field().max_position(RADIUS);
    let deltas = [-5000.0, -750.0, -1.0, 0.0, 0.5, 20.0, 999.0, 5000.0];

    for x in (0..=1004).step_by(59) {
        for y in (0..=748).step_by(43) {
            for dx in deltas {
                for dy in deltas {
                    let [nx, ny] = move_clamped([x as f32, y as f32], [dx, dy], RADIUS, field());
                    assert!((0.0..=max[0]).contains(&nx), "x {nx} from {x}+{dx}");
                    assert!((0.0..=max[1]).contains(&ny), "y {ny} from {y}+{dy}");
                }
            }
        }
    }
}

#[test]
fn test_ground_detection_at_floor_only() {
    assert!(is_on_ground(FLOOR, RADIUS, field(), 0.0));
    assert!(!is_on_ground(FLOOR - 1.0, RADIUS, field(), 1e-3));
    assert!(!is_on_ground(0.0, RADIUS, field(), 1e-3));
}

#[test]
fn test_bounces_converge_to_rest() {
    let params = PhysicsParams::default();
    let mut state = PhysicsState::with_velocity(params.initial_velocity);
    let mut position = [100.0, FLOOR];

    for _ in 0..100 {
        position = state.step(position, RADIUS, 0.1, &params, field());
        assert!(position[1] <= FLOOR);
        if state.is_at_rest() {
            break;
        }
    }

    assert!(state.is_at_rest(), "ball still moving at {position:?}");
    assert_eq!(state.velocity(), 0.0);
    assert_eq!(position[1], FLOOR);
    assert!(state.bounces() >= 1 && state.bounces() <= 10);
}

#[test]
fn test_jump_impulse_replaces_velocity_exactly() {
    let params = PhysicsParams::default();
    for prior in [-300.0, 0.0, 42.5, 900.0] {
        let mut state = PhysicsState::with_velocity(prior);
        state.request_jump(true);
        assert!(state.apply_jump(&params));
        assert_eq!(state.velocity(), -1000.0);
    }
}

#[test]
fn test_jump_impulse_then_gravity() {
    let params = PhysicsParams::default();
    let dt = 1.0 / 60.0;
    let mut state = PhysicsState::with_velocity(0.0);
    state.request_jump(true);

    let position = state.step([100.0, FLOOR], RADIUS, dt, &params, field());

    let expected = -params.jump_velocity + params.acceleration * dt;
    assert!((state.velocity() - expected).abs() < 1e-2, "velocity {}", state.velocity());
    assert!(position[1] < FLOOR);
    assert!(!state.on_ground());
    assert!(!state.jump_requested());
}

#[test]
fn test_drop_from_center_comes_to_rest_on_floor() {
    let mut world = World::new(PhysicsParams::default(), field());
    let shared = published([507.0, 374.0]);
    let mut previous = 374.0;

    for _ in 0..200 {
        let outcome = world
            .tick(0.1, Intent::default(), &shared)
            .expect("shape is published");
        let [x, y] = outcome.position;

        assert_eq!(x, 507.0);
        assert!(y <= FLOOR, "ball left the screen at y = {y}");
        if world.body().bounces() == 0 {
            assert!(y >= previous, "ball rose before touching the floor");
        }
        previous = y;

        if world.body().is_at_rest() {
            break;
        }
    }

    assert!(world.body().is_at_rest());
    assert_eq!(shared.snapshot().map(|s| s.position), Some([507.0, FLOOR]));
    assert!(world.body().bounces() > 0);
}

#[test]
fn test_resting_ball_ignores_time() {
    let mut world = World::new(PhysicsParams::default(), field())
        .with_body(PhysicsState::with_velocity(0.0));
    let shared = published([300.0, FLOOR]);

    for dt in [1.0 / 144.0, 1.0 / 60.0, 0.25] {
        let outcome = world.tick(dt, Intent::default(), &shared).unwrap();
        assert_eq!(outcome.position, [300.0, FLOOR]);
        assert_eq!(outcome.velocity, 0.0);
        assert!(outcome.on_ground);
    }
}

#[test]
fn test_walking_stops_at_walls() {
    let mut world = World::new(PhysicsParams::default(), field())
        .with_body(PhysicsState::with_velocity(0.0));
    let shared = published([20.0, FLOOR]);
    let left = Intent {
        direction: [-1.0, 0.0],
        jump: false,
    };

    let outcome = world.tick(0.5, left, &shared).unwrap();
    assert_eq!(outcome.position, [0.0, FLOOR]);

    let right = Intent {
        direction: [1.0, 0.0],
        jump: false,
    };
    for _ in 0..10 {
        world.tick(0.5, right, &shared);
    }
    assert_eq!(shared.acquire().position(), Some([1004.0, FLOOR]));
}

#[test]
fn test_without_gravity_ball_floats() {
    let params = PhysicsParams {
        gravity: false,
        ..Default::default()
    };
    let mut world = World::new(params, field());
    let shared = published([507.0, 374.0]);

    for _ in 0..50 {
        world.tick(0.1, Intent::default(), &shared);
    }
    assert_eq!(shared.acquire().position(), Some([507.0, 374.0]));

    let down = Intent {
        direction: [0.0, 1.0],
        jump: true,
    };
    let outcome = world.tick(0.25, down, &shared).unwrap();
    assert_eq!(outcome.position, [507.0, 474.0]);
    assert_eq!(outcome.velocity, 0.0);
    assert!(!world.body().jump_requested());
}

#[test]
fn test_ball_at_apex_with_zero_velocity_falls_again() {
    let mut world = World::new(PhysicsParams::default(), field())
        .with_body(PhysicsState::with_velocity(0.0));
    let shared = published([507.0, 568.0]);

    let outcome = world.tick(0.1, Intent::default(), &shared).unwrap();
    assert!(outcome.position[1] > 568.0);
    assert!(outcome.velocity > 0.0);
}

#[test]
fn test_drop_settles_at_any_tick_rate() {
    for dt in [1.0 / 144.0, 1.0 / 60.0, 0.1, 0.25] {
        let mut world = World::new(PhysicsParams::default(), field());
        let shared = published([507.0, 374.0]);
        let ticks = (30.0 / dt) as usize;

        for _ in 0..ticks {
            world.tick(dt, Intent::default(), &shared);
            if world.body().is_at_rest() {
                break;
            }
        }

        assert!(world.body().is_at_rest(), "no rest at dt = {dt}");
        assert_eq!(shared.acquire().position(), Some([507.0, FLOOR]));
    }
}
