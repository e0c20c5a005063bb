//! Ball simulation
//!
//! Handles the shared shape, its physics, and the per-tick update the
//! physics/input loop runs on the main thread.

pub mod physics;
pub mod shape;
pub mod shared;

pub use physics::{Playfield, PhysicsParams, PhysicsState};
pub use shape::Shape;
pub use shared::{HandoffError, ShapeGuard, SharedShape};

/// What the player asks the ball to do during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Held movement direction, each axis in `-1.0..=1.0`
    pub direction: [f32; 2],
    /// Whether the jump key is held
    pub jump: bool,
}

/// Result of one tick, as published to the shared shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub position: [f32; 2],
    pub velocity: f32,
    pub on_ground: bool,
}

/// Physics-side world state
///
/// Owns everything the physics loop keeps between ticks. The shape itself
/// lives in the [`SharedShape`] and is only touched under its lock.
pub struct World {
    /// Total number of simulation ticks elapsed
    tick_count: u64,
    /// Total simulation time elapsed in seconds
    sim_time: f64,
    params: PhysicsParams,
    playfield: Playfield,
    body: PhysicsState,
}

impl World {
    /// Creates a world with the body in its start state
    pub fn new(params: PhysicsParams, playfield: Playfield) -> Self {
        Self {
            tick_count: 0,
            sim_time: 0.0,
            body: PhysicsState::new(&params),
            params,
            playfield,
        }
    }

    /// Builder method to replace the starting body state
    pub fn with_body(mut self, body: PhysicsState) -> Self {
        self.body = body;
        self
    }

    /// Advances the ball by one tick
    ///
    /// Vertical physics runs first using the jump flag from the previous
    /// tick, then held keys move the ball and the jump flag is recomputed
    /// from the current key and ground state. Returns `None` when no shape
    /// is published.
    pub fn tick(
        &mut self,
        delta_time: f32,
        intent: Intent,
        shared: &SharedShape,
    ) -> Option<TickOutcome> {
        let mut guard = shared.acquire();
        let shape = *guard.shape()?;

        let mut position = self.body.step(
            shape.position,
            shape.radius,
            delta_time,
            &self.params,
            self.playfield,
        );

        let direction = if self.params.gravity {
            [intent.direction[0], 0.0]
        } else {
            intent.direction
        };
        if direction != [0.0, 0.0] {
            let delta = physics::walk_delta(direction, self.params.movement_speed, delta_time);
            position = physics::move_clamped(position, delta, shape.radius, self.playfield);
        }

        guard.set_position(position);
        drop(guard);

        self.body
            .request_jump(self.params.gravity && intent.jump && self.body.on_ground());

        self.tick_count += 1;
        self.sim_time += delta_time as f64;

        Some(TickOutcome {
            position,
            velocity: self.body.velocity(),
            on_ground: self.body.on_ground(),
        })
    }

    /// Updates the bounds after the window was resized
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.playfield = playfield;
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn body(&self) -> &PhysicsState {
        &self.body
    }

    /// Returns the current tick count
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns the total simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn published(position: [f32; 2]) -> SharedShape {
        let shared = SharedShape::new();
        shared.publish(Shape::new(position, 10.0, [0.0, 1.0, 0.0]));
        shared
    }

    #[test]
    fn test_tick_without_shape_does_nothing() {
        let mut world = World::new(PhysicsParams::default(), Playfield::new(1024.0, 768.0));
        let shared = SharedShape::new();
        assert_eq!(world.tick(0.1, Intent::default(), &shared), None);
        assert_eq!(world.tick_count(), 0);
    }

    #[test]
    fn test_tick_publishes_position() {
        let mut world = World::new(PhysicsParams::default(), Playfield::new(1024.0, 768.0));
        let shared = published([502.0, 374.0]);
        let outcome = world.tick(0.1, Intent::default(), &shared).unwrap();
        assert_eq!(shared.acquire().position(), Some(outcome.position));
        assert!(outcome.position[1] > 374.0);
        assert_eq!(world.tick_count(), 1);
        assert!((world.sim_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_jump_only_armed_on_ground() {
        let params = PhysicsParams::default();
        let field = Playfield::new(1024.0, 768.0);
        let jump = Intent {
            jump: true,
            ..Default::default()
        };

        let mut airborne = World::new(params, field);
        airborne.tick(1.0 / 60.0, jump, &published([100.0, 100.0]));
        assert!(!airborne.body().jump_requested());

        let mut grounded = World::new(params, field).with_body(PhysicsState::with_velocity(0.0));
        let shared = published([100.0, 748.0]);
        grounded.tick(1.0 / 60.0, jump, &shared);
        assert!(grounded.body().jump_requested());

        grounded.tick(1.0 / 60.0, Intent::default(), &shared);
        assert!(grounded.body().velocity() < 0.0);
        assert!(!grounded.body().jump_requested());
    }

    #[test]
    fn test_vertical_keys_only_without_gravity() {
        let field = Playfield::new(1024.0, 768.0);
        let up = Intent {
            direction: [0.0, -1.0],
            jump: false,
        };

        let mut floaty = World::new(
            PhysicsParams {
                gravity: false,
                ..Default::default()
            },
            field,
        );
        let shared = published([100.0, 300.0]);
        let outcome = floaty.tick(0.5, up, &shared).unwrap();
        assert_eq!(outcome.position, [100.0, 100.0]);

        let mut heavy = World::new(PhysicsParams::default(), field)
            .with_body(PhysicsState::with_velocity(0.0));
        let shared = published([100.0, 748.0]);
        let outcome = heavy.tick(0.5, up, &shared).unwrap();
        assert_eq!(outcome.position, [100.0, 748.0]);
    }
}
