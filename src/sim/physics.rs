//! Bounded kinematics for the ball
//!
//! Screen-space coordinates: x grows to the right, y grows downward, so a
//! positive vertical velocity means falling. Every tick integrates:
//!
//! 1. a pending jump replaces the velocity with `-jump_velocity`
//! 2. the position moves by `velocity * dt` and is clamped to the playfield
//! 3. `on_ground` is recomputed against the floor bound
//! 4. gravity accelerates the ball unless it is resting on the floor
//! 5. a downward velocity on the floor bounces back at half speed, and a
//!    rebound slower than `bounce_rest_speed` comes to rest
//!
//! Large ticks are split into substeps no longer than `max_substep` so the
//! bounce sequence settles the same way at any tick rate.

/// Upper bound on substeps per tick (a tick after a long stall)
const MAX_SUBSTEPS: u32 = 1024;

/// Tunable constants of the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    /// Whether gravity, jumping and bouncing are active
    pub gravity: bool,
    /// Downward acceleration in px/s²
    pub acceleration: f32,
    /// Vertical velocity the ball starts with in px/s
    pub initial_velocity: f32,
    /// Upward speed of a jump impulse in px/s
    pub jump_velocity: f32,
    /// Speed of key-driven movement in px/s
    pub movement_speed: f32,
    /// Rebounds slower than this come to rest
    pub bounce_rest_speed: f32,
    /// Tolerance of the floor comparison (0.0 means exact equality)
    pub ground_epsilon: f32,
    /// Longest integration step in seconds
    pub max_substep: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: true,
            acceleration: 1200.0,
            initial_velocity: 600.0,
            jump_velocity: 1000.0,
            movement_speed: 400.0,
            bounce_rest_speed: 60.0,
            ground_epsilon: 1e-3,
            max_substep: 1.0 / 120.0,
        }
    }
}

/// The area the ball must stay inside, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest top-left position a shape of `radius` can take
    pub fn max_position(&self, radius: f32) -> [f32; 2] {
        [
            (self.width - radius * 2.0).max(0.0),
            (self.height - radius * 2.0).max(0.0),
        ]
    }

    /// Vertical position of a shape resting on the bottom edge
    pub fn floor(&self, radius: f32) -> f32 {
        self.max_position(radius)[1]
    }
}

/// Moves a position by `delta`, keeping the shape's bounding box on screen
pub fn move_clamped(
    position: [f32; 2],
    delta: [f32; 2],
    radius: f32,
    playfield: Playfield,
) -> [f32; 2] {
    let max = playfield.max_position(radius);
    [
        (position[0] + delta[0]).clamp(0.0, max[0]),
        (position[1] + delta[1]).clamp(0.0, max[1]),
    ]
}

/// Whether a shape at vertical position `y` touches the floor
pub fn is_on_ground(y: f32, radius: f32, playfield: Playfield, epsilon: f32) -> bool {
    (playfield.floor(radius) - y).abs() <= epsilon
}

/// Reflects a downward velocity off the floor at half speed
///
/// Returns zero when the rebound would be slower than `rest_speed`.
pub fn bounce(velocity: f32, rest_speed: f32) -> f32 {
    let rebound = -(velocity / 2.0);
    if rebound > -rest_speed { 0.0 } else { rebound }
}

/// Position delta for key-driven movement
///
/// `direction` components are expected in `-1.0..=1.0`; there is no
/// velocity state, the ball moves at a constant speed while a key is held.
pub fn walk_delta(direction: [f32; 2], speed: f32, dt: f32) -> [f32; 2] {
    [direction[0] * speed * dt, direction[1] * speed * dt]
}

/// Number of substeps used to integrate a tick of length `dt`
pub fn substep_count(dt: f32, max_substep: f32) -> u32 {
    if dt <= 0.0 {
        return 0;
    }
    if max_substep <= 0.0 {
        return 1;
    }
    ((dt / max_substep).ceil() as u32).clamp(1, MAX_SUBSTEPS)
}

/// Vertical motion state carried from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    velocity: f32,
    on_ground: bool,
    jump_requested: bool,
    bounces: u64,
}

impl PhysicsState {
    /// Creates the state the ball starts the program with
    pub fn new(params: &PhysicsParams) -> Self {
        Self {
            velocity: if params.gravity {
                params.initial_velocity
            } else {
                0.0
            },
            on_ground: false,
            jump_requested: false,
            bounces: 0,
        }
    }

    /// Creates a state with an explicit velocity (useful for replaying scenarios)
    pub fn with_velocity(velocity: f32) -> Self {
        Self {
            velocity,
            on_ground: false,
            jump_requested: false,
            bounces: 0,
        }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Total number of floor bounces so far
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    /// True once the ball lies on the floor without moving
    pub fn is_at_rest(&self) -> bool {
        self.on_ground && self.velocity == 0.0
    }

    /// Sets the jump flag for the next tick
    ///
    /// The flag is level-triggered: callers recompute it every tick, so a
    /// released key or a ball in the air clears it again.
    pub fn request_jump(&mut self, requested: bool) {
        self.jump_requested = requested;
    }

    /// Applies a pending jump impulse, consuming the flag
    pub fn apply_jump(&mut self, params: &PhysicsParams) -> bool {
        if !self.jump_requested {
            return false;
        }
        self.jump_requested = false;
        self.velocity = -params.jump_velocity;
        true
    }

    /// Integrates one tick and returns the new position
    pub fn step(
        &mut self,
        position: [f32; 2],
        radius: f32,
        dt: f32,
        params: &PhysicsParams,
        playfield: Playfield,
    ) -> [f32; 2] {
        if !params.gravity {
            self.jump_requested = false;
            self.velocity = 0.0;
            return self.settle(position, radius, params, playfield);
        }

        self.apply_jump(params);

        let substeps = substep_count(dt, params.max_substep);
        if substeps == 0 {
            return self.settle(position, radius, params, playfield);
        }

        let h = dt / substeps as f32;
        let mut position = position;
        for _ in 0..substeps {
            position = move_clamped(position, [0.0, self.velocity * h], radius, playfield);
            self.on_ground = is_on_ground(position[1], radius, playfield, params.ground_epsilon);

            if self.velocity != 0.0 || !self.on_ground {
                self.velocity += params.acceleration * h;
            }

            if self.on_ground && self.velocity > 0.0 {
                self.velocity = bounce(self.velocity, params.bounce_rest_speed);
                self.bounces += 1;
            }
        }

        position
    }

    /// Clamps without integrating and refreshes the ground flag
    fn settle(
        &mut self,
        position: [f32; 2],
        radius: f32,
        params: &PhysicsParams,
        playfield: Playfield,
    ) -> [f32; 2] {
        let position = move_clamped(position, [0.0, 0.0], radius, playfield);
        self.on_ground = is_on_ground(position[1], radius, playfield, params.ground_epsilon);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(1024.0, 768.0)
    }

    #[test]
    fn test_max_position_and_floor() {
        assert_eq!(field().max_position(10.0), [1004.0, 748.0]);
        assert_eq!(field().floor(10.0), 748.0);
    }

    #[test]
    fn test_move_clamped_stays_on_screen() {
        assert_eq!(move_clamped([5.0, 5.0], [-50.0, -50.0], 10.0, field()), [0.0, 0.0]);
        assert_eq!(
            move_clamped([1000.0, 740.0], [50.0, 50.0], 10.0, field()),
            [1004.0, 748.0]
        );
        assert_eq!(move_clamped([100.0, 100.0], [4.0, -2.0], 10.0, field()), [104.0, 98.0]);
    }

    #[test]
    fn test_ground_detection() {
        assert!(is_on_ground(748.0, 10.0, field(), 0.0));
        assert!(is_on_ground(747.9995, 10.0, field(), 1e-3));
        assert!(!is_on_ground(747.9995, 10.0, field(), 0.0));
        assert!(!is_on_ground(700.0, 10.0, field(), 1e-3));
    }

    #[test]
    fn test_bounce_halves_and_reverses() {
        assert_eq!(bounce(600.0, 60.0), -300.0);
        assert_eq!(bounce(130.0, 60.0), -65.0);
    }

    #[test]
    fn test_weak_bounce_comes_to_rest() {
        assert_eq!(bounce(100.0, 60.0), 0.0);
        assert_eq!(bounce(119.0, 60.0), 0.0);
    }

    #[test]
    fn test_substep_count() {
        assert_eq!(substep_count(0.0, 1.0 / 120.0), 0);
        assert_eq!(substep_count(1.0 / 240.0, 1.0 / 120.0), 1);
        assert_eq!(substep_count(0.1, 1.0 / 120.0), 12);
        assert_eq!(substep_count(0.1, 0.0), 1);
        assert_eq!(substep_count(1.0e6, 1.0 / 120.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let params = PhysicsParams::default();
        let mut state = PhysicsState::with_velocity(250.0);
        state.request_jump(true);
        assert!(state.apply_jump(&params));
        assert_eq!(state.velocity(), -params.jump_velocity);
        assert!(!state.jump_requested());
        assert!(!state.apply_jump(&params));
    }

    #[test]
    fn test_resting_ball_stays_put() {
        let params = PhysicsParams::default();
        let mut state = PhysicsState::with_velocity(0.0);
        let pos = state.step([100.0, 748.0], 10.0, 1.0 / 60.0, &params, field());
        assert_eq!(pos, [100.0, 748.0]);
        assert!(state.is_at_rest());
    }

    #[test]
    fn test_ball_in_air_with_zero_velocity_falls() {
        let params = PhysicsParams::default();
        let mut state = PhysicsState::with_velocity(0.0);
        let pos = state.step([100.0, 300.0], 10.0, 0.1, &params, field());
        assert!(pos[1] > 300.0);
        assert!(state.velocity() > 0.0);
        assert!(!state.on_ground());
    }

    #[test]
    fn test_gravity_disabled_freezes_vertical_motion() {
        let params = PhysicsParams {
            gravity: false,
            ..Default::default()
        };
        let mut state = PhysicsState::new(&params);
        state.request_jump(true);
        let pos = state.step([100.0, 300.0], 10.0, 0.5, &params, field());
        assert_eq!(pos, [100.0, 300.0]);
        assert_eq!(state.velocity(), 0.0);
        assert!(!state.jump_requested());
    }

    #[test]
    fn test_zero_dt_only_reclamps() {
        let params = PhysicsParams::default();
        let mut state = PhysicsState::with_velocity(400.0);
        let pos = state.step([2000.0, 900.0], 10.0, 0.0, &params, field());
        assert_eq!(pos, [1004.0, 748.0]);
        assert!(state.on_ground());
        assert_eq!(state.velocity(), 400.0);
    }

    #[test]
    fn test_walk_delta() {
        assert_eq!(walk_delta([-1.0, 0.0], 400.0, 0.5), [-200.0, 0.0]);
        assert_eq!(walk_delta([0.0, 0.0], 400.0, 0.5), [0.0, 0.0]);
    }
}
