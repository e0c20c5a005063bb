//! Physics integrator health check

use crate::health::check::{CheckResult, Findings, SystemCheck};
use crate::sim::{Intent, Playfield, PhysicsParams, PhysicsState, Shape, SharedShape, World};

/// Ticks allowed for a dropped ball to come to rest
const SETTLE_TICKS: usize = 2_000;

/// Runs short headless scenarios through the integrator
pub struct PhysicsCheck {
    params: PhysicsParams,
}

impl PhysicsCheck {
    pub fn new() -> Self {
        Self {
            params: PhysicsParams::default(),
        }
    }

    pub fn with_params(params: PhysicsParams) -> Self {
        Self { params }
    }
}

impl Default for PhysicsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for PhysicsCheck {
    fn name(&self) -> &'static str {
        "Physics"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Drops, bounces and jumps the ball without a window")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();
        let field = Playfield::new(1024.0, 768.0);
        let floor = field.floor(10.0);

        // Drop from the middle at 60 ticks per second
        let shared = SharedShape::new();
        shared.publish(Shape::centered(field, 10.0, [0.0, 1.0, 0.0]));
        let mut world = World::new(self.params, field);
        let mut rested_at = None;
        for tick in 0..SETTLE_TICKS {
            world.tick(1.0 / 60.0, Intent::default(), &shared);
            if !self.params.gravity || world.body().is_at_rest() {
                rested_at = Some(tick + 1);
                break;
            }
        }
        match (rested_at, shared.acquire().position()) {
            (Some(ticks), Some(position))
                if !self.params.gravity
                    || (position[1] - floor).abs() <= self.params.ground_epsilon =>
            {
                findings.ok(format!(
                    "Dropped ball settles after {ticks} ticks and {} bounces",
                    world.body().bounces()
                ))
            }
            (_, position) => findings.fail(format!(
                "Dropped ball did not settle within {SETTLE_TICKS} ticks (position {position:?})"
            )),
        }

        // Jump impulse replaces the velocity
        let mut state = PhysicsState::with_velocity(250.0);
        state.request_jump(true);
        state.apply_jump(&self.params);
        findings.expect(
            state.velocity() == -self.params.jump_velocity,
            format!("Jump sets velocity to {}", -self.params.jump_velocity),
        );

        // Clamping keeps the ball on screen
        let corners = [[-50.0, -50.0], [5_000.0, 5_000.0], [-1.0, 900.0]];
        let max = field.max_position(10.0);
        let clamped = corners.iter().all(|delta| {
            let p = crate::sim::physics::move_clamped([500.0, 300.0], *delta, 10.0, field);
            (0.0..=max[0]).contains(&p[0]) && (0.0..=max[1]).contains(&p[1])
        });
        findings.expect(clamped, "Large moves stay inside the playfield");

        findings.finish("Integrator settles, jumps and clamps")
    }
}
