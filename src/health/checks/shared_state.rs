//! Shared shape handoff health check

use std::thread;
use std::time::Duration;

use crate::health::check::{CheckResult, Findings, SystemCheck};
use crate::sim::{HandoffError, Shape, SharedShape};

/// Exercises the publish, wait, write, and retract cycle across threads
pub struct SharedStateCheck;

impl SharedStateCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SharedStateCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for SharedStateCheck {
    fn name(&self) -> &'static str {
        "Shared State"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates the startup barrier and the shape lock")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();
        let shared = SharedShape::new();
        let shape = Shape::new([502.0, 374.0], 10.0, [0.0, 1.0, 0.0]);

        let publisher = shared.clone();
        let handle = thread::spawn(move || publisher.publish(shape));
        let waited = shared.wait_published_timeout(Duration::from_secs(5));
        findings.expect(
            waited == Ok(shape),
            "Waiting thread wakes with the published shape",
        );
        findings.expect(handle.join().is_ok(), "Publisher thread joined");

        findings.expect(
            shared.acquire().set_position([10.0, 20.0])
                && shared.acquire().position() == Some([10.0, 20.0]),
            "Position write is visible to the next reader",
        );

        let last = shared.retract();
        findings.expect(
            last.map(|s| s.position) == Some([10.0, 20.0]) && !shared.is_published(),
            "Retract returns the last state and empties the slot",
        );
        findings.expect(
            shared.wait_published() == Err(HandoffError::Retracted),
            "Waiting after retract reports it instead of blocking",
        );

        let abandoned = SharedShape::new();
        abandoned.abandon();
        findings.expect(
            abandoned.wait_published() == Err(HandoffError::Abandoned),
            "Abandoned handoff releases the waiter",
        );

        findings.finish("Handoff and lock behave")
    }
}
