//! Integration tests for the shape handoff between threads

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use gravity_ball::sim::{HandoffError, Shape, SharedShape};

fn ball() -> Shape {
    Shape::new([0.0, 0.0], 10.0, [0.0, 1.0, 0.0])
}

#[test]
fn test_reader_never_sees_torn_position() {
    let shared = SharedShape::new();
    shared.publish(ball());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let shared = shared.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..20_000u32 {
                let i = i as f32;
                shared.acquire().set_position([i, i * 2.0]);
            }
            done.store(true, Ordering::Release);
        })
    };

    let reader = {
        let shared = shared.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut reads = 0u64;
            while !done.load(Ordering::Acquire) {
                let [x, y] = shared.acquire().position().expect("published");
                assert_eq!(y, x * 2.0, "torn read ({x}, {y})");
                reads += 1;
            }
            reads
        })
    };

    writer.join().unwrap();
    let reads = reader.join().unwrap();
    assert!(reads > 0);
    assert_eq!(shared.acquire().position(), Some([19_999.0, 39_998.0]));
}

#[test]
fn test_physics_waits_for_renderer_to_publish() {
    let shared = SharedShape::new();
    let renderer = {
        let shared = shared.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            shared.publish(Shape::new([502.0, 374.0], 10.0, [0.0, 1.0, 0.0]));
        })
    };

    let shape = shared
        .wait_published_timeout(Duration::from_secs(5))
        .expect("renderer publishes");
    assert_eq!(shape.position, [502.0, 374.0]);
    renderer.join().unwrap();
}

#[test]
fn test_failed_renderer_releases_waiter() {
    let shared = SharedShape::new();
    let renderer = {
        let shared = shared.clone();
        thread::spawn(move || shared.abandon())
    };

    assert_eq!(
        shared.wait_published_timeout(Duration::from_secs(5)),
        Err(HandoffError::Abandoned)
    );
    renderer.join().unwrap();
}

#[test]
fn test_retract_stops_further_updates() {
    let shared = SharedShape::new();
    shared.publish(ball());
    shared.acquire().set_position([5.0, 6.0]);

    assert_eq!(shared.retract().map(|s| s.position), Some([5.0, 6.0]));
    assert!(!shared.acquire().set_position([7.0, 8.0]));
    assert_eq!(shared.snapshot(), None);
    assert_eq!(shared.retract(), None);
}
