//! Single-slot handoff of the ball between the render and physics threads
//!
//! The render thread constructs the [`Shape`] and publishes it; the physics
//! thread waits for the publication, then moves the shape while the render
//! thread reads it every frame. Both sides go through the same mutex and
//! hold it only for one read or one write.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::shape::Shape;

/// Why waiting for the shape did not produce one
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    #[error("renderer stopped before publishing the shape")]
    Abandoned,
    #[error("shape was retracted during shutdown")]
    Retracted,
    #[error("timed out waiting for the renderer to publish the shape")]
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Pending,
    Published(Shape),
    Abandoned,
    Retracted,
}

#[derive(Debug)]
struct Inner {
    slot: Mutex<Slot>,
    published: Condvar,
}

/// Shared handle to the one live [`Shape`]
///
/// Discipline: the render thread is the only publisher, the physics thread
/// is the only writer of the position once published, and the render thread
/// only reads. Every access happens under the internal lock, so a reader
/// always sees a position written by a single `set_position` call.
///
/// Lifecycle: `Pending` until [`publish`](Self::publish) or
/// [`abandon`](Self::abandon), then `Published` until
/// [`retract`](Self::retract) at shutdown.
#[derive(Debug, Clone)]
pub struct SharedShape {
    inner: Arc<Inner>,
}

impl SharedShape {
    /// Creates an empty handle
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot::Pending),
                published: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panic while holding the lock cannot leave a half-written shape
        // because every write replaces a `Copy` value.
        self.inner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the shape visible to the physics thread and wakes any waiter
    pub fn publish(&self, shape: Shape) {
        *self.lock() = Slot::Published(shape);
        self.inner.published.notify_all();
    }

    /// Signals that the shape will never be published
    pub fn abandon(&self) {
        let mut slot = self.lock();
        if matches!(*slot, Slot::Pending) {
            *slot = Slot::Abandoned;
        }
        drop(slot);
        self.inner.published.notify_all();
    }

    /// Removes the shape at shutdown, returning its last state
    pub fn retract(&self) -> Option<Shape> {
        let mut slot = self.lock();
        let previous = std::mem::replace(&mut *slot, Slot::Retracted);
        drop(slot);
        self.inner.published.notify_all();
        match previous {
            Slot::Published(shape) => Some(shape),
            _ => None,
        }
    }

    /// Blocks until the shape is published and returns a copy of it
    pub fn wait_published(&self) -> Result<Shape, HandoffError> {
        let slot = self
            .inner
            .published
            .wait_while(self.lock(), |slot| matches!(slot, Slot::Pending))
            .unwrap_or_else(PoisonError::into_inner);
        Self::resolve(&slot)
    }

    /// Like [`wait_published`](Self::wait_published) but gives up after `timeout`
    pub fn wait_published_timeout(&self, timeout: Duration) -> Result<Shape, HandoffError> {
        let (slot, result) = self
            .inner
            .published
            .wait_timeout_while(self.lock(), timeout, |slot| matches!(slot, Slot::Pending))
            .unwrap_or_else(PoisonError::into_inner);
        if result.timed_out() && matches!(*slot, Slot::Pending) {
            return Err(HandoffError::TimedOut);
        }
        Self::resolve(&slot)
    }

    fn resolve(slot: &Slot) -> Result<Shape, HandoffError> {
        match *slot {
            Slot::Published(shape) => Ok(shape),
            Slot::Abandoned => Err(HandoffError::Abandoned),
            Slot::Retracted => Err(HandoffError::Retracted),
            // wait_while only returns once the slot left Pending
            Slot::Pending => Err(HandoffError::TimedOut),
        }
    }

    /// Takes the lock for one read or write of the shape
    pub fn acquire(&self) -> ShapeGuard<'_> {
        ShapeGuard { slot: self.lock() }
    }

    /// Copies the current shape out under the lock
    pub fn snapshot(&self) -> Option<Shape> {
        self.acquire().shape().copied()
    }

    /// Whether a shape is currently published
    pub fn is_published(&self) -> bool {
        matches!(*self.lock(), Slot::Published(_))
    }
}

impl Default for SharedShape {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped lock over the shared shape; released on drop
pub struct ShapeGuard<'a> {
    slot: MutexGuard<'a, Slot>,
}

impl ShapeGuard<'_> {
    /// The published shape, if any
    pub fn shape(&self) -> Option<&Shape> {
        match &*self.slot {
            Slot::Published(shape) => Some(shape),
            _ => None,
        }
    }

    /// Current position of the published shape
    pub fn position(&self) -> Option<[f32; 2]> {
        self.shape().map(|shape| shape.position)
    }

    /// Writes a new position; returns false when nothing is published
    pub fn set_position(&mut self, position: [f32; 2]) -> bool {
        match &mut *self.slot {
            Slot::Published(shape) => {
                shape.position = position;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn ball() -> Shape {
        Shape::new([10.0, 20.0], 10.0, [0.0, 1.0, 0.0])
    }

    #[test]
    fn test_starts_empty() {
        let shared = SharedShape::new();
        assert!(!shared.is_published());
        assert_eq!(shared.snapshot(), None);
        assert!(!shared.acquire().set_position([1.0, 1.0]));
    }

    #[test]
    fn test_publish_then_write_and_read() {
        let shared = SharedShape::new();
        shared.publish(ball());
        assert!(shared.acquire().set_position([30.0, 40.0]));
        assert_eq!(shared.acquire().position(), Some([30.0, 40.0]));
        assert_eq!(shared.snapshot().map(|s| s.radius), Some(10.0));
    }

    #[test]
    fn test_wait_returns_after_publish_from_other_thread() {
        let shared = SharedShape::new();
        let publisher = shared.clone();
        let handle = thread::spawn(move || publisher.publish(ball()));
        assert_eq!(shared.wait_published(), Ok(ball()));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_reports_abandon() {
        let shared = SharedShape::new();
        let other = shared.clone();
        let handle = thread::spawn(move || other.abandon());
        assert_eq!(shared.wait_published(), Err(HandoffError::Abandoned));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_timeout() {
        let shared = SharedShape::new();
        assert_eq!(
            shared.wait_published_timeout(Duration::from_millis(10)),
            Err(HandoffError::TimedOut)
        );
    }

    #[test]
    fn test_abandon_does_not_clobber_published_shape() {
        let shared = SharedShape::new();
        shared.publish(ball());
        shared.abandon();
        assert_eq!(shared.snapshot(), Some(ball()));
    }

    #[test]
    fn test_retract_returns_last_state() {
        let shared = SharedShape::new();
        shared.publish(ball());
        shared.acquire().set_position([1.0, 2.0]);
        let last = shared.retract();
        assert_eq!(last.map(|s| s.position), Some([1.0, 2.0]));
        assert!(!shared.is_published());
        assert_eq!(shared.wait_published(), Err(HandoffError::Retracted));
    }
}
