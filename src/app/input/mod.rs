//! Input handling
//!
//! Keys are tracked from winit events and polled once per physics tick:
//!
//! ```text
//! Raw Input (winit) → InputCollector → InputState → Controls → sim::Intent
//! ```
//!
//! # Usage
//!
//! ```ignore
//! // In window_event()
//! collector.handle_window_event(&event);
//!
//! // Each tick
//! let controls = Controls::from_state(collector.state(), gravity);
//! ```

mod collector;
mod controls;
mod keys;
mod state;

pub use collector::InputCollector;
pub use controls::Controls;
pub use keys::Key;
pub use state::{InputState, KeyboardState};
