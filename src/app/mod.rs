//! Game application module
//!
//! Handles windowing, rendering, and user input.

pub mod config;
pub mod display;
pub mod input;
pub mod renderer;
mod runner;
pub mod window;

pub use config::{AppConfig, BallConfig, PhysicsConfig, RenderConfig, WindowConfig};
pub use runner::App;
pub use window::window_attributes_from_config;
