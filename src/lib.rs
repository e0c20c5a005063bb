//! Gravity Ball
//!
//! A ball under gravity in a window, built with Rust, winit, and wgpu.
//! Physics and input run on the main thread while a dedicated thread
//! renders; the two share one mutex-guarded ball.

/// Game application - windowing, rendering, and input handling
pub mod app;

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Startup and display error types
pub mod error;

/// System health checks runnable from the command line
pub mod health;

/// Ball simulation - shared shape, physics, and the per-tick update
pub mod sim;
