//! Error types
//!
//! Startup failures are fatal and end the process with exit code 1. Display
//! query failures only cost the window its centered placement.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::HandoffError;

/// Fatal errors raised before both loops are running
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font {path} is not a usable TTF/OTF file")]
    FontFormat { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("renderer failed to initialize: {0}")]
    Renderer(String),

    #[error("renderer never published the ball: {0}")]
    Handoff(#[from] HandoffError),
}

/// Non-fatal failures of the primary display query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    #[error("display server reported no monitors")]
    NoMonitors,

    #[error("primary monitor has an empty geometry")]
    EmptyGeometry,
}
