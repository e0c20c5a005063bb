//! Built-in health checks for core systems

pub mod build_info;
pub mod config;
pub mod graphics_backend;
pub mod overlay;
pub mod physics;
pub mod shared_state;
pub mod system_info;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use graphics_backend::GraphicsBackendCheck;
pub use overlay::OverlayCheck;
pub use physics::PhysicsCheck;
pub use shared_state::SharedStateCheck;
pub use system_info::SystemInfoCheck;
