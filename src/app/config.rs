//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::sim::{Playfield, PhysicsParams};

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Inner width in physical pixels
    pub width: u32,
    /// Inner height in physical pixels
    pub height: u32,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Place the window in the middle of the primary monitor
    pub center_on_primary: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gravity Ball".to_string(),
            width: 1024,
            height: 768,
            resizable: false,
            decorated: true,
            center_on_primary: true,
        }
    }
}

/// Render thread configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether to enable vsync
    pub vsync: bool,
    /// Frame cap in frames per second, 0 for none (ignored with vsync)
    pub frame_limit: u32,
    /// Requested MSAA sample count
    pub msaa_samples: u32,
    /// Number of triangles used to draw the ball
    pub circle_segments: u32,
    /// Optional TTF/OTF font for the FPS label
    pub font_path: Option<PathBuf>,
    /// Label font size in points
    pub font_size: f32,
    /// Top-left corner of the FPS label in pixels
    pub label_position: [f32; 2],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            frame_limit: 0,
            msaa_samples: 8,
            circle_segments: 48,
            font_path: None,
            font_size: 13.0,
            label_position: [5.0, 5.0],
        }
    }
}

impl RenderConfig {
    /// Minimum frame duration when the render loop paces itself
    pub fn frame_budget(&self) -> Option<std::time::Duration> {
        if self.vsync || self.frame_limit == 0 {
            return None;
        }
        Some(std::time::Duration::from_secs_f64(
            1.0 / self.frame_limit as f64,
        ))
    }
}

/// The ball's appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// RGB fill, each channel in 0..=1
    pub color: [f32; 3],
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            color: [0.0, 1.0, 0.0],
        }
    }
}

/// Integrator constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: bool,
    pub acceleration: f32,
    pub initial_velocity: f32,
    pub jump_velocity: f32,
    pub movement_speed: f32,
    pub bounce_rest_speed: f32,
    pub ground_epsilon: f32,
    pub max_substep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let params = PhysicsParams::default();
        Self {
            gravity: params.gravity,
            acceleration: params.acceleration,
            initial_velocity: params.initial_velocity,
            jump_velocity: params.jump_velocity,
            movement_speed: params.movement_speed,
            bounce_rest_speed: params.bounce_rest_speed,
            ground_epsilon: params.ground_epsilon,
            max_substep: params.max_substep,
        }
    }
}

impl From<&PhysicsConfig> for PhysicsParams {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            acceleration: config.acceleration,
            initial_velocity: config.initial_velocity,
            jump_velocity: config.jump_velocity,
            movement_speed: config.movement_speed,
            bounce_rest_speed: config.bounce_rest_speed,
            ground_epsilon: config.ground_epsilon,
            max_substep: config.max_substep,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub ball: BallConfig,
    pub physics: PhysicsConfig,
}

impl AppConfig {
    /// Profiles shipped in the `config` directory
    pub const PROFILES: [&'static str; 2] = ["debug", "release"];

    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_PHYSICS__JUMP_VELOCITY=1400)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let config_dir = Self::find_config_dir();

        let mut builder = Config::builder();

        if let Some(ref dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Use __ as separator for nested fields (e.g., APP_WINDOW__WIDTH)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Checks the values the loops rely on
    pub fn validate(&self) -> Result<(), String> {
        let ball = &self.ball;
        let physics = &self.physics;

        if !(ball.radius > 0.0) {
            return Err(format!("ball.radius must be positive, got {}", ball.radius));
        }
        if ball.radius * 2.0 > self.window.width.min(self.window.height) as f32 {
            return Err(format!(
                "a ball of radius {} does not fit a {}x{} window",
                ball.radius, self.window.width, self.window.height
            ));
        }
        if ball.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(format!("ball.color channels must be in 0..=1, got {:?}", ball.color));
        }

        for (name, value) in [
            ("physics.acceleration", physics.acceleration),
            ("physics.jump_velocity", physics.jump_velocity),
            ("physics.movement_speed", physics.movement_speed),
            ("physics.max_substep", physics.max_substep),
        ] {
            if !(value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if physics.initial_velocity < 0.0 || physics.bounce_rest_speed < 0.0 {
            return Err(
                "physics.initial_velocity and physics.bounce_rest_speed must not be negative"
                    .to_string(),
            );
        }
        if physics.ground_epsilon < 0.0 {
            return Err(format!(
                "physics.ground_epsilon must not be negative, got {}",
                physics.ground_epsilon
            ));
        }

        let render = &self.render;
        if render.msaa_samples == 0 || !render.msaa_samples.is_power_of_two() {
            return Err(format!(
                "render.msaa_samples must be a power of two, got {}",
                render.msaa_samples
            ));
        }
        if render.circle_segments < 3 {
            return Err(format!(
                "render.circle_segments must be at least 3, got {}",
                render.circle_segments
            ));
        }
        if !(render.font_size > 0.0) {
            return Err(format!("render.font_size must be positive, got {}", render.font_size));
        }

        Ok(())
    }

    /// Integrator constants for the physics loop
    pub fn physics_params(&self) -> PhysicsParams {
        PhysicsParams::from(&self.physics)
    }

    /// Bounds of the ball at the configured window size
    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.window.width as f32, self.window.height as f32)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            ball: BallConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}
