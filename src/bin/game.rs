use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use winit::event_loop::{ControlFlow, EventLoop};

use gravity_ball::app::renderer::overlay::load_font;
use gravity_ball::app::{App, AppConfig};
use gravity_ball::build_info;
use gravity_ball::error::StartupError;
use gravity_ball::health::{
    self,
    checks::{GraphicsBackendCheck, OverlayCheck},
};

/// A ball under gravity, rendered on its own thread
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration profile to load (default: $APP_PROFILE or "release")
    #[arg(long)]
    profile: Option<String>,

    /// Run the health checks, print the report and exit
    #[arg(long)]
    check: bool,

    /// Do not center the window on the primary monitor
    #[arg(long)]
    no_center: bool,

    /// Disable gravity: W/S move vertically and Space does nothing
    #[arg(long)]
    no_gravity: bool,

    /// TTF/OTF font for the FPS label
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Cap the render loop at N frames per second (turns vsync off)
    #[arg(long, value_name = "N")]
    fps_limit: Option<u32>,

    /// Window width in pixels
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long, value_name = "PX")]
    height: Option<u32>,
}

impl Cli {
    /// Applies command line overrides on top of the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        if self.no_center {
            config.window.center_on_primary = false;
        }
        if self.no_gravity {
            config.physics.gravity = false;
        }
        if let Some(font) = &self.font {
            config.render.font_path = Some(font.clone());
        }
        if let Some(limit) = self.fps_limit {
            config.render.vsync = false;
            config.render.frame_limit = limit;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

fn load_config(cli: &Cli) -> AppConfig {
    let loaded = match &cli.profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using default configuration");
        AppConfig::default()
    });
    cli.apply(&mut config);
    config
}

fn run_checks(config: &AppConfig) -> ExitCode {
    let overlay = match config.render.font_path.as_deref().map(load_font) {
        Some(Ok(font)) => OverlayCheck::with_font(font),
        Some(Err(e)) => {
            warn!(error = %e, "Configured font unusable, checking the built-in font");
            OverlayCheck::new()
        }
        None => OverlayCheck::new(),
    };

    let report = health::HealthCheckRunner::new()
        .add_check(health::checks::ConfigCheck::new())
        .add_check(health::checks::PhysicsCheck::with_params(config.physics_params()))
        .add_check(health::checks::SharedStateCheck::new())
        .add_check(overlay)
        .add_check(health::checks::BuildInfoCheck::new())
        .add_check(health::checks::SystemInfoCheck::new())
        .add_check(GraphicsBackendCheck::new(config.render.msaa_samples))
        .run();
    health::print_report(&report);
    ExitCode::from(report.exit_code())
}

fn run(config: AppConfig) -> anyhow::Result<()> {
    config.validate().map_err(StartupError::Config)?;

    let font = config
        .render
        .font_path
        .as_deref()
        .map(load_font)
        .transpose()?;

    let event_loop = EventLoop::new().map_err(StartupError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, font);
    event_loop.run_app(&mut app)?;
    app.into_result()
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    info!(version = %build_info::version_string(), "gravity-ball");

    let config = load_config(&cli);
    if cli.check {
        return run_checks(&config);
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Fatal error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
