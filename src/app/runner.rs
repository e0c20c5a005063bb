//! Main application handler: the physics/input loop
//!
//! Runs on the main thread. Each `about_to_wait` is one tick: poll the
//! keys, integrate, and write the new position into the shared slot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::config::AppConfig;
use super::display;
use super::input::{Controls, InputCollector};
use super::renderer::{GpuSurface, RenderSettings, RenderThread, SurfaceSize};
use super::window::{DragTracker, WindowMove, window_attributes_from_config};
use crate::error::StartupError;
use crate::sim::{Playfield, SharedShape, World};

/// How long startup waits for the render thread to publish the ball
const HANDOFF_TIMEOUT: Duration = Duration::from_secs(30);

/// Main game application
pub struct App {
    config: AppConfig,
    font: Option<Vec<u8>>,
    window: Option<Arc<Window>>,
    render_thread: Option<RenderThread>,
    surface_size: Option<SurfaceSize>,
    shared: SharedShape,
    world: World,
    input: InputCollector,
    drag: DragTracker,
    last_update: Option<Instant>,
    skip_tick: bool,
    shutting_down: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    /// Creates the application; `font` was read and checked beforehand
    pub fn new(config: AppConfig, font: Option<Vec<u8>>) -> Self {
        info!(profile = %config.profile, "Starting game");
        info!(?config.window, "Window configuration");
        info!(?config.physics, "Physics configuration");

        let world = World::new(config.physics_params(), config.playfield());

        Self {
            config,
            font,
            window: None,
            render_thread: None,
            surface_size: None,
            shared: SharedShape::new(),
            world,
            input: InputCollector::new(),
            drag: DragTracker::new(),
            last_update: None,
            skip_tick: false,
            shutting_down: false,
            failure: None,
        }
    }

    /// Outcome of the run once the event loop has returned
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, e: anyhow::Error) {
        if self.failure.is_none() {
            self.failure = Some(e);
        }
    }

    /// Creates the window and render thread, then waits for the ball
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), StartupError> {
        let window_config = &self.config.window;
        let requested = [window_config.width, window_config.height];
        let position = window_config
            .center_on_primary
            .then(|| display::initial_window_position(event_loop, requested));

        let attributes = window_attributes_from_config(window_config, position);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let size = window.inner_size();
        info!(
            window.width = size.width,
            window.height = size.height,
            window.position = ?position,
            "Window created successfully"
        );

        let size = [size.width, size.height];
        self.world
            .set_playfield(Playfield::new(size[0] as f32, size[1] as f32));
        let surface_size = SurfaceSize::new(size);

        let gpu = GpuSurface::new(window.clone())?;
        let settings = RenderSettings::from_config(&self.config, self.font.take());
        let render_thread =
            RenderThread::spawn(gpu, self.shared.clone(), surface_size.clone(), settings)?;

        self.window = Some(window);
        self.surface_size = Some(surface_size);

        let (render_thread, shape) = render_thread.wait_for_shape(&self.shared, HANDOFF_TIMEOUT)?;

        info!(
            ball.x = shape.position[0],
            ball.y = shape.position[1],
            "Ball published, starting physics"
        );
        self.render_thread = Some(render_thread);
        self.last_update = Some(Instant::now());
        Ok(())
    }

    /// Stops ticking, joins the render thread, then releases the ball
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutting_down {
            return;
        }
        self.shutting_down = true;
        debug!("Physics loop stopped");

        if let Some(render_thread) = self.render_thread.take() {
            match render_thread.stop_and_join() {
                Ok(stats) => info!(
                    frames = stats.frames,
                    skipped = stats.skipped_frames,
                    fps = stats.average_fps,
                    "Render thread stopped"
                ),
                Err(e) => self.fail(e.context("render thread failed")),
            }
        }

        if let Some(last) = self.shared.retract() {
            debug!(x = last.position[0], y = last.position[1], "Ball retracted");
        }

        info!(
            ticks = self.world.tick_count(),
            sim_time = self.world.sim_time(),
            bounces = self.world.body().bounces(),
            "Shutdown complete"
        );
        event_loop.exit();
    }

    fn handle_move(&mut self, position: [i32; 2]) {
        match self.drag.update(position) {
            WindowMove::Still => {}
            WindowMove::Placed => {
                debug!(x = position[0], y = position[1], "Window placed");
                self.skip_tick = true;
            }
            WindowMove::Dragged(offset) => {
                debug!(dx = offset[0], dy = offset[1], "Window dragged");
            }
        }
    }

    fn handle_resize(&mut self, size: [u32; 2]) {
        // minimized windows report 0x0
        if size[0] == 0 || size[1] == 0 {
            return;
        }
        self.world
            .set_playfield(Playfield::new(size[0] as f32, size[1] as f32));
        if let Some(surface_size) = &self.surface_size {
            surface_size.set(size);
        }
        debug!(width = size[0], height = size[1], "Playfield resized");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.shutting_down {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            error!(error = %e, "Startup failed");
            self.fail(e.into());
            self.shutting_down = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutting_down {
            return;
        }
        let Some(last_update) = self.last_update else {
            return;
        };

        if self
            .render_thread
            .as_ref()
            .is_some_and(RenderThread::is_finished)
        {
            warn!("Render thread exited on its own");
            self.shutdown(event_loop);
            return;
        }

        let now = Instant::now();
        let delta_time = (now - last_update).as_secs_f32();
        self.last_update = Some(now);

        let controls = Controls::from_state(self.input.state(), self.world.params().gravity);
        if controls.close {
            info!("Escape pressed, exiting");
            self.shutdown(event_loop);
            return;
        }

        if std::mem::take(&mut self.skip_tick) {
            return;
        }

        if let Some(outcome) = self.world.tick(delta_time, controls.intent, &self.shared) {
            trace!(
                x = outcome.position[0],
                y = outcome.position[1],
                v = outcome.velocity,
                on_ground = outcome.on_ground,
                "Tick"
            );
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize([new_size.width, new_size.height]);
            }
            WindowEvent::Moved(position) => {
                self.handle_move([position.x, position.y]);
            }
            WindowEvent::Focused(focused) => {
                debug!(focused, "Focus changed");
            }
            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}
