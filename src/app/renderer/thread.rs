//! The render loop on its own thread
//!
//! The thread builds the renderer, publishes the ball to the shared slot,
//! then draws frames until the main thread raises the [`StopSignal`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use tracing::{debug, error, info, warn};

use super::fps::FpsCounter;
use super::{GpuSurface, Renderer};
use crate::app::config::AppConfig;
use crate::error::StartupError;
use crate::sim::{Playfield, Shape, SharedShape};

/// Cooperative stop request checked once per frame
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Latest window inner size, written by the main thread
///
/// The render thread never queries the window itself, since some platforms
/// forward those calls to the (possibly blocked) main thread.
#[derive(Debug, Clone)]
pub struct SurfaceSize(Arc<AtomicU64>);

impl SurfaceSize {
    pub fn new(size: [u32; 2]) -> Self {
        Self(Arc::new(AtomicU64::new(Self::pack(size))))
    }

    fn pack([width, height]: [u32; 2]) -> u64 {
        ((width as u64) << 32) | height as u64
    }

    pub fn set(&self, size: [u32; 2]) {
        self.0.store(Self::pack(size), Ordering::Relaxed);
    }

    pub fn get(&self) -> [u32; 2] {
        let packed = self.0.load(Ordering::Relaxed);
        [(packed >> 32) as u32, packed as u32]
    }
}

/// Everything the render thread needs from configuration
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub vsync: bool,
    pub frame_budget: Option<Duration>,
    pub msaa_samples: u32,
    pub circle_segments: u32,
    /// Font bytes, already read and checked on the main thread
    pub font: Option<Vec<u8>>,
    pub font_size: f32,
    pub label_position: [f32; 2],
    pub ball_radius: f32,
    pub ball_color: [f32; 3],
}

impl RenderSettings {
    pub fn from_config(config: &AppConfig, font: Option<Vec<u8>>) -> Self {
        let render = &config.render;
        Self {
            vsync: render.vsync,
            frame_budget: render.frame_budget(),
            msaa_samples: render.msaa_samples,
            circle_segments: render.circle_segments,
            font,
            font_size: render.font_size,
            label_position: render.label_position,
            ball_radius: config.ball.radius,
            ball_color: config.ball.color,
        }
    }

    /// The ball as first published, centered on a surface of `size`
    pub fn initial_shape(&self, size: [u32; 2]) -> Shape {
        Shape::centered(
            Playfield::new(size[0] as f32, size[1] as f32),
            self.ball_radius,
            self.ball_color,
        )
    }
}

/// Summary of a finished render loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub frames: u64,
    pub skipped_frames: u64,
    pub average_fps: f32,
}

/// Abandons the handoff if the thread ends before publishing, including by
/// panic
struct PublishGuard {
    shared: SharedShape,
}

impl Drop for PublishGuard {
    fn drop(&mut self) {
        self.shared.abandon();
    }
}

/// Handle to the running render thread
pub struct RenderThread {
    handle: JoinHandle<anyhow::Result<RenderStats>>,
    stop: StopSignal,
}

impl RenderThread {
    /// Spawns the thread; it publishes the ball once the renderer is ready
    pub fn spawn(
        gpu: GpuSurface,
        shared: SharedShape,
        size: SurfaceSize,
        settings: RenderSettings,
    ) -> Result<Self, StartupError> {
        Self::spawn_loop(move |stop| render_loop(gpu, shared, size, settings, stop))
    }

    fn spawn_loop<F>(body: F) -> Result<Self, StartupError>
    where
        F: FnOnce(StopSignal) -> anyhow::Result<RenderStats> + Send + 'static,
    {
        let stop = StopSignal::new();
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let result = body(thread_stop);
                if let Err(e) = &result {
                    error!(error = ?e, "Render thread failed");
                }
                result
            })
            .map_err(StartupError::Spawn)?;

        Ok(Self { handle, stop })
    }

    /// Blocks until the loop publishes the ball or `timeout` passes
    ///
    /// On failure the thread has been stopped and joined before this
    /// returns. A thread that ended with an error reports that error.
    pub fn wait_for_shape(
        self,
        shared: &SharedShape,
        timeout: Duration,
    ) -> Result<(Self, Shape), StartupError> {
        let handoff = match shared.wait_published_timeout(timeout) {
            Ok(shape) => return Ok((self, shape)),
            Err(handoff) => handoff,
        };

        warn!(error = %handoff, "Ball was not published, stopping render thread");
        match self.stop_and_join() {
            Err(e) => Err(StartupError::Renderer(format!("{e:#}"))),
            Ok(_) => Err(StartupError::Handoff(handoff)),
        }
    }

    /// Whether the loop has already returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Raises the stop flag and waits for the loop to exit
    pub fn stop_and_join(self) -> anyhow::Result<RenderStats> {
        self.stop.request();
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("render thread panicked")),
        }
    }
}

fn render_loop(
    gpu: GpuSurface,
    shared: SharedShape,
    size: SurfaceSize,
    settings: RenderSettings,
    stop: StopSignal,
) -> anyhow::Result<RenderStats> {
    let _guard = PublishGuard {
        shared: shared.clone(),
    };

    let initial_size = size.get();
    let mut renderer = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to create tokio runtime")?
        .block_on(Renderer::new(gpu, initial_size, &settings))
        .context("failed to initialize renderer")?;

    let shape = settings.initial_shape(initial_size);
    info!(
        shape.x = shape.position[0],
        shape.y = shape.position[1],
        shape.radius = shape.radius,
        "Publishing ball"
    );
    shared.publish(shape);

    let mut fps = FpsCounter::new();
    let mut stats = RenderStats::default();

    while !stop.is_requested() {
        let frame_start = Instant::now();
        fps.tick();

        let wanted = size.get();
        if wanted != renderer.size() {
            renderer.resize(wanted);
        }

        let shape = shared.snapshot();
        match renderer.draw(shape.as_ref(), fps.instant_fps()) {
            Ok(()) => stats.frames += 1,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                renderer.reconfigure();
                stats.skipped_frames += 1;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("Surface timed out, skipping frame");
                stats.skipped_frames += 1;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                anyhow::bail!("out of GPU memory after {} frames", stats.frames);
            }
            Err(e) => {
                warn!(error = %e, "Render error");
                stats.skipped_frames += 1;
            }
        }

        if let Some(budget) = settings.frame_budget {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            }
        }
    }

    stats.average_fps = fps.fps();
    debug!(
        frames = stats.frames,
        skipped = stats.skipped_frames,
        fps = stats.average_fps,
        "Render thread exiting"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_is_shared() {
        let signal = StopSignal::new();
        let other = signal.clone();
        assert!(!other.is_requested());
        signal.request();
        assert!(other.is_requested());
    }

    #[test]
    fn test_surface_size_round_trips() {
        let size = SurfaceSize::new([1024, 768]);
        assert_eq!(size.get(), [1024, 768]);
        size.set([u32::MAX, 1]);
        assert_eq!(size.get(), [u32::MAX, 1]);
    }

    #[test]
    fn test_publish_guard_abandons_pending_handoff() {
        let shared = SharedShape::new();
        drop(PublishGuard {
            shared: shared.clone(),
        });
        assert_eq!(
            shared.wait_published(),
            Err(crate::sim::HandoffError::Abandoned)
        );
    }

    fn idle_until_stopped(exited: Arc<AtomicBool>) -> RenderThread {
        RenderThread::spawn_loop(move |stop| {
            while !stop.is_requested() {
                thread::sleep(Duration::from_millis(1));
            }
            exited.store(true, Ordering::Release);
            Ok(RenderStats::default())
        })
        .unwrap()
    }

    #[test]
    fn test_handoff_timeout_joins_thread() {
        let shared = SharedShape::new();
        let exited = Arc::new(AtomicBool::new(false));
        let render_thread = idle_until_stopped(Arc::clone(&exited));

        let Err(err) = render_thread.wait_for_shape(&shared, Duration::from_millis(20)) else {
            panic!("nothing was published");
        };
        assert!(matches!(
            err,
            StartupError::Handoff(crate::sim::HandoffError::TimedOut)
        ));
        assert!(exited.load(Ordering::Acquire));
    }

    #[test]
    fn test_failed_init_reports_thread_error() {
        let shared = SharedShape::new();
        let thread_shared = shared.clone();
        let render_thread = RenderThread::spawn_loop(move |_| {
            let _guard = PublishGuard {
                shared: thread_shared,
            };
            anyhow::bail!("no suitable adapter")
        })
        .unwrap();

        let Err(err) = render_thread.wait_for_shape(&shared, Duration::from_secs(5)) else {
            panic!("nothing was published");
        };
        match err {
            StartupError::Renderer(message) => assert!(message.contains("no suitable adapter")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_published_shape_is_returned() {
        let shared = SharedShape::new();
        let exited = Arc::new(AtomicBool::new(false));
        shared.publish(Shape::new([1.0, 2.0], 10.0, [0.0, 1.0, 0.0]));
        let render_thread = idle_until_stopped(Arc::clone(&exited));

        let Ok((render_thread, shape)) = render_thread.wait_for_shape(&shared, Duration::ZERO)
        else {
            panic!("shape was published");
        };
        assert_eq!(shape.position, [1.0, 2.0]);
        assert!(!exited.load(Ordering::Acquire));
        assert_eq!(render_thread.stop_and_join().unwrap(), RenderStats::default());
        assert!(exited.load(Ordering::Acquire));
    }

    #[test]
    fn test_settings_from_config() {
        let settings = RenderSettings::from_config(&AppConfig::default(), None);
        assert_eq!(settings.frame_budget, None);
        assert_eq!(
            settings.initial_shape([1024, 768]).position,
            [502.0, 374.0]
        );
    }
}
