//! Rendering with wgpu, owned by the render thread
//!
//! ## Architecture
//!
//! - `circle`: pipeline drawing the ball as a filled triangle fan
//! - `overlay`: egui FPS label
//! - `fps`: rolling frame-rate estimate
//! - `thread`: the render loop and its cooperative stop

use std::sync::Arc;

use tracing::{debug, info};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, TextureView};
use winit::window::Window;

use crate::error::StartupError;
use crate::sim::Shape;

pub mod circle;
pub mod fps;
pub mod overlay;
pub mod thread;

use circle::CircleRenderer;
use overlay::Overlay;
pub use thread::{RenderSettings, RenderStats, RenderThread, StopSignal, SurfaceSize};

/// Largest sample count not above `requested` that the format supports
pub fn pick_sample_count(requested: u32, supported: impl Fn(u32) -> bool) -> u32 {
    [16, 8, 4, 2]
        .into_iter()
        .find(|&count| count <= requested && supported(count))
        .unwrap_or(1)
}

/// wgpu instance plus the window's surface
///
/// Must be created on the main thread; the render thread takes it over.
pub struct GpuSurface {
    instance: wgpu::Instance,
    surface: Surface<'static>,
}

impl GpuSurface {
    pub fn new(window: Arc<Window>) -> Result<Self, StartupError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        Ok(Self { instance, surface })
    }
}

/// Renderer handles wgpu setup, the ball pipeline and the egui label
pub struct Renderer {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    sample_count: u32,
    msaa_view: Option<TextureView>,
    circle: CircleRenderer,
    overlay: Overlay,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    /// Current surface size in pixels
    pub fn size(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// Creates a new renderer drawing into `gpu`
    pub async fn new(
        gpu: GpuSurface,
        size: [u32; 2],
        settings: &RenderSettings,
    ) -> anyhow::Result<Self> {
        info!("Initializing wgpu renderer");

        let GpuSurface { instance, surface } = gpu;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        info!(
            adapter.name = adapter.get_info().name,
            adapter.backend = ?adapter.get_info().backend,
            "Found GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Render Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size[0].max(1),
            height: size[1].max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let format_flags = adapter.get_texture_format_features(surface_format).flags;
        let sample_count = pick_sample_count(settings.msaa_samples, |count| {
            format_flags.sample_count_supported(count)
        });

        info!(
            surface.width = config.width,
            surface.height = config.height,
            surface.format = ?config.format,
            surface.present_mode = ?config.present_mode,
            msaa.requested = settings.msaa_samples,
            msaa.samples = sample_count,
            "Surface configured"
        );

        let circle = CircleRenderer::new(
            &device,
            surface_format,
            sample_count,
            settings.circle_segments,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: sample_count,
                ..Default::default()
            },
        );

        let overlay = Overlay::new(
            settings.font.clone(),
            settings.font_size,
            settings.label_position,
        );

        let msaa_view = Self::create_msaa_view(&device, &config, sample_count);

        info!("Renderer initialized successfully");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            msaa_view,
            circle,
            overlay,
            egui_renderer,
        })
    }

    /// Creates the multisampled color target, if MSAA is on
    fn create_msaa_view(
        device: &Device,
        config: &SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<TextureView> {
        if sample_count <= 1 {
            return None;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("MSAA Color Target"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    /// Resizes the surface
    pub fn resize(&mut self, new_size: [u32; 2]) {
        let [width, height] = new_size;
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.msaa_view = Self::create_msaa_view(&self.device, &self.config, self.sample_count);

            debug!(width, height, "Surface resized");
        }
    }

    /// Reconfigures the surface at its current size
    pub fn reconfigure(&mut self) {
        self.resize(self.size());
    }

    /// Renders one frame: black clear, the ball, then the FPS label
    pub fn draw(&mut self, shape: Option<&Shape>, fps: f32) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let screen_size = [self.config.width as f32, self.config.height as f32];
        self.circle.prepare(&self.queue, shape, screen_size);

        let full_output = self.overlay.run(self.size(), fps);

        // The label is laid out at one point per pixel
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: self.size(),
            pixels_per_point: 1.0,
        };

        let tris = self
            .overlay
            .context()
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };

        // Render pass - use forget_lifetime() for egui_wgpu compatibility
        {
            let mut rpass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Frame Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.circle.render(&mut rpass);
            self.egui_renderer
                .render(&mut rpass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_sample_count() {
        let common = |count: u32| matches!(count, 1 | 4);
        assert_eq!(pick_sample_count(8, common), 4);
        assert_eq!(pick_sample_count(4, common), 4);
        assert_eq!(pick_sample_count(2, common), 1);
        assert_eq!(pick_sample_count(1, |_| true), 1);
        assert_eq!(pick_sample_count(16, |_| true), 16);
    }
}
