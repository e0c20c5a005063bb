//! Filled circle renderer
//!
//! The fan geometry for a unit circle is uploaded once; the ball's center,
//! radius and color travel in a uniform written every frame.

use wgpu::{BindGroup, Buffer, Device, Queue, RenderPass, RenderPipeline, util::DeviceExt};

use crate::sim::Shape;

/// WGSL shader mapping playfield pixels (y down) to NDC
const CIRCLE_SHADER: &str = r#"
struct VertexInput {
    @location(0) unit: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
}

struct Uniforms {
    screen_size: vec2<f32>,
    center: vec2<f32>,
    color: vec3<f32>,
    radius: f32,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    let position = uniforms.center + in.unit * uniforms.radius;
    let ndc_x = (position.x / uniforms.screen_size.x) * 2.0 - 1.0;

    // Y-axis: flip for screen coordinates (top = 1, bottom = -1 in NDC)
    let ndc_y = 1.0 - (position.y / uniforms.screen_size.y) * 2.0;

    out.clip_position = vec4<f32>(ndc_x, ndc_y, 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(uniforms.color, 1.0);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    unit: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Layout matches the WGSL struct: `color` starts at a 16-byte boundary
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    screen_size: [f32; 2],
    center: [f32; 2],
    color: [f32; 3],
    radius: f32,
}

impl Uniforms {
    fn new(shape: &Shape, screen_size: [f32; 2]) -> Self {
        Self {
            screen_size,
            center: shape.center(),
            color: shape.color,
            radius: shape.radius,
        }
    }
}

/// Triangle list covering the unit circle: center, edge[i], edge[i + 1]
fn fan_vertices(segments: u32) -> Vec<Vertex> {
    let center = Vertex { unit: [0.0, 0.0] };
    let edge = |i: u32| {
        let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
        Vertex {
            unit: [angle.cos(), angle.sin()],
        }
    };

    (0..segments)
        .flat_map(|i| [center, edge(i), edge(i + 1)])
        .collect()
}

/// Draws one filled circle per frame
pub struct CircleRenderer {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    vertex_buffer: Buffer,
    vertex_count: u32,
    visible: bool,
}

impl CircleRenderer {
    pub fn new(
        device: &Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        segments: u32,
    ) -> Self {
        let vertices = fan_vertices(segments.max(3));
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Circle Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Circle Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms {
                screen_size: [1.0, 1.0],
                center: [0.0, 0.0],
                color: [0.0, 0.0, 0.0],
                radius: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Circle Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Circle Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Circle Shader"),
            source: wgpu::ShaderSource::Wgsl(CIRCLE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Circle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Circle Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            visible: false,
        }
    }

    /// Uploads this frame's shape; `None` hides the circle
    pub fn prepare(&mut self, queue: &Queue, shape: Option<&Shape>, screen_size: [f32; 2]) {
        self.visible = shape.is_some();
        if let Some(shape) = shape {
            let uniforms = Uniforms::new(shape, screen_size);
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    pub fn render(&self, rpass: &mut RenderPass<'_>) {
        if !self.visible {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_has_three_vertices_per_segment() {
        let vertices = fan_vertices(48);
        assert_eq!(vertices.len(), 48 * 3);
        assert_eq!(vertices[0].unit, [0.0, 0.0]);
        assert_eq!(vertices[1].unit, [1.0, 0.0]);
    }

    #[test]
    fn test_fan_points_lie_on_unit_circle() {
        for vertex in fan_vertices(16).iter().skip(1).step_by(3) {
            let [x, y] = vertex.unit;
            assert!(((x * x + y * y) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uniforms_use_shape_center() {
        let shape = Shape::new([502.0, 374.0], 10.0, [0.0, 1.0, 0.0]);
        let uniforms = Uniforms::new(&shape, [1024.0, 768.0]);
        assert_eq!(uniforms.center, [512.0, 384.0]);
        assert_eq!(std::mem::size_of::<Uniforms>(), 32);
    }
}
