//! Line renderer for `lab_core` diagrams

use glam::Vec2;
use lab_core::diagram::{Color, Diagram, Shape};

use crate::camera::{Camera2D, CameraUniform};
use crate::graphics::GraphicsContext;

/// Segments used to approximate a circle
const CIRCLE_SEGMENTS: usize = 32;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Line vertex for diagram outlines
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Turn a diagram into line-list vertices (two per segment).
pub fn tessellate(diagram: &Diagram) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    let mut segment = |a: Vec2, b: Vec2, color: Color| {
        vertices.push(LineVertex { position: a.to_array(), color });
        vertices.push(LineVertex { position: b.to_array(), color });
    };

    for shape in &diagram.shapes {
        match shape {
            Shape::Line { from, to, color } => segment(*from, *to, *color),
            Shape::Rect { min, max, color } => {
                let corners = [
                    *min,
                    Vec2::new(max.x, min.y),
                    *max,
                    Vec2::new(min.x, max.y),
                ];
                for i in 0..4 {
                    segment(corners[i], corners[(i + 1) % 4], *color);
                }
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                let point = |i: usize| {
                    let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    *center + Vec2::new(a.cos(), a.sin()) * *radius
                };
                for i in 0..CIRCLE_SEGMENTS {
                    segment(point(i), point(i + 1), *color);
                }
            }
            Shape::Polyline { points, color } => {
                for pair in points.windows(2) {
                    segment(pair[0], pair[1], *color);
                }
            }
        }
    }

    vertices
}

/// Draws a diagram as coloured lines
pub struct DiagramRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    max_vertices: usize,
}

impl DiagramRenderer {
    pub fn new(ctx: &GraphicsContext, max_vertices: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Diagram Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/diagram.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Diagram Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Diagram Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_line",
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_line",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Diagram Vertex Buffer"),
            size: (std::mem::size_of::<LineVertex>() * max_vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            vertex_buffer,
            camera_buffer,
            camera_bind_group,
            max_vertices,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        let uniform = CameraUniform::from_camera_2d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload the diagram and return the vertex count to draw.
    pub fn update_diagram(&self, queue: &wgpu::Queue, diagram: &Diagram) -> u32 {
        let mut vertices = tessellate(diagram);
        if vertices.len() > self.max_vertices {
            log::warn!(
                "diagram has {} vertices, drawing the first {}",
                vertices.len(),
                self.max_vertices
            );
            // Keep whole segments
            vertices.truncate(self.max_vertices & !1);
        }

        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        vertices.len() as u32
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        vertex_count: u32,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Diagram Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if vertex_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = [1.0; 4];

    #[test]
    fn test_segment_counts_per_shape() {
        let mut diagram = Diagram::new(Vec2::splat(-1.0), Vec2::splat(1.0));
        diagram
            .line(Vec2::ZERO, Vec2::X, WHITE)
            .rect(Vec2::ZERO, Vec2::ONE, WHITE)
            .circle(Vec2::ZERO, 0.5, WHITE)
            .polyline(vec![Vec2::ZERO, Vec2::X, Vec2::ONE], WHITE);

        let vertices = tessellate(&diagram);
        assert_eq!(vertices.len(), 2 * (1 + 4 + CIRCLE_SEGMENTS + 2));
    }

    #[test]
    fn test_circle_points_lie_on_radius() {
        let mut diagram = Diagram::new(Vec2::splat(-2.0), Vec2::splat(2.0));
        diagram.circle(Vec2::new(1.0, 0.0), 0.5, WHITE);

        for v in tessellate(&diagram) {
            let r = (Vec2::from_array(v.position) - Vec2::new(1.0, 0.0)).length();
            assert!((r - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_polyline_draws_nothing() {
        let mut diagram = Diagram::new(Vec2::ZERO, Vec2::ONE);
        diagram.polyline(vec![Vec2::ZERO], WHITE);
        assert!(tessellate(&diagram).is_empty());
    }
}
