//! Point sprite rendering.
//!
//! Every point is drawn as a camera-facing quad (six vertices, one instance
//! per point). Size, shape and blending are set per layer, so the particle
//! cloud, the stars and the sparkles share a single shader.

use wgpu::util::DeviceExt;

use super::shaders::{point_shader, LayerUniform, PointInstance};
use super::DEPTH_FORMAT;
use crate::visuals::BlendMode;

/// A render pipeline for one blend configuration.
pub struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl PointPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
        layer_layout: &wgpu::BindGroupLayout,
        blend_mode: BlendMode,
        depth_write: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(point_shader().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[globals_layout, layer_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PointInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend_mode.to_blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }
}

/// Bind group layout for [`LayerUniform`].
pub fn create_layer_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Point Layer Bind Group Layout"),
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
    })
}

/// A batch of points sharing one [`LayerUniform`].
pub struct PointLayer {
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
}

impl PointLayer {
    pub fn new(
        device: &wgpu::Device,
        layer_layout: &wgpu::BindGroupLayout,
        label: &str,
        instances: &[PointInstance],
        uniform: LayerUniform,
    ) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Layer Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Layer Bind Group"),
            layout: layer_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            instance_buffer,
            uniform_buffer,
            bind_group,
            count: instances.len() as u32,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &LayerUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Replace the instance data. `instances` must not outgrow the layer.
    pub fn write_instances(&self, queue: &wgpu::Queue, instances: &[PointInstance]) {
        let len = instances.len().min(self.count as usize);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances[..len]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &PointPipeline) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
