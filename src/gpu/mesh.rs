//! Lit sphere rendering.

use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};
use wgpu::util::DeviceExt;

use super::shaders::{mesh_shader, MeshVertex, ObjectUniform};
use super::DEPTH_FORMAT;
use crate::scene::ObjectFrame;

/// UV sphere geometry: `(width_segments + 1) * (height_segments + 1)`
/// vertices, with degenerate triangles at the poles skipped.
pub fn sphere_geometry(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    (vertices, indices)
}

/// Pack an object's render state for the GPU.
pub fn object_uniform(frame: &ObjectFrame) -> ObjectUniform {
    let material = &frame.material;
    ObjectUniform {
        model: frame.world.to_cols_array_2d(),
        normal_matrix: normal_matrix(frame.world).to_cols_array_2d(),
        color: material.color.to_linear().extend(1.0).to_array(),
        emissive: material.emitted().extend(0.0).to_array(),
        params: [material.metalness, material.roughness, 0.0, 0.0],
    }
}

/// Inverse transpose of the model matrix, or identity for singular matrices.
fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() < f32::EPSILON {
        Mat4::IDENTITY
    } else {
        model.inverse().transpose()
    }
}

/// Uploaded sphere mesh and the pipeline that shades it.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_layout: wgpu::BindGroupLayout,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Self {
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(mesh_shader().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Negative scales flip winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            object_layout,
        }
    }

    /// Allocate the uniform buffer and bind group for one object.
    pub fn create_binding(&self, device: &wgpu::Device, frame: &ObjectFrame) -> ObjectBinding {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::bytes_of(&object_uniform(frame)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        ObjectBinding { buffer, bind_group }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, objects: &[ObjectBinding]) {
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for object in objects {
            pass.set_bind_group(1, &object.bind_group, &[]);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}

/// GPU handle for one object's uniforms.
pub struct ObjectBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    pub fn write(&self, queue: &wgpu::Queue, frame: &ObjectFrame) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&object_uniform(frame)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animated::AnimatedObject;
    use crate::visuals::{Color, Material};

    #[test]
    fn test_sphere_counts() {
        let (vertices, indices) = sphere_geometry(1.0, 32, 32);
        assert_eq!(vertices.len(), 33 * 33);
        assert_eq!(indices.len(), 32 * 31 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let (vertices, _) = sphere_geometry(2.0, 8, 6);
        for v in &vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!((p.length() - 2.0).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p - n * 2.0).length() < 1e-5);
        }
    }

    #[test]
    fn test_object_uniform_packs_material() {
        let frame = ObjectFrame {
            world: Mat4::from_scale(Vec3::splat(0.8)),
            material: Material {
                color: Color::WHITE,
                emissive: Color::WHITE,
                emissive_intensity: 0.3,
                metalness: 0.8,
                roughness: 0.2,
            },
        };
        let uniform = object_uniform(&frame);
        assert_eq!(uniform.params, [0.8, 0.2, 0.0, 0.0]);
        assert!((uniform.emissive[0] - 0.3).abs() < 1e-6);
        assert!((uniform.color[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_scale_keeps_normals_finite() {
        let object = AnimatedObject::new(Vec3::ZERO, Color::BLACK).with_scale(0.0);
        let frame = ObjectFrame {
            world: object.world_matrix(1.0),
            material: object.material(),
        };
        let uniform = object_uniform(&frame);
        assert!(uniform.normal_matrix.iter().flatten().all(|v| v.is_finite()));
    }
}
