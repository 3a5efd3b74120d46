//! GPU resources for a mounted scene.
//!
//! Built once when the scene mounts. Each frame [`SceneRenderer::prepare`]
//! uploads the globals, the layer uniforms, the drifting sparkle positions
//! and the sphere uniforms, then [`SceneRenderer::draw`] records the pass.
//! Draw order: stars, particles, spheres, sparkles.

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::mesh::{sphere_geometry, MeshRenderer, ObjectBinding};
use super::points::{create_layer_layout, PointLayer, PointPipeline};
use super::shaders::{GlobalsUniform, LayerUniform, PointInstance};
use crate::animated::{SPHERE_RADIUS, SPHERE_SEGMENTS};
use crate::particles::{self, ParticleField};
use crate::scene::Scene;
use crate::sparkles::{self, Sparkles};
use crate::stars::Starfield;
use crate::visuals::{BlendMode, PointStyle};

/// Per-frame viewport information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Physical pixels.
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

/// Everything needed to draw a [`Scene`].
pub struct SceneRenderer {
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    opaque_points: PointPipeline,
    additive_points: PointPipeline,
    stars: PointLayer,
    particles: PointLayer,
    sparkles: PointLayer,
    sparkle_instances: Vec<PointInstance>,

    mesh: MeshRenderer,
    objects: Vec<ObjectBinding>,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        scene: &Scene,
        viewport: Viewport,
    ) -> Self {
        let globals = globals_for(scene, viewport);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
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

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let layer_layout = create_layer_layout(device);
        let opaque_points = PointPipeline::new(
            device,
            surface_format,
            &globals_layout,
            &layer_layout,
            BlendMode::Alpha,
            true,
        );
        let additive_points = PointPipeline::new(
            device,
            surface_format,
            &globals_layout,
            &layer_layout,
            BlendMode::Additive,
            false,
        );

        let time = scene.elapsed();
        let stars = PointLayer::new(
            device,
            &layer_layout,
            "Star Instances",
            &star_instances(scene.stars()),
            star_layer(scene.stars(), time),
        );
        let particles = PointLayer::new(
            device,
            &layer_layout,
            "Particle Instances",
            &particle_instances(scene.particles()),
            particle_layer(scene.particles(), time, viewport),
        );
        let sparkle_instances = sparkle_instances(scene.sparkles(), time);
        let sparkles = PointLayer::new(
            device,
            &layer_layout,
            "Sparkle Instances",
            &sparkle_instances,
            sparkle_layer(viewport),
        );

        let (vertices, indices) = sphere_geometry(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let mesh = MeshRenderer::new(device, surface_format, &globals_layout, &vertices, &indices);
        let objects = scene
            .frame()
            .objects
            .iter()
            .map(|frame| mesh.create_binding(device, frame))
            .collect();

        Self {
            globals_buffer,
            globals_bind_group,
            opaque_points,
            additive_points,
            stars,
            particles,
            sparkles,
            sparkle_instances,
            mesh,
            objects,
        }
    }

    /// Upload this frame's state. Call after [`Scene::update`].
    pub fn prepare(&mut self, queue: &wgpu::Queue, scene: &Scene, viewport: Viewport) {
        let frame = scene.frame();
        let time = frame.time;

        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&globals_for(scene, viewport)),
        );

        self.stars.write_uniform(queue, &star_layer(scene.stars(), time));
        self.particles
            .write_uniform(queue, &particle_layer(scene.particles(), time, viewport));
        self.sparkles.write_uniform(queue, &sparkle_layer(viewport));

        for (instance, position) in self
            .sparkle_instances
            .iter_mut()
            .zip(&frame.sparkle_positions)
        {
            instance.position = position.to_array();
        }
        self.sparkles.write_instances(queue, &self.sparkle_instances);

        for (binding, object) in self.objects.iter().zip(&frame.objects) {
            binding.write(queue, object);
        }
    }

    /// Record draw calls into an open render pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        self.stars.draw(pass, &self.additive_points);
        self.particles.draw(pass, &self.opaque_points);
        self.mesh.draw(pass, &self.objects);
        self.sparkles.draw(pass, &self.additive_points);
    }
}

fn globals_for(scene: &Scene, viewport: Viewport) -> GlobalsUniform {
    GlobalsUniform::new(
        scene.camera(),
        scene.lights(),
        scene.environment(),
        scene.frame().time,
        (viewport.width, viewport.height),
        viewport.pixel_ratio,
    )
}

fn star_instances(stars: &Starfield) -> Vec<PointInstance> {
    stars
        .stars()
        .iter()
        .map(|star| PointInstance {
            position: star.position.to_array(),
            size: star.size,
            color: star.color.to_linear().extend(1.0).to_array(),
        })
        .collect()
}

fn star_layer(stars: &Starfield, time: f32) -> LayerUniform {
    let style = if stars.config().fade {
        PointStyle::Soft
    } else {
        PointStyle::Square
    };
    LayerUniform::new(Mat4::IDENTITY, stars.size_scale(time), style.shader_index(), true, 1.0)
}

fn particle_instances(field: &ParticleField) -> Vec<PointInstance> {
    field
        .positions()
        .iter()
        .zip(field.colors())
        .map(|(position, color)| PointInstance {
            position: position.to_array(),
            size: particles::POINT_SIZE,
            color: color.extend(1.0).to_array(),
        })
        .collect()
}

fn particle_layer(field: &ParticleField, time: f32, viewport: Viewport) -> LayerUniform {
    LayerUniform::new(
        field.model_matrix(time),
        viewport.height as f32 * 0.5,
        PointStyle::Square.shader_index(),
        particles::SIZE_ATTENUATION,
        1.0,
    )
}

fn sparkle_instances(sparkles: &Sparkles, time: f32) -> Vec<PointInstance> {
    let color = sparkles.color().to_linear();
    sparkles
        .sparkles()
        .iter()
        .map(|sparkle| PointInstance {
            position: sparkle.position(time).to_array(),
            size: sparkle.size,
            color: color.extend(sparkle.opacity).to_array(),
        })
        .collect()
}

fn sparkle_layer(viewport: Viewport) -> LayerUniform {
    LayerUniform::new(
        Mat4::IDENTITY,
        sparkles::PIXEL_FACTOR * viewport.pixel_ratio,
        PointStyle::Glow.shader_index(),
        true,
        1.0,
    )
}
