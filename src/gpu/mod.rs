//! GPU state and rendering.
//!
//! [`GpuState`] owns the surface, device and depth buffer. The scene's GPU
//! resources ([`SceneRenderer`]) are created only once the scene mounts;
//! until then a frame is just a black clear.
//!
//! A frame is split into three steps so the optional egui pass can be
//! recorded in between:
//!
//! ```ignore
//! let mut frame = gpu.begin_frame()?;
//! gpu.draw_scene(&mut frame, scene);
//! egui.paint(&gpu, &mut frame, output);
//! gpu.finish(frame);
//! ```

#[cfg(feature = "egui")]
mod egui_integration;
mod mesh;
mod points;
mod scene_renderer;
pub mod shaders;

use std::sync::Arc;

use log::info;
use winit::window::Window;

#[cfg(feature = "egui")]
pub use egui_integration::{EguiFrameOutput, EguiIntegration};
pub use mesh::sphere_geometry;
pub use scene_renderer::{SceneRenderer, Viewport};

use crate::error::GpuError;
use crate::scene::Scene;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Background behind everything.
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// An acquired surface texture with an open command encoder.
pub struct FrameTarget {
    surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Command buffers that must be submitted before `encoder`.
    pub pre_commands: Vec<wgpu::CommandBuffer>,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    pixel_ratio: f32,
    scene: Option<SceneRenderer>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let pixel_ratio = window.scale_factor() as f32;

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        info!("Surface format {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pixel_ratio,
            scene: None,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.config.width,
            height: self.config.height,
            pixel_ratio: self.pixel_ratio,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        let size = winit::dpi::PhysicalSize::new(self.config.width, self.config.height);
        self.resize(size);
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Build GPU resources for `scene`. Replaces any previous scene.
    pub fn mount_scene(&mut self, scene: &Scene) {
        self.scene = Some(SceneRenderer::new(
            &self.device,
            self.config.format,
            scene,
            self.viewport(),
        ));
        info!("Scene resources uploaded");
    }

    /// Acquire the next surface texture.
    pub fn begin_frame(&mut self) -> Result<FrameTarget, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        Ok(FrameTarget {
            surface_texture,
            view,
            encoder,
            pre_commands: Vec::new(),
        })
    }

    /// Clear the frame and draw the mounted scene, if any.
    ///
    /// `scene` must be the scene that was mounted and already updated for
    /// this frame.
    pub fn draw_scene(&mut self, frame: &mut FrameTarget, scene: Option<&Scene>) {
        let viewport = self.viewport();
        let renderer = match (self.scene.as_mut(), scene) {
            (Some(renderer), Some(scene)) => {
                renderer.prepare(&self.queue, scene, viewport);
                Some(&*renderer)
            }
            _ => None,
        };

        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some(renderer) = renderer {
            renderer.draw(&mut render_pass);
        }
    }

    /// Submit recorded work and present.
    pub fn finish(&self, frame: FrameTarget) {
        let FrameTarget {
            surface_texture,
            encoder,
            pre_commands,
            ..
        } = frame;
        self.queue
            .submit(pre_commands.into_iter().chain(std::iter::once(encoder.finish())));
        surface_texture.present();
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
