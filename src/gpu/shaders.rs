//! WGSL sources and the uniform/vertex layouts they read.
//!
//! Rust structs here mirror the WGSL structs byte for byte. Every uniform is
//! a multiple of 16 bytes and only uses `vec4`/`mat4x4` sized members (or
//! four scalars in a row) so std140-style padding never comes into play.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::lights::{Environment, Light};

/// Per-frame values shared by every pipeline (bind group 0).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// xyz: camera position, w: elapsed seconds.
    pub camera_position: [f32; 4],
    /// x: width, y: height (physical pixels), z: pixel ratio.
    pub viewport: [f32; 4],
    pub ambient: [f32; 4],
    /// xyz: unit direction toward the light.
    pub directional_dir: [f32; 4],
    pub directional_color: [f32; 4],
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub env_sky: [f32; 4],
    pub env_ground: [f32; 4],
}

impl GlobalsUniform {
    pub fn new(
        camera: &PerspectiveCamera,
        lights: &[Light],
        environment: Environment,
        time: f32,
        viewport: (u32, u32),
        pixel_ratio: f32,
    ) -> Self {
        let mut globals = Self::zeroed();
        globals.view_proj = camera.view_proj().to_cols_array_2d();
        globals.view = camera.view_matrix().to_cols_array_2d();
        globals.camera_position = camera.position().extend(time).to_array();
        globals.viewport = [viewport.0 as f32, viewport.1 as f32, pixel_ratio, 0.0];

        for light in lights {
            let radiance = light.radiance().extend(1.0).to_array();
            match light {
                Light::Ambient { .. } => globals.ambient = radiance,
                Light::Directional { position, .. } => {
                    globals.directional_dir = position.normalize_or_zero().extend(0.0).to_array();
                    globals.directional_color = radiance;
                }
                Light::Point { position, .. } => {
                    globals.point_position = position.extend(1.0).to_array();
                    globals.point_color = radiance;
                }
            }
        }

        let (sky, ground) = environment.hemisphere();
        globals.env_sky = sky.extend(1.0).to_array();
        globals.env_ground = ground.extend(1.0).to_array();
        globals
    }
}

/// Per-layer values for a batch of point sprites (bind group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LayerUniform {
    pub model: [[f32; 4]; 4],
    /// Multiplier from sprite size to pixels.
    pub size_scale: f32,
    /// [`crate::visuals::PointStyle::shader_index`].
    pub style: u32,
    /// 1 to divide pixel size by view depth.
    pub attenuate: u32,
    pub opacity: f32,
}

impl LayerUniform {
    pub fn new(model: Mat4, size_scale: f32, style: u32, attenuate: bool, opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            size_scale,
            style,
            attenuate: attenuate as u32,
            opacity,
        }
    }
}

/// One point sprite.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    /// Linear RGB plus alpha.
    pub color: [f32; 4],
}

impl PointInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-object values for a lit mesh (bind group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base color, alpha in w.
    pub color: [f32; 4],
    /// Linear emitted radiance.
    pub emissive: [f32; 4],
    /// x: metalness, y: roughness.
    pub params: [f32; 4],
}

/// Mesh vertex: position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Shared globals declaration, prepended to every shader.
const GLOBALS_WGSL: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_position: vec4<f32>,
    viewport: vec4<f32>,
    ambient: vec4<f32>,
    directional_dir: vec4<f32>,
    directional_color: vec4<f32>,
    point_position: vec4<f32>,
    point_color: vec4<f32>,
    env_sky: vec4<f32>,
    env_ground: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

const POINT_BODY_WGSL: &str = r#"
struct Layer {
    model: mat4x4<f32>,
    size_scale: f32,
    style: u32,
    attenuate: u32,
    opacity: f32,
};

@group(1) @binding(0)
var<uniform> layer: Layer;

struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, sprite: PointInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    let world = layer.model * vec4<f32>(sprite.position, 1.0);
    let view_pos = globals.view * world;
    let clip = globals.view_proj * world;

    // Sprite diameter in pixels
    var pixels = sprite.size * layer.size_scale;
    if layer.attenuate == 1u {
        pixels = pixels / max(-view_pos.z, 0.0001);
    }
    let offset = corner * pixels / globals.viewport.xy;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.z, clip.w);
    out.uv = corner;
    out.color = sprite.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Distance from the sprite center, 0.5 at the edge midpoints
    let d = length(in.uv) * 0.5;
    var alpha = in.color.a * layer.opacity;

    if layer.style == 1u {
        if d > 0.5 {
            discard;
        }
        alpha = alpha / (1.0 + exp(16.0 * (d - 0.25)));
    } else if layer.style == 2u {
        let strength = 0.05 / max(d, 0.0001) - 0.1;
        alpha = alpha * clamp(strength, 0.0, 1.0);
    }

    return vec4<f32>(in.color.rgb, alpha);
}
"#;

const MESH_BODY_WGSL: &str = r#"
struct Object {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    emissive: vec4<f32>,
    params: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> mesh_object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

const PI: f32 = 3.14159265;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = mesh_object.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.world_position = world.xyz;
    out.normal = (mesh_object.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

fn shade(l: vec3<f32>, radiance: vec3<f32>, n: vec3<f32>, v: vec3<f32>, diffuse: vec3<f32>, specular: vec3<f32>, shininess: f32) -> vec3<f32> {
    let n_dot_l = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let n_dot_h = max(dot(n, h), 0.0);
    let spec = specular * pow(n_dot_h, shininess) * (shininess + 8.0) / (8.0 * PI);
    return (diffuse + spec) * radiance * n_dot_l;
}

fn aces(x: vec3<f32>) -> vec3<f32> {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    return clamp((x * (a * x + b)) / (x * (c * x + d) + e), vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let v = normalize(globals.camera_position.xyz - in.world_position);

    let base = mesh_object.color.rgb;
    let metalness = mesh_object.params.x;
    let roughness = max(mesh_object.params.y, 0.04);
    let diffuse = base * (1.0 - metalness);
    let specular = mix(vec3<f32>(0.04), base, vec3<f32>(metalness));
    let r4 = roughness * roughness * roughness * roughness;
    let shininess = max(2.0 / r4 - 2.0, 1.0);

    var color = globals.ambient.rgb * diffuse;

    color += shade(globals.directional_dir.xyz, globals.directional_color.rgb, n, v, diffuse, specular, shininess);

    let to_point = globals.point_position.xyz - in.world_position;
    let distance_sq = max(dot(to_point, to_point), 0.01);
    color += shade(normalize(to_point), globals.point_color.rgb / distance_sq, n, v, diffuse, specular, shininess);

    let sky_mix = n.y * 0.5 + 0.5;
    let env = mix(globals.env_ground.rgb, globals.env_sky.rgb, sky_mix);
    color += env * (diffuse + specular);

    color += mesh_object.emissive.rgb;

    return vec4<f32>(aces(color), mesh_object.color.a);
}
"#;

/// Point sprite shader source.
pub fn point_shader() -> String {
    format!("{GLOBALS_WGSL}{POINT_BODY_WGSL}")
}

/// Lit mesh shader source.
pub fn mesh_shader() -> String {
    format!("{GLOBALS_WGSL}{MESH_BODY_WGSL}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::scene_lights;

    #[test]
    fn test_uniform_sizes_are_aligned() {
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 272);
        assert_eq!(std::mem::size_of::<LayerUniform>(), 80);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 176);
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }

    #[test]
    fn test_globals_pack_lights() {
        let camera = PerspectiveCamera::new();
        let globals = GlobalsUniform::new(
            &camera,
            &scene_lights(),
            Environment::Night,
            2.5,
            (1280, 720),
            1.0,
        );

        assert_eq!(globals.camera_position, [0.0, 0.0, 10.0, 2.5]);
        assert_eq!(globals.viewport, [1280.0, 720.0, 1.0, 0.0]);
        assert!((globals.ambient[0] - 0.5).abs() < 1e-6);
        let dir = Vec3::new(
            globals.directional_dir[0],
            globals.directional_dir[1],
            globals.directional_dir[2],
        );
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(globals.point_position, [-10.0, -10.0, -5.0, 1.0]);
    }

    #[test]
    fn test_sources_share_globals() {
        assert!(point_shader().contains("var<uniform> globals"));
        assert!(mesh_shader().contains("var<uniform> globals"));
    }
}
