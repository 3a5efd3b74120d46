//! Colors, materials and blend modes.
//!
//! Scene constants are written as sRGB hex literals (`0xff6b6b`) and converted
//! to linear RGB only when uploaded to the GPU, so comparisons in the
//! animation core stay exact.

use glam::Vec3;

/// An sRGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a color from sRGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    /// Create a color from HSL components, all in `0.0..=1.0`.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        if s == 0.0 {
            return Self::rgb(l, l, l);
        }
        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;
        Self::rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Linear-light channels for shading.
    pub fn to_linear(self) -> Vec3 {
        Vec3::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b))
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Convert one sRGB channel to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Physically-inspired surface description for lit meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Self-illumination color; black means off.
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    /// Emitted radiance in linear RGB.
    pub fn emitted(&self) -> Vec3 {
        self.emissive.to_linear() * self.emissive_intensity
    }
}

/// How a layer of sprites combines with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Alpha,

    /// Additive blending. Overlapping sprites glow brighter.
    Additive,
}

impl BlendMode {
    /// The wgpu blend state implementing this mode.
    pub fn to_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Fragment shape of a point sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointStyle {
    /// Hard-edged square, like classic GL points.
    #[default]
    Square,
    /// Round sprite with a logistic edge falloff.
    Soft,
    /// Bright core with a `0.05 / d` glow.
    Glow,
}

impl PointStyle {
    /// Index passed to the point shader.
    pub fn shader_index(self) -> u32 {
        match self {
            PointStyle::Square => 0,
            PointStyle::Soft => 1,
            PointStyle::Glow => 2,
        }
    }
}
