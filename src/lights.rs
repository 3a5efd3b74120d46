//! Scene lighting.

use glam::Vec3;

use crate::visuals::Color;

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient { color: Color, intensity: f32 },
    /// Parallel light shining from `position` toward the origin.
    Directional { position: Vec3, color: Color, intensity: f32 },
    /// Light radiating from a point.
    Point { position: Vec3, color: Color, intensity: f32 },
}

impl Light {
    pub fn ambient(intensity: f32) -> Self {
        Light::Ambient {
            color: Color::WHITE,
            intensity,
        }
    }

    pub fn directional(position: Vec3, intensity: f32) -> Self {
        Light::Directional {
            position,
            color: Color::WHITE,
            intensity,
        }
    }

    pub fn point(position: Vec3, color: Color, intensity: f32) -> Self {
        Light::Point {
            position,
            color,
            intensity,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity,
        }
    }

    /// Linear-light radiance (color times intensity).
    pub fn radiance(&self) -> Vec3 {
        match self {
            Light::Ambient { color, intensity }
            | Light::Directional { color, intensity, .. }
            | Light::Point { color, intensity, .. } => color.to_linear() * *intensity,
        }
    }
}

/// Image-based lighting presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Dim blue sky over a near-black ground.
    #[default]
    Night,
}

impl Environment {
    /// Hemisphere approximation: (sky color, ground color) in linear light.
    pub fn hemisphere(self) -> (Vec3, Vec3) {
        match self {
            Environment::Night => (Vec3::new(0.05, 0.07, 0.16), Vec3::new(0.01, 0.01, 0.02)),
        }
    }
}

/// The light rig the scene is lit with.
pub fn scene_lights() -> [Light; 3] {
    [
        Light::ambient(0.5),
        Light::directional(Vec3::new(10.0, 10.0, 5.0), 1.0),
        Light::point(Vec3::new(-10.0, -10.0, -5.0), Color::hex(0xff0080), 0.5),
    ]
}
