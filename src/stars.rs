//! Starfield backdrop.
//!
//! Stars are laid out on a thick spherical shell around the scene. Generation
//! starts at `radius + depth` and walks inward a small random step per star,
//! so the shell fills from the outside in. Stars are drawn as soft round
//! sprites whose size breathes slowly with time.

use glam::Vec3;
use rand::Rng;

use crate::visuals::Color;

/// Inner radius of the shell.
pub const RADIUS: f32 = 100.0;
/// Thickness of the shell.
pub const DEPTH: f32 = 50.0;
pub const COUNT: usize = 5000;
/// Size multiplier.
pub const FACTOR: f32 = 4.0;
/// Color saturation; zero gives white stars.
pub const SATURATION: f32 = 0.0;
/// Lightness of every star.
pub const LIGHTNESS: f32 = 0.9;
/// Pixel-space multiplier applied to star sizes, divided by depth.
pub const PIXEL_FACTOR: f32 = 30.0;

/// One star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub color: Color,
    pub size: f32,
}

/// Starfield configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldConfig {
    pub radius: f32,
    pub depth: f32,
    pub count: usize,
    pub factor: f32,
    pub saturation: f32,
    /// Soft round sprites instead of hard squares.
    pub fade: bool,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            radius: RADIUS,
            depth: DEPTH,
            count: COUNT,
            factor: FACTOR,
            saturation: SATURATION,
            fade: true,
        }
    }
}

/// The generated backdrop.
#[derive(Debug, Clone)]
pub struct Starfield {
    config: StarfieldConfig,
    stars: Vec<Star>,
}

impl Starfield {
    /// Generate the default backdrop.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_config(StarfieldConfig::default(), rng)
    }

    pub fn with_config<R: Rng + ?Sized>(config: StarfieldConfig, rng: &mut R) -> Self {
        let mut r = config.radius + config.depth;
        let step = if config.count > 0 {
            config.depth / config.count as f32
        } else {
            0.0
        };

        let stars = (0..config.count)
            .map(|i| {
                r -= step * rng.gen::<f32>();
                Star {
                    position: random_on_sphere(rng) * r,
                    color: Color::hsl(i as f32 / config.count as f32, config.saturation, LIGHTNESS),
                    size: (0.5 + 0.5 * rng.gen::<f32>()) * config.factor,
                }
            })
            .collect();

        Self { config, stars }
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn count(&self) -> usize {
        self.stars.len()
    }

    /// Pixel size multiplier for elapsed time `t`.
    pub fn size_scale(&self, t: f32) -> f32 {
        PIXEL_FACTOR * (3.0 + (t + 100.0).sin())
    }
}

/// Uniformly distributed unit vector.
fn random_on_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * phi.cos(), ring * phi.sin(), z)
}
