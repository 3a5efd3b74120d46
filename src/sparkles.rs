//! Drifting glints scattered around the scene.

use glam::Vec3;
use rand::Rng;

use crate::visuals::Color;

/// Number of sparkles.
pub const COUNT: usize = 100;
/// Edge length of the box sparkles are scattered in.
pub const SCALE: f32 = 20.0;
/// Sprite size before the pixel factor.
pub const SIZE: f32 = 2.0;
/// Drift speed factor.
pub const SPEED: f32 = 0.4;
/// Spatial frequency of the drift.
pub const NOISE: f32 = 1.0;
/// Distance a sparkle wanders from its rest position on each axis.
pub const DRIFT: f32 = 0.2;
/// Pixel-space multiplier applied to `SIZE`.
pub const PIXEL_FACTOR: f32 = 25.0;

/// One sprite of the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub rest: Vec3,
    pub size: f32,
    pub speed: f32,
    pub noise: f32,
    pub opacity: f32,
}

impl Sparkle {
    /// Position at elapsed time `t`, computed from the rest position.
    pub fn position(&self, t: f32) -> Vec3 {
        let phase = t * self.speed + self.rest.x * self.noise * 100.0;
        let (sin, cos) = phase.sin_cos();
        self.rest + Vec3::new(cos, sin, cos) * DRIFT
    }
}

/// An additive cloud of glowing sprites.
#[derive(Debug, Clone)]
pub struct Sparkles {
    sparkles: Vec<Sparkle>,
    color: Color,
}

impl Sparkles {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let half = SCALE * 0.5;
        let sparkles = (0..COUNT)
            .map(|_| Sparkle {
                rest: Vec3::new(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                ),
                size: SIZE,
                speed: SPEED,
                noise: NOISE,
                opacity: 1.0,
            })
            .collect();

        Self {
            sparkles,
            color: Color::WHITE,
        }
    }

    pub fn count(&self) -> usize {
        self.sparkles.len()
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// All sparkle positions at elapsed time `t`.
    pub fn positions(&self, t: f32) -> impl Iterator<Item = Vec3> + '_ {
        self.sparkles.iter().map(move |s| s.position(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_composition() {
        let s = Sparkles::new(&mut StdRng::seed_from_u64(11));
        assert_eq!(s.count(), COUNT);
        assert_eq!(s.color(), Color::WHITE);
        for sparkle in s.sparkles() {
            assert_eq!(sparkle.size, 2.0);
            assert_eq!(sparkle.speed, 0.4);
            assert!(sparkle.rest.abs().max_element() <= SCALE * 0.5);
        }
    }

    #[test]
    fn test_drift_stays_near_rest() {
        let s = Sparkles::new(&mut StdRng::seed_from_u64(12));
        for t in [0.0_f32, 1.0, 17.5, 400.0] {
            for (sparkle, p) in s.sparkles().iter().zip(s.positions(t)) {
                let offset = p - sparkle.rest;
                assert!(offset.abs().max_element() <= DRIFT + 1e-5);
            }
        }
    }

    #[test]
    fn test_drift_has_no_history() {
        let sparkle = Sparkle {
            rest: Vec3::new(1.0, 2.0, 3.0),
            size: SIZE,
            speed: SPEED,
            noise: NOISE,
            opacity: 1.0,
        };
        let direct = sparkle.position(5.0);
        let _ = sparkle.position(2.0);
        assert_eq!(direct, sparkle.position(5.0));
    }
}
