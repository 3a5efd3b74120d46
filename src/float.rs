//! Ambient floating motion.
//!
//! Every animated object sits inside a float group that bobs up and down and
//! sways a little around all three axes. Each group has its own phase offset,
//! so the objects drift out of step with each other.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// Upper bound of the random phase offset, in seconds.
pub const MAX_PHASE: f32 = 10_000.0;

/// Parameters of a float group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatMotion {
    /// Time multiplier for the oscillation.
    pub speed: f32,
    /// Multiplier on the sway angles.
    pub rotation_intensity: f32,
    /// Multiplier on the vertical bob.
    pub float_intensity: f32,
    /// Output range the raw bob (`-0.1..=0.1`) is mapped onto.
    pub floating_range: (f32, f32),
    /// Phase offset in seconds.
    pub phase: f32,
}

/// Group transform produced by [`FloatMotion::sample`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatOffset {
    /// Vertical offset of the group.
    pub y: f32,
    /// Sway angles in radians, applied in XYZ order.
    pub rotation: Vec3,
}

impl FloatOffset {
    /// The group's local matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, Vec3::new(0.0, self.y, 0.0))
    }
}

impl Default for FloatMotion {
    fn default() -> Self {
        Self {
            speed: 1.0,
            rotation_intensity: 1.0,
            float_intensity: 1.0,
            floating_range: (-0.1, 0.1),
            phase: 0.0,
        }
    }
}

impl FloatMotion {
    /// The float used for the interactive spheres, with a random phase.
    pub fn for_sphere<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            speed: 2.0,
            rotation_intensity: 1.0,
            float_intensity: 2.0,
            phase: rng.gen_range(0.0..MAX_PHASE),
            ..Default::default()
        }
    }

    /// Evaluate the group transform at elapsed time `t`.
    pub fn sample(&self, t: f32) -> FloatOffset {
        let u = (self.phase + t) / 4.0 * self.speed;
        let (sin, cos) = u.sin_cos();

        let rotation = Vec3::new(cos / 8.0, sin / 8.0, sin / 20.0) * self.rotation_intensity;

        let (lo, hi) = self.floating_range;
        let y = map_linear(sin / 10.0, -0.1, 0.1, lo, hi) * self.float_intensity;

        FloatOffset { y, rotation }
    }
}

/// Re-map `x` from the range `a1..a2` onto `b1..b2`.
pub fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}
