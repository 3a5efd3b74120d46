//! The rotating particle cloud.
//!
//! A fixed set of points scattered through a cube around the origin, each
//! with its own random color. Positions and colors are generated once; the
//! only thing that changes afterwards is the rotation of the whole field,
//! which is derived from elapsed time.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// Number of particles in the field.
pub const COUNT: usize = 1000;
/// Half the edge length of the cube particles are scattered in.
pub const HALF_EXTENT: f32 = 25.0;
/// World-space point size before attenuation.
pub const POINT_SIZE: f32 = 0.1;
/// Whether point size shrinks with view depth.
pub const SIZE_ATTENUATION: bool = true;
/// Field spin around X, in radians per second.
pub const SPIN_X: f32 = 0.05;
/// Field spin around Y, in radians per second.
pub const SPIN_Y: f32 = 0.1;

/// A static cloud of colored points.
#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl ParticleField {
    /// Generate the field. Called once per scene composition.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(COUNT);
        let mut colors = Vec::with_capacity(COUNT);

        for _ in 0..COUNT {
            positions.push(Vec3::new(
                rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
                rng.gen_range(-HALF_EXTENT..HALF_EXTENT),
            ));
            colors.push(Vec3::new(rng.gen(), rng.gen(), rng.gen()));
        }

        Self { positions, colors }
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Rest positions in field space.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-particle RGB colors.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Field rotation (x, y, z) at elapsed time `t`.
    pub fn rotation(&self, t: f32) -> Vec3 {
        Vec3::new(SPIN_X * t, SPIN_Y * t, 0.0)
    }

    /// Field-to-world matrix at elapsed time `t`.
    pub fn model_matrix(&self, t: f32) -> Mat4 {
        let r = self.rotation(t);
        Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z))
    }
}
