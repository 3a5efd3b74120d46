//! Floating, hoverable, clickable spheres.
//!
//! An [`AnimatedObject`] owns nothing mutable except its two interaction
//! flags. Its transform for any frame is computed from elapsed time and those
//! flags alone:
//!
//! - `rotation.x = sin(t) * 0.3`
//! - `rotation.y = sin(t * 0.5) * 0.3`
//! - `scale = base_scale * (1.2 if hovered) * (0.9 if pressed)`
//!
//! A [`FloatMotion`] group is layered on top for the idle bob.

use glam::{EulerRot, Mat4, Quat, Vec3};
use log::debug;

use crate::float::{FloatMotion, FloatOffset};
use crate::visuals::{Color, Material};

/// Amplitude of the spin oscillation, in radians.
pub const ROTATION_AMPLITUDE: f32 = 0.3;
/// Scale multiplier while the pointer is over the object.
pub const HOVER_SCALE: f32 = 1.2;
/// Scale multiplier while a button is held on the object.
pub const PRESS_SCALE: f32 = 0.9;
/// Emissive intensity while hovered.
pub const HOVER_EMISSIVE_INTENSITY: f32 = 0.3;
pub const METALNESS: f32 = 0.8;
pub const ROUGHNESS: f32 = 0.2;
/// Radius of the unscaled sphere geometry.
pub const SPHERE_RADIUS: f32 = 1.0;
/// Width and height segments of the sphere geometry.
pub const SPHERE_SEGMENTS: u32 = 32;

/// Pointer callbacks delivered to an object by the picking layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Down,
    Up,
}

/// Interaction flags. Independent of each other, both false by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interaction {
    pub hovered: bool,
    pub pressed: bool,
}

impl Interaction {
    /// Apply a pointer event. Each event touches exactly one flag.
    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter => self.hovered = true,
            PointerEvent::Leave => self.hovered = false,
            PointerEvent::Down => self.pressed = true,
            PointerEvent::Up => self.pressed = false,
        }
    }
}

/// Mesh-local transform of an object for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// Rotation about X then Y, in radians. Z is always zero.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

/// A sphere whose transform is a pure function of time and pointer state.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedObject {
    position: Vec3,
    base_color: Color,
    base_scale: f32,
    interaction: Interaction,
    float: FloatMotion,
}

impl AnimatedObject {
    /// Create an object with a scale multiplier of 1 and no float motion.
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position,
            base_color: color,
            base_scale: 1.0,
            interaction: Interaction::default(),
            float: FloatMotion {
                float_intensity: 0.0,
                rotation_intensity: 0.0,
                ..Default::default()
            },
        }
    }

    /// Set the scale multiplier.
    ///
    /// The value is used as given: zero or negative scales are not clamped.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.base_scale = scale;
        self
    }

    /// Set the ambient float motion.
    pub fn with_float(mut self, float: FloatMotion) -> Self {
        self.float = float;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn float(&self) -> &FloatMotion {
        &self.float
    }

    pub fn is_hovered(&self) -> bool {
        self.interaction.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.interaction.pressed
    }

    /// Handle a pointer callback from the picking layer.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        debug!("{:?} on object at {:?}", event, self.position);
        self.interaction.apply(event);
    }

    /// Uniform scale for the current interaction state.
    pub fn effective_scale(&self) -> f32 {
        let hover = if self.interaction.hovered {
            HOVER_SCALE
        } else {
            1.0
        };
        let press = if self.interaction.pressed {
            PRESS_SCALE
        } else {
            1.0
        };
        self.base_scale * hover * press
    }

    /// Mesh-local rotation and scale at elapsed time `t`.
    pub fn transform(&self, t: f32) -> ObjectTransform {
        ObjectTransform {
            rotation: Vec3::new(
                t.sin() * ROTATION_AMPLITUDE,
                (t * 0.5).sin() * ROTATION_AMPLITUDE,
                0.0,
            ),
            scale: self.effective_scale(),
        }
    }

    /// Float group transform at elapsed time `t`.
    pub fn float_offset(&self, t: f32) -> FloatOffset {
        self.float.sample(t)
    }

    /// Full model matrix: float group applied over the mesh transform.
    pub fn world_matrix(&self, t: f32) -> Mat4 {
        let local = self.transform(t);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            local.rotation.x,
            local.rotation.y,
            local.rotation.z,
        );
        let scale = Vec3::splat(local.scale);
        let mesh = Mat4::from_scale_rotation_translation(scale, rotation, self.position);
        self.float_offset(t).matrix() * mesh
    }

    /// World-space bounding sphere at elapsed time `t`.
    pub fn bounding_sphere(&self, t: f32) -> (Vec3, f32) {
        let center = self.world_matrix(t).transform_point3(Vec3::ZERO);
        (center, self.effective_scale().abs() * SPHERE_RADIUS)
    }

    /// Surface material for the current interaction state.
    pub fn material(&self) -> Material {
        let (emissive, emissive_intensity) = if self.interaction.hovered {
            (self.base_color, HOVER_EMISSIVE_INTENSITY)
        } else {
            (Color::BLACK, 0.0)
        };
        Material {
            color: self.base_color,
            emissive,
            emissive_intensity,
            metalness: METALNESS,
            roughness: ROUGHNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> AnimatedObject {
        AnimatedObject::new(Vec3::new(-3.0, 2.0, 0.0), Color::hex(0xff6b6b))
    }

    #[test]
    fn test_flags_default_false() {
        let obj = object();
        assert_eq!(obj.interaction(), Interaction::default());
        assert!(!obj.is_hovered());
        assert!(!obj.is_pressed());
        assert_eq!(obj.base_scale(), 1.0);
    }

    #[test]
    fn test_pointer_events_touch_one_flag_each() {
        let mut obj = object();

        obj.handle_pointer(PointerEvent::Enter);
        assert!(obj.is_hovered() && !obj.is_pressed());

        obj.handle_pointer(PointerEvent::Down);
        assert!(obj.is_hovered() && obj.is_pressed());

        obj.handle_pointer(PointerEvent::Leave);
        assert!(!obj.is_hovered() && obj.is_pressed());

        obj.handle_pointer(PointerEvent::Up);
        assert!(!obj.is_hovered() && !obj.is_pressed());
    }

    #[test]
    fn test_repeated_events_are_not_debounced() {
        let mut obj = object();
        obj.handle_pointer(PointerEvent::Enter);
        obj.handle_pointer(PointerEvent::Enter);
        assert!(obj.is_hovered());
        obj.handle_pointer(PointerEvent::Leave);
        assert!(!obj.is_hovered());
    }

    #[test]
    fn test_effective_scale_combinations() {
        let mut obj = object();
        assert!((obj.effective_scale() - 1.0).abs() < 1e-6);

        obj.handle_pointer(PointerEvent::Enter);
        assert!((obj.effective_scale() - 1.2).abs() < 1e-6);

        obj.handle_pointer(PointerEvent::Down);
        assert!((obj.effective_scale() - 1.08).abs() < 1e-6);

        obj.handle_pointer(PointerEvent::Leave);
        assert!((obj.effective_scale() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_ignores_interaction() {
        let mut obj = object().with_scale(0.8);
        let t = 1.234_f32;
        let idle = obj.transform(t);
        obj.handle_pointer(PointerEvent::Enter);
        obj.handle_pointer(PointerEvent::Down);
        let active = obj.transform(t);

        assert_eq!(idle.rotation, active.rotation);
        assert!((idle.rotation.x - t.sin() * 0.3).abs() < 1e-6);
        assert!((idle.rotation.y - (t * 0.5).sin() * 0.3).abs() < 1e-6);
        assert_eq!(idle.rotation.z, 0.0);
    }

    #[test]
    fn test_scale_passthrough_is_not_clamped() {
        let zero = object().with_scale(0.0);
        assert_eq!(zero.transform(1.0).scale, 0.0);

        let mut negative = object().with_scale(-2.0);
        negative.handle_pointer(PointerEvent::Enter);
        assert!((negative.transform(1.0).scale + 2.4).abs() < 1e-6);
        assert!((negative.bounding_sphere(1.0).1 - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_hover_emissive() {
        let mut obj = object();
        let idle = obj.material();
        assert_eq!(idle.emissive, Color::BLACK);
        assert_eq!(idle.emissive_intensity, 0.0);
        assert_eq!(idle.metalness, METALNESS);
        assert_eq!(idle.roughness, ROUGHNESS);

        obj.handle_pointer(PointerEvent::Enter);
        let hovered = obj.material();
        assert_eq!(hovered.emissive, obj.base_color());
        assert_eq!(hovered.emissive_intensity, HOVER_EMISSIVE_INTENSITY);

        // Pressing alone does not light the object
        obj.handle_pointer(PointerEvent::Leave);
        obj.handle_pointer(PointerEvent::Down);
        assert_eq!(obj.material().emissive_intensity, 0.0);
    }

    #[test]
    fn test_world_matrix_without_float_places_object() {
        let obj = object();
        let (center, radius) = obj.bounding_sphere(0.0);
        assert!((center - Vec3::new(-3.0, 2.0, 0.0)).length() < 1e-5);
        assert!((radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_world_matrix_composes_rotation_and_scale() {
        let mut obj = object().with_scale(0.8);
        obj.handle_pointer(PointerEvent::Enter);
        obj.handle_pointer(PointerEvent::Down);
        let t = std::f32::consts::PI;

        let expected = Mat4::from_translation(Vec3::new(-3.0, 2.0, 0.0))
            * Mat4::from_rotation_x(t.sin() * 0.3)
            * Mat4::from_rotation_y((t * 0.5).sin() * 0.3)
            * Mat4::from_scale(Vec3::splat(0.8 * 1.2 * 0.9));
        assert!(obj.world_matrix(t).abs_diff_eq(expected, 1e-5));

        // At t = 2 both rotation angles are well away from zero
        let t = 2.0_f32;
        let expected = Mat4::from_translation(Vec3::new(-3.0, 2.0, 0.0))
            * Mat4::from_rotation_x(t.sin() * 0.3)
            * Mat4::from_rotation_y((t * 0.5).sin() * 0.3)
            * Mat4::from_scale(Vec3::splat(0.8 * 1.2 * 0.9));
        assert!(obj.world_matrix(t).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_float_moves_world_position() {
        let obj = object().with_float(FloatMotion {
            speed: 2.0,
            float_intensity: 2.0,
            phase: 3.0,
            ..Default::default()
        });
        let without_float = object();
        let t = 0.5;
        let a = obj.bounding_sphere(t).0;
        let b = without_float.bounding_sphere(t).0;
        assert!((a - b).length() > 1e-4);
        // The sway never carries an object far from its anchor
        assert!((a - b).length() < 1.0);
    }
}
