//! Perspective camera and orbit controls.
//!
//! The camera orbits a target point. Its placement is stored as yaw, pitch and
//! distance around that target, which keeps orbiting, panning and zooming
//! simple and makes pole clamping a one-liner.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::input::{Input, MouseButton};

/// Vertical field of view, in degrees.
pub const FOV_DEGREES: f32 = 50.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 2000.0;
/// Where the camera starts.
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);

/// Keeps the camera from flipping over the poles.
const POLE_EPSILON: f32 = 1e-3;

/// A perspective camera orbiting a target.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width over height.
    pub aspect: f32,
}

impl PerspectiveCamera {
    /// Camera at [`INITIAL_POSITION`] looking at the origin.
    pub fn new() -> Self {
        Self::looking_at(INITIAL_POSITION, Vec3::ZERO)
    }

    /// Camera placed at `position`, orbiting `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        let (yaw, pitch) = if distance > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / distance).clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };

        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_degrees: FOV_DEGREES,
            near: NEAR,
            far: FAR,
            aspect: 16.0 / 9.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Update the aspect ratio for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera right and up axes in world space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let view = self.view_matrix().inverse();
        (view.x_axis.truncate(), view.y_axis.truncate())
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse-driven orbit, pan and zoom with optional damping.
///
/// Left drag orbits, right drag pans, the wheel zooms. With damping on,
/// drags feed a pending delta that is bled into the camera a fraction at a
/// time by [`OrbitControls::update`], so motion eases out after release.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    /// Distance multiplier per wheel line toward the target.
    pub zoom_scale: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_scale: 0.95,
            min_distance: 0.01,
            max_distance: f32::INFINITY,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an orbit for a drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if !self.enable_rotate || viewport_height <= 0.0 {
            return;
        }
        self.pending_yaw -= TAU * delta.x / viewport_height * self.rotate_speed;
        self.pending_pitch += TAU * delta.y / viewport_height * self.rotate_speed;
    }

    /// Queue a pan for a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera, viewport_height: f32) {
        if !self.enable_pan || viewport_height <= 0.0 {
            return;
        }
        let world_per_pixel =
            2.0 * camera.distance * (camera.fov_degrees.to_radians() * 0.5).tan() / viewport_height;
        let (right, up) = camera.basis();
        self.pending_pan += (-right * delta.x + up * delta.y) * world_per_pixel * self.pan_speed;
    }

    /// Zoom by `lines` wheel steps. Positive zooms in.
    pub fn zoom(&mut self, lines: f32, camera: &mut PerspectiveCamera) {
        if !self.enable_zoom || lines == 0.0 {
            return;
        }
        camera.distance = (camera.distance * self.zoom_scale.powf(lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Feed this frame's pointer deltas into the controls.
    pub fn handle_input(&mut self, input: &Input, camera: &mut PerspectiveCamera) {
        let height = input.window_size().1 as f32;
        if input.mouse_held(MouseButton::Left) {
            self.rotate(input.mouse_delta(), height);
        } else if input.mouse_held(MouseButton::Right) {
            self.pan(input.mouse_delta(), camera, height);
        }
        self.zoom(input.scroll_delta(), camera);
    }

    /// Apply pending motion to the camera. Call once per frame.
    ///
    /// Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let yaw = self.pending_yaw * factor;
        let pitch = self.pending_pitch * factor;
        let pan = self.pending_pan * factor;

        let before = camera.position();
        camera.yaw += yaw;
        camera.pitch =
            (camera.pitch + pitch).clamp(-FRAC_PI_2 + POLE_EPSILON, FRAC_PI_2 - POLE_EPSILON);
        camera.target += pan;

        if self.enable_damping {
            self.pending_yaw *= 1.0 - self.damping_factor;
            self.pending_pitch *= 1.0 - self.damping_factor;
            self.pending_pan *= 1.0 - self.damping_factor;
        } else {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
            self.pending_pan = Vec3::ZERO;
        }

        camera.position().distance_squared(before) > 1e-12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_camera() {
        let camera = PerspectiveCamera::new();
        assert!((camera.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
        assert_eq!(camera.fov_degrees, 50.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 2000.0);
    }

    #[test]
    fn test_looking_at_round_trips_position() {
        let p = Vec3::new(3.0, 4.0, -2.0);
        let camera = PerspectiveCamera::looking_at(p, Vec3::new(1.0, 0.0, 0.0));
        assert!((camera.position() - p).length() < 1e-4);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = PerspectiveCamera::new();
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_damped_rotation_eases_in() {
        let mut camera = PerspectiveCamera::new();
        let mut controls = OrbitControls::new();
        controls.rotate(Vec2::new(100.0, 0.0), 720.0);

        let total = -TAU * 100.0 / 720.0;
        assert!(controls.update(&mut camera));
        assert!((camera.yaw - total * 0.05).abs() < 1e-5);

        for _ in 0..400 {
            controls.update(&mut camera);
        }
        assert!((camera.yaw - total).abs() < 1e-3);
        // The orbit keeps its radius
        assert!((camera.position().length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let mut camera = PerspectiveCamera::new();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..Default::default()
        };
        controls.rotate(Vec2::new(0.0, 10_000.0), 720.0);
        controls.update(&mut camera);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.pitch > FRAC_PI_2 - 0.01);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_zoom_scales_distance() {
        let mut camera = PerspectiveCamera::new();
        let controls = OrbitControls::new();
        let mut controls = controls;
        controls.zoom(1.0, &mut camera);
        assert!((camera.distance - 9.5).abs() < 1e-5);
        controls.zoom(-1.0, &mut camera);
        assert!((camera.distance - 10.0).abs() < 1e-4);

        controls.zoom(10_000.0, &mut camera);
        assert_eq!(camera.distance, controls.min_distance);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut camera = PerspectiveCamera::new();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..Default::default()
        };
        let before = camera.position() - camera.target;
        controls.pan(Vec2::new(50.0, 0.0), &camera, 720.0);
        controls.update(&mut camera);

        // Dragging right slides the scene right, so the camera moves left
        assert!(camera.target.x < 0.0);
        assert!((camera.position() - camera.target - before).length() < 1e-4);
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let mut camera = PerspectiveCamera::new();
        let mut controls = OrbitControls {
            enable_rotate: false,
            enable_zoom: false,
            ..Default::default()
        };
        controls.rotate(Vec2::new(100.0, 100.0), 720.0);
        controls.zoom(3.0, &mut camera);
        assert!(!controls.update(&mut camera));
        assert_eq!(camera.distance, 10.0);
    }
}
