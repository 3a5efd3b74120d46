//! Pointer hit testing for the interactive spheres.
//!
//! A ray is cast from the camera through the cursor and tested against each
//! object's bounding sphere. [`PointerTracker`] turns the per-frame hit list
//! into enter/leave callbacks and forwards button presses to whatever is under
//! the cursor. Every intersected object receives the event, not only the
//! nearest one.

use glam::{Mat4, Vec2, Vec3};
use std::collections::BTreeSet;

use crate::animated::{AnimatedObject, PointerEvent};

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray through a point in normalized device coordinates.
    ///
    /// `inv_view_proj` is the inverse of the camera's view-projection matrix.
    pub fn from_ndc(ndc: Vec2, inv_view_proj: Mat4) -> Self {
        let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Self {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Distance along `ray` to the first intersection with a sphere.
///
/// Returns `None` on a miss, for spheres behind the ray, and for spheres with
/// zero radius.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    let far = -b + sqrt_d;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        // Origin inside the sphere
        Some(0.0)
    } else {
        None
    }
}

/// One intersected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance: f32,
}

/// Intersect a ray with every object at elapsed time `t`, nearest first.
pub fn intersect_objects(ray: &Ray, objects: &[AnimatedObject], t: f32) -> Vec<Hit> {
    let mut hits: Vec<Hit> = objects
        .iter()
        .enumerate()
        .filter_map(|(index, object)| {
            let (center, radius) = object.bounding_sphere(t);
            ray_sphere(ray, center, radius).map(|distance| Hit { index, distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Converts hit lists into pointer callbacks.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    hovered: BTreeSet<usize>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices currently under the pointer.
    pub fn hovered(&self) -> impl Iterator<Item = usize> + '_ {
        self.hovered.iter().copied()
    }

    /// Diff the new hit list against the hovered set.
    ///
    /// Emits `Leave` for objects no longer hit, then `Enter` for new ones.
    pub fn update_hover(&mut self, hits: &[Hit]) -> Vec<(usize, PointerEvent)> {
        let current: BTreeSet<usize> = hits.iter().map(|h| h.index).collect();
        let mut events: Vec<(usize, PointerEvent)> = self
            .hovered
            .difference(&current)
            .map(|&i| (i, PointerEvent::Leave))
            .collect();
        events.extend(current.difference(&self.hovered).map(|&i| (i, PointerEvent::Enter)));
        self.hovered = current;
        events
    }

    /// The pointer left the window: everything hovered gets `Leave`.
    pub fn clear(&mut self) -> Vec<(usize, PointerEvent)> {
        std::mem::take(&mut self.hovered)
            .into_iter()
            .map(|i| (i, PointerEvent::Leave))
            .collect()
    }

    /// A button went down over `hits`.
    pub fn button_down(&self, hits: &[Hit]) -> Vec<(usize, PointerEvent)> {
        hits.iter().map(|h| (h.index, PointerEvent::Down)).collect()
    }

    /// A button went up over `hits`.
    ///
    /// Objects pressed elsewhere stay pressed.
    pub fn button_up(&self, hits: &[Hit]) -> Vec<(usize, PointerEvent)> {
        hits.iter().map(|h| (h.index, PointerEvent::Up)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::visuals::Color;

    fn hit(index: usize) -> Hit {
        Hit { index, distance: 1.0 }
    }

    #[test]
    fn test_ray_sphere_front_hit() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let d = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((d - 9.0).abs() < 1e-5);
        assert!((ray.at(d) - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_sphere_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_sphere(&ray, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, 20.0), 1.0).is_none());
        assert!(ray_sphere(&ray, Vec3::ZERO, 0.0).is_none());
    }

    #[test]
    fn test_center_ray_from_camera() {
        let camera = PerspectiveCamera::new();
        let ray = Ray::from_ndc(Vec2::ZERO, camera.view_proj().inverse());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!(ray.origin.z > 9.0 && ray.origin.z <= 10.0);
    }

    #[test]
    fn test_intersections_sorted_nearest_first() {
        let objects = vec![
            AnimatedObject::new(Vec3::new(0.0, 0.0, -5.0), Color::WHITE),
            AnimatedObject::new(Vec3::new(0.0, 0.0, 3.0), Color::WHITE),
            AnimatedObject::new(Vec3::new(5.0, 0.0, 0.0), Color::WHITE),
        ];
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let hits = intersect_objects(&ray, &objects, 0.0);
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_enter_and_leave_once_per_transition() {
        let mut tracker = PointerTracker::new();

        assert_eq!(tracker.update_hover(&[hit(2)]), vec![(2, PointerEvent::Enter)]);
        // Staying over the same object emits nothing
        assert!(tracker.update_hover(&[hit(2)]).is_empty());

        let events = tracker.update_hover(&[hit(4)]);
        assert_eq!(events, vec![(2, PointerEvent::Leave), (4, PointerEvent::Enter)]);

        assert_eq!(tracker.clear(), vec![(4, PointerEvent::Leave)]);
        assert_eq!(tracker.hovered().count(), 0);
    }

    #[test]
    fn test_buttons_go_to_every_hit() {
        let tracker = PointerTracker::new();
        let hits = [hit(0), hit(3)];
        assert_eq!(
            tracker.button_down(&hits),
            vec![(0, PointerEvent::Down), (3, PointerEvent::Down)]
        );
        assert_eq!(tracker.button_up(&[]), vec![]);
    }
}
