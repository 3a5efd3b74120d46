//! Integration tests for scene composition, object animation and the overlay
//! session, driven through the public API only.

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use immersive::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn compose(seed: u64) -> Scene {
    Scene::compose(&mut StdRng::seed_from_u64(seed))
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ============================================================================
// Animated objects
// ============================================================================

#[test]
fn test_rotation_follows_time_regardless_of_interaction() {
    let mut object = AnimatedObject::new(Vec3::ZERO, Color::hex(0x45b7d1));
    for &t in &[0.0, 0.25, 1.0, PI, 12.5, 100.0] {
        let idle = object.transform(t).rotation;
        assert!(approx(idle.x, t.sin() * 0.3));
        assert!(approx(idle.y, (t * 0.5).sin() * 0.3));
        assert_eq!(idle.z, 0.0);
    }

    object.handle_pointer(PointerEvent::Enter);
    object.handle_pointer(PointerEvent::Down);
    for &t in &[0.0, 2.0, 7.0] {
        let active = object.transform(t).rotation;
        assert!(approx(active.x, t.sin() * 0.3));
        assert!(approx(active.y, (t * 0.5).sin() * 0.3));
    }
}

#[test]
fn test_effective_scale_table() {
    let mut object = AnimatedObject::new(Vec3::ZERO, Color::WHITE);
    assert!(approx(object.effective_scale(), 1.0));

    object.handle_pointer(PointerEvent::Enter);
    assert!(approx(object.effective_scale(), 1.2));

    object.handle_pointer(PointerEvent::Down);
    assert!(approx(object.effective_scale(), 1.08));

    object.handle_pointer(PointerEvent::Leave);
    assert!(approx(object.effective_scale(), 0.9));

    object.handle_pointer(PointerEvent::Up);
    assert!(approx(object.effective_scale(), 1.0));
}

#[test]
fn test_first_sphere_at_pi() {
    let mut scene = compose(3);
    scene.update(PI);

    let object = scene
        .object_at(Vec3::new(-3.0, 2.0, 0.0))
        .expect("sphere at [-3, 2, 0]");
    assert_eq!(object.base_scale(), 0.8);

    let transform = object.transform(scene.elapsed());
    assert!(approx(transform.rotation.x, 0.0));
    assert!(approx(transform.rotation.y, 0.3));
    assert!(approx(transform.scale, 0.8));

    // The matrix handed to the renderer: float group over the mesh transform
    let mesh = Mat4::from_translation(Vec3::new(-3.0, 2.0, 0.0))
        * Mat4::from_rotation_x(PI.sin() * 0.3)
        * Mat4::from_rotation_y((PI * 0.5).sin() * 0.3)
        * Mat4::from_scale(Vec3::splat(0.8));
    let expected = object.float_offset(PI).matrix() * mesh;
    assert!(scene.frame().objects[0].world.abs_diff_eq(expected, 1e-4));
}

#[test]
fn test_rendered_sphere_grows_when_hovered_and_pressed() {
    let mut scene = compose(3);
    scene.dispatch(&[(0, PointerEvent::Enter), (0, PointerEvent::Down)]);
    let t = 2.0_f32;
    let world = scene.update(t).objects[0].world;

    let mesh = Mat4::from_translation(Vec3::new(-3.0, 2.0, 0.0))
        * Mat4::from_rotation_x(t.sin() * 0.3)
        * Mat4::from_rotation_y((t * 0.5).sin() * 0.3)
        * Mat4::from_scale(Vec3::splat(0.8 * 1.2 * 0.9));
    let expected = scene.objects()[0].float_offset(t).matrix() * mesh;
    assert!(world.abs_diff_eq(expected, 1e-4));
}

#[test]
fn test_hover_only_lights_the_hovered_sphere() {
    let mut scene = compose(5);
    scene.dispatch(&[(4, PointerEvent::Enter)]);
    let frame = scene.update(1.0);

    for (i, object) in frame.objects.iter().enumerate() {
        if i == 4 {
            assert_eq!(object.material.emissive_intensity, 0.3);
            assert_eq!(object.material.emissive, Color::hex(0xf0932b));
        } else {
            assert_eq!(object.material.emissive_intensity, 0.0);
        }
        assert_eq!(object.material.metalness, 0.8);
        assert_eq!(object.material.roughness, 0.2);
    }
}

// ============================================================================
// Particle field
// ============================================================================

#[test]
fn test_field_is_fixed_after_construction() {
    let mut scene = compose(11);
    let before = scene.particles().positions().to_vec();
    assert_eq!(before.len(), 1000);

    scene.update(3.0);
    scene.update(40.0);
    assert_eq!(scene.particles().positions(), before.as_slice());
    assert_eq!(scene.particles().positions(), scene.particles().positions());
    assert!(before.iter().all(|p| p.abs().max_element() <= 25.0));
}

#[test]
fn test_rendered_field_matrix_follows_time() {
    let mut scene = compose(11);
    let frame = scene.update(10.0);
    let expected = Mat4::from_rotation_x(0.5) * Mat4::from_rotation_y(1.0);
    assert!(frame.field_matrix.abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_field_rotation_is_linear_in_time() {
    let scene = compose(11);
    for &t in &[0.0, 1.0, 10.0, 360.0] {
        let rotation = scene.particles().rotation(t);
        assert!(approx(rotation.x, 0.05 * t));
        assert!(approx(rotation.y, 0.1 * t));
    }
}

// ============================================================================
// Picking
// ============================================================================

#[test]
fn test_pointer_walkthrough_over_front_sphere() {
    let mut scene = compose(8);
    let mut pointer = PointerTracker::new();
    scene.update(0.0);

    let hits = scene.pick(Vec2::ZERO);
    assert_eq!(hits.first().map(|h| h.index), Some(2));
    let front = scene.objects()[2].position();
    assert_eq!(front, Vec3::new(0.0, 0.0, 3.0));

    let events = pointer.update_hover(&hits);
    scene.dispatch(&events);
    assert!(scene.objects()[2].is_hovered());

    let events = pointer.button_down(&hits);
    scene.dispatch(&events);
    assert!(scene.objects()[2].is_pressed());

    let events = pointer.button_up(&hits);
    scene.dispatch(&events);
    assert!(!scene.objects()[2].is_pressed());

    let events = pointer.clear();
    scene.dispatch(&events);
    assert!(scene.objects().iter().all(|o| !o.is_hovered()));
}

#[test]
fn test_corner_pick_misses() {
    let mut scene = compose(8);
    scene.update(0.0);
    assert!(scene.pick(Vec2::new(0.99, -0.99)).is_empty());
}

// ============================================================================
// Overlay session
// ============================================================================

#[test]
fn test_loading_ends_once_after_delay() {
    let start = Instant::now();
    let mut session = UiSession::mount(start);
    assert!(session.is_loading());

    let mut fired = 0;
    for ms in (0..3000).step_by(16) {
        if session.tick(start + Duration::from_millis(ms)) {
            fired += 1;
        }
        assert!(session.is_loading());
    }
    for ms in [3000, 3001, 5000, 60_000] {
        if session.tick(start + Duration::from_millis(ms)) {
            fired += 1;
        }
        assert!(!session.is_loading());
    }
    assert_eq!(fired, 1);
}

#[test]
fn test_h_key_toggles_hud() {
    let mut session = UiSession::mount(Instant::now());
    assert!(session.is_ui_visible());

    session.on_key_press("h");
    assert!(!session.is_ui_visible());
    session.on_key_press("H");
    assert!(session.is_ui_visible());

    for other in ["g", "j", " ", "hh", "Escape"] {
        session.on_key_press(other);
        assert!(session.is_ui_visible());
    }
}

#[test]
fn test_teardown_freezes_session() {
    let start = Instant::now();
    let mut session = UiSession::mount(start);
    session.teardown();
    session.teardown();

    assert!(!session.tick(start + Duration::from_secs(10)));
    assert!(session.is_loading());

    session.on_key_press("h");
    assert!(session.is_ui_visible());

    session.activate(Control::PlayPause);
    assert!(!session.is_playing());
}
