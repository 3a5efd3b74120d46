//! Scene composition and per-frame update.
//!
//! [`Scene::compose`] builds the whole graph in one pass: camera and orbit
//! controls, lights, the star backdrop, the particle field, sparkles and the
//! five interactive spheres. [`Scene::update`] then derives every transform
//! for a frame from elapsed time and the spheres' interaction flags.

use glam::{Mat4, Vec2, Vec3};
use log::{debug, info};
use rand::Rng;

use crate::animated::{AnimatedObject, PointerEvent};
use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::float::FloatMotion;
use crate::input::Input;
use crate::lights::{scene_lights, Environment, Light};
use crate::particles::ParticleField;
use crate::picking::{intersect_objects, Hit, Ray};
use crate::sparkles::Sparkles;
use crate::stars::Starfield;
use crate::visuals::{Color, Material};

/// Placement of one interactive sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSpec {
    pub position: Vec3,
    /// Packed `0xRRGGBB` sRGB color.
    pub color: u32,
    pub scale: f32,
}

/// The interactive spheres, in composition order.
pub const OBJECTS: [ObjectSpec; 5] = [
    ObjectSpec {
        position: Vec3::new(-3.0, 2.0, 0.0),
        color: 0xff6b6b,
        scale: 0.8,
    },
    ObjectSpec {
        position: Vec3::new(3.0, -1.0, -2.0),
        color: 0x4ecdc4,
        scale: 1.2,
    },
    ObjectSpec {
        position: Vec3::new(0.0, 0.0, 3.0),
        color: 0x45b7d1,
        scale: 1.0,
    },
    ObjectSpec {
        position: Vec3::new(-2.0, -3.0, -1.0),
        color: 0xf9ca24,
        scale: 0.9,
    },
    ObjectSpec {
        position: Vec3::new(4.0, 1.0, 1.0),
        color: 0xf0932b,
        scale: 1.1,
    },
];

/// Render-ready state of one sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectFrame {
    pub world: Mat4,
    pub material: Material,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct SceneFrame {
    pub time: f32,
    pub objects: Vec<ObjectFrame>,
    pub field_matrix: Mat4,
    pub sparkle_positions: Vec<Vec3>,
    pub star_size_scale: f32,
}

/// The composed scene.
pub struct Scene {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    lights: [Light; 3],
    environment: Environment,
    stars: Starfield,
    particles: ParticleField,
    sparkles: Sparkles,
    objects: Vec<AnimatedObject>,
    elapsed: f32,
    frame: SceneFrame,
}

impl Scene {
    /// Assemble the scene. `rng` supplies every random value in it.
    pub fn compose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let particles = ParticleField::new(rng);
        let objects = OBJECTS
            .iter()
            .map(|spec| {
                AnimatedObject::new(spec.position, Color::hex(spec.color))
                    .with_scale(spec.scale)
                    .with_float(FloatMotion::for_sphere(rng))
            })
            .collect();
        let stars = Starfield::new(rng);
        let sparkles = Sparkles::new(rng);

        info!(
            "Scene composed: {} particles, {} stars, {} sparkles, {} objects",
            particles.count(),
            stars.count(),
            sparkles.count(),
            OBJECTS.len()
        );

        let mut scene = Self {
            camera: PerspectiveCamera::new(),
            controls: OrbitControls::new(),
            lights: scene_lights(),
            environment: Environment::Night,
            stars,
            particles,
            sparkles,
            objects,
            elapsed: 0.0,
            frame: SceneFrame::default(),
        };
        scene.update(0.0);
        scene
    }

    /// Recompute per-frame state for elapsed time `t`.
    ///
    /// The result depends only on `t` and the current interaction flags.
    pub fn update(&mut self, t: f32) -> &SceneFrame {
        self.elapsed = t;
        self.frame = SceneFrame {
            time: t,
            objects: self
                .objects
                .iter()
                .map(|object| ObjectFrame {
                    world: object.world_matrix(t),
                    material: object.material(),
                })
                .collect(),
            field_matrix: self.particles.model_matrix(t),
            sparkle_positions: self.sparkles.positions(t).collect(),
            star_size_scale: self.stars.size_scale(t),
        };
        &self.frame
    }

    /// State computed by the last [`Scene::update`].
    pub fn frame(&self) -> &SceneFrame {
        &self.frame
    }

    /// Elapsed time of the last update.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn objects(&self) -> &[AnimatedObject] {
        &self.objects
    }

    /// The sphere composed at `position`, if any.
    pub fn object_at(&self, position: Vec3) -> Option<&AnimatedObject> {
        self.objects.iter().find(|o| o.position() == position)
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn stars(&self) -> &Starfield {
        &self.stars
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn sparkles(&self) -> &Sparkles {
        &self.sparkles
    }

    /// Drive the orbit controls from this frame's input.
    pub fn orbit(&mut self, input: &Input) -> bool {
        self.controls.handle_input(input, &mut self.camera);
        self.controls.update(&mut self.camera)
    }

    /// Objects under a cursor at `ndc`, nearest first.
    pub fn pick(&self, ndc: Vec2) -> Vec<Hit> {
        let ray = Ray::from_ndc(ndc, self.camera.view_proj().inverse());
        intersect_objects(&ray, &self.objects, self.elapsed)
    }

    /// Deliver pointer callbacks to the objects they name.
    pub fn dispatch(&mut self, events: &[(usize, PointerEvent)]) {
        for &(index, event) in events {
            match self.objects.get_mut(index) {
                Some(object) => object.handle_pointer(event),
                None => debug!("Dropping {:?} for unknown object {}", event, index),
            }
        }
    }
}
