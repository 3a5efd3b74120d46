//! # Immersive - a floating 3D landing scene
//!
//! A full-window scene with five floating, hoverable spheres, a slowly
//! rotating particle cloud, twinkling sparkles and a distant starfield, viewed
//! through an orbit camera. A glass-style HUD sits on top of it: a loading
//! screen for the first three seconds, then a header, a control panel and a
//! keyboard hint that the `h` key hides and shows.
//!
//! ## Quick Start
//!
//! ```ignore
//! use immersive::prelude::*;
//!
//! fn main() -> Result<(), ExperienceError> {
//!     Experience::new()
//!         .with_title("Internet Inmersivo")
//!         .with_seed(42)
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! Everything that moves is a pure function of elapsed time, so the scene can
//! be composed and stepped without a window:
//!
//! ```
//! use immersive::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut scene = Scene::compose(&mut rng);
//! let frame = scene.update(1.5);
//! assert_eq!(frame.objects.len(), 5);
//! ```
//!
//! ## Layout
//!
//! - [`scene`] composes the objects, particles, sparkles, stars, lights and
//!   camera and produces a [`scene::SceneFrame`] per tick.
//! - [`animated`] and [`float`] drive each sphere's motion and pointer state;
//!   [`picking`] turns the cursor into pointer events.
//! - [`session`] and [`motion`] hold the overlay state and its animation
//!   curves; `overlay` draws it with egui.
//! - [`gpu`] renders a [`scene::SceneFrame`] with wgpu; [`app`] runs the
//!   window and the frame loop.

pub mod animated;
pub mod app;
pub mod camera;
pub mod error;
pub mod float;
pub mod gpu;
pub mod input;
pub mod lights;
pub mod motion;
#[cfg(feature = "egui")]
pub mod overlay;
pub mod particles;
pub mod picking;
pub mod scene;
pub mod session;
pub mod sparkles;
pub mod stars;
pub mod time;
pub mod visuals;

pub use animated::{AnimatedObject, PointerEvent};
pub use app::Experience;
pub use camera::{OrbitControls, PerspectiveCamera};
pub use error::{ExperienceError, GpuError};
pub use glam::{Mat4, Vec2, Vec3};
pub use scene::{Scene, SceneFrame};
pub use session::{Control, UiSession};
pub use visuals::{Color, Material};

/// Convenient re-exports for typical use.
///
/// ```ignore
/// use immersive::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animated::{AnimatedObject, Interaction, PointerEvent};
    pub use crate::app::Experience;
    pub use crate::camera::{OrbitControls, PerspectiveCamera};
    pub use crate::error::{ExperienceError, GpuError};
    pub use crate::input::{Input, MouseButton};
    pub use crate::lights::{Environment, Light};
    pub use crate::picking::{Hit, PointerTracker, Ray};
    pub use crate::scene::{Scene, SceneFrame};
    pub use crate::session::{Control, LoadingTimer, UiSession};
    pub use crate::time::Time;
    pub use crate::visuals::{BlendMode, Color, Material, PointStyle};
    pub use crate::{Mat4, Vec2, Vec3};

    #[cfg(feature = "egui")]
    pub use egui;
}
