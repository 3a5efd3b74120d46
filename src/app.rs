//! Window, event loop and frame loop.
//!
//! [`Experience`] is the configuration builder; [`Experience::run`] opens the
//! window and blocks until it closes. All per-frame work happens in the
//! `RedrawRequested` handler: poll the loading timer, mount the scene when it
//! fires, advance the clock, apply orbit and hover input, update transforms
//! and render.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::error::ExperienceError;
#[cfg(feature = "egui")]
use crate::gpu::EguiIntegration;
use crate::gpu::GpuState;
use crate::input::{pressed_text, Input};
#[cfg(feature = "egui")]
use crate::overlay::Overlay;
use crate::picking::PointerTracker;
use crate::scene::Scene;
use crate::session::{UiSession, LOADING_DELAY};
use crate::time::Time;

/// Default window title.
pub const DEFAULT_TITLE: &str = "Internet Inmersivo";
/// Default logical window size.
pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

/// Builder for the immersive experience.
///
/// # Example
///
/// ```ignore
/// use immersive::Experience;
///
/// Experience::new()
///     .with_title("Demo")
///     .with_seed(7)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Experience {
    title: String,
    size: (u32, u32),
    seed: Option<u64>,
    loading_delay: Duration,
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

impl Experience {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            size: DEFAULT_SIZE,
            seed: None,
            loading_delay: LOADING_DELAY,
        }
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial logical window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Fix the random seed so the scene is identical between runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Change how long the loading screen stays up.
    pub fn with_loading_delay(mut self, delay: Duration) -> Self {
        self.loading_delay = delay;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn loading_delay(&self) -> Duration {
        self.loading_delay
    }

    /// The random source scene composition draws from.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ExperienceError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    rng: StdRng,
    config: Experience,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    #[cfg(feature = "egui")]
    overlay: Overlay,
    session: Option<UiSession>,
    scene: Option<Scene>,
    /// Scene clock, started when the scene mounts.
    time: Option<Time>,
    input: Input,
    pointer: PointerTracker,
    error: Option<ExperienceError>,
}

impl App {
    fn new(config: Experience) -> Self {
        Self {
            rng: config.rng(),
            config,
            window: None,
            gpu_state: None,
            #[cfg(feature = "egui")]
            egui: None,
            #[cfg(feature = "egui")]
            overlay: Overlay::new(),
            session: None,
            scene: None,
            time: None,
            input: Input::new(),
            pointer: PointerTracker::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ExperienceError> {
        let (width, height) = self.config.size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(gpu_state.device(), gpu_state.format(), &window));
        }

        self.gpu_state = Some(gpu_state);
        self.window = Some(window);
        self.session = Some(UiSession::mount_with_delay(Instant::now(), self.config.loading_delay));
        info!("Window ready, loading for {:?}", self.config.loading_delay);
        Ok(())
    }

    /// Compose the scene and upload it. Starts the scene clock.
    fn mount_scene(&mut self, now: Instant) {
        let mut scene = Scene::compose(&mut self.rng);
        let (width, height) = self.input.window_size();
        scene.camera_mut().set_viewport(width, height);

        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.mount_scene(&scene);
        }
        self.scene = Some(scene);
        self.time = Some(Time::starting_at(now));
    }

    fn pointer_over_ui(&self) -> bool {
        #[cfg(feature = "egui")]
        {
            self.egui.as_ref().is_some_and(|egui| egui.wants_pointer())
        }
        #[cfg(not(feature = "egui"))]
        {
            false
        }
    }

    fn on_button(&mut self, pressed: bool) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        let Some(ndc) = self.input.mouse_ndc() else {
            return;
        };
        let hits = scene.pick(ndc);
        let events = if pressed {
            self.pointer.button_down(&hits)
        } else {
            self.pointer.button_up(&hits)
        };
        scene.dispatch(&events);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        let loading_finished = self.session.as_mut().is_some_and(|session| session.tick(now));
        if loading_finished {
            self.mount_scene(now);
        }

        let over_ui = self.pointer_over_ui();
        if let (Some(scene), Some(time)) = (&mut self.scene, &mut self.time) {
            let elapsed = time.update_at(now);

            let hits = match self.input.mouse_ndc() {
                Some(ndc) if !over_ui => scene.pick(ndc),
                _ => Vec::new(),
            };
            let events = self.pointer.update_hover(&hits);
            scene.dispatch(&events);

            if !over_ui {
                scene.orbit(&self.input);
            } else {
                scene.orbit(&Input::new());
            }
            scene.update(elapsed);

            if time.frame() % 600 == 0 {
                debug!(
                    "t = {:.1}s, {:.2} ms/frame, {:.0} fps",
                    elapsed,
                    time.delta() * 1000.0,
                    time.fps()
                );
            }
        }
        self.input.end_frame();

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let mut frame = match gpu_state.begin_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                warn!("Skipping frame: {:?}", e);
                return;
            }
        };

        gpu_state.draw_scene(&mut frame, self.scene.as_ref());

        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window), Some(session)) =
            (&mut self.egui, &self.window, &mut self.session)
        {
            let overlay = &mut self.overlay;
            let output = egui.run(window, |ctx| overlay.show(ctx, session, now));
            egui.paint(gpu_state, &mut frame, output);
        }

        gpu_state.finish(frame);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("Startup failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => egui.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match &event {
            WindowEvent::CloseRequested => {
                if let Some(session) = &mut self.session {
                    session.teardown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.input.handle_event(&event);
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(*size);
                }
                if let Some(scene) = &mut self.scene {
                    scene.camera_mut().set_viewport(size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.set_pixel_ratio(*scale_factor as f32);
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if consumed {
                    return;
                }
                if let (Some(text), Some(session)) = (pressed_text(key_event), &mut self.session) {
                    session.on_key_press(text);
                }
            }
            WindowEvent::MouseInput { state, .. } => {
                let pressed = *state == ElementState::Pressed;
                let blocked = consumed || self.pointer_over_ui();
                // Releases always reach the input so drags never stick
                if !(pressed && blocked) {
                    self.input.handle_event(&event);
                }
                if !blocked {
                    self.on_button(pressed);
                }
            }
            WindowEvent::MouseWheel { .. } => {
                if !consumed {
                    self.input.handle_event(&event);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                self.input.handle_event(&event);
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.handle_event(&event);
                let events = self.pointer.clear();
                if let Some(scene) = &mut self.scene {
                    scene.dispatch(&events);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
