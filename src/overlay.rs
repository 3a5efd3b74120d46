//! The egui overlay: loading screen, header, control panel and key hint.
//!
//! The overlay only reads and toggles [`UiSession`] flags. HUD elements are
//! mounted once loading has finished and animate in with their own delays;
//! hiding the HUD animates them out again.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use egui::{Align, Align2, Color32, FontId, Layout, RichText, Stroke};

use crate::motion::{pulse_opacity, spinner_angle, zoom_in_scale, Pose, Reveal};
use crate::session::{Control, UiSession};

pub const TITLE: &str = "Internet Inmersivo";
pub const SUBTITLE: &str = "Experiencia 3D Interactiva";
pub const STATUS: &str = "Conectado";
pub const HINT: &str = "Presiona 'H' para ocultar UI";
pub const LOADING_TITLE: &str = "Cargando Experiencia Inmersiva";
pub const LOADING_SUBTITLE: &str = "Preparando el futuro del internet...";

const CYAN_300: Color32 = Color32::from_rgb(0x67, 0xe8, 0xf9);
const CYAN_400: Color32 = Color32::from_rgb(0x22, 0xd3, 0xee);
const CYAN_500: Color32 = Color32::from_rgb(0x06, 0xb6, 0xd4);
const CYAN_900: Color32 = Color32::from_rgb(0x16, 0x4e, 0x63);
const PURPLE_400: Color32 = Color32::from_rgb(0xc0, 0x84, 0xfc);
const PURPLE_500: Color32 = Color32::from_rgb(0xa8, 0x55, 0xf7);
const PURPLE_900: Color32 = Color32::from_rgb(0x58, 0x1c, 0x87);
const BLUE_900: Color32 = Color32::from_rgb(0x1e, 0x3a, 0x8a);
const INDIGO_900: Color32 = Color32::from_rgb(0x31, 0x2e, 0x81);
const GREEN_400: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);

/// Panel inset from the window edge, in points.
const INSET: f32 = 16.0;
/// Widths (in points) from which secondary labels are shown.
const SMALL_BREAKPOINT: f32 = 640.0;
const MEDIUM_BREAKPOINT: f32 = 768.0;

/// Which optional control-panel labels fit at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub audio_label: bool,
    pub feature_labels: bool,
}

impl PanelLayout {
    pub fn for_width(width: f32) -> Self {
        Self {
            audio_label: width >= SMALL_BREAKPOINT,
            feature_labels: width >= MEDIUM_BREAKPOINT,
        }
    }
}

/// Overlay animation state.
#[derive(Debug, Clone)]
pub struct Overlay {
    header: Reveal,
    controls: Reveal,
    hint: Reveal,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            header: Reveal::header(),
            controls: Reveal::controls(),
            hint: Reveal::hint(),
        }
    }

    /// Point the HUD animations at the session's current flags.
    pub fn sync(&mut self, session: &UiSession, now: Instant) {
        let show = !session.is_loading() && session.is_ui_visible();
        self.header.set_visible(show, now);
        self.controls.set_visible(show, now);
        self.hint.set_visible(show, now);
    }

    /// Draw the overlay for this frame.
    pub fn show(&mut self, ctx: &egui::Context, session: &mut UiSession, now: Instant) {
        self.sync(session, now);

        if session.is_loading() {
            loading_screen(ctx, now.saturating_duration_since(session.mounted_at()));
            return;
        }

        gradient_wash(ctx);
        let pulse = pulse_opacity(now.saturating_duration_since(session.mounted_at()));

        let pose = self.header.pose(now);
        if pose.opacity > 0.0 {
            header(ctx, pose, pulse);
        }

        let pose = self.controls.pose(now);
        if pose.opacity > 0.0 {
            let interactive = self.controls.is_visible();
            if let Some(control) = control_panel(ctx, pose, interactive, session) {
                session.activate(control);
            }
        }

        let pose = self.hint.pose(now);
        if pose.opacity > 0.0 {
            hint(ctx, pose);
        }
    }
}

fn glass_frame(fill_alpha: u8, stroke_alpha: u8, radius: f32, margin: f32) -> egui::Frame {
    egui::Frame::default()
        .fill(Color32::from_black_alpha(fill_alpha))
        .stroke(Stroke::new(1.0, Color32::from_white_alpha(stroke_alpha)))
        .corner_radius(radius)
        .inner_margin(margin)
}

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    color.gamma_multiply(alpha.clamp(0.0, 1.0))
}

/// Four-corner gradient over `rect`: top-left, top-right, bottom-right, bottom-left.
fn gradient_rect(painter: &egui::Painter, rect: egui::Rect, corners: [Color32; 4]) {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), corners[0]);
    mesh.colored_vertex(rect.right_top(), corners[1]);
    mesh.colored_vertex(rect.right_bottom(), corners[2]);
    mesh.colored_vertex(rect.left_bottom(), corners[3]);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(egui::Shape::mesh(mesh));
}

fn gradient_wash(ctx: &egui::Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("gradient_wash"),
    ));
    gradient_rect(
        &painter,
        ctx.screen_rect(),
        [
            with_alpha(PURPLE_900, 0.2),
            Color32::TRANSPARENT,
            with_alpha(CYAN_900, 0.2),
            Color32::TRANSPARENT,
        ],
    );
}

fn loading_screen(ctx: &egui::Context, elapsed: Duration) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("loading"),
    ));
    let rect = ctx.screen_rect();
    gradient_rect(&painter, rect, [PURPLE_900, BLUE_900, INDIGO_900, BLUE_900]);

    let scale = zoom_in_scale(elapsed);
    let fade = ((elapsed.as_secs_f32() / 0.8).min(1.0)).max(0.0);
    let center = rect.center();

    // Spinner: a ring with its top quarter missing
    let radius = 28.0 * scale;
    let spinner_center = center - egui::vec2(0.0, 48.0 * scale);
    let start = spinner_angle(elapsed) - TAU * 0.125 - std::f32::consts::FRAC_PI_2;
    let points: Vec<egui::Pos2> = (0..=48)
        .map(|i| {
            let a = start + TAU * 0.75 * (i as f32 / 48.0);
            spinner_center + egui::vec2(a.cos(), a.sin()) * radius
        })
        .collect();
    painter.add(egui::Shape::line(points, Stroke::new(4.0 * scale, with_alpha(CYAN_400, fade))));

    painter.text(
        center + egui::vec2(0.0, 8.0 * scale),
        Align2::CENTER_CENTER,
        LOADING_TITLE,
        FontId::proportional(24.0 * scale),
        with_alpha(Color32::WHITE, pulse_opacity(elapsed) * fade),
    );
    painter.text(
        center + egui::vec2(0.0, 40.0 * scale),
        Align2::CENTER_CENTER,
        LOADING_SUBTITLE,
        FontId::proportional(16.0 * scale),
        with_alpha(CYAN_300, fade),
    );
}

fn header(ctx: &egui::Context, pose: Pose, pulse: f32) {
    let width = ctx.screen_rect().width() - INSET * 2.0;
    egui::Area::new(egui::Id::new("header"))
        .anchor(Align2::LEFT_TOP, egui::vec2(INSET, INSET + pose.offset_y))
        .order(egui::Order::Middle)
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(pose.opacity);
            glass_frame(51, 26, 16.0, INSET).show(ui, |ui| {
                ui.set_width(width - INSET * 2.0);
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(TITLE).size(24.0).strong().color(CYAN_400));
                        ui.label(
                            RichText::new(SUBTITLE)
                                .size(14.0)
                                .color(with_alpha(Color32::WHITE, 0.6)),
                        );
                    });
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(STATUS).size(14.0).color(GREEN_400));
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                        ui.painter()
                            .circle_filled(rect.center(), 4.0, with_alpha(GREEN_400, pulse));
                    });
                });
            });
        });
}

fn round_button(ui: &mut egui::Ui, icon: &str, color: Color32, tint: Color32, size: f32) -> bool {
    ui.add(
        egui::Button::new(RichText::new(icon).size(size).color(color))
            .fill(with_alpha(tint, 0.2))
            .stroke(Stroke::new(1.0, with_alpha(tint, 0.3)))
            .min_size(egui::vec2(48.0, 48.0)),
    )
    .clicked()
}

/// Fullscreen button: four corner brackets painted inside a round button.
fn fullscreen_button(ui: &mut egui::Ui) -> bool {
    let response = ui.add(
        egui::Button::new("")
            .fill(with_alpha(Color32::WHITE, 0.2))
            .stroke(Stroke::new(1.0, with_alpha(Color32::WHITE, 0.3)))
            .min_size(egui::vec2(48.0, 48.0)),
    );
    let icon = egui::Rect::from_center_size(response.rect.center(), egui::vec2(16.0, 16.0));
    let stroke = Stroke::new(2.0, Color32::WHITE);
    let arm = 5.0;
    let painter = ui.painter();
    for (corner, dx, dy) in [
        (icon.left_top(), arm, arm),
        (icon.right_top(), -arm, arm),
        (icon.right_bottom(), -arm, -arm),
        (icon.left_bottom(), arm, -arm),
    ] {
        painter.line_segment([corner, corner + egui::vec2(dx, 0.0)], stroke);
        painter.line_segment([corner, corner + egui::vec2(0.0, dy)], stroke);
    }
    response.clicked()
}

fn control_panel(
    ctx: &egui::Context,
    pose: Pose,
    interactive: bool,
    session: &UiSession,
) -> Option<Control> {
    let screen = ctx.screen_rect();
    let width = screen.width() - INSET * 2.0;
    let layout = PanelLayout::for_width(screen.width());
    let mut activated = None;

    egui::Area::new(egui::Id::new("control_panel"))
        .anchor(Align2::LEFT_BOTTOM, egui::vec2(INSET, -INSET + pose.offset_y))
        .order(egui::Order::Middle)
        .interactable(interactive)
        .show(ctx, |ui| {
            ui.set_opacity(pose.opacity);
            glass_frame(51, 26, 16.0, INSET).show(ui, |ui| {
                ui.set_width(width - INSET * 2.0);
                ui.horizontal(|ui| {
                    let play_icon = if session.is_playing() { "⏸" } else { "▶" };
                    if round_button(ui, play_icon, CYAN_400, CYAN_500, 20.0) {
                        activated = Some(Control::PlayPause);
                    }
                    let volume_icon = if session.is_volume_on() { "🔊" } else { "🔇" };
                    if round_button(ui, volume_icon, PURPLE_400, PURPLE_500, 20.0) {
                        activated = Some(Control::Volume);
                    }
                    if layout.audio_label {
                        ui.label(
                            RichText::new("🎧 Audio Espacial")
                                .size(14.0)
                                .color(with_alpha(Color32::WHITE, 0.8)),
                        );
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if fullscreen_button(ui) {
                            activated = Some(Control::Fullscreen);
                        }
                        if round_button(ui, "⚙", Color32::WHITE, Color32::WHITE, 18.0) {
                            activated = Some(Control::Settings);
                        }
                        if layout.feature_labels {
                            let muted = with_alpha(Color32::WHITE, 0.6);
                            for label in ["⚡ 60 FPS", "✋ Gestos", "👁 VR Ready"] {
                                ui.label(RichText::new(label).size(14.0).color(muted));
                            }
                        }
                    });
                });
            });
        });

    activated
}

fn hint(ctx: &egui::Context, pose: Pose) {
    egui::Area::new(egui::Id::new("hint"))
        .anchor(Align2::RIGHT_TOP, egui::vec2(-INSET, INSET + pose.offset_y))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(pose.opacity);
            glass_frame(102, 51, 8.0, 8.0).show(ui, |ui| {
                ui.label(RichText::new(HINT).size(12.0).color(with_alpha(Color32::WHITE, 0.7)));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(overlay: &Overlay) -> [bool; 3] {
        [overlay.header.is_visible(), overlay.controls.is_visible(), overlay.hint.is_visible()]
    }

    fn run_frame(
        ctx: &egui::Context,
        overlay: &mut Overlay,
        session: &mut UiSession,
        now: Instant,
    ) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| overlay.show(ctx, session, now));
    }

    #[test]
    fn test_fullscreen_icon_is_painted() {
        let ctx = egui::Context::default();
        let mut clicked = true;
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| clicked = fullscreen_button(ui));
        });
        assert!(!clicked);
        let brackets = output
            .shapes
            .iter()
            .filter(|clipped| matches!(clipped.shape, egui::Shape::LineSegment { .. }))
            .count();
        assert!(brackets >= 8);
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(
            PanelLayout::for_width(500.0),
            PanelLayout {
                audio_label: false,
                feature_labels: false,
            }
        );
        assert_eq!(
            PanelLayout::for_width(700.0),
            PanelLayout {
                audio_label: true,
                feature_labels: false,
            }
        );
        assert_eq!(
            PanelLayout::for_width(1280.0),
            PanelLayout {
                audio_label: true,
                feature_labels: true,
            }
        );
    }

    #[test]
    fn test_hud_waits_for_loading() {
        let start = Instant::now();
        let mut session = UiSession::mount(start);
        let mut overlay = Overlay::new();

        overlay.sync(&session, start);
        assert_eq!(targets(&overlay), [false; 3]);

        let ready = start + Duration::from_secs(3);
        session.tick(ready);
        overlay.sync(&session, ready);
        assert_eq!(targets(&overlay), [true; 3]);
        assert_eq!(overlay.header.pose(ready).opacity, 0.0);
    }

    #[test]
    fn test_hiding_hud_retargets_every_element() {
        let start = Instant::now();
        let mut session = UiSession::mount(start);
        let mut overlay = Overlay::new();
        let ready = start + Duration::from_secs(3);
        session.tick(ready);
        overlay.sync(&session, ready);

        session.on_key_press("h");
        overlay.sync(&session, ready + Duration::from_secs(5));
        assert_eq!(targets(&overlay), [false; 3]);
    }

    #[test]
    fn test_frames_render_headless() {
        let ctx = egui::Context::default();
        let start = Instant::now();
        let mut session = UiSession::mount(start);
        let mut overlay = Overlay::new();

        run_frame(&ctx, &mut overlay, &mut session, start + Duration::from_millis(500));
        assert!(session.is_loading());

        let ready = start + Duration::from_secs(3);
        session.tick(ready);
        run_frame(&ctx, &mut overlay, &mut session, ready + Duration::from_secs(4));
        assert!(!session.is_playing());
        assert!(session.is_ui_visible());
    }
}
