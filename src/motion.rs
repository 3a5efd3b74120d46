//! Overlay animation curves.
//!
//! The HUD panels slide and fade in after a delay and slide back out when the
//! HUD is hidden. The loading screen has a spinner, a pulsing title and a
//! zoom-in. All of these are evaluated from timestamps, never accumulated.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Length of an enter or exit transition.
pub const TRANSITION: Duration = Duration::from_millis(500);

/// Cubic ease-out.
pub fn ease_out(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(3)
}

/// Cubic ease-in-out.
pub fn ease_in_out(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

/// Animated visual state of a panel: where it sits and how opaque it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Vertical offset in points from its resting place.
    pub offset_y: f32,
    pub opacity: f32,
}

/// Entrance/exit animation for one HUD element.
///
/// The element rests at `hidden` while absent and animates to zero offset,
/// full opacity while present. Both directions wait `delay` before moving;
/// with exit animation off, hiding snaps straight to `hidden`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    hidden: Pose,
    delay: Duration,
    duration: Duration,
    animate_exit: bool,
    visible: bool,
    changed_at: Option<Instant>,
    /// Progress (0 hidden, 1 shown) at the moment of the last change.
    from: f32,
}

impl Reveal {
    pub fn new(hidden: Pose, delay: Duration) -> Self {
        Self {
            hidden,
            delay,
            duration: TRANSITION,
            animate_exit: true,
            visible: false,
            changed_at: None,
            from: 0.0,
        }
    }

    /// Header: drops in from 100 points above.
    pub fn header() -> Self {
        Self::new(
            Pose {
                offset_y: -100.0,
                opacity: 0.0,
            },
            Duration::from_millis(500),
        )
    }

    /// Control panel: rises from 100 points below, vanishes at once.
    pub fn controls() -> Self {
        Self::new(
            Pose {
                offset_y: 100.0,
                opacity: 0.0,
            },
            Duration::from_secs(1),
        )
        .without_exit()
    }

    /// Keyboard hint: fades in.
    pub fn hint() -> Self {
        Self::new(
            Pose {
                offset_y: 0.0,
                opacity: 0.0,
            },
            Duration::from_secs(2),
        )
    }

    /// Hide instantly instead of animating out.
    pub fn without_exit(mut self) -> Self {
        self.animate_exit = false;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Change target visibility at `now`. No-op if unchanged.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if visible == self.visible {
            return;
        }
        self.from = self.progress(now);
        self.visible = visible;
        self.changed_at = Some(now);
    }

    /// 0 when fully hidden, 1 when fully shown.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(changed_at) = self.changed_at else {
            return if self.visible { 1.0 } else { 0.0 };
        };
        if !self.visible && !self.animate_exit {
            return 0.0;
        }
        let since = now.saturating_duration_since(changed_at);
        let x = if since <= self.delay {
            0.0
        } else {
            (since - self.delay).as_secs_f32() / self.duration.as_secs_f32()
        };
        let eased = ease_out(x);
        let target = if self.visible { 1.0 } else { 0.0 };
        self.from + (target - self.from) * eased
    }

    /// Current pose.
    pub fn pose(&self, now: Instant) -> Pose {
        let p = self.progress(now);
        Pose {
            offset_y: self.hidden.offset_y * (1.0 - p),
            opacity: self.hidden.opacity + (1.0 - self.hidden.opacity) * p,
        }
    }
}

/// Spinner angle after `elapsed`, one turn per second.
pub fn spinner_angle(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() % 1.0) * TAU
}

/// Opacity of the pulsing loading title: 0.5 to 1 and back every 2 seconds.
pub fn pulse_opacity(elapsed: Duration) -> f32 {
    let phase = (elapsed.as_secs_f32() % 2.0) / 2.0;
    let x = if phase < 0.5 {
        phase * 2.0
    } else {
        2.0 - phase * 2.0
    };
    0.5 + 0.5 * ease_in_out(x)
}

/// Scale of the loading content as it zooms in over 0.8 seconds.
pub fn zoom_in_scale(elapsed: Duration) -> f32 {
    0.5 + 0.5 * ease_out(elapsed.as_secs_f32() / 0.8)
}
