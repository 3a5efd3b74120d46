//! Overlay session state.
//!
//! [`UiSession`] owns the flags behind the overlay: the loading screen, HUD
//! visibility and the control-panel toggles. None of them affect the 3D scene.
//!
//! Loading ends through a one-shot [`LoadingTimer`] scheduled at mount. The
//! timer and the keyboard listener are released by [`UiSession::teardown`],
//! after which nothing can change the session.

use log::{debug, info};
use std::time::{Duration, Instant};

/// Delay between mount and the end of the loading screen.
pub const LOADING_DELAY: Duration = Duration::from_millis(3000);

/// Lifecycle of a [`LoadingTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Pending,
    Fired,
    Cancelled,
}

/// A cancelable one-shot deadline, polled from the frame loop.
#[derive(Debug, Clone)]
pub struct LoadingTimer {
    deadline: Instant,
    state: TimerState,
}

impl LoadingTimer {
    pub fn schedule(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: now + delay,
            state: TimerState::Pending,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Returns true exactly once: on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state == TimerState::Pending && now >= self.deadline {
            self.state = TimerState::Fired;
            return true;
        }
        false
    }

    /// Stop a pending timer. Fired and cancelled timers are left alone.
    pub fn cancel(&mut self) {
        if self.state == TimerState::Pending {
            self.state = TimerState::Cancelled;
        }
    }
}

/// Buttons on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    PlayPause,
    Volume,
    Settings,
    /// Shown but inert.
    Fullscreen,
}

/// Session flags and their lifecycle.
#[derive(Debug)]
pub struct UiSession {
    loading: bool,
    ui_visible: bool,
    playing: bool,
    volume_on: bool,
    settings_open: bool,

    mounted_at: Instant,
    timer: LoadingTimer,
    key_listener: bool,
    torn_down: bool,
}

impl UiSession {
    /// Mount with the default loading delay.
    pub fn mount(now: Instant) -> Self {
        Self::mount_with_delay(now, LOADING_DELAY)
    }

    /// Mount the session at `now`: schedule the loading timer and attach the
    /// key listener.
    pub fn mount_with_delay(now: Instant, delay: Duration) -> Self {
        debug!("Session mounted, loading for {:?}", delay);
        Self {
            loading: true,
            ui_visible: true,
            playing: false,
            volume_on: true,
            settings_open: false,
            mounted_at: now,
            timer: LoadingTimer::schedule(now, delay),
            key_listener: true,
            torn_down: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_ui_visible(&self) -> bool {
        self.ui_visible
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_volume_on(&self) -> bool {
        self.volume_on
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn mounted_at(&self) -> Instant {
        self.mounted_at
    }

    pub fn timer(&self) -> &LoadingTimer {
        &self.timer
    }

    /// Advance the session clock. Returns true on the frame loading ends.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.loading = false;
            info!(
                "Loading finished after {:?}",
                now.saturating_duration_since(self.mounted_at)
            );
            return true;
        }
        false
    }

    /// Handle a key press carrying `text`. Only `h`/`H` does anything.
    pub fn on_key_press(&mut self, text: &str) {
        if !self.key_listener {
            return;
        }
        if text.eq_ignore_ascii_case("h") {
            self.ui_visible = !self.ui_visible;
            debug!("HUD {}", if self.ui_visible { "shown" } else { "hidden" });
        }
    }

    /// Activate a control-panel button.
    pub fn activate(&mut self, control: Control) {
        if self.torn_down {
            return;
        }
        match control {
            Control::PlayPause => self.playing = !self.playing,
            Control::Volume => self.volume_on = !self.volume_on,
            Control::Settings => self.settings_open = !self.settings_open,
            Control::Fullscreen => {}
        }
        debug!("{:?} activated", control);
    }

    /// Cancel the loading timer and detach the key listener. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.timer.cancel();
        self.key_listener = false;
        self.torn_down = true;
        debug!("Session torn down");
    }
}

impl Drop for UiSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_flags() {
        let session = UiSession::mount(Instant::now());
        assert!(session.is_loading());
        assert!(session.is_ui_visible());
        assert!(!session.is_playing());
        assert!(session.is_volume_on());
        assert!(!session.is_settings_open());
    }

    #[test]
    fn test_loading_ends_at_deadline_once() {
        let start = Instant::now();
        let mut session = UiSession::mount(start);

        assert!(!session.tick(start + Duration::from_millis(2999)));
        assert!(session.is_loading());

        assert!(session.tick(start + Duration::from_millis(3000)));
        assert!(!session.is_loading());

        for ms in [3001, 5000, 60_000] {
            assert!(!session.tick(start + Duration::from_millis(ms)));
            assert!(!session.is_loading());
        }
        assert_eq!(session.timer().state(), TimerState::Fired);
    }

    #[test]
    fn test_teardown_before_deadline_keeps_loading() {
        let start = Instant::now();
        let mut session = UiSession::mount(start);
        session.teardown();
        session.teardown();

        assert!(!session.tick(start + Duration::from_secs(10)));
        assert!(session.is_loading());
        assert_eq!(session.timer().state(), TimerState::Cancelled);
    }

    #[test]
    fn test_h_toggles_hud() {
        let mut session = UiSession::mount(Instant::now());
        session.on_key_press("h");
        assert!(!session.is_ui_visible());
        session.on_key_press("H");
        assert!(session.is_ui_visible());

        for key in ["x", "j", " ", "hh", ""] {
            session.on_key_press(key);
            assert!(session.is_ui_visible());
        }
    }

    #[test]
    fn test_keys_work_while_loading() {
        let mut session = UiSession::mount(Instant::now());
        assert!(session.is_loading());
        session.on_key_press("h");
        assert!(!session.is_ui_visible());
    }

    #[test]
    fn test_controls_toggle_independently() {
        let mut session = UiSession::mount(Instant::now());
        session.activate(Control::PlayPause);
        assert!(session.is_playing());
        assert!(session.is_volume_on());

        session.activate(Control::Volume);
        session.activate(Control::Settings);
        assert!(!session.is_volume_on());
        assert!(session.is_settings_open());

        session.activate(Control::Fullscreen);
        assert!(session.is_playing() && !session.is_volume_on() && session.is_settings_open());
        assert!(session.is_ui_visible());
    }

    #[test]
    fn test_nothing_mutates_after_teardown() {
        let mut session = UiSession::mount(Instant::now());
        session.teardown();
        session.on_key_press("h");
        session.activate(Control::PlayPause);
        assert!(session.is_ui_visible());
        assert!(!session.is_playing());
        assert!(session.is_torn_down());
    }

    #[test]
    fn test_fired_timer_ignores_cancel() {
        let start = Instant::now();
        let mut timer = LoadingTimer::schedule(start, Duration::from_millis(10));
        assert!(timer.poll(start + Duration::from_millis(10)));
        timer.cancel();
        assert_eq!(timer.state(), TimerState::Fired);
    }
}
