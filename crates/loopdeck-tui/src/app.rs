use std::hash::Hash;
use std::sync::Arc;

use loopdeck_core::{AppConfig, Carousel, CarouselDriver, SwapScheduler};
use tracing::debug;

use crate::host::StripHost;
use crate::input::Action;
use crate::theme::Theme;

/// Idle frames after the last drag step before the gesture counts as ended
const GESTURE_IDLE_FRAMES: u32 = 3;

/// Strips glide this many cards on a fling
const FLING_CARDS: f64 = 3.0;

/// Drag gesture being assembled from key repeats
#[derive(Debug, Default, Clone, Copy)]
struct DragGesture {
    samples: u32,
    /// Horizontal finger velocity: positive moves toward earlier cards
    velocity: f64,
    idle_frames: u32,
    moved_this_frame: bool,
}

impl DragGesture {
    fn record(&mut self, velocity: f64) {
        self.samples += 1;
        self.velocity = velocity;
        self.idle_frames = 0;
        self.moved_this_frame = true;
    }

    fn is_active(&self) -> bool {
        self.samples > 0
    }

    /// Called once per frame; returns the finished gesture when it ends
    fn end_frame(&mut self) -> Option<(f64, u32)> {
        if !self.is_active() {
            return None;
        }
        if std::mem::take(&mut self.moved_this_frame) {
            return None;
        }
        self.idle_frames += 1;
        if self.idle_frames < GESTURE_IDLE_FRAMES {
            return None;
        }
        let ended = (self.velocity, self.samples);
        *self = Self::default();
        Some(ended)
    }
}

/// Application state for the terminal carousel demo
pub struct App<M> {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    driver: CarouselDriver<M, StripHost>,
    source: Vec<M>,
    gesture: DragGesture,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
}

impl<M> App<M>
where
    M: Clone + Eq + Hash,
{
    /// Create the app for a viewport `viewport_width` layout units wide.
    ///
    /// Swaps are delivered with `fire_pending_swap` until a scheduler is
    /// attached with `with_scheduler`.
    pub fn new(config: Arc<AppConfig>, viewport_width: f64) -> Self {
        let host = StripHost::new(&config.ui, viewport_width);
        let driver = CarouselDriver::new(config.carousel.clone(), host);
        Self {
            config,
            theme: Theme::default(),
            driver,
            source: Vec::new(),
            gesture: DragGesture::default(),
            should_quit: false,
            status_message: None,
        }
    }

    /// Deliver swap delays through a tokio timer. Needs a running runtime.
    pub fn with_scheduler(mut self) -> Self {
        self.driver = self.driver.with_scheduler(SwapScheduler::new());
        self
    }

    pub fn set_source(&mut self, source: Vec<M>) {
        if source.is_empty() {
            self.status_message = Some("Nothing to show: source list is empty".to_string());
            return;
        }
        self.driver.set_source(&source);
        self.source = source;
        self.gesture = DragGesture::default();
        self.status_message = None;
    }

    pub fn source(&self) -> &[M] {
        &self.source
    }

    pub fn carousel(&self) -> &Carousel<M> {
        self.driver.carousel()
    }

    pub fn host(&self) -> &StripHost {
        self.driver.host()
    }

    /// Terminal width changed
    pub fn resize(&mut self, columns: u16) {
        let width = columns as f64 * self.config.ui.units_per_column;
        self.driver.host_mut().set_viewport_width(width);
    }

    pub fn handle_action(&mut self, action: Action) {
        let step = self.config.ui.drag_step;
        let glide = FLING_CARDS * (self.config.ui.card_width + self.config.ui.card_spacing);

        match action {
            Action::Quit => self.should_quit = true,
            Action::DragPrev => self.drag(-step),
            Action::DragNext => self.drag(step),
            Action::FlingPrev => self.fling(-glide),
            Action::FlingNext => self.fling(glide),
            Action::RotateSource => {
                let mut rotated = self.source.clone();
                if !rotated.is_empty() {
                    rotated.rotate_left(1);
                }
                self.set_source(rotated);
                self.status_message = Some("Source rotated, buffer rebuilt".to_string());
            }
            Action::None => {}
        }
    }

    fn drag(&mut self, delta: f64) {
        if self.driver.host_mut().drag_by(delta) {
            // content moving left means the finger moves right
            self.gesture.record(-delta);
        }
    }

    fn fling(&mut self, distance: f64) {
        if self.driver.host_mut().fling(distance) {
            self.gesture = DragGesture::default();
            // a flick is never a slow scroll
            self.driver.gesture_ended(-distance, 1);
        }
    }

    /// Advance one frame: animations, disappearances, centering, timers
    pub fn tick(&mut self) {
        let gone = self.driver.host_mut().advance();
        for (surface, position) in gone {
            self.driver.element_disappeared(surface, position);
        }

        self.driver.on_frame();

        if let Some((velocity, samples)) = self.gesture.end_frame() {
            debug!(velocity, samples, "Drag gesture ended");
            self.driver.gesture_ended(velocity, samples);
        }

        self.driver.poll_timers();
    }

    /// Deliver a pending swap when running without a scheduler
    pub fn fire_pending_swap(&mut self) -> bool {
        self.driver.fire_swap()
    }

    /// Whether the next frame should come quickly
    pub fn needs_fast_update(&self) -> bool {
        let carousel = self.driver.carousel();
        self.driver.host().is_animating()
            || self.gesture.is_active()
            || self.driver.has_pending_swap()
            || carousel.dwell() <= carousel.config().dwell_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopdeck_core::{ResetPhase, ScrollConfig, SurfaceId};
    use std::time::Duration;

    fn config() -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.ui.scroll = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        Arc::new(config)
    }

    fn app() -> App<char> {
        let mut app = App::new(config(), 1_000.0);
        app.set_source(vec!['a', 'b', 'c']);
        app
    }

    #[test]
    fn test_initial_layout_centers_middle() {
        let mut app = app();
        app.tick();
        let centered = app.carousel().centered().cloned().unwrap();
        assert_eq!(centered.value, 'a');
        assert_eq!(centered.position, 24);

        let strip = app.host().strip(SurfaceId::Front);
        assert_eq!(strip.card_center(24), Some(strip.viewport_center()));
    }

    #[test]
    fn test_empty_source_keeps_previous() {
        let mut app = app();
        app.set_source(Vec::new());
        assert_eq!(app.source(), &['a', 'b', 'c']);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_strips_sized_from_buffer() {
        let app = app();
        let len = app.carousel().buffer().map(|b| b.len());
        assert_eq!(len, Some(48));
        assert_eq!(app.host().strip(SurfaceId::Front).len(), 48);
        assert_eq!(app.host().strip(SurfaceId::Back).len(), 48);
    }

    #[test]
    fn test_unbuildable_source_leaves_strips_empty() {
        let mut config = AppConfig::default();
        config.carousel.repetitions = 2_000;
        let mut app = App::new(Arc::new(config), 1_000.0);
        app.set_source(vec!['a']);
        assert!(app.carousel().buffer().is_none());
        assert_eq!(app.host().strip(SurfaceId::Front).len(), 0);
        assert_eq!(app.host().strip(SurfaceId::Back).len(), 0);
    }

    #[test]
    fn test_flip_keeps_visible_offset() {
        let mut app = app();
        let lap = 3.0 * (app.config.ui.card_width + app.config.ui.card_spacing);
        let mut flips = 0;
        for _ in 0..220 {
            app.handle_action(Action::DragNext);
            for _ in 0..4 {
                app.tick();
                if !matches!(app.carousel().reset_phase(), ResetPhase::Swapping { .. }) {
                    continue;
                }
                let before = app.host().strip(app.host().shown()).offset();
                assert!(app.fire_pending_swap());
                let after = app.host().strip(app.host().shown()).offset();
                let drift = (before - after).rem_euclid(lap);
                assert!(drift < 1e-6 || lap - drift < 1e-6, "flip moved by {drift}");
                flips += 1;
            }
        }
        assert!(flips > 0);
    }

    #[test]
    fn test_slow_drag_snaps_to_neighbour() {
        let mut app = app();
        for _ in 0..12 {
            app.handle_action(Action::DragNext);
            app.tick();
        }
        for _ in 0..GESTURE_IDLE_FRAMES {
            app.tick();
        }
        let biggest = app.carousel().biggest().map(|e| e.position).unwrap();
        let slow = app.carousel().slow_centered().map(|e| e.position);
        // dragging toward later cards snaps one further along
        assert_eq!(biggest, 26);
        assert_eq!(slow, Some(27));
    }

    #[test]
    fn test_rotate_rebuilds() {
        let mut app = app();
        app.handle_action(Action::RotateSource);
        assert_eq!(app.source(), &['b', 'c', 'a']);
        assert_eq!(app.carousel().centered().map(|e| e.value), Some('b'));
        assert_eq!(app.carousel().stats().rebuilds, 2);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_drag_triggers_seamless_reset() {
        let mut app = App::new(config(), 1_000.0).with_scheduler();
        app.set_source(vec!['a', 'b', 'c']);
        app.tick();

        // seven laps of the source list toward later cards
        let lap = 3.0 * (app.config.ui.card_width + app.config.ui.card_spacing);
        let steps = (7.0 * lap / app.config.ui.drag_step).ceil() as usize;
        for _ in 0..steps {
            app.handle_action(Action::DragNext);
            app.tick();
        }
        assert!(app.carousel().reset_state().disappear_count > 5);
        assert_eq!(app.carousel().reset_phase(), ResetPhase::PendingReset);

        // let the gesture end and the carousel settle
        for _ in 0..30 {
            app.tick();
        }
        assert!(matches!(app.carousel().reset_phase(), ResetPhase::Swapping { .. }));
        assert!(!app.host().interaction_enabled());

        tokio::time::sleep(Duration::from_millis(400)).await;
        app.tick();

        assert_eq!(app.carousel().stats().swaps, 1);
        assert_eq!(app.carousel().active_surface(), SurfaceId::Back);
        assert_eq!(app.host().shown(), SurfaceId::Back);
        assert!(app.host().interaction_enabled());
        assert_eq!(app.carousel().reset_state().disappear_count, 0);
    }
}
