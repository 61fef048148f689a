//! Carousel state machine
//!
//! `Carousel` owns every piece of widget state: the buffer, the centering
//! tracker, the reset controller and the two overlaid surfaces. Hosts feed it
//! `CarouselEvent`s and carry out the `HostCommand`s it returns; nothing in
//! here talks to a renderer directly, so the whole machine runs headless in
//! tests.

use std::hash::Hash;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{Element, ElementBuffer};
use crate::centering::CenteringTracker;
use crate::config::CarouselConfig;
use crate::reset::{ResetPhase, ResetState, SeamlessResetController, SwapPlan, SwapToken};
use crate::scale::ProximityScaler;

/// One of the two overlaid scroll surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceId {
    Front,
    Back,
}

impl SurfaceId {
    pub const ALL: [SurfaceId; 2] = [SurfaceId::Front, SurfaceId::Back];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            SurfaceId::Front => 0,
            SurfaceId::Back => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            SurfaceId::Front => SurfaceId::Back,
            SurfaceId::Back => SurfaceId::Front,
        }
    }
}

/// What the carousel last asked of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceState {
    pub visible: bool,
    /// Position the surface was last scrolled to
    pub position: Option<usize>,
}

/// Distance of one visible card from the viewport center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardReading {
    pub position: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CarouselEvent {
    /// Geometry of the active surface's visible cards for one frame
    Frame { readings: Vec<CardReading> },
    /// A card scrolled out of a surface's viewport
    ElementDisappeared { surface: SurfaceId, position: usize },
    /// A drag gesture ended with the given horizontal velocity
    GestureEnded { velocity: f64, samples: u32 },
    /// The delay scheduled by `HostCommand::ScheduleSwap` elapsed
    SwapTimerFired { token: SwapToken },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Lay out `len` cards on both surfaces; sent before any scroll of a build
    SetLength {
        len: usize,
    },
    ScrollTo {
        surface: SurfaceId,
        position: usize,
        animated: bool,
    },
    SetSurfaceVisible {
        surface: SurfaceId,
        visible: bool,
    },
    SetInteractionEnabled {
        enabled: bool,
    },
    ScheduleSwap {
        token: SwapToken,
        delay: Duration,
    },
    CancelSwap {
        token: SwapToken,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselStats {
    pub rebuilds: u32,
    pub swaps: u32,
    pub skipped_resets: u32,
}

#[derive(Debug, Clone)]
pub struct Carousel<M> {
    config: CarouselConfig,
    scaler: ProximityScaler,
    buffer: Option<ElementBuffer<M>>,
    tracker: CenteringTracker<M>,
    reset: SeamlessResetController<M>,
    surfaces: [SurfaceState; 2],
    active: SurfaceId,
    interaction_enabled: bool,
    slow_centered: Option<Element<M>>,
    stats: CarouselStats,
}

impl<M> Carousel<M>
where
    M: Clone + Eq + Hash,
{
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            scaler: ProximityScaler::from_config(&config),
            tracker: CenteringTracker::from_config(&config),
            reset: SeamlessResetController::new(config.disappear_threshold),
            buffer: None,
            surfaces: [SurfaceState::default(); 2],
            active: SurfaceId::Front,
            interaction_enabled: true,
            slow_centered: None,
            stats: CarouselStats::default(),
            config,
        }
    }

    /// Replace the source list and rebuild everything derived from it.
    ///
    /// An empty list is ignored and the current state is kept.
    pub fn set_source(&mut self, source: &[M]) -> Vec<HostCommand> {
        let Some((buffer, middle)) = ElementBuffer::build(source, self.config.repetitions) else {
            debug!(repetitions = self.config.repetitions, "Source list not buffered");
            return Vec::new();
        };

        let mut commands = Vec::new();

        if let Some(token) = self.reset.arm(middle.value.clone()) {
            commands.push(HostCommand::CancelSwap { token });
        }
        if !self.interaction_enabled {
            self.interaction_enabled = true;
            commands.push(HostCommand::SetInteractionEnabled { enabled: true });
        }

        debug!(
            source_len = source.len(),
            buffer_len = buffer.len(),
            middle = middle.position,
            "Rebuilt element buffer"
        );

        commands.push(HostCommand::SetLength { len: buffer.len() });
        self.buffer = Some(buffer);
        self.tracker.reset();
        self.tracker.adopt(middle.clone());
        self.slow_centered = None;
        self.stats.rebuilds += 1;

        let active = self.active;
        self.scroll(&mut commands, active, middle.position, false);
        self.scroll(&mut commands, active.other(), middle.position, false);
        self.publish_visibility(&mut commands);

        commands
    }

    /// Advance the state machine by one event.
    pub fn handle(&mut self, event: CarouselEvent) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        if self.buffer.is_none() {
            return commands;
        }

        match event {
            CarouselEvent::Frame { readings } => self.on_frame(&readings, &mut commands),
            CarouselEvent::ElementDisappeared { surface, position } => {
                self.on_disappeared(surface, position, &mut commands)
            }
            CarouselEvent::GestureEnded { velocity, samples } => {
                self.on_gesture_ended(velocity, samples, &mut commands)
            }
            CarouselEvent::SwapTimerFired { token } => self.on_swap_timer(token, &mut commands),
        }

        commands
    }

    fn on_frame(&mut self, readings: &[CardReading], commands: &mut Vec<HostCommand>) {
        // One evaluation per frame, from the closest card of this frame only
        let closest = readings
            .iter()
            .filter(|r| r.distance.is_finite())
            .min_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()));
        let Some(reading) = closest else {
            return;
        };
        let Some(candidate) = self
            .buffer
            .as_ref()
            .and_then(|b| b.get(reading.position))
            .cloned()
        else {
            return;
        };

        let previous = self.tracker.centered().cloned();
        let current = self.tracker.evaluate(&candidate, reading.distance).cloned();

        if let Some(centered) = current {
            if previous.as_ref() != Some(&centered) {
                self.on_centered_changed(centered, commands);
            }
        }
    }

    fn on_centered_changed(&mut self, centered: Element<M>, commands: &mut Vec<HostCommand>) {
        debug!(position = centered.position, "Centered element changed");
        if !self.try_begin_swap(&centered, commands) {
            let active = self.active;
            self.scroll(commands, active, centered.position, true);
        }
    }

    fn on_disappeared(
        &mut self,
        surface: SurfaceId,
        position: usize,
        commands: &mut Vec<HostCommand>,
    ) {
        if surface != self.active {
            return;
        }
        let Some(element) = self.buffer.as_ref().and_then(|b| b.get(position)) else {
            return;
        };

        if self.reset.on_disappeared(&element.value) {
            if let Some(centered) = self.tracker.centered().cloned() {
                self.try_begin_swap(&centered, commands);
            }
        }
    }

    fn on_gesture_ended(&mut self, velocity: f64, samples: u32, commands: &mut Vec<HostCommand>) {
        if !self.interaction_enabled {
            return;
        }

        let next = if samples > self.config.slow_scroll_min_samples {
            let base = self.tracker.biggest().map(|e| e.position).unwrap_or(0);
            let position = if velocity > 0.0 {
                base.checked_sub(1)
            } else if velocity < 0.0 {
                base.checked_add(1)
            } else {
                Some(base)
            };
            position
                .and_then(|p| self.buffer.as_ref().and_then(|b| b.get(p)))
                .cloned()
        } else {
            None
        };

        if next == self.slow_centered {
            return;
        }
        self.slow_centered = next.clone();

        if let Some(element) = next {
            debug!(position = element.position, "Slow scroll snapping");
            let active = self.active;
            self.scroll(commands, active, element.position, true);
        }
    }

    fn on_swap_timer(&mut self, token: SwapToken, commands: &mut Vec<HostCommand>) {
        let Some(target) = self.reset.complete_swap(token) else {
            debug!(token = token.0, "Ignoring stale swap timer");
            return;
        };

        let previous = self.active;
        self.active = previous.other();
        self.publish_visibility(commands);
        self.interaction_enabled = true;
        commands.push(HostCommand::SetInteractionEnabled { enabled: true });

        if let Some(element) = self.buffer.as_ref().and_then(|b| b.get(target)).cloned() {
            self.tracker.adopt(element);
        }
        self.stats.swaps += 1;
        debug!(active = ?self.active, target, "Surfaces swapped");
    }

    /// Start a swap if one is due. Returns true when a swap was started.
    ///
    /// The active surface is brought back onto `centered` while the hidden one
    /// jumps to its equivalent, so both show the same picture at the flip.
    fn try_begin_swap(&mut self, centered: &Element<M>, commands: &mut Vec<HostCommand>) -> bool {
        let Some(buffer) = self.buffer.as_ref() else {
            return false;
        };

        match self.reset.begin_swap(buffer, centered) {
            SwapPlan::NotDue => false,
            SwapPlan::Skipped => {
                self.stats.skipped_resets += 1;
                false
            }
            SwapPlan::Started { target, token } => {
                self.interaction_enabled = false;
                commands.push(HostCommand::SetInteractionEnabled { enabled: false });
                let (active, hidden) = (self.active, self.hidden_surface());
                self.scroll(commands, active, centered.position, true);
                self.scroll(commands, hidden, target.position, false);
                commands.push(HostCommand::ScheduleSwap {
                    token,
                    delay: self.config.swap_delay(),
                });
                true
            }
        }
    }

    fn scroll(
        &mut self,
        commands: &mut Vec<HostCommand>,
        surface: SurfaceId,
        position: usize,
        animated: bool,
    ) {
        self.surfaces[surface.index()].position = Some(position);
        commands.push(HostCommand::ScrollTo {
            surface,
            position,
            animated,
        });
    }

    fn publish_visibility(&mut self, commands: &mut Vec<HostCommand>) {
        for surface in SurfaceId::ALL {
            let visible = surface == self.active;
            self.surfaces[surface.index()].visible = visible;
            commands.push(HostCommand::SetSurfaceVisible { surface, visible });
        }
    }

    /// Scale factor for a card `distance` units from the center
    #[inline]
    pub fn scale_for(&self, distance: f64) -> f64 {
        self.scaler.scale(distance)
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn buffer(&self) -> Option<&ElementBuffer<M>> {
        self.buffer.as_ref()
    }

    pub fn centered(&self) -> Option<&Element<M>> {
        self.tracker.centered()
    }

    pub fn biggest(&self) -> Option<&Element<M>> {
        self.tracker.biggest()
    }

    pub fn slow_centered(&self) -> Option<&Element<M>> {
        self.slow_centered.as_ref()
    }

    pub fn dwell(&self) -> u32 {
        self.tracker.dwell()
    }

    pub fn active_surface(&self) -> SurfaceId {
        self.active
    }

    pub fn hidden_surface(&self) -> SurfaceId {
        self.active.other()
    }

    pub fn surface(&self, id: SurfaceId) -> SurfaceState {
        self.surfaces[id.index()]
    }

    pub fn reset_phase(&self) -> ResetPhase {
        self.reset.phase()
    }

    pub fn reset_state(&self) -> ResetState {
        self.reset.state()
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn stats(&self) -> CarouselStats {
        self.stats
    }
}
