//! Glue between a `Carousel`, its render host and the swap timer

use std::hash::Hash;

use tracing::trace;

use crate::carousel::{CardReading, Carousel, CarouselEvent, HostCommand, SurfaceId};
use crate::config::CarouselConfig;
use crate::host::{apply_command, RenderSurface};
use crate::reset::SwapToken;
use crate::timer::SwapScheduler;

/// Runs a carousel against a host.
///
/// The driver turns host geometry into events and carries out the commands
/// the carousel returns. Timer commands go to a `SwapScheduler` when one is
/// attached; without one the caller delivers swaps with `fire_swap`, which
/// keeps the driver usable outside a tokio runtime.
pub struct CarouselDriver<M, H> {
    carousel: Carousel<M>,
    host: H,
    scheduler: Option<SwapScheduler>,
    pending_swap: Option<SwapToken>,
}

impl<M, H> CarouselDriver<M, H>
where
    M: Clone + Eq + Hash,
    H: RenderSurface,
{
    pub fn new(config: CarouselConfig, host: H) -> Self {
        Self {
            carousel: Carousel::new(config),
            host,
            scheduler: None,
            pending_swap: None,
        }
    }

    /// Attach a tokio-backed timer for the swap delay
    pub fn with_scheduler(mut self, scheduler: SwapScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn set_source(&mut self, source: &[M]) {
        let commands = self.carousel.set_source(source);
        self.apply(commands);
    }

    /// Evaluate one frame from the active surface's current geometry
    pub fn on_frame(&mut self) {
        let surface = self.carousel.active_surface();
        let center = self.host.viewport_center_x();
        let readings: Vec<CardReading> = self
            .host
            .visible_positions(surface)
            .into_iter()
            .filter_map(|position| {
                self.host.card_center_x(surface, position).map(|x| CardReading {
                    position,
                    distance: x - center,
                })
            })
            .collect();
        trace!(cards = readings.len(), "Frame");
        self.dispatch(CarouselEvent::Frame { readings });
    }

    /// Host callback: a card left the viewport of `surface`
    pub fn element_disappeared(&mut self, surface: SurfaceId, position: usize) {
        self.dispatch(CarouselEvent::ElementDisappeared { surface, position });
    }

    pub fn gesture_ended(&mut self, velocity: f64, samples: u32) {
        self.dispatch(CarouselEvent::GestureEnded { velocity, samples });
    }

    /// Deliver any swap timers that have fired. Returns how many were handled.
    pub fn poll_timers(&mut self) -> usize {
        let mut fired = Vec::new();
        if let Some(scheduler) = self.scheduler.as_mut() {
            while let Some(token) = scheduler.try_next() {
                fired.push(token);
            }
        }
        let count = fired.len();
        for token in fired {
            self.dispatch(CarouselEvent::SwapTimerFired { token });
        }
        count
    }

    /// Deliver the pending swap by hand, for hosts without a scheduler.
    /// Returns false when no swap was waiting.
    pub fn fire_swap(&mut self) -> bool {
        match self.pending_swap.take() {
            Some(token) => {
                self.dispatch(CarouselEvent::SwapTimerFired { token });
                true
            }
            None => false,
        }
    }

    pub fn dispatch(&mut self, event: CarouselEvent) {
        let commands = self.carousel.handle(event);
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<HostCommand>) {
        for command in commands {
            let Some(timer) = apply_command(&mut self.host, command) else {
                continue;
            };
            match timer {
                HostCommand::ScheduleSwap { token, delay } => match self.scheduler.as_mut() {
                    Some(scheduler) => scheduler.schedule(token, delay),
                    None => self.pending_swap = Some(token),
                },
                HostCommand::CancelSwap { token } => {
                    if let Some(scheduler) = self.scheduler.as_mut() {
                        scheduler.cancel(token);
                    }
                    if self.pending_swap == Some(token) {
                        self.pending_swap = None;
                    }
                }
                _ => {}
            }
        }
    }

    pub fn carousel(&self) -> &Carousel<M> {
        &self.carousel
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn has_pending_swap(&self) -> bool {
        self.pending_swap.is_some()
            || self
                .scheduler
                .as_ref()
                .is_some_and(|s| s.pending_count() > 0)
    }
}
