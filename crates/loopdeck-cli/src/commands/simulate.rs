use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use loopdeck_core::{AppConfig, CarouselStats, ResetPhase, SurfaceId};
use loopdeck_tui::{input::Action, App};

use super::items_or_default;

/// Script cycle: drag toward later cards, then let go and settle
const DRAG_FRAMES: u32 = 70;
const SETTLE_FRAMES: u32 = 30;

/// Terminal width the headless viewport pretends to have
const VIEWPORT_COLUMNS: u16 = 80;

/// Carousel state worth reporting, emitted whenever it changes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame: u32,
    pub active: SurfaceId,
    pub centered: Option<usize>,
    pub label: Option<String>,
    #[serde(flatten)]
    pub phase: ResetPhase,
    pub disappear_count: u32,
    pub interaction_enabled: bool,
}

impl Snapshot {
    fn capture(frame: u32, app: &App<String>) -> Self {
        let carousel = app.carousel();
        Self {
            frame,
            active: carousel.active_surface(),
            centered: carousel.centered().map(|e| e.position),
            label: carousel.centered().map(|e| e.value.clone()),
            phase: carousel.reset_phase(),
            disappear_count: carousel.reset_state().disappear_count,
            interaction_enabled: carousel.interaction_enabled(),
        }
    }

    /// Same state, ignoring when it was observed
    fn same_state(&self, other: &Self) -> bool {
        Self { frame: other.frame, ..self.clone() } == *other
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    frames: u32,
    #[serde(flatten)]
    stats: CarouselStats,
}

/// Run the scripted drag for `frames` frames and collect every transition.
///
/// Scrolls jump instead of animating and the swap timer is counted in frames
/// at the configured refresh rate, so a run is fully deterministic.
pub fn simulate(
    config: &AppConfig,
    frames: u32,
    items: Vec<String>,
) -> (Vec<Snapshot>, CarouselStats) {
    let mut config = config.clone();
    config.ui.scroll.smooth_enabled = false;
    let swap_frames = swap_delay_frames(&config);

    let mut app = App::new(Arc::new(config), 0.0);
    app.resize(VIEWPORT_COLUMNS);
    app.set_source(items);

    let mut snapshots = vec![Snapshot::capture(0, &app)];
    let mut swap_started: Option<u32> = None;

    for frame in 1..=frames {
        if (frame - 1) % (DRAG_FRAMES + SETTLE_FRAMES) < DRAG_FRAMES {
            app.handle_action(Action::DragNext);
        }
        app.tick();

        match (app.carousel().reset_phase(), swap_started) {
            (ResetPhase::Swapping { .. }, None) => swap_started = Some(frame),
            (ResetPhase::Swapping { .. }, Some(start)) if frame - start >= swap_frames => {
                app.fire_pending_swap();
                swap_started = None;
            }
            (ResetPhase::Swapping { .. }, Some(_)) => {}
            _ => swap_started = None,
        }

        let snapshot = Snapshot::capture(frame, &app);
        if snapshots.last().map_or(true, |last| !last.same_state(&snapshot)) {
            snapshots.push(snapshot);
        }
    }

    (snapshots, app.carousel().stats())
}

fn swap_delay_frames(config: &AppConfig) -> u32 {
    let hz = config.carousel.refresh_hz.max(1) as u64;
    let ms = config.carousel.swap_delay_ms;
    ((ms * hz).div_ceil(1_000) as u32).max(1)
}

pub fn run(config: &AppConfig, frames: u32, json: bool, items: Vec<String>) -> Result<()> {
    let items = items_or_default(items);
    let (snapshots, stats) = simulate(config, frames, items);

    if json {
        for snapshot in &snapshots {
            println!("{}", serde_json::to_string(snapshot)?);
        }
        println!("{}", serde_json::to_string(&Summary { frames, stats })?);
        return Ok(());
    }

    for s in &snapshots {
        let centered = match (s.centered, &s.label) {
            (Some(position), Some(label)) => format!("#{} {}", position, label),
            _ => "-".to_string(),
        };
        let phase = match s.phase {
            ResetPhase::Stable => "stable".to_string(),
            ResetPhase::PendingReset => "reset due".to_string(),
            ResetPhase::Swapping { target, .. } => format!("swapping to #{}", target),
        };
        println!(
            "frame {:>5}  {:<5}  centered {:<16}  lost {}  {}{}",
            s.frame,
            format!("{:?}", s.active).to_lowercase(),
            centered,
            s.disappear_count,
            phase,
            if s.interaction_enabled { "" } else { "  [locked]" },
        );
    }

    println!();
    println!(
        "{} frames, {} rebuilds, {} swaps, {} skipped resets",
        frames, stats.rebuilds, stats.swaps, stats.skipped_resets
    );
    Ok(())
}
