use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    /// Poll timeout while the carousel is settled
    tick_rate: Duration,
    /// Poll timeout while frames matter (animating, dwelling, swapping)
    frame_rate: Duration,
}

impl EventHandler {
    /// Use a faster poll interval whenever the caller asks for frames
    pub fn with_frame_rate(tick_rate_ms: u64, frame_rate: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_rate,
        }
    }

    pub fn timeout(&self, fast: bool) -> Duration {
        if fast {
            self.frame_rate.min(self.tick_rate)
        } else {
            self.tick_rate
        }
    }

    /// Poll for the next event, returning `Tick` when the timeout elapses
    pub fn next(&self, fast: bool) -> Result<Option<AppEvent>> {
        if event::poll(self.timeout(fast))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Frame/tick for periodic updates
    Tick,
}
