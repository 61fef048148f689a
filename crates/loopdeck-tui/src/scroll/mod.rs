//! Smooth horizontal scrolling for the terminal host
//!
//! The carousel core only says *where* a surface should scroll and whether
//! the move is animated. This module turns an animated request into a series
//! of per-frame offsets.
//!
//! - `easing` - pure easing curves
//! - `timing` - progress and interpolation helpers
//! - `config` - `ScrollConfig` (re-exported from loopdeck-core) and helpers
//! - `animation` - `OffsetAnimator`, the per-surface controller
//!
//! # Usage
//!
//! ```ignore
//! use loopdeck_tui::scroll::{OffsetAnimator, ScrollConfig};
//!
//! let mut animator = OffsetAnimator::new(ScrollConfig::default());
//! animator.scroll_to(1_200.0, true, max_offset);
//!
//! // each frame
//! let offset = animator.update(max_offset);
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::OffsetAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
