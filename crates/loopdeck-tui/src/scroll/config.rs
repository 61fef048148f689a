//! Scroll configuration helpers

use std::time::Duration;

pub use loopdeck_core::{EasingType, ScrollConfig};

pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Frame interval while an animation is running
    fn animation_tick_duration(&self) -> Duration;

    /// Whether animated scroll requests actually animate
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        match self.animation_fps {
            0 => Duration::from_millis(16),
            fps => Duration::from_micros(1_000_000 / fps as u64),
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0 && self.easing != EasingType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let config = ScrollConfig {
            animation_fps: 50,
            ..Default::default()
        };
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(20));

        let zero = ScrollConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(zero.animation_tick_duration(), Duration::from_millis(16));
    }

    #[test]
    fn test_easing_none_disables_smoothing() {
        let mut config = ScrollConfig::default();
        assert!(config.is_smooth());

        config.easing = EasingType::None;
        assert!(!config.is_smooth());

        config.easing = EasingType::Cubic;
        config.animation_duration_ms = 0;
        assert!(!config.is_smooth());
    }
}
