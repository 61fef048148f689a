//! Per-surface scroll offset animation

use std::time::{Duration, Instant};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{lerp, progress_at};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Scroll offset with optional easing toward a target.
///
/// Offsets are in layout units and always clamped to `[0, max_offset]`.
#[derive(Debug, Clone, Default)]
pub struct OffsetAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    offset: f64,
}

impl OffsetAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            offset: 0.0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Where the offset will end up once the running animation finishes
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.offset)
    }

    /// Jump immediately, dropping any running animation
    pub fn set_offset(&mut self, offset: f64, max_offset: f64) {
        self.animation = None;
        self.offset = clamp_offset(offset, max_offset);
    }

    /// Move toward `target`, animated when requested and smooth scrolling is on
    pub fn scroll_to(&mut self, target: f64, animated: bool, max_offset: f64) {
        self.scroll_to_at(target, animated, max_offset, Instant::now());
    }

    pub fn scroll_to_at(&mut self, target: f64, animated: bool, max_offset: f64, now: Instant) {
        let target = clamp_offset(target, max_offset);

        if !animated || !self.config.is_smooth() || (self.offset - target).abs() < f64::EPSILON {
            self.set_offset(target, max_offset);
            return;
        }

        // Retargeting mid-flight starts from the currently displayed offset
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.offset,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Advance the animation and return the offset to draw this frame
    pub fn update(&mut self, max_offset: f64) -> f64 {
        self.update_at(max_offset, Instant::now())
    }

    pub fn update_at(&mut self, max_offset: f64, now: Instant) -> f64 {
        if let Some(anim) = &self.animation {
            let t = progress_at(anim.start, now, anim.duration);
            if t >= 1.0 {
                self.offset = anim.to;
                self.animation = None;
            } else {
                self.offset = lerp(anim.from, anim.to, anim.easing.apply(t));
            }
        }
        self.offset = clamp_offset(self.offset, max_offset);
        self.offset
    }
}

#[inline]
fn clamp_offset(offset: f64, max_offset: f64) -> f64 {
    offset.clamp(0.0, max_offset.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> OffsetAnimator {
        OffsetAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: 100,
            easing: EasingType::Linear,
            animation_fps: 60,
        })
    }

    #[test]
    fn test_unanimated_jump() {
        let mut animator = linear();
        animator.scroll_to(500.0, false, 1_000.0);
        assert_eq!(animator.offset(), 500.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_disabled_smoothing_jumps() {
        let mut animator = OffsetAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        animator.scroll_to(500.0, true, 1_000.0);
        assert_eq!(animator.offset(), 500.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_progresses() {
        let mut animator = linear();
        let start = Instant::now();
        animator.scroll_to_at(400.0, true, 1_000.0, start);
        assert!(animator.is_animating());
        assert_eq!(animator.target(), 400.0);

        let mid = animator.update_at(1_000.0, start + Duration::from_millis(50));
        assert!((mid - 200.0).abs() < 1e-6);

        let end = animator.update_at(1_000.0, start + Duration::from_millis(150));
        assert_eq!(end, 400.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let mut animator = linear();
        let start = Instant::now();
        animator.scroll_to_at(400.0, true, 1_000.0, start);
        animator.update_at(1_000.0, start + Duration::from_millis(50));

        animator.scroll_to_at(0.0, true, 1_000.0, start + Duration::from_millis(50));
        let back = animator.update_at(1_000.0, start + Duration::from_millis(100));
        assert!((back - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_offsets_are_clamped() {
        let mut animator = linear();
        animator.set_offset(-50.0, 1_000.0);
        assert_eq!(animator.offset(), 0.0);
        animator.scroll_to(5_000.0, false, 1_000.0);
        assert_eq!(animator.offset(), 1_000.0);
        // a shrinking range pulls the offset in on the next frame
        assert_eq!(animator.update(300.0), 300.0);
    }
}
