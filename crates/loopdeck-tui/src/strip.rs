//! Logical horizontal scroll surface
//!
//! A `Strip` lays cards out left to right at a fixed pitch and scrolls over
//! them. It knows nothing about terminals: everything is in layout units, and
//! the widgets convert to columns when drawing.

use std::collections::BTreeSet;
use std::ops::Range;

use loopdeck_core::ScrollConfig;

use crate::scroll::OffsetAnimator;

#[derive(Debug, Clone)]
pub struct Strip {
    card_width: f64,
    spacing: f64,
    viewport_width: f64,
    len: usize,
    visible: bool,
    animator: OffsetAnimator,
    /// Cards inside the viewport as of the last `advance`
    on_screen: BTreeSet<usize>,
}

impl Strip {
    pub fn new(card_width: f64, spacing: f64, viewport_width: f64, scroll: ScrollConfig) -> Self {
        Self {
            card_width: card_width.max(1.0),
            spacing,
            viewport_width: viewport_width.max(0.0),
            len: 0,
            visible: false,
            animator: OffsetAnimator::new(scroll),
            on_screen: BTreeSet::new(),
        }
    }

    /// Distance between the left edges of neighbouring cards
    #[inline]
    pub fn pitch(&self) -> f64 {
        (self.card_width + self.spacing).max(1.0)
    }

    #[inline]
    pub fn card_width(&self) -> f64 {
        self.card_width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.animator.offset()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Total content width minus the viewport
    pub fn max_offset(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        let content = self.len as f64 * self.pitch() - self.spacing.max(0.0);
        (content - self.viewport_width).max(0.0)
    }

    /// Replace the card count; the offset is clamped into the new range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        let max = self.max_offset();
        self.animator.set_offset(self.animator.offset(), max);
        self.on_screen.clear();
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width.max(0.0);
        let max = self.max_offset();
        self.animator.update(max);
    }

    #[inline]
    pub fn viewport_center(&self) -> f64 {
        self.viewport_width / 2.0
    }

    /// Center of a card in viewport coordinates
    pub fn card_center(&self, position: usize) -> Option<f64> {
        if position >= self.len {
            return None;
        }
        Some(position as f64 * self.pitch() + self.card_width / 2.0 - self.offset())
    }

    /// Offset that centers `position` in the viewport
    pub fn offset_for(&self, position: usize) -> f64 {
        position as f64 * self.pitch() + self.card_width / 2.0 - self.viewport_center()
    }

    /// Positions whose card overlaps the viewport
    pub fn visible_range(&self) -> Range<usize> {
        if self.len == 0 || self.viewport_width <= 0.0 {
            return 0..0;
        }
        let pitch = self.pitch();
        let offset = self.offset();
        // a card at i overlaps when i*pitch < offset + vw and i*pitch + w > offset
        let first = ((offset - self.card_width) / pitch).floor() + 1.0;
        let last = ((offset + self.viewport_width) / pitch).ceil();
        let start = (first.max(0.0) as usize).min(self.len);
        let end = (last.max(0.0) as usize).min(self.len);
        start..end.max(start)
    }

    pub fn scroll_to(&mut self, position: usize, animated: bool) {
        let max = self.max_offset();
        self.animator.scroll_to(self.offset_for(position), animated, max);
    }

    /// Move the offset directly, as a finger drag would
    pub fn drag_by(&mut self, delta: f64) {
        let max = self.max_offset();
        self.animator.set_offset(self.offset() + delta, max);
    }

    /// Start an eased glide `distance` units away from the current target
    pub fn fling(&mut self, distance: f64) {
        let max = self.max_offset();
        let target = self.animator.target() + distance;
        self.animator.scroll_to(target, true, max);
    }

    /// Step animation for one frame and report cards that left the viewport
    pub fn advance(&mut self) -> Vec<usize> {
        let max = self.max_offset();
        self.animator.update(max);
        self.refresh_on_screen()
    }

    fn refresh_on_screen(&mut self) -> Vec<usize> {
        let now: BTreeSet<usize> = self.visible_range().collect();
        let gone: Vec<usize> = self.on_screen.difference(&now).copied().collect();
        self.on_screen = now;
        gone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(len: usize) -> Strip {
        let mut strip = Strip::new(
            100.0,
            0.0,
            300.0,
            ScrollConfig {
                smooth_enabled: false,
                ..Default::default()
            },
        );
        strip.set_len(len);
        strip
    }

    #[test]
    fn test_centering_offset() {
        let mut strip = strip(30);
        strip.scroll_to(10, false);
        assert_eq!(strip.offset(), 900.0);
        assert_eq!(strip.card_center(10), Some(150.0));
        assert_eq!(strip.card_center(10), Some(strip.viewport_center()));
        assert_eq!(strip.card_center(30), None);
    }

    #[test]
    fn test_visible_range_partial_cards() {
        let mut strip = strip(30);
        strip.scroll_to(10, false);
        // viewport 900..1200 covers cards 9, 10, 11 exactly
        assert_eq!(strip.visible_range(), 9..12);

        strip.drag_by(50.0);
        // 950..1250 clips 9 and 12
        assert_eq!(strip.visible_range(), 9..13);
    }

    #[test]
    fn test_scroll_clamps_at_edges() {
        let mut strip = strip(30);
        assert_eq!(strip.len(), 30);
        strip.scroll_to(0, false);
        assert_eq!(strip.offset(), 0.0);
        strip.scroll_to(29, false);
        assert_eq!(strip.offset(), strip.max_offset());
        assert_eq!(strip.max_offset(), 2_700.0);
    }

    #[test]
    fn test_advance_reports_disappearances() {
        let mut strip = strip(30);
        strip.scroll_to(10, false);
        assert!(strip.advance().is_empty());

        strip.drag_by(150.0);
        // 1050..1350: card 9 left, 12 and 13 entered
        assert_eq!(strip.advance(), vec![9]);

        strip.drag_by(-400.0);
        // 650..950: 10..13 gone
        assert_eq!(strip.advance(), vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_negative_spacing_overlaps() {
        let strip = Strip::new(380.0, -8.0, 1_000.0, ScrollConfig::default());
        assert_eq!(strip.pitch(), 372.0);
        assert_eq!(strip.offset_for(3), 3.0 * 372.0 + 190.0 - 500.0);
    }

    #[test]
    fn test_empty_strip() {
        let strip = strip(0);
        assert!(strip.is_empty());
        assert_eq!(strip.visible_range(), 0..0);
        assert_eq!(strip.max_offset(), 0.0);
    }
}
