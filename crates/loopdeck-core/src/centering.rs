//! Dwell-debounced detection of the centered element
//!
//! Each frame the host reports the card closest to the viewport center. A
//! card only becomes "centered" after it has stayed the closest for more
//! than `dwell_threshold` consecutive evaluations, so a fast scroll passing
//! through does not keep re-triggering a snap.

use std::hash::Hash;

use tracing::trace;

use crate::buffer::Element;
use crate::config::CarouselConfig;

#[derive(Debug, Clone)]
pub struct CenteringTracker<M> {
    capture_radius: f64,
    dwell_threshold: u32,
    /// Card currently closest to the center
    biggest: Option<Element<M>>,
    /// Consecutive evaluations `biggest` has held
    dwell: u32,
    centered: Option<Element<M>>,
}

impl<M> CenteringTracker<M>
where
    M: Clone + Eq + Hash,
{
    pub fn new(capture_radius: f64, dwell_threshold: u32) -> Self {
        Self {
            capture_radius,
            dwell_threshold,
            biggest: None,
            dwell: 0,
            centered: None,
        }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.capture_radius, config.dwell_threshold())
    }

    /// Feed one reading and return the centered element after it.
    ///
    /// Readings at or outside the capture radius leave the state untouched.
    pub fn evaluate(&mut self, candidate: &Element<M>, distance: f64) -> Option<&Element<M>> {
        if distance.abs() >= self.capture_radius {
            return self.centered.as_ref();
        }

        if self.biggest.as_ref() != Some(candidate) {
            trace!(position = candidate.position, "New centering candidate");
            self.biggest = Some(candidate.clone());
            self.dwell = 0;
            self.centered = None;
        } else {
            self.dwell = self.dwell.saturating_add(1);
            if self.dwell > self.dwell_threshold {
                self.centered = Some(candidate.clone());
            }
        }

        self.centered.as_ref()
    }

    /// Make `element` both the candidate and the centered element without
    /// waiting for a dwell. Used at build time and after a surface swap.
    pub fn adopt(&mut self, element: Element<M>) {
        self.biggest = Some(element.clone());
        self.centered = Some(element);
        self.dwell = 0;
    }

    pub fn reset(&mut self) {
        self.biggest = None;
        self.centered = None;
        self.dwell = 0;
    }

    #[inline]
    pub fn centered(&self) -> Option<&Element<M>> {
        self.centered.as_ref()
    }

    #[inline]
    pub fn biggest(&self) -> Option<&Element<M>> {
        self.biggest.as_ref()
    }

    #[inline]
    pub fn dwell(&self) -> u32 {
        self.dwell
    }

    #[inline]
    pub fn dwell_threshold(&self) -> u32 {
        self.dwell_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(position: usize, value: char) -> Element<char> {
        Element { position, value }
    }

    #[test]
    fn test_settles_after_threshold() {
        let mut tracker = CenteringTracker::new(200.0, 10);
        let a = el(15, 'a');
        tracker.adopt(a.clone());
        let prior = tracker.centered().cloned();

        for _ in 0..10 {
            tracker.evaluate(&a, 5.0);
            assert_eq!(tracker.centered().cloned(), prior);
        }
        assert_eq!(tracker.dwell(), 10);

        let centered = tracker.evaluate(&a, 5.0).cloned();
        assert_eq!(centered, Some(a));
        assert_eq!(tracker.dwell(), 11);
    }

    #[test]
    fn test_new_candidate_needs_full_dwell() {
        let mut tracker = CenteringTracker::new(200.0, 10);
        let b = el(16, 'b');

        // first sight only adopts the candidate
        assert!(tracker.evaluate(&b, 0.0).is_none());
        for _ in 0..10 {
            assert!(tracker.evaluate(&b, 0.0).is_none());
        }
        assert_eq!(tracker.evaluate(&b, 0.0), Some(&b));
    }

    #[test]
    fn test_switching_candidate_resets_dwell() {
        let mut tracker = CenteringTracker::new(200.0, 10);
        let a = el(15, 'a');
        let b = el(16, 'b');
        tracker.adopt(a.clone());

        for _ in 0..9 {
            tracker.evaluate(&a, 1.0);
        }
        assert_eq!(tracker.dwell(), 9);

        assert!(tracker.evaluate(&b, 1.0).is_none());
        assert_eq!(tracker.dwell(), 0);
        assert_eq!(tracker.biggest(), Some(&b));
    }

    #[test]
    fn test_same_value_other_position_is_new_candidate() {
        let mut tracker = CenteringTracker::new(200.0, 10);
        tracker.adopt(el(15, 'a'));
        tracker.evaluate(&el(18, 'a'), 0.0);
        assert_eq!(tracker.dwell(), 0);
        assert!(tracker.centered().is_none());
    }

    #[test]
    fn test_out_of_radius_is_ignored() {
        let mut tracker = CenteringTracker::new(200.0, 10);
        let a = el(15, 'a');
        tracker.adopt(a.clone());
        for _ in 0..5 {
            tracker.evaluate(&a, 0.0);
        }

        let far = el(16, 'b');
        assert_eq!(tracker.evaluate(&far, 200.0), Some(&a));
        assert_eq!(tracker.evaluate(&far, -250.0), Some(&a));
        assert_eq!(tracker.dwell(), 5);
        assert_eq!(tracker.biggest(), Some(&a));
    }
}
