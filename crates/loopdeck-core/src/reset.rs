//! Seamless reset: moving the viewport back toward the middle of the buffer
//!
//! Each time the designated first element leaves the active surface the
//! viewport has travelled one lap. Past a threshold a reset becomes due: the
//! hidden twin surface is jumped to an equivalent element near the middle of
//! the buffer, and after a short delay the two surfaces trade places.
//!
//! ```text
//! Stable --(count > threshold)--> PendingReset --(centered known)--> Swapping
//!    ^                                                                  |
//!    +-------------------------(timer fired)---------------------------+
//! ```

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::buffer::{Element, ElementBuffer};

/// Identifies one scheduled swap. A timer carrying an older token than the
/// current swap is stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwapToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ResetPhase {
    Stable,
    PendingReset,
    Swapping { target: usize, token: SwapToken },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetState {
    pub pending_reset: bool,
    pub disappear_count: u32,
}

/// Result of asking the controller to start a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapPlan<M> {
    /// No reset pending, or a swap is already running
    NotDue,
    /// Jump the hidden surface to `target`, then flip when `token` fires
    Started { target: Element<M>, token: SwapToken },
    /// No equivalent element exists; the pending reset was dropped
    Skipped,
}

#[derive(Debug, Clone)]
pub struct SeamlessResetController<M> {
    disappear_threshold: u32,
    first_value: Option<M>,
    state: ResetState,
    phase: ResetPhase,
    next_token: u64,
}

impl<M> SeamlessResetController<M>
where
    M: Clone + Eq + Hash,
{
    pub fn new(disappear_threshold: u32) -> Self {
        Self {
            disappear_threshold,
            first_value: None,
            state: ResetState::default(),
            phase: ResetPhase::Stable,
            next_token: 0,
        }
    }

    /// Start tracking a freshly built buffer whose first element holds `first`.
    ///
    /// Returns the token of a swap that was in flight, which the caller must
    /// cancel.
    pub fn arm(&mut self, first: M) -> Option<SwapToken> {
        let cancelled = self.cancel();
        self.first_value = Some(first);
        cancelled
    }

    /// Drop all progress and return to `Stable`.
    pub fn cancel(&mut self) -> Option<SwapToken> {
        let cancelled = match self.phase {
            ResetPhase::Swapping { token, .. } => Some(token),
            _ => None,
        };
        self.state = ResetState::default();
        self.phase = ResetPhase::Stable;
        cancelled
    }

    /// Record that an element holding `value` left the active surface.
    ///
    /// Returns true when this disappearance made a reset due.
    pub fn on_disappeared(&mut self, value: &M) -> bool {
        if matches!(self.phase, ResetPhase::Swapping { .. }) {
            return false;
        }
        if self.first_value.as_ref() != Some(value) {
            return false;
        }

        self.state.disappear_count = self.state.disappear_count.saturating_add(1);
        debug!(count = self.state.disappear_count, "First element left the viewport");

        if !self.state.pending_reset && self.state.disappear_count > self.disappear_threshold {
            self.state.pending_reset = true;
            self.phase = ResetPhase::PendingReset;
            debug!("Seamless reset is due");
            return true;
        }
        false
    }

    /// Start a swap toward an equivalent of `centered` if a reset is due.
    pub fn begin_swap(&mut self, buffer: &ElementBuffer<M>, centered: &Element<M>) -> SwapPlan<M> {
        if self.phase != ResetPhase::PendingReset {
            return SwapPlan::NotDue;
        }

        match buffer.reset_target(&centered.value) {
            Some(target) => {
                self.next_token += 1;
                let token = SwapToken(self.next_token);
                self.phase = ResetPhase::Swapping {
                    target: target.position,
                    token,
                };
                info!(
                    from = centered.position,
                    to = target.position,
                    token = token.0,
                    "Starting seamless reset"
                );
                SwapPlan::Started {
                    target: target.clone(),
                    token,
                }
            }
            None => {
                warn!(
                    position = centered.position,
                    buffer_len = buffer.len(),
                    "No reset target for centered element, skipping reset"
                );
                self.state = ResetState::default();
                self.phase = ResetPhase::Stable;
                SwapPlan::Skipped
            }
        }
    }

    /// Finish the swap identified by `token`, returning its target position.
    ///
    /// Stale or unknown tokens return `None` and change nothing.
    pub fn complete_swap(&mut self, token: SwapToken) -> Option<usize> {
        match self.phase {
            ResetPhase::Swapping { target, token: current } if current == token => {
                self.state = ResetState::default();
                self.phase = ResetPhase::Stable;
                Some(target)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn phase(&self) -> ResetPhase {
        self.phase
    }

    #[inline]
    pub fn state(&self) -> ResetState {
        self.state
    }

    pub fn first_value(&self) -> Option<&M> {
        self.first_value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed() -> (SeamlessResetController<char>, ElementBuffer<char>) {
        let (buffer, middle) = ElementBuffer::build(&['a', 'b', 'c'], 11).unwrap();
        let mut controller = SeamlessResetController::new(5);
        controller.arm(middle.value);
        (controller, buffer)
    }

    #[test]
    fn test_pending_after_six_disappearances() {
        let (mut controller, _) = armed();
        for _ in 0..5 {
            assert!(!controller.on_disappeared(&'a'));
            assert_eq!(controller.phase(), ResetPhase::Stable);
        }
        assert!(controller.on_disappeared(&'a'));
        assert_eq!(controller.phase(), ResetPhase::PendingReset);
        assert!(controller.state().pending_reset);
        assert_eq!(controller.state().disappear_count, 6);
    }

    #[test]
    fn test_other_values_do_not_count() {
        let (mut controller, _) = armed();
        for _ in 0..20 {
            controller.on_disappeared(&'b');
        }
        assert_eq!(controller.state().disappear_count, 0);
    }

    #[test]
    fn test_begin_swap_targets_same_value() {
        let (mut controller, buffer) = armed();
        for _ in 0..6 {
            controller.on_disappeared(&'a');
        }
        let centered = buffer.get(22).unwrap().clone(); // 'b'
        match controller.begin_swap(&buffer, &centered) {
            SwapPlan::Started { target, token } => {
                assert_eq!(target.value, 'b');
                assert_eq!(target.position, 13);
                assert_eq!(
                    controller.phase(),
                    ResetPhase::Swapping { target: 13, token }
                );
            }
            other => panic!("expected swap, got {:?}", other),
        }
    }

    #[test]
    fn test_begin_swap_not_due() {
        let (mut controller, buffer) = armed();
        let centered = buffer.get(15).unwrap().clone();
        assert_eq!(controller.begin_swap(&buffer, &centered), SwapPlan::NotDue);
    }

    #[test]
    fn test_complete_swap_clears_state() {
        let (mut controller, buffer) = armed();
        for _ in 0..6 {
            controller.on_disappeared(&'a');
        }
        let centered = buffer.get(15).unwrap().clone();
        let SwapPlan::Started { token, .. } = controller.begin_swap(&buffer, &centered) else {
            panic!("expected swap");
        };

        assert_eq!(controller.complete_swap(SwapToken(token.0 + 1)), None);
        assert_eq!(controller.complete_swap(token), Some(12));
        assert_eq!(controller.phase(), ResetPhase::Stable);
        assert_eq!(controller.state(), ResetState::default());
        assert_eq!(controller.complete_swap(token), None);
    }

    #[test]
    fn test_missing_target_skips() {
        let (buffer, middle) = ElementBuffer::build(&['a', 'b'], 1).unwrap();
        let mut controller = SeamlessResetController::new(0);
        controller.arm(middle.value);
        assert!(controller.on_disappeared(&'a'));

        assert_eq!(controller.begin_swap(&buffer, &middle), SwapPlan::Skipped);
        assert_eq!(controller.phase(), ResetPhase::Stable);
        assert_eq!(controller.state(), ResetState::default());
    }

    #[test]
    fn test_rearm_cancels_swap() {
        let (mut controller, buffer) = armed();
        for _ in 0..6 {
            controller.on_disappeared(&'a');
        }
        let centered = buffer.get(15).unwrap().clone();
        let SwapPlan::Started { token, .. } = controller.begin_swap(&buffer, &centered) else {
            panic!("expected swap");
        };

        assert_eq!(controller.arm('x'), Some(token));
        assert_eq!(controller.complete_swap(token), None);
        assert_eq!(controller.first_value(), Some(&'x'));
    }

    #[test]
    fn test_disappearances_ignored_while_swapping() {
        let (mut controller, buffer) = armed();
        for _ in 0..6 {
            controller.on_disappeared(&'a');
        }
        let centered = buffer.get(15).unwrap().clone();
        controller.begin_swap(&buffer, &centered);
        controller.on_disappeared(&'a');
        assert_eq!(controller.state().disappear_count, 6);
    }
}
