//! Replicated element buffer backing the looping carousel
//!
//! The caller's list is repeated many times so the viewport can travel in
//! either direction without reaching a real edge before a seamless reset
//! moves it back toward the middle.

use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Upper bound on how many times the source list may be repeated
pub const MAX_REPETITIONS: usize = 1024;

/// A source value pinned to one slot of the buffer.
///
/// Two elements are equal only when both the position and the value match,
/// so the same logical item at different positions stays distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element<M> {
    pub position: usize,
    pub value: M,
}

#[derive(Debug, Clone)]
pub struct ElementBuffer<M> {
    elements: Vec<Element<M>>,
    source_len: usize,
}

impl<M> ElementBuffer<M>
where
    M: Clone + Eq + Hash,
{
    /// Build the buffer and pick the starting element.
    ///
    /// Returns `None` for an empty source, zero repetitions, more than
    /// `MAX_REPETITIONS`, or a length that does not fit in `usize`. The
    /// starting element is the middle occurrence of `source[0]`, which gives
    /// the most headroom on both sides before a reset is needed.
    pub fn build(source: &[M], repetitions: usize) -> Option<(Self, Element<M>)> {
        let first = source.first()?;
        if repetitions == 0 || repetitions > MAX_REPETITIONS {
            return None;
        }
        let len = source.len().checked_mul(repetitions)?;

        let mut elements = Vec::with_capacity(len);
        let mut first_positions = Vec::with_capacity(repetitions);

        for _ in 0..repetitions {
            for value in source {
                let position = elements.len();
                if value == first {
                    first_positions.push(position);
                }
                elements.push(Element {
                    position,
                    value: value.clone(),
                });
            }
        }

        let middle_position = first_positions
            .get(first_positions.len() / 2)
            .copied()
            .unwrap_or(0);
        let middle = elements.get(middle_position)?.clone();

        Some((
            Self {
                elements,
                source_len: source.len(),
            },
            middle,
        ))
    }

    /// Look up an element; out-of-range positions are simply absent
    #[inline]
    pub fn get(&self, position: usize) -> Option<&Element<M>> {
        self.elements.get(position)
    }

    /// Every position holding `value`, in ascending order
    pub fn positions_of(&self, value: &M) -> Vec<usize> {
        self.elements
            .iter()
            .filter(|e| &e.value == value)
            .map(|e| e.position)
            .collect()
    }

    /// Occurrence of `value` used as a reset target.
    ///
    /// Picks the `floor(count / 2) - 1`-th occurrence, i.e. the one just
    /// before the middle. Values with fewer than two occurrences have no
    /// target.
    pub fn reset_target(&self, value: &M) -> Option<&Element<M>> {
        let positions = self.positions_of(value);
        let index = (positions.len() / 2).checked_sub(1)?;
        positions.get(index).and_then(|&p| self.get(p))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Length of the caller's list the buffer was built from
    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn repetitions(&self) -> usize {
        if self.source_len == 0 {
            0
        } else {
            self.elements.len() / self.source_len
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element<M>> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty_source() {
        let source: Vec<char> = Vec::new();
        assert!(ElementBuffer::build(&source, 11).is_none());
        assert!(ElementBuffer::build(&['a'], 0).is_none());
    }

    #[test]
    fn test_build_rejects_oversized_repetitions() {
        assert!(ElementBuffer::build(&['a', 'b'], usize::MAX).is_none());
        assert!(ElementBuffer::build(&['a', 'b'], MAX_REPETITIONS + 1).is_none());

        let (buffer, _) = ElementBuffer::build(&['a', 'b'], MAX_REPETITIONS).unwrap();
        assert_eq!(buffer.len(), 2 * MAX_REPETITIONS);
    }

    #[test]
    fn test_build_length_is_multiple_of_source() {
        for source in [vec!['a'], vec!['a', 'b'], vec!['a', 'b', 'c', 'd', 'e']] {
            let (buffer, middle) = ElementBuffer::build(&source, 11).unwrap();
            assert_eq!(buffer.len(), source.len() * 11);
            assert_eq!(buffer.len() % source.len(), 0);
            assert_eq!(buffer.repetitions(), 11);
            assert_eq!(middle.value, source[0]);
        }
    }

    #[test]
    fn test_positions_are_dense_and_unique() {
        let (buffer, _) = ElementBuffer::build(&['a', 'b', 'c'], 4).unwrap();
        for (i, element) in buffer.iter().enumerate() {
            assert_eq!(element.position, i);
        }
    }

    #[test]
    fn test_middle_element_of_three_by_eleven() {
        let (buffer, middle) = ElementBuffer::build(&['a', 'b', 'c'], 11).unwrap();
        assert_eq!(buffer.len(), 33);
        // 'a' sits at 0, 3, ..., 30; the 5th occurrence is the middle
        assert_eq!(middle.position, 15);
        assert_eq!(buffer.get(15), Some(&middle));
    }

    #[test]
    fn test_middle_counts_duplicates_of_first() {
        // 'a' occurs twice per repetition: 0,2,3,5,6,8,9,11 -> index 4 -> 6
        let (_, middle) = ElementBuffer::build(&['a', 'b', 'a'], 4).unwrap();
        assert_eq!(middle.position, 6);
        assert_eq!(middle.value, 'a');
    }

    #[test]
    fn test_get_out_of_range() {
        let (buffer, _) = ElementBuffer::build(&['a', 'b'], 2).unwrap();
        assert!(buffer.get(4).is_none());
        assert!(buffer.get(usize::MAX).is_none());
    }

    #[test]
    fn test_reset_target_just_before_middle() {
        let (buffer, _) = ElementBuffer::build(&['a', 'b', 'c'], 11).unwrap();
        // 'b' at 1, 4, ..., 31 (11 occurrences): index 4 -> position 13
        let target = buffer.reset_target(&'b').unwrap();
        assert_eq!(target.position, 13);
        assert_eq!(target.value, 'b');
    }

    #[test]
    fn test_reset_target_missing() {
        let (buffer, _) = ElementBuffer::build(&['a', 'b'], 1).unwrap();
        // single occurrence: floor(1/2) - 1 underflows
        assert!(buffer.reset_target(&'a').is_none());
        assert!(buffer.reset_target(&'z').is_none());
    }
}
