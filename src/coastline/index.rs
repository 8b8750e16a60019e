use std::collections::HashMap;

use crate::domain::Segment;
use crate::geometry::CoordinateKey;

/// Per-segment consumption tag, indexed by segment id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Free,
    Consumed,
}

/// Maps quantized segment endpoints to segment ids
///
/// Ids are positions in the segment slice the index was built from. Each
/// candidate list is in ascending id order, so lookups return the earliest
/// free segment in input order.
#[derive(Debug, Default)]
pub struct EndpointIndex {
    starts: HashMap<CoordinateKey, Vec<usize>>,
    ends: HashMap<CoordinateKey, Vec<usize>>,
    precision: u32,
}

impl EndpointIndex {
    /// Index the first and last point of every segment with at least 2 points
    pub fn build(segments: &[Segment], precision: u32) -> Self {
        let mut index = Self {
            precision,
            ..Default::default()
        };

        for (id, segment) in segments.iter().enumerate() {
            let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
                continue;
            };
            if !segment.is_valid() {
                continue;
            }
            index.starts.entry(index.key(first)).or_default().push(id);
            index.ends.entry(index.key(last)).or_default().push(id);
        }

        index
    }

    pub fn key(&self, point: (f64, f64)) -> CoordinateKey {
        CoordinateKey::new(point, self.precision)
    }

    /// First free segment whose first point matches `key`
    pub fn find_start(&self, key: &CoordinateKey, states: &[SegmentState]) -> Option<usize> {
        Self::first_free(self.starts.get(key), states)
    }

    /// First free segment whose last point matches `key`
    pub fn find_end(&self, key: &CoordinateKey, states: &[SegmentState]) -> Option<usize> {
        Self::first_free(self.ends.get(key), states)
    }

    fn first_free(candidates: Option<&Vec<usize>>, states: &[SegmentState]) -> Option<usize> {
        candidates?
            .iter()
            .copied()
            .find(|&id| states.get(id) == Some(&SegmentState::Free))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(10, vec![(0.0, 0.0), (1.0, 0.0)]),
            Segment::new(11, vec![(0.0, 0.0), (0.0, 1.0)]),
            Segment::new(12, vec![(5.0, 5.0)]),
            Segment::new(13, vec![(2.0, 2.0), (1.0, 0.0)]),
        ]
    }

    #[test]
    fn test_find_start_in_input_order() {
        let segments = segments();
        let index = EndpointIndex::build(&segments, 7);
        let states = vec![SegmentState::Free; segments.len()];

        let key = index.key((0.0, 0.0));
        assert_eq!(index.find_start(&key, &states), Some(0));
    }

    #[test]
    fn test_consumed_segments_are_skipped() {
        let segments = segments();
        let index = EndpointIndex::build(&segments, 7);
        let mut states = vec![SegmentState::Free; segments.len()];
        states[0] = SegmentState::Consumed;

        let key = index.key((0.0, 0.0));
        assert_eq!(index.find_start(&key, &states), Some(1));

        states[1] = SegmentState::Consumed;
        assert_eq!(index.find_start(&key, &states), None);
    }

    #[test]
    fn test_find_end() {
        let segments = segments();
        let index = EndpointIndex::build(&segments, 7);
        let states = vec![SegmentState::Free; segments.len()];

        let key = index.key((1.0, 0.0));
        assert_eq!(index.find_end(&key, &states), Some(0));
        assert_eq!(index.find_start(&key, &states), None);
    }

    #[test]
    fn test_short_segments_not_indexed() {
        let segments = segments();
        let index = EndpointIndex::build(&segments, 7);
        let states = vec![SegmentState::Free; segments.len()];

        let key = index.key((5.0, 5.0));
        assert_eq!(index.find_start(&key, &states), None);
        assert_eq!(index.find_end(&key, &states), None);
    }

    #[test]
    fn test_quantized_lookup() {
        let segments = vec![Segment::new(1, vec![(0.10000001, 0.2), (1.0, 1.0)])];
        let index = EndpointIndex::build(&segments, 6);
        let states = vec![SegmentState::Free];

        let key = index.key((0.1, 0.2));
        assert_eq!(index.find_start(&key, &states), Some(0));
    }
}
