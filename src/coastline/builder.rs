use log::{debug, warn};

use super::Discard;
use super::index::{EndpointIndex, SegmentState};
use crate::config::StitchConfig;
use crate::domain::{Ring, Segment};
use crate::geometry::CoordinateKey;

/// Counts of what happened to each segment and chain during a build
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Segments handed to the builder
    pub segments: usize,
    /// Segments with fewer than 2 points
    pub malformed: usize,
    /// Rings whose chain returned to its starting point
    pub closed: usize,
    /// Rings closed by appending their first point
    pub force_closed: usize,
    /// Chains or closed ways too small to keep
    pub discarded: usize,
    /// Chains that hit the per-ring iteration cap
    pub overruns: usize,
}

impl BuildReport {
    pub fn rings(&self) -> usize {
        self.closed + self.force_closed
    }
}

/// How a continuation segment joins the current chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    /// Segment starts at the chain's tail; appended as stored
    Forward,
    /// Segment ends at the chain's tail; appended reversed
    Reverse,
}

/// Greedy stitcher that turns open coastline segments into closed rings
///
/// Segments are visited in input order. Each free segment seeds a chain that
/// is extended from its tail until no free segment touches it. When several
/// free segments meet the tail, the first one in input order wins, and
/// forward continuations are preferred over reversed ones.
pub struct RingBuilder<'a> {
    segments: &'a [Segment],
    index: EndpointIndex,
    states: Vec<SegmentState>,
    config: StitchConfig,
    report: BuildReport,
}

impl<'a> RingBuilder<'a> {
    pub fn new(segments: &'a [Segment], config: StitchConfig) -> Self {
        let index = EndpointIndex::build(segments, config.precision);
        let mut report = BuildReport {
            segments: segments.len(),
            ..Default::default()
        };

        let states = segments
            .iter()
            .map(|s| {
                if s.is_valid() {
                    SegmentState::Free
                } else {
                    debug!(
                        "{}",
                        Discard::MalformedSegment {
                            id: s.id,
                            points: s.points.len()
                        }
                    );
                    report.malformed += 1;
                    SegmentState::Consumed
                }
            })
            .collect();

        Self {
            segments,
            index,
            states,
            config,
            report,
        }
    }

    /// Consume every segment and return the rings in build order
    pub fn build(mut self) -> (Vec<Ring>, BuildReport) {
        let mut rings = Vec::new();

        for id in 0..self.segments.len() {
            if self.states[id] == SegmentState::Consumed {
                continue;
            }
            if let Some(ring) = self.stitch_from(id) {
                rings.push(ring);
            }
        }

        (rings, self.report)
    }

    fn key(&self, point: (f64, f64)) -> CoordinateKey {
        self.index.key(point)
    }

    fn next_continuation(&self, tail: &CoordinateKey) -> Option<(usize, Join)> {
        if let Some(id) = self.index.find_start(tail, &self.states) {
            return Some((id, Join::Forward));
        }
        self.index
            .find_end(tail, &self.states)
            .map(|id| (id, Join::Reverse))
    }

    fn stitch_from(&mut self, id: usize) -> Option<Ring> {
        let segments = self.segments;
        let seed = &segments[id];
        self.states[id] = SegmentState::Consumed;

        let mut points = seed.points.clone();

        if self.key(points[0]) == self.key(points[points.len() - 1]) {
            if points.len() >= 4 {
                snap_closure(&mut points);
                self.report.closed += 1;
                return Some(Ring::new(points, false));
            }
            debug!(
                "{}",
                Discard::DegenerateRing {
                    id: seed.id,
                    points: points.len()
                }
            );
            self.report.discarded += 1;
            return None;
        }

        let mut extensions = 0;
        while let Some(&tail) = points.last() {
            let Some((next, join)) = self.next_continuation(&self.key(tail)) else {
                break;
            };

            if extensions >= self.config.max_iterations {
                warn!(
                    "{}",
                    Discard::RingBuilderOverrun {
                        start_id: seed.id,
                        max_iterations: self.config.max_iterations
                    }
                );
                self.report.overruns += 1;
                break;
            }

            self.states[next] = SegmentState::Consumed;
            let continuation = &segments[next].points;
            match join {
                Join::Forward => points.extend_from_slice(&continuation[1..]),
                Join::Reverse => points.extend(continuation.iter().rev().skip(1).copied()),
            }
            extensions += 1;
        }

        self.close_chain(seed.id, points)
    }

    /// Resolve a chain with no further continuation into a ring or a discard
    fn close_chain(&mut self, start_id: u64, mut points: Vec<(f64, f64)>) -> Option<Ring> {
        let lead = self.key(points[0]);
        let tail = self.key(points[points.len() - 1]);

        if lead == tail && points.len() >= 4 {
            snap_closure(&mut points);
            self.report.closed += 1;
            return Some(Ring::new(points, false));
        }

        if points.len() > self.config.force_close_min_points {
            points.push(points[0]);
            self.report.force_closed += 1;
            return Some(Ring::new(points, true));
        }

        debug!(
            "{}",
            Discard::UnclosableFragment {
                start_id,
                points: points.len()
            }
        );
        self.report.discarded += 1;
        None
    }
}

/// Make the last point bit-identical to the first once their keys match
fn snap_closure(points: &mut [(f64, f64)]) {
    let first = points[0];
    if let Some(last) = points.last_mut() {
        *last = first;
    }
}
