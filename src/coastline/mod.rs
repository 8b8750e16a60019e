//! Coastline ring reconstruction
//!
//! Open coastline segments are indexed by their quantized endpoints,
//! stitched greedily into closed rings, then scored by shoelace area and
//! ranked.

pub mod builder;
pub mod filter;
pub mod index;

pub use builder::{BuildReport, RingBuilder};
pub use filter::rank_significant;
pub use index::{EndpointIndex, SegmentState};

use thiserror::Error;

/// Non-fatal reasons a segment or partial ring is dropped
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Discard {
    #[error("way {id}: malformed segment with {points} point(s), skipped")]
    MalformedSegment { id: u64, points: usize },

    #[error("chain from way {start_id}: {points} point(s) never closed, discarded")]
    UnclosableFragment { start_id: u64, points: usize },

    #[error("way {id}: closed way with only {points} point(s), discarded")]
    DegenerateRing { id: u64, points: usize },

    #[error("chain from way {start_id}: exceeded {max_iterations} extension steps")]
    RingBuilderOverrun {
        start_id: u64,
        max_iterations: usize,
    },
}
