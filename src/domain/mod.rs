pub mod ring;
pub mod segment;

pub use ring::{Ring, RingSource, ScoredRing};
pub use segment::Segment;
