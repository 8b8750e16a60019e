pub mod area;
pub mod key;

pub use area::ring_area;
pub use key::CoordinateKey;
