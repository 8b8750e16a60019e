//! Land-mask assembly, serialization and point classification

pub mod classify;
pub mod geojson;
pub mod merge;
pub mod validation;

pub use classify::LandMask;
pub use geojson::{read_land_mask, to_geojson_string, write_land_mask};
pub use merge::{LandMassSet, MaskPolygon, merge_land_mask};
pub use validation::{ValidationResult, self_intersections, validate_rings};
