//! coastmask - Rebuild a land-mask polygon set from OpenStreetMap coastline ways

pub mod api;
pub mod coastline;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod mask;
pub mod osm;
pub mod pipeline;
