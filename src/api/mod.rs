pub mod overpass;

pub use overpass::{Element, GeometryPoint, OverpassResponse, fetch_coastline};
