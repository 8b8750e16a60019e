use anyhow::Result;
use geo::{BoundingRect, Intersects, LineString, Point, Polygon, Rect};
use std::path::Path;

use super::geojson::read_land_mask;
use super::merge::LandMassSet;
use crate::domain::Ring;

/// Point-in-land classifier over a land-mask polygon collection
///
/// A point is land when it lies inside or on the boundary of any polygon.
/// Each polygon's bounding rectangle is checked first.
#[derive(Debug, Clone)]
pub struct LandMask {
    polygons: Vec<(Polygon<f64>, Rect<f64>)>,
}

impl LandMask {
    pub fn from_rings<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Self {
        let polygons = rings
            .into_iter()
            .filter_map(|ring| {
                let polygon = Polygon::new(LineString::from(ring.points.clone()), vec![]);
                let rect = polygon.bounding_rect()?;
                Some((polygon, rect))
            })
            .collect();

        Self { polygons }
    }

    pub fn from_set(set: &LandMassSet) -> Self {
        Self::from_rings(set.rings())
    }

    /// Load a land-mask GeoJSON file
    pub fn load(path: &Path) -> Result<Self> {
        let rings = read_land_mask(path)?;
        Ok(Self::from_rings(&rings))
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn is_land(&self, lon: f64, lat: f64) -> bool {
        let point = Point::new(lon, lat);
        self.polygons
            .iter()
            .any(|(polygon, rect)| point.intersects(rect) && point.intersects(polygon))
    }

    /// Keep only the (lon, lat) points that fall on land
    pub fn filter_land(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .copied()
            .filter(|&(lon, lat)| self.is_land(lon, lat))
            .collect()
    }
}
