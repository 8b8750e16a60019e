use crate::domain::{Ring, RingSource, ScoredRing};

/// One polygon of the land mask
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPolygon {
    pub ring: Ring,
    pub source: RingSource,
    /// 1-based area rank among reconstructed rings; `None` for the mainland
    pub rank: Option<usize>,
    pub area: f64,
}

/// The final polygon collection
///
/// A point is land when it falls inside any polygon. Polygons may overlap;
/// nothing is unioned or healed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandMassSet {
    pub polygons: Vec<MaskPolygon>,
}

impl LandMassSet {
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().map(|p| &p.ring)
    }

    /// Number of polygons reconstructed from coastline segments
    pub fn coastline_count(&self) -> usize {
        self.polygons
            .iter()
            .filter(|p| p.source == RingSource::Coastline)
            .count()
    }
}

/// Append the hand-traced mainland outline to the ranked coastline rings
pub fn merge_land_mask(significant: Vec<ScoredRing>, mainland: Ring) -> LandMassSet {
    let mut polygons: Vec<MaskPolygon> = significant
        .into_iter()
        .enumerate()
        .map(|(i, scored)| MaskPolygon {
            ring: scored.ring,
            source: RingSource::Coastline,
            rank: Some(i + 1),
            area: scored.area,
        })
        .collect();

    let area = mainland.area();
    polygons.push(MaskPolygon {
        ring: mainland,
        source: RingSource::Mainland,
        rank: None,
        area,
    });

    LandMassSet { polygons }
}
