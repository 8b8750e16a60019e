use crate::geometry::ring_area;

/// Where a ring in the land mask came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSource {
    /// Reconstructed from coastline segments
    Coastline,
    /// The hand-traced mainland outline
    Mainland,
}

impl RingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RingSource::Coastline => "coastline",
            RingSource::Mainland => "mainland",
        }
    }
}

/// A closed polygon boundary: first point equals last, at least 4 points
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Points as (lon, lat) pairs in WGS84
    pub points: Vec<(f64, f64)>,
    /// True when the ring was closed by appending its first point
    pub force_closed: bool,
}

impl Ring {
    pub fn new(points: Vec<(f64, f64)>, force_closed: bool) -> Self {
        Self {
            points,
            force_closed,
        }
    }

    /// Build a ring from an outline that may or may not repeat its first point
    ///
    /// Returns `None` when the outline has fewer than 3 distinct vertices.
    pub fn from_outline(mut points: Vec<(f64, f64)>) -> Option<Self> {
        let first = *points.first()?;
        if points.last() != Some(&first) {
            points.push(first);
        }
        if distinct_vertices(&points[..points.len() - 1]) < 3 {
            return None;
        }
        Some(Self::new(points, false))
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    pub fn is_valid(&self) -> bool {
        self.points.len() >= 4 && self.is_closed()
    }

    pub fn area(&self) -> f64 {
        ring_area(&self.points)
    }
}

fn distinct_vertices(points: &[(f64, f64)]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    sorted.dedup();
    sorted.len()
}

/// A ring paired with its shoelace area
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRing {
    pub ring: Ring,
    pub area: f64,
}

impl ScoredRing {
    pub fn new(ring: Ring) -> Self {
        let area = ring.area();
        Self { ring, area }
    }
}
