/// One coastline way: an open, directional polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// OSM way id, or the position in the input for plain way lists
    pub id: u64,
    /// Points as (lon, lat) pairs in WGS84
    pub points: Vec<(f64, f64)>,
}

impl Segment {
    pub fn new(id: u64, points: Vec<(f64, f64)>) -> Self {
        Self { id, points }
    }

    /// A segment needs at least two points to take part in stitching
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }
}
