//! Ring simplicity checks
//!
//! The point-in-land classifier assumes simple rings. Nothing upstream
//! guarantees that, so this module reports self-intersections:
//! - Non-adjacent edges that touch or cross
//! - Rings that are not closed or too short
//!
//! Offending rings are reported only, never repaired or dropped.

use geo::{BoundingRect, Coord, Intersects, Line, Rect};

use super::merge::LandMassSet;
use crate::domain::Ring;

/// Result of checking every ring in a land mask
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Total number of rings checked
    pub total: usize,
    /// Rings that are not closed or have fewer than 4 points
    pub malformed: usize,
    /// Rings with at least one self-intersection
    pub non_simple: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn has_issues(&self) -> bool {
        self.malformed > 0 || self.non_simple > 0
    }

    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("{} rings checked, all simple", self.total)
        } else {
            format!(
                "{} rings checked: {} malformed, {} self-intersecting",
                self.total, self.malformed, self.non_simple
            )
        }
    }
}

/// Count pairs of non-adjacent edges of a closed ring that intersect
///
/// Quadratic in the number of edges; bounding boxes are compared before the
/// exact test. Zero-length edges from repeated consecutive points are dropped
/// first, so a duplicated vertex alone is not a self-intersection.
pub fn self_intersections(points: &[(f64, f64)]) -> usize {
    let edges: Vec<Line<f64>> = points
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| Line::new(Coord::from(w[0]), Coord::from(w[1])))
        .collect();
    let n = edges.len();
    if n < 4 {
        return 0;
    }

    let boxes: Vec<Rect<f64>> = edges.iter().map(|line| line.bounding_rect()).collect();
    let mut count = 0;

    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share the closing point
            if i == 0 && j == n - 1 {
                continue;
            }
            if !boxes[i].intersects(&boxes[j]) {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                count += 1;
            }
        }
    }

    count
}

fn check_ring(ring: &Ring, label: &str, result: &mut ValidationResult) {
    result.total += 1;

    if !ring.is_valid() {
        result.malformed += 1;
        result.warnings.push(format!(
            "{} is not a closed ring of at least 4 points ({} points)",
            label,
            ring.points.len()
        ));
        return;
    }

    let crossings = self_intersections(&ring.points);
    if crossings > 0 {
        result.non_simple += 1;
        result.warnings.push(format!(
            "{} has {} self-intersecting edge pair(s)",
            label, crossings
        ));
    }
}

/// Check every polygon of a land mask
pub fn validate_rings(set: &LandMassSet) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (i, polygon) in set.polygons.iter().enumerate() {
        let label = match polygon.rank {
            Some(rank) => format!("Coastline ring #{}", rank),
            None => format!("Polygon {} ({})", i, polygon.source.as_str()),
        };
        check_ring(&polygon.ring, &label, &mut result);
    }

    result
}
