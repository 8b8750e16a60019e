/// Planar shoelace area of a closed ring
///
/// Coordinates are treated as plain (x, y) pairs, so for (lon, lat) input the
/// result is in squared degrees. This is only meaningful for small regions at
/// a roughly constant latitude; it is not a geodesic area.
///
/// The ring must be closed (first point equals last). Returns 0.0 for fewer
/// than 3 points.
///
/// Points are taken relative to the first vertex so the cross products stay
/// small; absolute lon/lat products cancel and lose precision on small rings.
pub fn ring_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let (ox, oy) = points[0];
    let twice_signed: f64 = points
        .windows(2)
        .map(|w| {
            let (x0, y0) = (w[0].0 - ox, w[0].1 - oy);
            let (x1, y1) = (w[1].0 - ox, w[1].1 - oy);
            x0 * y1 - x1 * y0
        })
        .sum();

    twice_signed.abs() / 2.0
}
