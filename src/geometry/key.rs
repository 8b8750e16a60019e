/// Coordinate quantized to a fixed number of decimal digits
///
/// Two coordinates that round to the same digits produce equal keys, which
/// is what endpoint matching relies on. Raw `f64` values are never compared
/// for equality directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    x: i64,
    y: i64,
}

impl CoordinateKey {
    /// Quantize a (lon, lat) point to `precision` decimal digits
    pub fn new(point: (f64, f64), precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        Self {
            x: (point.0 * scale).round() as i64,
            y: (point.1 * scale).round() as i64,
        }
    }
}
