use crate::config::FilterConfig;
use crate::domain::{Ring, ScoredRing};

/// Score rings by shoelace area, drop noise, and keep the largest
///
/// Rings below `min_area` are dropped. The rest are sorted by descending
/// area (equal areas keep build order) and truncated to `max_rings`. In the
/// usual case the first ring is the mainland coast.
pub fn rank_significant(rings: Vec<Ring>, config: &FilterConfig) -> Vec<ScoredRing> {
    let mut scored: Vec<ScoredRing> = rings
        .into_iter()
        .map(ScoredRing::new)
        .filter(|r| r.area >= config.min_area)
        .collect();

    scored.sort_by(|a, b| b.area.total_cmp(&a.area));
    scored.truncate(config.max_rings);
    scored
}
