use log::{info, warn};

use crate::coastline::{BuildReport, RingBuilder, rank_significant};
use crate::config::{FilterConfig, StitchConfig};
use crate::domain::{Ring, Segment};
use crate::mask::{LandMassSet, merge_land_mask};

/// Everything the offline build produced for one batch of segments
#[derive(Debug)]
pub struct LandMaskBuild {
    pub land_mask: LandMassSet,
    pub report: BuildReport,
    /// Rings that closed before the area filter ran
    pub candidate_rings: usize,
}

/// Stitch, score, rank and merge one batch of coastline segments
///
/// # Algorithm
/// 1. Stitch segments into closed rings (force-close or discard leftovers)
/// 2. Drop rings under the area threshold, keep the largest `max_rings`
/// 3. Append the hand-traced mainland outline
pub fn build_land_mask(
    segments: &[Segment],
    mainland: Ring,
    stitch: StitchConfig,
    filter: &FilterConfig,
) -> LandMaskBuild {
    let (rings, report) = RingBuilder::new(segments, stitch).build();
    let candidate_rings = rings.len();

    info!(
        "Stitched {} segments into {} rings ({} closed, {} force-closed, {} discarded)",
        report.segments,
        report.rings(),
        report.closed,
        report.force_closed,
        report.discarded
    );
    if report.overruns > 0 {
        warn!(
            "{} ring(s) hit the {}-step iteration cap; input topology looks pathological",
            report.overruns, stitch.max_iterations
        );
    }

    let significant = rank_significant(rings, filter);
    if significant.is_empty() {
        warn!("No significant coastline rings; land mask holds only the mainland outline");
    } else {
        info!(
            "Kept {} of {} rings (largest area {:.6})",
            significant.len(),
            candidate_rings,
            significant[0].area
        );
    }

    LandMaskBuild {
        land_mask: merge_land_mask(significant, mainland),
        report,
        candidate_rings,
    }
}
