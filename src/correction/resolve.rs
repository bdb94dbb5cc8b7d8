//! Which class tag is missing?
//!
//! Every condition presents each of the four classes equally often, so the
//! tag seen least often is taken to be the one that was dropped.
use crate::codes::TAGS;
use crate::stream::EventCountTable;

/// Tag code with the smallest count; ties go to the lowest code.
///
/// Tags absent from `counts` count as zero.
pub fn resolve_missing_tag(counts: &EventCountTable) -> i32 {
    let tag_counts = counts.group(TAGS);
    let mut best = 0;
    for (i, &n) in tag_counts.iter().enumerate() {
        if n < tag_counts[best] {
            best = i;
        }
    }
    TAGS[best]
}
