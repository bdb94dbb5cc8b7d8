//! Baseline-end tag check.
//!
//! A recording opens with `11, 12, 13, 14`; 13 and 14 bracket the resting
//! baseline.  The trigger box occasionally drops the 14, in which case it is
//! re-inserted one baseline duration after the 13.
use tracing::info;

use crate::codes::{BASELINE_END, BASELINE_START};
use crate::error::EventError;
use crate::stream::{Event, EventStream};

/// Ensure the fourth event is the baseline-end tag.
///
/// Returns the (possibly) corrected stream and whether a tag was inserted.
/// `baseline_samples` is the baseline duration in acquisition samples.
/// A missing 14 is anchored on the third event, which must then be the
/// baseline start (13).
pub fn check_baseline_tags(
    stream: EventStream,
    baseline_samples: u64,
) -> Result<(EventStream, bool), EventError> {
    if stream.len() < 4 {
        return Err(EventError::MalformedInput(format!(
            "need at least 4 events to check baseline tags, got {}",
            stream.len()
        )));
    }
    if stream[3].code == BASELINE_END {
        return Ok((stream, false));
    }

    if stream[2].code != BASELINE_START {
        return Err(EventError::MalformedInput(format!(
            "baseline end missing and event 2 is code {}, not the baseline start",
            stream[2].code
        )));
    }

    let at = stream[2].timestamp.saturating_add(baseline_samples);
    info!(timestamp = at, "adding missing baseline end tag");
    Ok((stream.with_inserted([Event::synthetic(at, BASELINE_END)]), true))
}
