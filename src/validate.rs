//! Global structural invariants of a corrected stream.
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. start codes 11..=14 occur exactly once each
//! 2. `count(15) == count(16) == count(51) + 1`
//! 3. tags 31..=34 have equal counts
//! 4. marks 42/44/45/46 have equal counts
//! 5. `count(17) == Σ count(61..=64)`
//!
//! Validation reads a count table only, so it is idempotent.
use tracing::info;

use crate::codes::*;
use crate::error::EventError;
use crate::stream::EventCountTable;

pub fn validate_structure(counts: &EventCountTable) -> Result<(), EventError> {
    check_starts(counts)?;
    check_blocks(counts)?;
    check_tags(counts)?;
    check_marks(counts)?;
    check_cognitive_control(counts)?;
    Ok(())
}

pub fn check_starts(counts: &EventCountTable) -> Result<(), EventError> {
    let counts = counts.group(STARTS);
    if counts.iter().any(|&n| n != 1) {
        return Err(EventError::MissingStartMarkers { counts });
    }
    info!("start codes OK");
    Ok(())
}

pub fn check_blocks(counts: &EventCountTable) -> Result<(), EventError> {
    let begin = counts.get(BLOCK_BEGIN);
    let end   = counts.get(BLOCK_END);
    let rest  = counts.get(BLOCK_REST);
    if begin != end || begin != rest + 1 {
        return Err(EventError::MissingBlockMarkers { begin, end, rest });
    }
    info!("blocks OK");
    Ok(())
}

pub fn check_tags(counts: &EventCountTable) -> Result<(), EventError> {
    let counts = counts.group(TAGS);
    if !all_equal(&counts) {
        return Err(EventError::MissingTags { counts });
    }
    info!("tags OK");
    Ok(())
}

pub fn check_marks(counts: &EventCountTable) -> Result<(), EventError> {
    let counts = counts.group(MARKS);
    if !all_equal(&counts) {
        return Err(EventError::MissingMarks { counts });
    }
    info!("marks OK");
    Ok(())
}

pub fn check_cognitive_control(counts: &EventCountTable) -> Result<(), EventError> {
    let questions = counts.get(QUESTION);
    let answers   = counts.sum(&ANSWERS);
    if questions != answers {
        return Err(EventError::MissingCognitiveControl { questions, answers });
    }
    info!("cognitive control OK");
    Ok(())
}

fn all_equal(xs: &[usize]) -> bool {
    xs.windows(2).all(|w| w[0] == w[1])
}
