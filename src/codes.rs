//! Marker-code registry for the inner-speech recording protocol.
//!
//! Every trigger written by the stimulation software is one of the codes
//! below.  A single trial in the raw stream looks like
//!
//! ```text
//!   42  start mark
//!   31  class tag (31..=34)
//!   44  useful interval
//!   45  concentration interval
//!   46  rest interval
//!  [17  attention-check question
//!   61  answer (61..=64)]
//! ```
//!
//! and trials are wrapped by block markers (21..=23) and the block
//! boundaries 15 / 16 / 51.  The recording itself opens with the four
//! baseline start codes 11..=14.

// ── Session bounds ────────────────────────────────────────────────────────

/// Recording / baseline session bounds.  Each must occur exactly once.
pub const STARTS: [i32; 4] = [11, 12, 13, 14];
/// Baseline start.
pub const BASELINE_START: i32 = 13;
/// Baseline end.  Its position (row 3) is checked before scanning.
pub const BASELINE_END:   i32 = 14;

// ── Block boundaries ──────────────────────────────────────────────────────

/// Opens a run of trials.
pub const BLOCK_BEGIN: i32 = 15;
/// Closes a run of trials.
pub const BLOCK_END:   i32 = 16;
/// Rest period between two runs.
pub const BLOCK_REST:  i32 = 51;

// ── Condition blocks ──────────────────────────────────────────────────────

/// Condition-block markers (pronounced / inner / visualized).
pub const BLOCKS: [i32; 3] = [21, 22, 23];
pub const BLOCK_PRONOUNCED: i32 = 21;
pub const BLOCK_INNER:      i32 = 22;
pub const BLOCK_VISUALIZED: i32 = 23;

// ── Class tags ────────────────────────────────────────────────────────────

/// Class labels (up / down / right / left).
pub const TAGS: [i32; 4] = [31, 32, 33, 34];
pub const TAG_UP:    i32 = 31;
pub const TAG_DOWN:  i32 = 32;
pub const TAG_RIGHT: i32 = 33;
pub const TAG_LEFT:  i32 = 34;

// ── Trial phase marks ─────────────────────────────────────────────────────

/// Phase markers within a trial.
pub const MARKS: [i32; 4] = [42, 44, 45, 46];
pub const MARK_START:         i32 = 42;
pub const MARK_USEFUL:        i32 = 44;
pub const MARK_CONCENTRATION: i32 = 45;
pub const MARK_REST:          i32 = 46;

// ── Cognitive control ─────────────────────────────────────────────────────

/// Attention-check prompt.
pub const QUESTION: i32 = 17;
/// Attention-check answers.  The correct answer is always `tag + 30`.
pub const ANSWERS: [i32; 4] = [61, 62, 63, 64];
/// Distance between a class tag and its matching answer code.
pub const ANSWER_OFFSET: i32 = 30;

// ── Hardware noise ────────────────────────────────────────────────────────

/// Spurious code emitted by the trigger box; dropped before analysis.
pub const EXCLUDE: i32 = 65536;

// ── Correction offsets ────────────────────────────────────────────────────
//
// Expected inter-marker intervals in acquisition-clock samples (1024 Hz).
// A synthesized event is placed at `anchor.timestamp + offset(missing)`.
// Downstream epoching aligns on these exact values.

pub const OFFSET_START:         u64 = 1945;
pub const OFFSET_USEFUL:        u64 = 2594;
pub const OFFSET_CONCENTRATION: u64 = 1075;
pub const OFFSET_REST:          u64 = 1075;
pub const OFFSET_QUESTION:      u64 = 2092;
pub const OFFSET_ANSWER:        u64 = 2092;
pub const OFFSET_TAG:           u64 = 563;

#[inline]
pub fn is_block(code: i32) -> bool {
    BLOCKS.contains(&code)
}

#[inline]
pub fn is_tag(code: i32) -> bool {
    TAGS.contains(&code)
}

#[inline]
pub fn is_answer(code: i32) -> bool {
    ANSWERS.contains(&code)
}

/// Offset (in samples) from the anchor event to a synthesized `missing` code.
///
/// Codes without a dedicated interval fall back to the tag interval; the
/// scanner never asks for one.
pub fn correction_offset(missing: i32) -> u64 {
    match missing {
        MARK_START         => OFFSET_START,
        MARK_USEFUL        => OFFSET_USEFUL,
        MARK_CONCENTRATION => OFFSET_CONCENTRATION,
        MARK_REST          => OFFSET_REST,
        QUESTION           => OFFSET_QUESTION,
        61                 => OFFSET_ANSWER,
        _                  => OFFSET_TAG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_disjoint() {
        let all: Vec<i32> = STARTS.iter()
            .chain(BLOCKS.iter())
            .chain(TAGS.iter())
            .chain(MARKS.iter())
            .chain(ANSWERS.iter())
            .chain([QUESTION, EXCLUDE, BLOCK_BEGIN, BLOCK_END, BLOCK_REST].iter())
            .copied()
            .collect();
        let mut sorted = all.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len());
    }

    #[test]
    fn answers_are_tags_plus_thirty() {
        for (t, a) in TAGS.iter().zip(ANSWERS.iter()) {
            assert_eq!(t + ANSWER_OFFSET, *a);
        }
    }

    #[test]
    fn offsets_match_acquisition_intervals() {
        assert_eq!(correction_offset(42), 1945);
        assert_eq!(correction_offset(44), 2594);
        assert_eq!(correction_offset(45), 1075);
        assert_eq!(correction_offset(46), 1075);
        assert_eq!(correction_offset(17), 2092);
        assert_eq!(correction_offset(61), 2092);
        for t in TAGS {
            assert_eq!(correction_offset(t), 563);
        }
    }
}
