//! Protocol grammar check over adjacent event pairs.
//!
//! Each code constrains what may follow it:
//!
//! | current      | acceptable next   | otherwise missing           |
//! |--------------|-------------------|-----------------------------|
//! | 42           | 31..=34           | a tag, only when next is 44 |
//! | 46           | 42, 16, 17        | 17 if next is an answer, else 42 |
//! | 21..=23      | 42                | 42                          |
//! | 61..=64      | 42, 16            | 42                          |
//! | 31..=34      | 44                | 44                          |
//! | 44           | 45                | 45                          |
//! | 45           | 46                | 46                          |
//! | 17           | 61..=64           | 61                          |
//!
//! Codes not listed place no constraint on their successor.
//!
//! The table assumes at most one omission per local window.  Two
//! consecutive missing markers are not recoverable here; the repaired
//! stream will still be anomalous and the second scan reports it.
use tracing::{debug, warn};

use crate::codes::*;
use crate::stream::{EventCountTable, EventStream};
use super::resolve::resolve_missing_tag;

/// A grammar violation between `stream[position]` and `stream[position + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anomaly {
    pub position:     usize,
    pub current_code: i32,
    pub next_code:    i32,
    pub missing_code: i32,
}

/// Code that should have appeared between `current` and `next`, if any.
///
/// `counts` is only consulted for the `42 → 44` branch, where one of the
/// four class tags is missing and the least frequent one is assumed.
pub fn missing_code(current: i32, next: i32, counts: &EventCountTable) -> Option<i32> {
    match current {
        MARK_START => {
            if is_tag(next) {
                None
            } else if next == MARK_USEFUL {
                Some(resolve_missing_tag(counts))
            } else {
                debug!(current, next, "unclassified transition after start mark");
                None
            }
        }
        MARK_REST => match next {
            MARK_START | BLOCK_END | QUESTION => None,
            n if is_answer(n) => Some(QUESTION),
            _ => Some(MARK_START),
        },
        c if is_block(c) => (next != MARK_START).then_some(MARK_START),
        c if is_answer(c) => (next != MARK_START && next != BLOCK_END).then_some(MARK_START),
        c if is_tag(c) => (next != MARK_USEFUL).then_some(MARK_USEFUL),
        MARK_USEFUL => (next != MARK_CONCENTRATION).then_some(MARK_CONCENTRATION),
        MARK_CONCENTRATION => (next != MARK_REST).then_some(MARK_REST),
        QUESTION => (!is_answer(next)).then_some(ANSWERS[0]),
        _ => None,
    }
}

/// Walk every adjacent pair once and collect anomalies in stream order.
///
/// `stream` must already be free of [`EXCLUDE`] rows.
pub fn scan(stream: &EventStream, counts: &EventCountTable) -> Vec<Anomaly> {
    let events = stream.events();
    let mut anomalies = Vec::new();
    for (position, pair) in events.windows(2).enumerate() {
        let (current_code, next_code) = (pair[0].code, pair[1].code);
        if let Some(missing_code) = missing_code(current_code, next_code, counts) {
            warn!(position, current_code, next_code, missing_code, "missing event code");
            anomalies.push(Anomaly { position, current_code, next_code, missing_code });
        }
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Event;

    fn stream_of(codes: &[i32]) -> EventStream {
        EventStream::from_events(
            codes.iter().enumerate()
                .map(|(i, &c)| Event::new(i as u64 * 100, 0, c))
                .collect(),
        )
    }

    fn missing(current: i32, next: i32) -> Option<i32> {
        missing_code(current, next, &EventCountTable::default())
    }

    #[test]
    fn clean_trial_has_no_anomalies() {
        let s = stream_of(&[21, 42, 31, 44, 45, 46, 17, 61, 42, 32, 44, 45, 46, 16]);
        assert!(scan(&s, &s.count_table()).is_empty());
    }

    #[test]
    fn rest_mark_rules() {
        assert_eq!(missing(46, 42), None);
        assert_eq!(missing(46, 16), None);
        assert_eq!(missing(46, 17), None);
        assert_eq!(missing(46, 63), Some(17));
        assert_eq!(missing(46, 31), Some(42));
    }

    #[test]
    fn block_and_answer_rules() {
        for b in BLOCKS {
            assert_eq!(missing(b, 42), None);
            assert_eq!(missing(b, 31), Some(42));
        }
        for a in ANSWERS {
            assert_eq!(missing(a, 42), None);
            assert_eq!(missing(a, 16), None);
            assert_eq!(missing(a, 33), Some(42));
        }
    }

    #[test]
    fn phase_mark_rules() {
        assert_eq!(missing(31, 44), None);
        assert_eq!(missing(31, 45), Some(44));
        assert_eq!(missing(44, 45), None);
        assert_eq!(missing(44, 46), Some(45));
        assert_eq!(missing(45, 46), None);
        assert_eq!(missing(45, 17), Some(46));
        assert_eq!(missing(17, 64), None);
        assert_eq!(missing(17, 42), Some(61));
    }

    #[test]
    fn start_mark_only_flags_missing_tag() {
        let counts = EventCountTable::from_codes([31, 32, 34]);
        assert_eq!(missing_code(42, 44, &counts), Some(33));
        assert_eq!(missing_code(42, 34, &counts), None);
        assert_eq!(missing_code(42, 45, &counts), None);
    }

    #[test]
    fn unconstrained_codes_never_flag() {
        for c in [11, 12, 13, 14, 15, 16, 51] {
            assert_eq!(missing(c, 99), None);
        }
    }

    #[test]
    fn anomaly_records_pair_and_position() {
        let s = stream_of(&[42, 31, 44, 46, 42]);
        let found = scan(&s, &s.count_table());
        assert_eq!(found, vec![Anomaly {
            position: 2,
            current_code: 44,
            next_code: 46,
            missing_code: 45,
        }]);
    }
}
