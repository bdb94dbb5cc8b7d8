//! Replacement events for detected omissions.
use crate::codes::correction_offset;
use crate::stream::{Event, EventStream};
use super::scan::Anomaly;

/// Build the event that fills `anomaly`.
///
/// The new event is anchored on the event *before* the gap:
/// `timestamp = stream[position].timestamp + offset(missing_code)`,
/// `trigger_raw = 0`, `code = missing_code`.
///
/// # Panics
///
/// If `anomaly.position` is out of bounds for `stream`.  Anomalies produced
/// by [`scan`](super::scan::scan) on the same stream are always in bounds.
pub fn synthesize(stream: &EventStream, anomaly: &Anomaly) -> Event {
    let anchor = stream[anomaly.position].timestamp;
    let at = anchor.saturating_add(correction_offset(anomaly.missing_code));
    Event::synthetic(at, anomaly.missing_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomaly(position: usize, missing_code: i32) -> Anomaly {
        Anomaly { position, current_code: 0, next_code: 0, missing_code }
    }

    #[test]
    fn start_mark_offset() {
        let s = EventStream::from_events(vec![Event::new(1000, 7, 46)]);
        let e = synthesize(&s, &anomaly(0, 42));
        assert_eq!(e, Event::new(2945, 0, 42));
    }

    #[test]
    fn tag_offset_applies_to_every_tag() {
        let s = EventStream::from_events(vec![Event::new(0, 0, 21), Event::new(400, 0, 42)]);
        for tag in [31, 32, 33, 34] {
            assert_eq!(synthesize(&s, &anomaly(1, tag)), Event::new(963, 0, tag));
        }
    }

    #[test]
    fn anchor_is_not_mutated() {
        let s = EventStream::from_events(vec![Event::new(500, 3, 44), Event::new(700, 3, 46)]);
        let before = s.clone();
        let e = synthesize(&s, &anomaly(0, 45));
        assert_eq!(e.timestamp, 1575);
        assert_eq!(s, before);
    }
}
