//! Event rows, ordered event streams and code counts.
//!
//! An [`EventStream`] is one subject × session recording worth of trigger
//! events, always sorted by timestamp.  Repairs never mutate an existing
//! [`Event`]; they build a new stream containing the old rows plus the
//! synthesized ones.
use std::collections::BTreeMap;

use ndarray::Array2;

use crate::codes::EXCLUDE;
use crate::error::EventError;

// ── Event ─────────────────────────────────────────────────────────────────

/// One trigger row: `(timestamp, trigger_raw, code)`.
///
/// `timestamp` is in acquisition-clock samples, not seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub timestamp:   u64,
    pub trigger_raw: i64,
    pub code:        i32,
}

impl Event {
    pub const fn new(timestamp: u64, trigger_raw: i64, code: i32) -> Self {
        Self { timestamp, trigger_raw, code }
    }

    /// A synthesized event: no physical trigger fired.
    pub const fn synthetic(timestamp: u64, code: i32) -> Self {
        Self { timestamp, trigger_raw: 0, code }
    }
}

// ── EventStream ───────────────────────────────────────────────────────────

/// Ordered sequence of events for one recording.
///
/// Invariant: timestamps are non-decreasing.  Every constructor enforces it
/// with a stable sort, so rows sharing a timestamp keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    events: Vec<Event>,
}

impl EventStream {
    /// Build a stream from arbitrary rows, stable-sorting by timestamp.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self { events }
    }

    /// Build a stream from a raw `[N, ≥3]` table (`timestamp, trigger, code, …`).
    ///
    /// Extra columns are ignored.  Codes equal to [`EXCLUDE`] are kept here;
    /// call [`EventStream::without_excluded`] to drop them.
    pub fn from_table(table: &Array2<i64>) -> Result<Self, EventError> {
        if table.ncols() < 3 {
            return Err(EventError::MalformedInput(format!(
                "event table must have at least 3 columns (time, trigger, code), got {}",
                table.ncols()
            )));
        }
        let mut events = Vec::with_capacity(table.nrows());
        for (i, row) in table.rows().into_iter().enumerate() {
            let timestamp = u64::try_from(row[0]).map_err(|_| {
                EventError::MalformedInput(format!("row {i}: negative timestamp {}", row[0]))
            })?;
            let code = i32::try_from(row[2]).map_err(|_| {
                EventError::MalformedInput(format!("row {i}: code {} out of range", row[2]))
            })?;
            events.push(Event::new(timestamp, row[1], code));
        }
        Ok(Self::from_events(events))
    }

    /// Copy of this stream with the spurious hardware code removed.
    pub fn without_excluded(&self) -> Self {
        let events = self.events.iter().copied().filter(|e| e.code != EXCLUDE).collect();
        Self { events }
    }

    /// Append `extra` rows and stable-sort the result by timestamp.
    ///
    /// Existing rows precede new rows that share their timestamp.
    pub fn with_inserted(self, extra: impl IntoIterator<Item = Event>) -> Self {
        let mut events = self.events;
        events.extend(extra);
        Self::from_events(events)
    }

    /// `[N, 3]` table in the same column order as the input.
    ///
    /// Fails if a timestamp (e.g. a synthesized one near the top of the
    /// range) does not fit in `i64`.
    pub fn to_table(&self) -> Result<Array2<i64>, EventError> {
        let mut table = Array2::zeros((self.events.len(), 3));
        for (mut row, e) in table.rows_mut().into_iter().zip(&self.events) {
            row[0] = timestamp_to_i64(e.timestamp)?;
            row[1] = e.trigger_raw;
            row[2] = i64::from(e.code);
        }
        Ok(table)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.events.iter().map(|e| e.code)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.events.last().map(|e| e.timestamp)
    }

    /// `true` when timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Fresh code counts for the current snapshot.
    pub fn count_table(&self) -> EventCountTable {
        EventCountTable::from_codes(self.codes())
    }
}

impl std::ops::Index<usize> for EventStream {
    type Output = Event;

    fn index(&self, i: usize) -> &Event {
        &self.events[i]
    }
}

/// Timestamp as stored in the signed output columns.
pub fn timestamp_to_i64(timestamp: u64) -> Result<i64, EventError> {
    i64::try_from(timestamp).map_err(|_| EventError::TimestampOverflow { timestamp })
}

// ── EventCountTable ───────────────────────────────────────────────────────

/// `code → occurrence count` for one stream snapshot.
///
/// Rebuilt from scratch after every repair; never updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCountTable {
    counts: BTreeMap<i32, usize>,
}

impl EventCountTable {
    pub fn from_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        let mut counts = BTreeMap::new();
        for code in codes {
            *counts.entry(code).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Occurrences of `code`; absent codes count as 0.
    pub fn get(&self, code: i32) -> usize {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    /// Counts of a fixed group, in group order.
    pub fn group<const N: usize>(&self, codes: [i32; N]) -> [usize; N] {
        codes.map(|c| self.get(c))
    }

    pub fn sum(&self, codes: &[i32]) -> usize {
        codes.iter().map(|&c| self.get(c)).sum()
    }

    /// `(code, count)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }
}
