//! Single-pass stream repair with a confirmation scan.
//!
//! All replacement events for pass-1 anomalies are appended at once and the
//! stream is stable-sorted by timestamp.  The result is scanned again with a
//! freshly built count table.  There is no second repair pass: anything the
//! confirmation scan still finds is a [`EventError::UnrepairedSequence`].
use tracing::info;

use crate::error::EventError;
use crate::stream::{Event, EventStream};
use super::scan::{scan, Anomaly};
use super::synthesize::synthesize;

/// Outcome of [`repair_and_confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    /// Corrected stream, sorted by timestamp.
    pub stream: EventStream,
    /// Pass-1 anomalies, in stream order.
    pub anomalies: Vec<Anomaly>,
    /// Events inserted for those anomalies, same order.
    pub inserted: Vec<Event>,
}

/// Insert one synthesized event per anomaly and re-sort.
///
/// With no anomalies the input is handed back untouched.
pub fn repair(stream: EventStream, anomalies: &[Anomaly]) -> EventStream {
    insert_corrections(stream, anomalies).0
}

/// Repaired stream plus the inserted events, in anomaly order.
fn insert_corrections(stream: EventStream, anomalies: &[Anomaly]) -> (EventStream, Vec<Event>) {
    if anomalies.is_empty() {
        return (stream, Vec::new());
    }
    let corrections: Vec<Event> = anomalies.iter().map(|a| synthesize(&stream, a)).collect();
    info!(n = corrections.len(), "applying event corrections");
    (stream.with_inserted(corrections.iter().copied()), corrections)
}

/// Scan, repair, and confirm that the repaired stream is anomaly-free.
///
/// `stream` must already be free of excluded codes.
pub fn repair_and_confirm(stream: EventStream) -> Result<Repaired, EventError> {
    let anomalies = scan(&stream, &stream.count_table());
    if anomalies.is_empty() {
        info!("no anomalies detected, no corrections needed");
        return Ok(Repaired { stream, anomalies, inserted: Vec::new() });
    }

    let (repaired, inserted) = insert_corrections(stream, &anomalies);

    let residual = scan(&repaired, &repaired.count_table());
    if !residual.is_empty() {
        return Err(EventError::UnrepairedSequence { anomalies: residual });
    }

    Ok(Repaired { stream: repaired, anomalies, inserted })
}
