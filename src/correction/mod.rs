//! Event-stream correction: detect, synthesize, repair, confirm.
//!
//! - [`scan`]: one left-to-right pass over adjacent code pairs, yielding
//!   [`Anomaly`] values where the protocol grammar is violated.
//! - [`resolve`]: picks which class tag went missing.
//! - [`synthesize`]: builds the replacement event for one anomaly.
//! - [`repair`]: inserts all replacements, re-sorts, and re-scans once.
//! - [`baseline`]: fixes a missing baseline-end tag before scanning.
//!
//! ```text
//!   raw ─ strip 65536 ─ baseline ─ scan #1 ─ synthesize ─ insert+sort ─ scan #2
//!                                                                        │
//!                                          anomalies left? ─ UnrepairedSequence
//! ```

pub mod baseline;
pub mod repair;
pub mod resolve;
pub mod scan;
pub mod synthesize;

pub use baseline::check_baseline_tags;
pub use repair::{repair, repair_and_confirm, Repaired};
pub use resolve::resolve_missing_tag;
pub use scan::{missing_code, scan, Anomaly};
pub use synthesize::synthesize;
