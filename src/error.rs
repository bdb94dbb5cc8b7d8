//! Failure conditions of the event-correction engine.
//!
//! Every variant is fatal for the stream being processed.  Callers
//! (batch drivers, the CLI) log the variant and move on to the next
//! subject / block.
use crate::correction::Anomaly;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    /// The raw table is not usable (too few columns or rows, negative timestamps).
    #[error("malformed event table: {0}")]
    MalformedInput(String),

    /// Pass-2 scan still finds anomalies after one repair pass.
    #[error(
        "event stream still has {} anomalies after repair \
         (double omission or synthesis defect); first at position {}",
        .anomalies.len(),
        .anomalies.first().map(|a| a.position).unwrap_or_default()
    )]
    UnrepairedSequence { anomalies: Vec<Anomaly> },

    /// Codes 11..=14 must each occur exactly once.
    #[error("missing or duplicate start codes: counts [11, 12, 13, 14] = {counts:?}")]
    MissingStartMarkers { counts: [usize; 4] },

    /// `count(15) == count(16) == count(51) + 1` does not hold.
    #[error("missing or inconsistent blocks: count(15)={begin} count(16)={end} count(51)={rest}")]
    MissingBlockMarkers { begin: usize, end: usize, rest: usize },

    /// Tags 31..=34 have unequal counts.
    #[error("missing or inconsistent tags: counts [31, 32, 33, 34] = {counts:?}")]
    MissingTags { counts: [usize; 4] },

    /// Marks 42/44/45/46 have unequal counts.
    #[error("missing or inconsistent marks: counts [42, 44, 45, 46] = {counts:?}")]
    MissingMarks { counts: [usize; 4] },

    /// Question count differs from the total answer count.
    #[error("missing cognitive control pairs: {questions} questions, {answers} answers")]
    MissingCognitiveControl { questions: usize, answers: usize },

    /// Scorer tally disagrees with the number of questions in the stream.
    #[error("cognitive control tally mismatch: {correct} correct + {wrong} wrong != {questions} questions")]
    InvalidCognitiveControlTally { correct: usize, wrong: usize, questions: usize },

    /// Tags are not evenly distributed within a condition.
    #[error("tags unevenly distributed in {condition} condition: counts = {counts:?}")]
    UnbalancedConditionTags { condition: &'static str, counts: [usize; 4] },

    /// A manual condition relabelling did not yield the documented counts.
    #[error("condition override mismatch: expected per-condition trials {expected:?}, got {got:?}")]
    ConditionOverrideMismatch { expected: [usize; 3], got: [usize; 3] },

    /// A timestamp does not fit the signed 64-bit output column.
    #[error("timestamp {timestamp} exceeds the i64 range of the event table")]
    TimestampOverflow { timestamp: u64 },

    #[error("unknown condition name {0:?}")]
    UnknownCondition(String),

    #[error("unknown class name {0:?}")]
    UnknownClass(String),
}
