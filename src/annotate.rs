//! Trial labelling for the epoching stage.
//!
//! A corrected stream is reduced to one [`TrialEvent`] per class tag, each
//! carrying the standardized class label, the condition of the enclosing
//! block and the session (block) number.  The trigger column is dropped.
use std::ops::Range;

use tracing::info;

use crate::error::EventError;
use crate::labels::{Class, Condition, Selection};
use crate::stream::EventStream;

/// One labelled trial onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialEvent {
    pub timestamp: u64,
    pub class:     Class,
    pub condition: Condition,
    /// Session number (1-based).
    pub block:     u32,
}

// ── Running condition ─────────────────────────────────────────────────────

/// Tracks the condition of the most recent block marker.
///
/// Starts at [`Condition::Pronounced`]; codes other than 21..=23 leave it
/// unchanged.
#[derive(Debug, Clone, Copy)]
struct ConditionTracker {
    current: Condition,
}

impl ConditionTracker {
    fn new() -> Self {
        Self { current: Condition::Pronounced }
    }

    fn observe(&mut self, code: i32) -> Condition {
        if let Some(c) = Condition::from_block_code(code) {
            self.current = c;
        }
        self.current
    }
}

/// Label every tag event in `stream` with its condition and `block`.
pub fn annotate_trials(stream: &EventStream, block: u32) -> Vec<TrialEvent> {
    let mut tracker = ConditionTracker::new();
    stream.events().iter()
        .filter_map(|e| {
            let condition = tracker.observe(e.code);
            Class::from_tag(e.code).map(|class| TrialEvent {
                timestamp: e.timestamp,
                class,
                condition,
                block,
            })
        })
        .collect()
}

/// Trials matching both selections, in order.
pub fn select_trials(
    trials: &[TrialEvent],
    condition: Selection<Condition>,
    class: Selection<Class>,
) -> Vec<TrialEvent> {
    trials.iter()
        .copied()
        .filter(|t| condition.matches(t.condition) && class.matches(t.class))
        .collect()
}

// ── Per-condition balance ─────────────────────────────────────────────────

/// Tag counts per condition: `counts[condition][class]`.
///
/// Tags seen before any block marker are not attributed to a condition.
pub fn count_tags_by_condition(stream: &EventStream) -> [[usize; 4]; 3] {
    let mut counts = [[0usize; 4]; 3];
    let mut current: Option<Condition> = None;
    for code in stream.codes() {
        if let Some(c) = Condition::from_block_code(code) {
            current = Some(c);
        }
        if let (Some(cond), Some(class)) = (current, Class::from_tag(code)) {
            counts[cond.index()][class as usize] += 1;
        }
    }
    counts
}

/// Every condition must present the four classes equally often.
pub fn check_condition_balance(stream: &EventStream) -> Result<[[usize; 4]; 3], EventError> {
    let counts = count_tags_by_condition(stream);
    for cond in Condition::ALL {
        let row = counts[cond.index()];
        if row.iter().any(|&n| n != row[0]) {
            return Err(EventError::UnbalancedConditionTags {
                condition: cond.name(),
                counts: row,
            });
        }
    }
    info!("tags are evenly distributed across conditions");
    Ok(counts)
}

// ── Ad-hoc condition overrides ────────────────────────────────────────────

/// Relabel a range of trials of one recording after the fact.
///
/// Used when a participant reports having performed a different paradigm
/// than the one cued for part of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOverride {
    pub subject:   u32,
    pub block:     u32,
    /// Trial indices (into the annotated trial list).
    pub trials:    Range<usize>,
    pub condition: Condition,
    /// Expected trials per condition afterwards, if known.
    pub expected:  Option<[usize; 3]>,
}

impl ConditionOverride {
    /// Overrides documented for the published dataset.
    ///
    /// Subject 3 performed the visualized paradigm for trials 80..120 of
    /// session 1 instead of the cued inner-speech one.
    pub fn known() -> Vec<ConditionOverride> {
        vec![ConditionOverride {
            subject:   3,
            block:     1,
            trials:    80..120,
            condition: Condition::Visualized,
            expected:  Some([40, 40, 120]),
        }]
    }

    pub fn applies_to(&self, subject: u32, block: u32) -> bool {
        self.subject == subject && self.block == block
    }

    /// Relabel `trials` in place and verify the resulting condition counts.
    pub fn apply(&self, trials: &mut [TrialEvent]) -> Result<(), EventError> {
        if self.trials.end > trials.len() {
            return Err(EventError::MalformedInput(format!(
                "condition override needs at least {} trials, got {}",
                self.trials.end,
                trials.len()
            )));
        }
        for t in &mut trials[self.trials.clone()] {
            t.condition = self.condition;
        }

        let got = condition_counts(trials);
        if let Some(expected) = self.expected {
            if got != expected {
                return Err(EventError::ConditionOverrideMismatch { expected, got });
            }
        }
        info!(
            subject = self.subject,
            block = self.block,
            relabelled = self.trials.len(),
            condition = %self.condition,
            "condition override applied"
        );
        Ok(())
    }
}

/// Trials per condition, indexed by [`Condition::index`].
pub fn condition_counts(trials: &[TrialEvent]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for t in trials {
        counts[t.condition.index()] += 1;
    }
    counts
}
