//! Per-block processing report.
use std::path::Path;

use anyhow::{Context, Result};

/// Summary of one processed subject / block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReport {
    pub subject:           String,
    pub block:             u32,
    /// `round(last timestamp / sfreq)`, in seconds.
    pub recording_time_s:  u64,
    /// Correct attention-check answers.
    pub ans_r:             usize,
    /// Wrong attention-check answers, skipped questions included.
    pub ans_w:             usize,
    pub skipped_questions: usize,
    /// Events synthesized by the repair pass.
    pub n_corrections:     usize,
    pub baseline_inserted: bool,
    /// Events in the corrected stream.
    pub n_events:          usize,
    pub n_trials:          usize,
}

impl BlockReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "subject":           self.subject,
            "block":             self.block,
            "recording_time_s":  self.recording_time_s,
            "ans_r":             self.ans_r,
            "ans_w":             self.ans_w,
            "skipped_questions": self.skipped_questions,
            "n_corrections":     self.n_corrections,
            "baseline_inserted": self.baseline_inserted,
            "n_events":          self.n_events,
            "n_trials":          self.n_trials,
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.to_json())?;
        std::fs::write(path, bytes)
            .with_context(|| format!("writing report {}", path.display()))
    }
}

/// Recording duration in whole seconds.
pub fn recording_time_s(last_timestamp: u64, sfreq: f64) -> u64 {
    if sfreq <= 0.0 {
        return 0;
    }
    (last_timestamp as f64 / sfreq).round() as u64
}
