//! # innerspeech: event-stream correction for the inner-speech EEG paradigm
//!
//! `innerspeech` turns the raw trigger table of one recording block into a
//! validated, corrected, labelled sequence of trial events.  The raw table
//! comes from the EEG reader (BDF/FIF parsing is not part of this crate);
//! the labelled trials go to the epoching stage.
//!
//! ## Pipeline overview
//!
//! ```text
//! raw events [N, ≥3] i64  (timestamp, trigger, code)
//!   │
//!   ├─ EventStream::from_table     sort by timestamp, reject malformed rows
//!   ├─ without_excluded()          drop hardware code 65536
//!   ├─ check_baseline_tags()       re-insert a missing 14 after the baseline
//!   ├─ scan()  (pass 1)            grammar check over adjacent codes
//!   ├─ synthesize() + repair()     insert replacements, stable re-sort
//!   ├─ scan()  (pass 2)            must be clean, else UnrepairedSequence
//!   ├─ validate_structure()        global count invariants
//!   ├─ score_cognitive_control()   attention-check tally
//!   ├─ check_condition_balance()   classes balanced within each condition
//!   └─ annotate_trials()           (timestamp, class, condition, block)
//!        │
//!        └─→ ProcessedBlock { stream, trials, score, report, … }
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use innerspeech::{process_block, CorrectionConfig};
//! use innerspeech::io::read_event_table;
//! use std::path::Path;
//!
//! let table = read_event_table(Path::new("sub-01_ses-01_events.safetensors")).unwrap();
//! let out = process_block(&table, 1, 1, &CorrectionConfig::default()).unwrap();
//! println!("{} corrections, {} trials", out.repaired.inserted.len(), out.trials.len());
//! ```
//!
//! ## Running individual steps
//!
//! ```
//! use innerspeech::{Event, EventStream};
//! use innerspeech::correction::{scan, repair};
//!
//! let stream = EventStream::from_events(vec![
//!     Event::new(0,    0, 42),
//!     Event::new(613,  0, 31),
//!     Event::new(3257, 0, 44),
//!     Event::new(5507, 0, 46),   // 45 is missing
//! ]);
//! let anomalies = scan(&stream, &stream.count_table());
//! assert_eq!(anomalies.len(), 1);
//! assert_eq!(anomalies[0].missing_code, 45);
//!
//! let fixed = repair(stream, &anomalies);
//! assert_eq!(fixed[3], Event::new(4332, 0, 45));
//! ```
//!
//! ## Known limitation
//!
//! The grammar assumes at most one missing marker per local window.  Two
//! consecutive omissions are detected (the second scan is not clean) but not
//! repaired.

pub mod annotate;
pub mod codes;
pub mod cognitive;
pub mod config;
pub mod correction;
pub mod error;
pub mod io;
pub mod labels;
pub mod report;
pub mod stream;
pub mod validate;

use ndarray::Array2;
use tracing::info;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::CorrectionConfig;

// errors
pub use error::EventError;

// stream model
pub use stream::{Event, EventCountTable, EventStream};

// correction engine
pub use correction::{
    check_baseline_tags, missing_code, repair, repair_and_confirm,
    resolve_missing_tag, scan, synthesize, Anomaly, Repaired,
};

// validation + scoring
pub use validate::validate_structure;
pub use cognitive::{score_cognitive_control, CognitiveScore};

// labelling
pub use annotate::{
    annotate_trials, check_condition_balance, count_tags_by_condition,
    select_trials, ConditionOverride, TrialEvent,
};
pub use labels::{normalize_name, subject_name, Class, Condition, Selection};

// report
pub use report::BlockReport;

/// Correct and certify one event stream.
///
/// Drops excluded codes, repairs single omissions, confirms the repair with
/// a second scan and checks the structural invariants.  This is the part of
/// [`process_block`] that every downstream consumer relies on.
pub fn correct_events(stream: &EventStream) -> Result<Repaired, EventError> {
    info!(n_events = stream.len(), "starting event correction");
    let repaired = repair_and_confirm(stream.without_excluded())?;
    validate_structure(&repaired.stream.count_table())?;
    info!(n_corrections = repaired.inserted.len(), "event correction completed");
    Ok(repaired)
}

/// Everything produced for one recording block.
#[derive(Debug, Clone)]
pub struct ProcessedBlock {
    /// Corrected stream and the corrections that produced it.
    pub repaired:          Repaired,
    pub baseline_inserted: bool,
    pub score:             CognitiveScore,
    /// Tag counts per condition (`[condition][class]`).
    pub condition_counts:  [[usize; 4]; 3],
    /// One entry per class tag.
    pub trials:            Vec<TrialEvent>,
    pub report:            BlockReport,
}

/// Run the **full event pipeline** on the raw trigger table of one block.
///
/// # Steps
///
/// 1. Parse `table` (`[N, ≥3]`: timestamp, trigger, code) and sort it.
/// 2. Drop the excluded hardware code.
/// 3. If [`CorrectionConfig::check_baseline`], re-insert a missing
///    baseline-end tag.
/// 4. Scan, repair, re-scan, and validate ([`correct_events`]).
/// 5. Score the attention checks.
/// 6. If [`CorrectionConfig::check_condition_balance`], require balanced
///    classes within every condition.
/// 7. Label tag events with condition and `block`, then apply any
///    [`CorrectionConfig::overrides`] matching `subject` / `block`.
///
/// # Errors
///
/// Any [`EventError`]; the block should be skipped by the caller.
pub fn process_block(
    table: &Array2<i64>,
    subject: u32,
    block: u32,
    cfg: &CorrectionConfig,
) -> Result<ProcessedBlock, EventError> {
    // 1–2. Parse and clean.
    let stream = EventStream::from_table(table)?.without_excluded();

    // 3. Baseline tags.
    let (stream, baseline_inserted) = if cfg.check_baseline {
        check_baseline_tags(stream, cfg.baseline_samples())?
    } else {
        (stream, false)
    };

    // 4. Repair + certify.
    let repaired = correct_events(&stream)?;

    // 5. Attention checks.
    let score = score_cognitive_control(&repaired.stream)?;

    // 6. Per-condition balance.
    let condition_counts = if cfg.check_condition_balance {
        check_condition_balance(&repaired.stream)?
    } else {
        count_tags_by_condition(&repaired.stream)
    };

    // 7. Labels.
    let mut trials = annotate_trials(&repaired.stream, block);
    for ov in cfg.overrides.iter().filter(|o| o.applies_to(subject, block)) {
        ov.apply(&mut trials)?;
    }

    let report = BlockReport {
        subject:           subject_name(subject),
        block,
        recording_time_s:  report::recording_time_s(
            repaired.stream.last_timestamp().unwrap_or(0),
            cfg.sfreq,
        ),
        ans_r:             score.correct,
        ans_w:             score.wrong,
        skipped_questions: score.skipped,
        n_corrections:     repaired.inserted.len(),
        baseline_inserted,
        n_events:          repaired.stream.len(),
        n_trials:          trials.len(),
    };

    Ok(ProcessedBlock { repaired, baseline_inserted, score, condition_counts, trials, report })
}
