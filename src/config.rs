//! Block-processing configuration.
//!
//! [`CorrectionConfig`] holds every tunable parameter of
//! [`process_block`](crate::process_block).  All fields have defaults that
//! match the acquisition setup of the inner-speech dataset (BioSemi, 1024 Hz,
//! 15 s resting baseline).

use crate::annotate::ConditionOverride;

/// Configuration for correcting and labelling one recording block.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use innerspeech::CorrectionConfig;
///
/// let cfg = CorrectionConfig {
///     check_baseline: false,   // stream was already trimmed
///     ..CorrectionConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    /// Acquisition sampling rate in Hz.
    ///
    /// Timestamps are sample indices at this rate.  Used to place a missing
    /// baseline-end tag and to convert the last timestamp into a recording
    /// duration for the report.
    ///
    /// Default: `1024.0` Hz.
    pub sfreq: f64,

    /// Duration of the resting baseline between codes 13 and 14, in seconds.
    ///
    /// Default: `15.0` s.
    pub baseline_secs: f64,

    /// Verify (and repair) the baseline-end tag before scanning.
    ///
    /// Requires at least four events in the stream.
    ///
    /// Default: `true`.
    pub check_baseline: bool,

    /// Require every condition to present the four classes equally often.
    ///
    /// Default: `true`.
    pub check_condition_balance: bool,

    /// Manual relabelling applied to matching subject / block pairs after
    /// annotation.  See [`ConditionOverride::known`].
    ///
    /// Default: `[]`.
    pub overrides: Vec<ConditionOverride>,
}

impl Default for CorrectionConfig {
    /// 1024 Hz · 15 s baseline · all checks on · no overrides.
    fn default() -> Self {
        Self {
            sfreq: 1024.0,
            baseline_secs: 15.0,
            check_baseline: true,
            check_condition_balance: true,
            overrides: vec![],
        }
    }
}

impl CorrectionConfig {
    /// Baseline duration in samples: `round(baseline_secs × sfreq)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use innerspeech::CorrectionConfig;
    /// let cfg = CorrectionConfig::default();
    /// assert_eq!(cfg.baseline_samples(), 15360);
    /// ```
    pub fn baseline_samples(&self) -> u64 {
        (self.baseline_secs * self.sfreq).round().max(0.0) as u64
    }
}
