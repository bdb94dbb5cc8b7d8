//! correct_events: read the raw trigger table of one recording block,
//! repair and validate it, and write the corrected stream, the labelled
//! trials and a JSON report.
//!
//! Output keys (safetensors):
//!   events     [N, 3]  I64  corrected (timestamp, trigger, code)
//!   trials     [T, 4]  I64  (timestamp, label, condition, block)
//!   n_trials   [1]     I32
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use innerspeech::{
    io::{read_event_csv, read_event_table, write_corrected, write_trials_csv},
    process_block, select_trials, Class, Condition, ConditionOverride, CorrectionConfig,
    Selection,
};

#[derive(Parser, Debug)]
#[command(name = "correct_events", about = "Inner-speech event correction and labelling")]
struct Args {
    /// Raw events: .safetensors with an `events` tensor, or .csv
    #[arg(long)]
    input: PathBuf,

    /// Corrected events + trials (.safetensors)
    #[arg(long)]
    output: PathBuf,

    /// JSON report path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Trial table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Subject number
    #[arg(long)]
    subject: u32,

    /// Session / block number
    #[arg(long)]
    block: u32,

    /// Acquisition sampling rate in Hz
    #[arg(long, default_value_t = 1024.0)]
    sfreq: f64,

    /// Skip the baseline-end tag check
    #[arg(long)]
    no_baseline_check: bool,

    /// Skip the per-condition class balance check
    #[arg(long)]
    no_condition_check: bool,

    /// Apply the documented per-subject condition overrides
    #[arg(long)]
    adhoc: bool,

    /// Conditions kept in the CSV trial table (e.g. "all", "inner", "pron")
    #[arg(long, default_value = "all")]
    condition: String,

    /// Classes kept in the CSV trial table (e.g. "all", "up", "izquierda")
    #[arg(long, default_value = "all")]
    class: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let condition: Selection<Condition> = args.condition.parse()?;
    let class: Selection<Class> = args.class.parse()?;

    let is_csv = args.input.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let table = if is_csv {
        read_event_csv(&args.input)?
    } else {
        read_event_table(&args.input)?
    };
    info!(rows = table.nrows(), cols = table.ncols(), input = %args.input.display(), "loaded events");

    let cfg = CorrectionConfig {
        sfreq: args.sfreq,
        check_baseline: !args.no_baseline_check,
        check_condition_balance: !args.no_condition_check,
        overrides: if args.adhoc { ConditionOverride::known() } else { vec![] },
        ..CorrectionConfig::default()
    };

    let out = match process_block(&table, args.subject, args.block, &cfg) {
        Ok(out) => out,
        Err(e) => {
            error!(subject = args.subject, block = args.block, "{e}");
            return Err(e).context("event correction failed");
        }
    };
    info!(
        corrections = out.repaired.inserted.len(),
        trials = out.trials.len(),
        correct = out.score.correct,
        wrong = out.score.wrong,
        "block processed"
    );

    write_corrected(&out.repaired.stream, &out.trials, &args.output)?;
    info!(output = %args.output.display(), "written");

    if let Some(path) = &args.csv {
        let picked = select_trials(&out.trials, condition, class);
        write_trials_csv(&picked, path)?;
        info!(path = %path.display(), trials = picked.len(), "trial table written");
    }

    if let Some(path) = &args.report {
        out.report.write_json(path)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
