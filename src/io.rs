//! Event-table I/O.
//!
//! Reader: raw trigger tables as written by the event-extraction step,
//! either as a safetensors file with an `events` tensor (`I32` or `I64`,
//! shape `[N, ≥3]`) or as a CSV file with a header row.
//!
//! Writer: a small safetensors builder for corrected streams and trial
//! labels, plus a CSV writer for the trial table.
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

use crate::annotate::TrialEvent;
use crate::error::EventError;
use crate::stream::{timestamp_to_i64, EventStream};

// ── Low-level safetensors parser (raw bytes → ndarray) ────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into()?) as usize;
    if bytes.len() < 8 + n {
        bail!("safetensors header truncated ({} bytes declared)", n);
    }
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n])
            .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no shape")?
        .iter()
        .map(|v| v.as_u64().map(|x| x as usize).context("non-integer shape"))
        .collect()
}

fn data_range(entry: &serde_json::Value, data_start: usize, len: usize) -> Result<(usize, usize)> {
    let offsets = entry["data_offsets"].as_array().context("tensor entry has no data_offsets")?;
    if offsets.len() != 2 {
        bail!("data_offsets must have two elements");
    }
    let s = offsets[0].as_u64().context("bad data offset")? as usize;
    let e = offsets[1].as_u64().context("bad data offset")? as usize;
    if s > e || data_start + e > len {
        bail!("tensor data [{s}, {e}) out of bounds");
    }
    Ok((data_start + s, data_start + e))
}

fn read_int_tensor(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<i64>> {
    let (s, e) = data_range(entry, data_start, bytes.len())?;
    let raw = &bytes[s..e];
    let dtype = entry["dtype"].as_str().context("tensor entry has no dtype")?;
    Ok(match dtype {
        "I32" => raw.chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64)
            .collect(),
        "I64" => raw.chunks_exact(8)
            .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        other => bail!("unsupported event dtype {other:?} (expected I32 or I64)"),
    })
}

// ── Readers ───────────────────────────────────────────────────────────────

/// Load the `events` tensor of a safetensors file as an `[N, C]` table.
pub fn read_event_table(path: &Path) -> Result<Array2<i64>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let entry = header.get("events").context("missing 'events' key")?;
    let shape = shape_of(entry)?;
    if shape.len() != 2 {
        bail!("'events' must be 2-D, got shape {shape:?}");
    }
    let values = read_int_tensor(&bytes, data_start, entry)?;
    Ok(Array2::from_shape_vec((shape[0], shape[1]), values)?)
}

/// Load a CSV event table (header row, integer cells).
///
/// Every column is kept; [`EventStream::from_table`] uses the first three.
pub fn read_event_csv(path: &Path) -> Result<Array2<i64>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let n_cols = reader.headers()?.len();

    let mut values = Vec::new();
    let mut n_rows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV row {i}"))?;
        if record.len() != n_cols {
            bail!("CSV row {i}: expected {n_cols} fields, got {}", record.len());
        }
        for field in record.iter() {
            let v: i64 = field.trim().parse()
                .with_context(|| format!("CSV row {i}: {field:?} is not an integer"))?;
            values.push(v);
        }
        n_rows += 1;
    }
    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

// ── Generic safetensors builder ───────────────────────────────────────────

/// Simple safetensors file writer for I32 and I64 tensors.
///
/// Usage:
/// ```rust,no_run
/// use innerspeech::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_i64("events", &[0, 0, 42, 613, 0, 31], &[2, 3]);
/// w.add_i32("n_trials", &[1], &[1]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    pub fn add_i64(&mut self, name: &str, data: &[i64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I64", shape.to_vec()));
    }

    pub fn add_i64_arr2(&mut self, name: &str, arr: &Array2<i64>) {
        let data: Vec<i64> = arr.iter().copied().collect();
        self.add_i64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

// ── Corrected output ──────────────────────────────────────────────────────

/// Write the corrected stream and its trial labels to one safetensors file.
///
/// Keys:
///   events     [N, 3]  I64  timestamp, trigger, code
///   trials     [T, 4]  I64  timestamp, label (0..3), condition (0..2), block
///   n_trials   [1]     I32
pub fn write_corrected(stream: &EventStream, trials: &[TrialEvent], path: &Path) -> Result<()> {
    let mut w = StWriter::new();
    w.add_i64_arr2("events", &stream.to_table()?);
    w.add_i64_arr2("trials", &trials_table(trials)?);
    w.add_i32("n_trials", &[trials.len() as i32], &[1]);
    w.write(path)
}

/// `[T, 4]` trial table: timestamp, label, condition, block.
pub fn trials_table(trials: &[TrialEvent]) -> Result<Array2<i64>, EventError> {
    let mut table = Array2::zeros((trials.len(), 4));
    for (mut row, t) in table.rows_mut().into_iter().zip(trials) {
        row[0] = timestamp_to_i64(t.timestamp)?;
        row[1] = i64::from(t.class.label());
        row[2] = t.condition.index() as i64;
        row[3] = i64::from(t.block);
    }
    Ok(table)
}

/// Write trials as CSV: `timestamp,label,condition,block`.
pub fn write_trials_csv(trials: &[TrialEvent], path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["timestamp", "label", "condition", "block"])?;
    for t in trials {
        w.write_record(&[
            t.timestamp.to_string(),
            t.class.label().to_string(),
            t.condition.index().to_string(),
            t.block.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
