//! Flat-file store for workout entries
//!
//! One CSV file per deployment, read in full at open and rewritten in full
//! on every mutation. Single writer assumed; each user action completes
//! before the next begins.
//!
//! Older files written by earlier variants of the app (no id column, no
//! split, one uniform weight/reps pair per row) are migrated on load and
//! come out in the current schema on the next save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::metrics::SetMetrics;
use crate::models::{NewEntry, ValidationError, WorkoutEntry, WorkoutSet, DATE_FMT};

/// Current schema. Loading is header-driven, so column order only matters
/// for what `save` writes.
const HEADER: [&str; 13] = [
  "id",
  "date",
  "split",
  "exercise",
  "sets",
  "rest_seconds",
  "total_reps",
  "volume",
  "density",
  "avg_load_per_rep",
  "best_e1rm",
  "progress_score",
  "range_achieved",
];

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("JSON column error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("row {row}: {message}")]
  Row { row: usize, message: String },

  #[error(transparent)]
  Invalid(#[from] ValidationError),

  #[error("no entry with id {0}")]
  NotFound(u64),
}

fn bad_row(row: usize, message: impl Into<String>) -> StoreError {
  StoreError::Row {
    row,
    message: message.into(),
  }
}

/// ---------------------------------------------------------------------------
/// Schema detection
/// ---------------------------------------------------------------------------

/// Column indexes resolved from the header row. Older files miss some of
/// these; presence-of-column is the schema version signal.
struct ColumnMap {
  id: Option<usize>,
  date: Option<usize>,
  split: Option<usize>,
  exercise: Option<usize>,
  sets: Option<usize>,
  rest_seconds: Option<usize>,
  // Uniform-set layout from before per-set weights existed
  weight_kg: Option<usize>,
  reps: Option<usize>,
  num_sets: Option<usize>,
}

impl ColumnMap {
  fn from_headers(headers: &StringRecord) -> Self {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    Self {
      id: find("id"),
      date: find("date"),
      split: find("split"),
      exercise: find("exercise"),
      sets: find("sets"),
      rest_seconds: find("rest_seconds"),
      weight_kg: find("weight_kg"),
      reps: find("reps"),
      num_sets: find("num_sets"),
    }
  }

  fn is_current(&self) -> bool {
    self.id.is_some() && self.split.is_some() && self.sets.is_some()
  }

  /// Field lookup treating a missing column and an empty cell the same way
  fn field<'a>(&self, record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx
      .and_then(|i| record.get(i))
      .map(str::trim)
      .filter(|s| !s.is_empty())
  }
}

/// One parsed data row before id assignment
struct RawRow {
  id: Option<u64>,
  date: NaiveDate,
  split: String,
  exercise: String,
  sets: Vec<WorkoutSet>,
  rest_seconds: f64,
}

fn parse_row(columns: &ColumnMap, record: &StringRecord, row: usize) -> Result<RawRow, StoreError> {
  let id = match columns.field(record, columns.id) {
    Some(s) => Some(
      s.parse::<u64>()
        .map_err(|e| bad_row(row, format!("bad id '{}': {}", s, e)))?,
    ),
    None => None,
  };

  let date_str = columns
    .field(record, columns.date)
    .ok_or_else(|| bad_row(row, "missing date"))?;
  let date = NaiveDate::parse_from_str(date_str, DATE_FMT)
    .map_err(|e| bad_row(row, format!("bad date '{}': {}", date_str, e)))?;

  let split = columns
    .field(record, columns.split)
    .unwrap_or("")
    .to_string();
  let exercise = columns
    .field(record, columns.exercise)
    .ok_or_else(|| bad_row(row, "missing exercise"))?
    .to_string();

  let sets = match columns.field(record, columns.sets) {
    Some(json) => serde_json::from_str::<Vec<WorkoutSet>>(json)
      .map_err(|e| bad_row(row, format!("bad sets column: {}", e)))?,
    None => parse_uniform_sets(columns, record, row)?,
  };

  let rest_seconds = match columns.field(record, columns.rest_seconds) {
    Some(s) => s
      .parse::<f64>()
      .map_err(|e| bad_row(row, format!("bad rest_seconds '{}': {}", s, e)))?,
    None => 0.0,
  };

  Ok(RawRow {
    id,
    date,
    split,
    exercise,
    sets,
    rest_seconds,
  })
}

/// Expand the legacy single weight/reps pair into `num_sets` identical sets
fn parse_uniform_sets(
  columns: &ColumnMap,
  record: &StringRecord,
  row: usize,
) -> Result<Vec<WorkoutSet>, StoreError> {
  let weight_str = columns
    .field(record, columns.weight_kg)
    .ok_or_else(|| bad_row(row, "no sets column and no legacy weight_kg column"))?;
  let weight = weight_str
    .parse::<f64>()
    .map_err(|e| bad_row(row, format!("bad weight_kg '{}': {}", weight_str, e)))?;

  let reps_str = columns
    .field(record, columns.reps)
    .ok_or_else(|| bad_row(row, "legacy row missing reps column"))?;
  let reps = reps_str
    .parse::<u32>()
    .map_err(|e| bad_row(row, format!("bad reps '{}': {}", reps_str, e)))?;

  let count = match columns.field(record, columns.num_sets) {
    Some(s) => s
      .parse::<usize>()
      .map_err(|e| bad_row(row, format!("bad num_sets '{}': {}", s, e)))?,
    None => 1,
  };

  Ok(vec![WorkoutSet::new(weight, reps); count])
}

/// ---------------------------------------------------------------------------
/// Workout Log
/// ---------------------------------------------------------------------------

/// The persisted, insertion-ordered collection of workout entries.
/// Exclusive owner of its entries; all lookups and deletions go through it.
pub struct WorkoutLog {
  path: PathBuf,
  entries: Vec<WorkoutEntry>,
  next_id: u64,
}

impl WorkoutLog {
  /// Open a log backed by `path`. A missing or empty file is an empty
  /// collection, not an error.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let path = path.into();

    if !path.exists() {
      info!(path = %path.display(), "no log file yet, starting empty");
      return Ok(Self {
        path,
        entries: Vec::new(),
        next_id: 1,
      });
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut raw_rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
      let record = result?;
      // Header is line 1, data starts at line 2
      raw_rows.push(parse_row(&columns, &record, i + 2)?);
    }

    let migrated = !raw_rows.is_empty() && !columns.is_current();

    // Assign ids missing from older files, in file order, above any that
    // were already present. Derived metrics are recomputed from the sets
    // so stored copies can never drift from the engine.
    let mut next_id = raw_rows
      .iter()
      .filter_map(|r| r.id)
      .max()
      .map_or(1, |m| m + 1);
    let mut entries = Vec::with_capacity(raw_rows.len());
    for raw in raw_rows {
      let id = match raw.id {
        Some(id) => id,
        None => {
          let id = next_id;
          next_id += 1;
          id
        }
      };
      let metrics = SetMetrics::compute(&raw.sets, raw.rest_seconds);
      entries.push(WorkoutEntry {
        id,
        date: raw.date,
        split: raw.split,
        exercise: raw.exercise,
        sets: raw.sets,
        rest_seconds: raw.rest_seconds,
        metrics,
      });
    }

    if migrated {
      warn!(path = %path.display(), "loaded legacy schema, next save writes the current one");
    }
    info!(path = %path.display(), entries = entries.len(), "log loaded");

    Ok(Self {
      path,
      entries,
      next_id,
    })
  }

  /// Insertion-ordered view of the collection
  pub fn entries(&self) -> &[WorkoutEntry] {
    &self.entries
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Validate a submission, compute its metrics, assign the next surrogate
  /// id, and rewrite the file. Returns the id of the stored entry.
  pub fn append(&mut self, new: NewEntry) -> Result<u64, StoreError> {
    let entry = WorkoutEntry::from_new(self.next_id, new)?;
    let id = entry.id;
    self.next_id += 1;
    self.entries.push(entry);
    self.save()?;

    info!(id, "entry appended");
    Ok(id)
  }

  /// Remove exactly the entry with the given id. Field-identical duplicates
  /// have distinct ids, so deletion is never ambiguous.
  pub fn delete(&mut self, id: u64) -> Result<WorkoutEntry, StoreError> {
    let idx = self
      .entries
      .iter()
      .position(|e| e.id == id)
      .ok_or(StoreError::NotFound(id))?;
    let removed = self.entries.remove(idx);
    self.save()?;

    info!(id, exercise = %removed.exercise, "entry deleted");
    Ok(removed)
  }

  /// Remove every entry and truncate the file. Returns how many were removed.
  pub fn clear(&mut self) -> Result<usize, StoreError> {
    let removed = self.entries.len();
    self.entries.clear();
    self.save()?;

    info!(removed, "log cleared");
    Ok(removed)
  }

  /// Rewrite the whole file in the current schema
  fn save(&self) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }

    let mut writer = csv::Writer::from_path(&self.path)?;
    writer.write_record(HEADER)?;

    for entry in &self.entries {
      let m = &entry.metrics;
      writer.write_record([
        entry.id.to_string(),
        entry.date.format(DATE_FMT).to_string(),
        entry.split.clone(),
        entry.exercise.clone(),
        serde_json::to_string(&entry.sets)?,
        entry.rest_seconds.to_string(),
        m.total_reps.to_string(),
        m.volume.to_string(),
        m.density.to_string(),
        m.avg_load_per_rep.to_string(),
        m.best_e1rm.to_string(),
        m.progress_score.to_string(),
        serde_json::to_string(&m.range_achieved)?,
      ])?;
    }

    writer.flush()?;
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
