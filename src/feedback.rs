//! Session-over-session progress feedback
//!
//! Compares the latest entry for a (split, exercise) key against the
//! previous one and classifies the trend from the progress-score delta.
//!
//! Key principles:
//! - "Latest" means last-inserted, not last-by-date; the store appends in
//!   session order
//! - Fewer than two sessions is a normal status, not an error
//! - Pure function over the collection, no side effects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::WorkoutEntry;

/// Sessions required before a trend can be reported
const MIN_SESSIONS_FOR_TREND: usize = 2;

// ---------------------------------------------------------------------------
/// Trend Direction: where the progress score moved
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
  /// progress score delta > 0
  Improved,
  /// progress score delta < 0
  Declined,
  /// progress score delta == 0
  Unchanged,
}

impl TrendDirection {
  pub fn from_delta(delta: f64) -> Self {
    if delta > 0.0 {
      Self::Improved
    } else if delta < 0.0 {
      Self::Declined
    } else {
      Self::Unchanged
    }
  }
}

impl std::fmt::Display for TrendDirection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Improved => write!(f, "improved"),
      Self::Declined => write!(f, "declined"),
      Self::Unchanged => write!(f, "unchanged"),
    }
  }
}

// ---------------------------------------------------------------------------
/// Metric Delta: latest value plus movement since the previous session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
  pub latest: f64,
  pub delta: f64,
  /// Percent change; None when the previous value was zero
  pub pct: Option<f64>,
}

impl MetricDelta {
  pub fn between(previous: f64, latest: f64) -> Self {
    let delta = latest - previous;
    let pct = if previous != 0.0 {
      Some(delta / previous * 100.0)
    } else {
      None
    };
    Self { latest, delta, pct }
  }

  fn arrow(&self) -> char {
    if self.delta > 0.0 {
      '↑'
    } else if self.delta < 0.0 {
      '↓'
    } else {
      '→'
    }
  }
}

impl std::fmt::Display for MetricDelta {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.pct {
      Some(pct) => write!(
        f,
        "{:.2} ({:+.2}, {} {:.1}%)",
        self.latest,
        self.delta,
        self.arrow(),
        pct.abs()
      ),
      None => write!(f, "{:.2} ({:+.2})", self.latest, self.delta),
    }
  }
}

// ---------------------------------------------------------------------------
/// Progress Report: one key, latest two sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
  pub split: String,
  pub exercise: String,
  pub date: NaiveDate,
  pub previous_date: NaiveDate,
  pub volume: MetricDelta,
  pub density: MetricDelta,
  pub avg_load_per_rep: MetricDelta,
  pub best_e1rm: MetricDelta,
  pub progress_score: MetricDelta,
  /// Per-set compliance of the latest session; None where no range was set
  pub range_achieved: Vec<Option<bool>>,
  pub trend: TrendDirection,
}

impl ProgressReport {
  fn from_pair(previous: &WorkoutEntry, latest: &WorkoutEntry) -> Self {
    let progress_score =
      MetricDelta::between(previous.metrics.progress_score, latest.metrics.progress_score);

    Self {
      split: latest.split.clone(),
      exercise: latest.exercise.clone(),
      date: latest.date,
      previous_date: previous.date,
      volume: MetricDelta::between(previous.metrics.volume, latest.metrics.volume),
      density: MetricDelta::between(previous.metrics.density, latest.metrics.density),
      avg_load_per_rep: MetricDelta::between(
        previous.metrics.avg_load_per_rep,
        latest.metrics.avg_load_per_rep,
      ),
      best_e1rm: MetricDelta::between(previous.metrics.best_e1rm, latest.metrics.best_e1rm),
      trend: TrendDirection::from_delta(progress_score.delta),
      progress_score,
      range_achieved: latest.metrics.range_achieved.clone(),
    }
  }

  fn has_range_data(&self) -> bool {
    self.range_achieved.iter().any(Option::is_some)
  }
}

impl std::fmt::Display for ProgressReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(
      f,
      "[{}] {} - {} (prev: {})",
      self.split, self.exercise, self.date, self.previous_date
    )?;
    writeln!(f, "  volume: {}", self.volume)?;
    writeln!(f, "  density: {}", self.density)?;
    writeln!(f, "  avg load/rep: {}", self.avg_load_per_rep)?;
    writeln!(f, "  best e1RM: {}", self.best_e1rm)?;
    writeln!(f, "  progress score: {}", self.progress_score)?;
    if self.has_range_data() {
      let marks: Vec<&str> = self
        .range_achieved
        .iter()
        .map(|c| match c {
          Some(true) => "✅",
          Some(false) => "❌",
          None => "-",
        })
        .collect();
      writeln!(f, "  sets in range: {}", marks.join(" "))?;
    }
    write!(f, "  trend: {}", self.trend)
  }
}

// ---------------------------------------------------------------------------
/// Feedback: report or a normal insufficient-data status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Feedback {
  /// Fewer than two sessions logged for the key. Expected for any new
  /// exercise, so a status rather than an error.
  InsufficientData {
    split: String,
    exercise: String,
    sessions: usize,
  },
  Report(ProgressReport),
}

impl std::fmt::Display for Feedback {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InsufficientData {
        split,
        exercise,
        sessions,
      } => write!(
        f,
        "[{}] {} - {} session(s) logged, need {} for a trend",
        split, exercise, sessions, MIN_SESSIONS_FOR_TREND
      ),
      Self::Report(report) => write!(f, "{}", report),
    }
  }
}

/// Build feedback for one (split, exercise) key from the full
/// insertion-ordered collection.
pub fn progress_feedback(entries: &[WorkoutEntry], split: &str, exercise: &str) -> Feedback {
  let matching: Vec<&WorkoutEntry> = entries
    .iter()
    .filter(|e| e.split == split && e.exercise == exercise)
    .collect();

  if matching.len() < MIN_SESSIONS_FOR_TREND {
    return Feedback::InsufficientData {
      split: split.to_string(),
      exercise: exercise.to_string(),
      sessions: matching.len(),
    };
  }

  let latest = matching[matching.len() - 1];
  let previous = matching[matching.len() - 2];

  Feedback::Report(ProgressReport::from_pair(previous, latest))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
