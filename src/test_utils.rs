//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Temp-file-backed store setup
//! - Mock data factories
//! - Helper assertions

use chrono::{Days, NaiveDate};
use tempfile::TempDir;

use crate::models::{NewEntry, WorkoutEntry, WorkoutSet};
use crate::store::WorkoutLog;

/// ---------------------------------------------------------------------------
/// Store Test Utilities
/// ---------------------------------------------------------------------------

/// Create a log backed by a file in a fresh temp directory.
/// Keep the returned TempDir alive for the duration of the test; dropping
/// it deletes the backing file.
pub fn setup_test_log() -> (TempDir, WorkoutLog) {
  let dir = tempfile::tempdir().expect("create temp dir");
  let log = WorkoutLog::open(dir.path().join("workouts.csv")).expect("open log");
  (dir, log)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Fixed base date so factory output is deterministic
fn base_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2025, 3, 2).expect("valid date")
}

/// Create a mock submission; `session` staggers the date so successive
/// calls read as successive training days.
pub fn mock_new_entry(split: &str, exercise: &str, session: u32) -> NewEntry {
  NewEntry {
    date: base_date() + Days::new(u64::from(session)),
    split: split.to_string(),
    exercise: exercise.to_string(),
    sets: vec![
      WorkoutSet::new(60.0, 10),
      WorkoutSet::new(60.0, 8),
      WorkoutSet::new(55.0, 8),
    ],
    rest_seconds: 90.0,
  }
}

/// Create a persisted entry without going through a store
pub fn mock_entry(id: u64, split: &str, exercise: &str, session: u32) -> WorkoutEntry {
  WorkoutEntry::from_new(id, mock_new_entry(split, exercise, session)).expect("valid mock entry")
}

/// Create an entry whose progress score lands on `score`.
///
/// Uses one 10-rep set with no between-set rest, so
/// score = 0.5 * (10 * w) + 0.2 * w = 5.2 * w.
pub fn entry_with_score(
  id: u64,
  split: &str,
  exercise: &str,
  session: u32,
  score: f64,
) -> WorkoutEntry {
  let mut new = mock_new_entry(split, exercise, session);
  new.sets = vec![WorkoutSet::new(score / 5.2, 10)];
  WorkoutEntry::from_new(id, new).expect("valid mock entry")
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;

  #[test]
  fn test_setup_creates_empty_log() {
    let (_dir, log) = setup_test_log();
    assert!(log.entries().is_empty());
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let new = mock_new_entry("Push Day", "Bench Press", 1);
    assert!(new.validate().is_ok());
    assert_eq!(new.sets.len(), 3);

    let entry = mock_entry(1, "Push Day", "Bench Press", 1);
    assert_eq!(entry.id, 1);
    assert_eq!(entry.metrics.total_reps, 26);
  }

  #[test]
  fn test_sessions_stagger_dates() {
    let a = mock_new_entry("Push Day", "Bench Press", 1);
    let b = mock_new_entry("Push Day", "Bench Press", 3);
    assert!(a.date < b.date);
  }

  #[test]
  fn test_entry_with_score_hits_target() {
    let entry = entry_with_score(1, "Push Day", "Bench Press", 1, 312.0);
    assert_approx_eq!(entry.metrics.progress_score, 312.0, 1e-9);
  }
}
