//! Core data model for logged workouts
//!
//! A submitted form becomes a `NewEntry`; validation plus the metrics
//! engine turn it into a `WorkoutEntry`, the record the store persists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::SetMetrics;

/// Date format used wherever an entry date is parsed or rendered
pub const DATE_FMT: &str = "%Y-%m-%d";

/// ---------------------------------------------------------------------------
/// Sets and target ranges
/// ---------------------------------------------------------------------------

/// Prescribed rep range for a set, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
  pub min_reps: u32,
  pub max_reps: u32,
}

impl RepRange {
  pub fn contains(&self, reps: u32) -> bool {
    self.min_reps <= reps && reps <= self.max_reps
  }
}

/// One performed set: load, achieved reps, optional prescribed range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
  pub weight_kg: f64,
  pub reps: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target: Option<RepRange>,
}

impl WorkoutSet {
  pub fn new(weight_kg: f64, reps: u32) -> Self {
    Self {
      weight_kg,
      reps,
      target: None,
    }
  }

  pub fn with_target(weight_kg: f64, reps: u32, min_reps: u32, max_reps: u32) -> Self {
    Self {
      weight_kg,
      reps,
      target: Some(RepRange { min_reps, max_reps }),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
  #[error("entry has no sets")]
  NoSets,

  #[error("entry has zero reps across all sets")]
  NoReps,

  #[error("set {0} has a negative or non-finite weight")]
  BadWeight(usize),

  #[error("rest time is negative or non-finite")]
  BadRest,

  #[error("set {set} has an inverted target range ({min}-{max})")]
  InvertedRange { set: usize, min: u32, max: u32 },
}

/// ---------------------------------------------------------------------------
/// New entry (form submission)
/// ---------------------------------------------------------------------------

/// What the form layer submits, before validation and metric computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
  pub date: NaiveDate,
  pub split: String,
  pub exercise: String,
  pub sets: Vec<WorkoutSet>,
  pub rest_seconds: f64,
}

impl NewEntry {
  /// Reject submissions the engine must never see: no sets, zero reps
  /// across all sets, negative or non-finite numbers, inverted ranges.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.sets.is_empty() {
      return Err(ValidationError::NoSets);
    }
    if self.sets.iter().map(|s| s.reps).sum::<u32>() == 0 {
      return Err(ValidationError::NoReps);
    }
    for (i, set) in self.sets.iter().enumerate() {
      if !set.weight_kg.is_finite() || set.weight_kg < 0.0 {
        return Err(ValidationError::BadWeight(i));
      }
      if let Some(range) = set.target {
        if range.min_reps > range.max_reps {
          return Err(ValidationError::InvertedRange {
            set: i,
            min: range.min_reps,
            max: range.max_reps,
          });
        }
      }
    }
    if !self.rest_seconds.is_finite() || self.rest_seconds < 0.0 {
      return Err(ValidationError::BadRest);
    }
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Persisted entry
/// ---------------------------------------------------------------------------

/// A logged workout entry. Created once on submission, never mutated,
/// removed only by explicit deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
  /// Surrogate key assigned by the store, independent of field values
  pub id: u64,
  pub date: NaiveDate,
  pub split: String,
  pub exercise: String,
  pub sets: Vec<WorkoutSet>,
  /// Rest between sets, constant across an entry
  pub rest_seconds: f64,
  /// Derived metrics, stored redundantly for display
  pub metrics: SetMetrics,
}

impl WorkoutEntry {
  /// Validate a submission and compute its derived metrics.
  /// The store picks the id.
  pub fn from_new(id: u64, new: NewEntry) -> Result<Self, ValidationError> {
    new.validate()?;
    let metrics = SetMetrics::compute(&new.sets, new.rest_seconds);
    Ok(Self {
      id,
      date: new.date,
      split: new.split,
      exercise: new.exercise,
      sets: new.sets,
      rest_seconds: new.rest_seconds,
      metrics,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_new_entry;

  #[test]
  fn test_valid_entry_passes() {
    let new = mock_new_entry("Push Day", "Bench Press", 1);
    assert!(new.validate().is_ok());
  }

  #[test]
  fn test_empty_sets_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets.clear();
    assert_eq!(new.validate(), Err(ValidationError::NoSets));
  }

  #[test]
  fn test_zero_reps_across_all_sets_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets = vec![WorkoutSet::new(80.0, 0), WorkoutSet::new(80.0, 0)];
    assert_eq!(new.validate(), Err(ValidationError::NoReps));
  }

  #[test]
  fn test_bodyweight_zero_kg_allowed() {
    let mut new = mock_new_entry("Pull Day", "Pull-up", 1);
    new.sets = vec![WorkoutSet::new(0.0, 10)];
    assert!(new.validate().is_ok());
  }

  #[test]
  fn test_negative_weight_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets[1].weight_kg = -5.0;
    assert_eq!(new.validate(), Err(ValidationError::BadWeight(1)));
  }

  #[test]
  fn test_nan_weight_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets[0].weight_kg = f64::NAN;
    assert_eq!(new.validate(), Err(ValidationError::BadWeight(0)));
  }

  #[test]
  fn test_negative_rest_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.rest_seconds = -1.0;
    assert_eq!(new.validate(), Err(ValidationError::BadRest));
  }

  #[test]
  fn test_inverted_target_range_rejected() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets[0].target = Some(RepRange {
      min_reps: 12,
      max_reps: 8,
    });
    assert_eq!(
      new.validate(),
      Err(ValidationError::InvertedRange {
        set: 0,
        min: 12,
        max: 8
      })
    );
  }

  #[test]
  fn test_from_new_computes_metrics() {
    let new = mock_new_entry("Push Day", "Bench Press", 1);
    let entry = WorkoutEntry::from_new(7, new).expect("valid entry");

    assert_eq!(entry.id, 7);
    assert_eq!(entry.metrics.total_reps, entry.sets.iter().map(|s| s.reps).sum::<u32>());
  }

  #[test]
  fn test_from_new_rejects_invalid() {
    let mut new = mock_new_entry("Push Day", "Bench Press", 1);
    new.sets.clear();
    assert!(WorkoutEntry::from_new(1, new).is_err());
  }

  #[test]
  fn test_rep_range_contains_is_inclusive() {
    let range = RepRange {
      min_reps: 8,
      max_reps: 12,
    };
    assert!(range.contains(8));
    assert!(range.contains(12));
    assert!(!range.contains(7));
    assert!(!range.contains(13));
  }
}
