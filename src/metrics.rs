//! Deterministic metrics layer for workout entries
//!
//! This module turns raw set data into derived training quantities.
//! Everything here is pure arithmetic: validation happens before a
//! submission reaches this module, persistence happens after.

use serde::{Deserialize, Serialize};

use crate::models::WorkoutSet;

/// ---------------------------------------------------------------------------
/// Score weights
/// ---------------------------------------------------------------------------

/// Fixed policy weights for the composite progress score. They sum to 1.0
/// but are otherwise a tuning choice, not derived from anything.
pub const VOLUME_WEIGHT: f64 = 0.5;
pub const DENSITY_WEIGHT: f64 = 0.3;
pub const AVG_LOAD_WEIGHT: f64 = 0.2;

/// Epley rep divisor for estimated one-rep max: weight * (1 + reps / 30)
const E1RM_REP_DIVISOR: f64 = 30.0;

/// ---------------------------------------------------------------------------
/// Derived metrics
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetMetrics {
  /// Total reps across all sets
  pub total_reps: u32,

  /// Total work: weight * reps summed across sets (kg)
  pub volume: f64,

  /// Volume per second of rest between sets; 0.0 for single-set entries
  pub density: f64,

  /// Volume per rep; 0.0 when no reps were recorded
  pub avg_load_per_rep: f64,

  /// Best estimated one-rep max across sets (Epley)
  pub best_e1rm: f64,

  /// Fixed-weight composite of volume, density, and average load
  pub progress_score: f64,

  /// Per-set range compliance; None where no target range was prescribed
  pub range_achieved: Vec<Option<bool>>,
}

impl SetMetrics {
  /// Compute all derived metrics for one entry.
  ///
  /// Assumes finite, non-negative input; `NewEntry::validate` enforces
  /// that contract before anything reaches this function.
  pub fn compute(sets: &[WorkoutSet], rest_seconds: f64) -> Self {
    let total_reps: u32 = sets.iter().map(|s| s.reps).sum();
    let volume: f64 = sets.iter().map(|s| s.weight_kg * s.reps as f64).sum();

    // No rest after the last set
    let total_rest = rest_seconds * sets.len().saturating_sub(1) as f64;
    let density = if total_rest > 0.0 {
      volume / total_rest
    } else {
      0.0
    };

    let avg_load_per_rep = if total_reps > 0 {
      volume / total_reps as f64
    } else {
      0.0
    };

    let best_e1rm = sets
      .iter()
      .map(|s| s.weight_kg * (1.0 + s.reps as f64 / E1RM_REP_DIVISOR))
      .fold(0.0, f64::max);

    let progress_score =
      VOLUME_WEIGHT * volume + DENSITY_WEIGHT * density + AVG_LOAD_WEIGHT * avg_load_per_rep;

    let range_achieved = sets
      .iter()
      .map(|s| s.target.map(|range| range.contains(s.reps)))
      .collect();

    Self {
      total_reps,
      volume,
      density,
      avg_load_per_rep,
      best_e1rm,
      progress_score,
      range_achieved,
    }
  }

  /// Whether any set carried a prescribed range
  pub fn has_range_data(&self) -> bool {
    self.range_achieved.iter().any(Option::is_some)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;

  #[test]
  fn test_single_set_worked_example() {
    // One set of 60kg x 10: volume 600, no between-set rest, avg load 60
    let sets = vec![WorkoutSet::new(60.0, 10)];
    let m = SetMetrics::compute(&sets, 90.0);

    assert_eq!(m.total_reps, 10);
    assert_approx_eq!(m.volume, 600.0, 1e-9);
    assert_eq!(m.density, 0.0);
    assert_approx_eq!(m.avg_load_per_rep, 60.0, 1e-9);
    assert_approx_eq!(m.progress_score, 312.0, 1e-9);
  }

  #[test]
  fn test_volume_sums_across_sets() {
    let sets = vec![
      WorkoutSet::new(60.0, 10),
      WorkoutSet::new(60.0, 8),
      WorkoutSet::new(55.0, 8),
    ];
    let m = SetMetrics::compute(&sets, 120.0);

    assert_eq!(m.total_reps, 26);
    assert_approx_eq!(m.volume, 600.0 + 480.0 + 440.0, 1e-9);
  }

  #[test]
  fn test_density_excludes_rest_after_last_set() {
    // Three sets, 120s rest: only two rest periods count
    let sets = vec![
      WorkoutSet::new(100.0, 5),
      WorkoutSet::new(100.0, 5),
      WorkoutSet::new(100.0, 5),
    ];
    let m = SetMetrics::compute(&sets, 120.0);

    assert_approx_eq!(m.density, 1500.0 / 240.0, 1e-9);
  }

  #[test]
  fn test_zero_rest_means_zero_density() {
    let sets = vec![WorkoutSet::new(100.0, 5), WorkoutSet::new(100.0, 5)];
    let m = SetMetrics::compute(&sets, 0.0);
    assert_eq!(m.density, 0.0);
  }

  #[test]
  fn test_zero_reps_means_zero_avg_load() {
    let sets = vec![WorkoutSet::new(100.0, 0)];
    let m = SetMetrics::compute(&sets, 60.0);

    assert_eq!(m.total_reps, 0);
    assert_eq!(m.avg_load_per_rep, 0.0);
  }

  #[test]
  fn test_score_weights_sum_to_one() {
    assert_approx_eq!(VOLUME_WEIGHT + DENSITY_WEIGHT + AVG_LOAD_WEIGHT, 1.0, 1e-12);
  }

  #[test]
  fn test_more_weight_strictly_increases_score() {
    let sets = vec![WorkoutSet::new(60.0, 10), WorkoutSet::new(60.0, 8)];
    let heavier = vec![WorkoutSet::new(62.5, 10), WorkoutSet::new(60.0, 8)];

    let base = SetMetrics::compute(&sets, 90.0);
    let bumped = SetMetrics::compute(&heavier, 90.0);

    assert!(bumped.volume > base.volume);
    assert!(bumped.progress_score > base.progress_score);
  }

  #[test]
  fn test_e1rm_epley_estimate() {
    // 100kg x 10 -> 100 * (1 + 10/30)
    let sets = vec![WorkoutSet::new(100.0, 10)];
    let m = SetMetrics::compute(&sets, 60.0);
    assert_approx_eq!(m.best_e1rm, 100.0 * (1.0 + 10.0 / 30.0), 1e-9);
  }

  #[test]
  fn test_e1rm_takes_best_set() {
    // Heavier low-rep set can out-estimate a lighter high-rep set
    let sets = vec![WorkoutSet::new(120.0, 2), WorkoutSet::new(100.0, 8)];
    let m = SetMetrics::compute(&sets, 120.0);

    let heavy: f64 = 120.0 * (1.0 + 2.0 / 30.0);
    let light: f64 = 100.0 * (1.0 + 8.0 / 30.0);
    assert_approx_eq!(m.best_e1rm, heavy.max(light), 1e-9);
  }

  #[test]
  fn test_range_compliance_per_set() {
    let sets = vec![
      WorkoutSet::with_target(60.0, 10, 8, 12),
      WorkoutSet::with_target(60.0, 6, 8, 12),
      WorkoutSet::new(60.0, 10),
    ];
    let m = SetMetrics::compute(&sets, 90.0);

    assert_eq!(m.range_achieved, vec![Some(true), Some(false), None]);
    assert!(m.has_range_data());
  }

  #[test]
  fn test_no_targets_means_no_range_data() {
    let sets = vec![WorkoutSet::new(60.0, 10), WorkoutSet::new(60.0, 8)];
    let m = SetMetrics::compute(&sets, 90.0);

    assert_eq!(m.range_achieved, vec![None, None]);
    assert!(!m.has_range_data());
  }
}
