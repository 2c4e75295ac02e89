//! Plain-text rendering of the workout history
//!
//! The table mirrors what the form layer would show; charting stays with
//! the presentation side.

use crate::models::{WorkoutEntry, WorkoutSet};

/// Compact per-set notation: "60x10 60x8 55x8"
pub fn format_sets(sets: &[WorkoutSet]) -> String {
  sets
    .iter()
    .map(|s| format!("{}x{}", s.weight_kg, s.reps))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Render the full log as a fixed-width table, insertion order preserved
pub fn history_table(entries: &[WorkoutEntry]) -> String {
  if entries.is_empty() {
    return "No workouts logged yet.".to_string();
  }

  let mut out = String::new();
  out.push_str(&format!(
    "{:<4} {:<10} {:<14} {:<20} {:<24} {:>6} {:>5} {:>9} {:>8} {:>8} {:>8} {:>9}\n",
    "id",
    "date",
    "split",
    "exercise",
    "sets",
    "rest",
    "reps",
    "volume",
    "density",
    "avg/rep",
    "e1rm",
    "score"
  ));

  for entry in entries {
    let m = &entry.metrics;
    out.push_str(&format!(
      "{:<4} {:<10} {:<14} {:<20} {:<24} {:>6} {:>5} {:>9.1} {:>8.2} {:>8.1} {:>8.1} {:>9.1}\n",
      entry.id,
      entry.date.format("%Y-%m-%d"),
      entry.split,
      entry.exercise,
      format_sets(&entry.sets),
      entry.rest_seconds,
      m.total_reps,
      m.volume,
      m.density,
      m.avg_load_per_rep,
      m.best_e1rm,
      m.progress_score
    ));
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_entry;

  #[test]
  fn test_empty_log_renders_placeholder() {
    assert_eq!(history_table(&[]), "No workouts logged yet.");
  }

  #[test]
  fn test_table_has_header_and_one_line_per_entry() {
    let entries = vec![
      mock_entry(1, "Push Day", "Bench Press", 1),
      mock_entry(2, "Pull Day", "Deadlift", 2),
    ];
    let table = history_table(&entries);

    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("Bench Press"));
    assert!(table.contains("Deadlift"));
  }

  #[test]
  fn test_set_notation() {
    let sets = vec![WorkoutSet::new(60.0, 10), WorkoutSet::new(57.5, 8)];
    assert_eq!(format_sets(&sets), "60x10 57.5x8");
  }
}
