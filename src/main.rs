//! "Run the app" entry point: load the log, render the history table,
//! and print a progress report for every (split, exercise) key seen.

use std::env;
use std::process::ExitCode;

use lift_log::feedback::progress_feedback;
use lift_log::report::history_table;
use lift_log::store::{StoreError, WorkoutLog};

const LOG_PATH_VAR: &str = "LIFT_LOG_PATH";
const DEFAULT_LOG_PATH: &str = "workouts.csv";

fn main() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("lift-log: {}", e);
      ExitCode::FAILURE
    }
  }
}

fn run() -> Result<(), StoreError> {
  let path = env::var(LOG_PATH_VAR).unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
  let log = WorkoutLog::open(path)?;

  println!("{}", history_table(log.entries()));

  // One report per key, in first-seen order
  let mut keys: Vec<(&str, &str)> = Vec::new();
  for entry in log.entries() {
    let key = (entry.split.as_str(), entry.exercise.as_str());
    if !keys.contains(&key) {
      keys.push(key);
    }
  }

  for (split, exercise) in keys {
    println!("{}\n", progress_feedback(log.entries(), split, exercise));
  }

  Ok(())
}
