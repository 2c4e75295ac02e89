pub mod entry;

pub use entry::{NewEntry, RepRange, ValidationError, WorkoutEntry, WorkoutSet, DATE_FMT};
