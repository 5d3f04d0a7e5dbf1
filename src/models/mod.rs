pub mod profile;

pub use profile::{CurrentWorkout, UserProfile};
