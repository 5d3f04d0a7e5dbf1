use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Profile of the person being coached, embedded verbatim into the system prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub fitness_level: String,
    pub fitness_goal: String,
    pub medical_history: String,
    pub workout_preferences: String,
    pub menstrual_status: String,
    pub default_workout_duration: u32, // minutes
    pub current_workout: CurrentWorkout,
}

/// The routine the user is currently following
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWorkout {
    pub format: String,
    #[serde(default)]
    pub exercises: Vec<String>,
}

impl UserProfile {
    /// Built-in sample profile used when no profile file exists
    pub fn sample() -> Self {
        Self {
            name: "Alice".to_string(),
            age: 26,
            gender: "Female".to_string(),
            height: "165 cm".to_string(),
            weight: "60 kg".to_string(),
            fitness_level: "Intermediate".to_string(),
            fitness_goal: "Build endurance and tone muscles".to_string(),
            medical_history: "Mild knee pain, no major injuries".to_string(),
            workout_preferences: "Home workouts, minimal equipment".to_string(),
            menstrual_status: "Period started today".to_string(),
            default_workout_duration: 7,
            current_workout: CurrentWorkout {
                format: "50s work, 10s rest".to_string(),
                exercises: [
                    "Jump Squats",
                    "Push Ups",
                    "Jumping Lunges",
                    "Mountain Climbers",
                    "Plank to Shoulder Tap",
                    "Burpees",
                    "Bicycle Crunches",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
        }
    }

    /// Default profile location (~/.fit-coach/profile.toml)
    pub fn profile_file() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("profile.toml"))
    }

    /// Load a profile from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse profile {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize profile")
    }

    /// Resolve the active profile: explicit path, then the default file, then the sample
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_file = Self::profile_file()?;
        if default_file.exists() {
            tracing::debug!("Using profile from {:?}", default_file);
            return Self::load(&default_file);
        }

        tracing::debug!("No profile file found, using sample profile");
        Ok(Self::sample())
    }

    /// Write the profile to a file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create profile directory")?;
        }

        fs::write(path, self.to_toml()?).context("Failed to write profile file")?;

        Ok(())
    }
}
