use crate::error::SettingsError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const ENV_PREFIX: &str = "GESTURE_QUIZ";

/// Session-wide settings. Every field has a default, so an empty file (or no
/// file at all) yields a working quiz.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub quiz: QuizSettings,
}

/// Tunables for the producer side of the session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub sample_every: u64,
    pub feature_length: usize,
    pub stabilizer_window: usize,
    pub stabilizer_quorum: f32,
    pub free_confidence_threshold: f32,
    pub challenge_confidence_threshold: f32,
    pub skip_unchanged_landmarks: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sample_every: 10,
            feature_length: 84,
            stabilizer_window: 10,
            stabilizer_quorum: 0.6,
            free_confidence_threshold: 0.1,
            challenge_confidence_threshold: 0.3,
            skip_unchanged_landmarks: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub poll_interval_ms: u64,
    pub progress_display_floor: f32,
    pub vocabulary: Vec<String>,
    pub challenge_targets: Vec<String>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        let vocabulary: Vec<String> = ["Hammer", "Lehrer", "Lehrnen", "Schule"]
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            poll_interval_ms: 500,
            progress_display_floor: 0.05,
            challenge_targets: vocabulary.clone(),
            vocabulary,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply
    /// `GESTURE_QUIZ__<SECTION>__<KEY>` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Sample more often and vote over a shorter window
    pub fn responsive() -> Self {
        let mut settings = Self::default();
        settings.pipeline.sample_every = 5;
        settings.pipeline.stabilizer_window = 6;
        settings.quiz.poll_interval_ms = 100;
        settings
    }

    /// Longer window and higher quorum, for noisy cameras
    pub fn strict() -> Self {
        let mut settings = Self::default();
        settings.pipeline.stabilizer_window = 15;
        settings.pipeline.stabilizer_quorum = 0.75;
        settings
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let pipeline = &self.pipeline;
        if pipeline.sample_every == 0 {
            return Err(invalid("pipeline.sample_every", "must be greater than 0"));
        }
        if pipeline.feature_length == 0 {
            return Err(invalid("pipeline.feature_length", "must be greater than 0"));
        }
        if pipeline.stabilizer_window == 0 {
            return Err(invalid(
                "pipeline.stabilizer_window",
                "must be greater than 0",
            ));
        }
        check_unit("pipeline.stabilizer_quorum", pipeline.stabilizer_quorum)?;
        check_unit(
            "pipeline.free_confidence_threshold",
            pipeline.free_confidence_threshold,
        )?;
        check_unit(
            "pipeline.challenge_confidence_threshold",
            pipeline.challenge_confidence_threshold,
        )?;
        check_unit(
            "quiz.progress_display_floor",
            self.quiz.progress_display_floor,
        )?;

        if self.quiz.poll_interval_ms == 0 {
            return Err(invalid("quiz.poll_interval_ms", "must be greater than 0"));
        }
        if self.quiz.vocabulary.is_empty() {
            return Err(invalid("quiz.vocabulary", "must name at least one gesture"));
        }

        let mut seen = HashSet::new();
        for name in &self.quiz.vocabulary {
            if !seen.insert(name.as_str()) {
                return Err(invalid(
                    "quiz.vocabulary",
                    format!("duplicate gesture `{name}`"),
                ));
            }
        }
        for target in &self.quiz.challenge_targets {
            if !seen.contains(target.as_str()) {
                return Err(invalid(
                    "quiz.challenge_targets",
                    format!("`{target}` is not in the vocabulary"),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pipeline.sample_every, 10);
        assert_eq!(settings.pipeline.feature_length, 84);
        assert_eq!(settings.quiz.vocabulary.len(), 4);
    }

    #[test]
    fn presets_are_valid() {
        assert!(Settings::responsive().validate().is_ok());
        assert!(Settings::strict().validate().is_ok());
    }

    #[test]
    fn rejects_quorum_outside_unit_range() {
        let mut settings = Settings::default();
        settings.pipeline.stabilizer_quorum = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "pipeline.stabilizer_quorum",
                ..
            })
        ));
    }

    #[test]
    fn rejects_target_outside_vocabulary() {
        let mut settings = Settings::default();
        settings.quiz.challenge_targets = vec!["Zange".to_string()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_vocabulary() {
        let mut settings = Settings::default();
        settings.quiz.vocabulary.push("Hammer".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn loads_partial_toml_file() {
        let name = format!("gesture-quiz-{}.toml", uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(name);
        let content = "[pipeline]\nsample_every = 3\n\n[quiz]\npoll_interval_ms = 250\n";
        std::fs::write(&path, content).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.pipeline.sample_every, 3);
        assert_eq!(settings.pipeline.stabilizer_window, 10);
        assert_eq!(settings.quiz.poll_interval_ms, 250);
    }
}
