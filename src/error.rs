use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Settings Error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Challenge Error: {0}")]
    Challenge(#[from] ConfigError),
    #[error("Recording Error: {0}")]
    Recording(#[from] RecordingError),
    #[error("Leaderboard Error: {0}")]
    Leaderboard(#[from] LeaderboardError),
    #[error("Coordinator Error: {0}")]
    Coordinator(String),
}

// Raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// The only error surfaced to a consumer at runtime: a bad challenge request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown challenge target: {0}")]
    UnknownTarget(String),
    #[error("No challenge targets configured")]
    NoTargets,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Classifier failed: {0}")]
    Inference(String),
    #[error("Classifier returned {actual} probabilities, expected {expected}")]
    WrongArity { expected: usize, actual: usize },
    #[error("Classifier returned a non-finite probability at index {0}")]
    NonFinite(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Landmark detection failed: {0}")]
    Failed(String),
    #[error("Hand observation has {actual} landmarks, expected {expected}")]
    LandmarkCount { expected: usize, actual: usize },
    #[error("Landmark {index} at ({x}, {y}) is outside the unit square")]
    OutOfBounds { index: usize, x: f32, y: f32 },
}

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid template set: {0}")]
    Templates(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeaderboardError {
    #[error("Player name must not be empty")]
    EmptyName,
}
