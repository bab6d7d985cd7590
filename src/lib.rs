pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod quiz;

pub use error::{AppError, ConfigError, SettingsError};

pub use config::Settings;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use pipeline::{FrameHandler, FrameProcessor, PipelineFactory, SharedState};
pub use quiz::{ChallengeSession, MemoryLeaderboard, QuizEvent, ScoreSink};
