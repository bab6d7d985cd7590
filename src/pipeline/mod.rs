pub mod frame_processor;
pub mod pipeline_factory;
pub mod services;
pub mod shared_state;
pub mod types;

pub use frame_processor::{FrameHandler, FrameOutcome, FrameProcessor};
pub use pipeline_factory::PipelineFactory;
pub use shared_state::{ChallengeTicket, SharedState, Snapshot};
pub use types::{ClassificationResult, FeatureVector, GestureLabel, StrengthEvent, Verdict};
