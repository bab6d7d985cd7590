pub mod detector;
pub mod recording;
pub mod templates;

pub use detector::LandmarkDetector;
pub use recording::{RecordedFrame, RecordedLandmarks, Recording};
pub use templates::TemplateClassifier;
