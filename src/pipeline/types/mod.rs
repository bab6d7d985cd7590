mod classification;
mod feature_vector;
mod gesture_label;

pub use classification::{ClassificationResult, StrengthEvent, Verdict};
pub use feature_vector::FeatureVector;
pub use gesture_label::GestureLabel;
