pub mod classifier_gate;
pub mod normalizer;
pub mod stabilizer;
pub mod strength;
pub mod throttle;

pub use classifier_gate::{ClassifierGate, GateThresholds, GestureClassifier};
pub use normalizer::LandmarkNormalizer;
pub use stabilizer::Stabilizer;
pub use strength::{StrengthAccumulator, StrengthPolicy, TieredStrengthPolicy};
pub use throttle::FrameThrottle;
