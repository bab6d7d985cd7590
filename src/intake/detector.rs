use crate::common::HandObservation;
use crate::error::DetectionError;

/// Finds hands in a raw video frame.
///
/// Returns 0 to 2 observations in detection order. Anything else the
/// detector produces (drawing metadata, handedness) stays on its side.
pub trait LandmarkDetector: Send {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Vec<HandObservation>, DetectionError>;
}
