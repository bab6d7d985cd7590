use crate::common::{HandObservation, LANDMARKS_PER_HAND, MAX_HANDS};
use crate::pipeline::types::FeatureVector;

/// Encodes hand landmarks as a translation-normalized feature vector.
///
/// All hands share one reference point: the minimum x and minimum y over
/// every landmark of every hand. Each hand contributes its landmarks as
/// `(x - min_x, y - min_y)` pairs in detection order.
#[derive(Debug, Clone)]
pub struct LandmarkNormalizer {
    feature_length: usize,
}

impl LandmarkNormalizer {
    pub fn new(feature_length: usize) -> Self {
        Self { feature_length }
    }

    /// Returns `None` when no hand was observed; the caller treats that frame
    /// as idle.
    pub fn normalize(&self, hands: &[HandObservation]) -> Option<FeatureVector> {
        if hands.is_empty() {
            return None;
        }

        let points = move || hands.iter().flat_map(|hand| hand.landmarks().iter());
        let min_x = points().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = points().map(|p| p.y).fold(f32::INFINITY, f32::min);

        let mut values = Vec::with_capacity(hands.len() * LANDMARKS_PER_HAND * 2);
        for point in points() {
            values.push(point.x - min_x);
            values.push(point.y - min_y);
        }

        Some(FeatureVector::from_values(values, self.feature_length))
    }
}

impl Default for LandmarkNormalizer {
    fn default() -> Self {
        Self::new(LANDMARKS_PER_HAND * 2 * MAX_HANDS)
    }
}
