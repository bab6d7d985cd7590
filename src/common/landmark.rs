use crate::error::DetectionError;
use serde::Deserialize;

/// Keypoints tracked per hand, in canonical index order (wrist first).
pub const LANDMARKS_PER_HAND: usize = 21;

/// The detector reports at most this many hands per frame.
pub const MAX_HANDS: usize = 2;

/// A tracked 2D keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Finite and inside `[0, 1]` on both axes
    pub fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl From<(f32, f32)> for Landmark {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// One detected hand. Construction enforces the fixed landmark count and
/// normalized coordinates, so everything downstream can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, DetectionError> {
        if landmarks.len() != LANDMARKS_PER_HAND {
            return Err(DetectionError::LandmarkCount {
                expected: LANDMARKS_PER_HAND,
                actual: landmarks.len(),
            });
        }
        let outside = landmarks.iter().enumerate().find(|(_, p)| !p.in_bounds());
        if let Some((index, point)) = outside {
            return Err(DetectionError::OutOfBounds {
                index,
                x: point.x,
                y: point.y,
            });
        }
        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl TryFrom<Vec<(f32, f32)>> for HandObservation {
    type Error = DetectionError;

    fn try_from(points: Vec<(f32, f32)>) -> Result<Self, Self::Error> {
        Self::new(points.into_iter().map(Landmark::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_landmark_count() {
        let result = HandObservation::new(vec![Landmark::new(0.1, 0.1); 20]);
        assert_eq!(
            result,
            Err(DetectionError::LandmarkCount {
                expected: 21,
                actual: 20
            })
        );
    }

    #[test]
    fn rejects_points_outside_the_unit_square() {
        let mut points = vec![(0.5, 0.5); LANDMARKS_PER_HAND];
        points[3] = (1.2, 0.5);
        assert!(matches!(
            HandObservation::try_from(points),
            Err(DetectionError::OutOfBounds { index: 3, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_points() {
        let mut points = vec![Landmark::new(0.5, 0.5); LANDMARKS_PER_HAND];
        points[7] = Landmark::new(0.5, f32::NAN);
        assert!(matches!(
            HandObservation::new(points),
            Err(DetectionError::OutOfBounds { index: 7, .. })
        ));
    }

    #[test]
    fn accepts_the_edges_of_the_frame() {
        let mut points = vec![(0.0, 0.0); LANDMARKS_PER_HAND];
        points[20] = (1.0, 1.0);
        assert!(HandObservation::try_from(points).is_ok());
    }

    #[test]
    fn builds_from_point_tuples() {
        let hand = HandObservation::try_from(vec![(0.5, 0.25); LANDMARKS_PER_HAND]).unwrap();
        assert_eq!(hand.landmarks()[0], Landmark::new(0.5, 0.25));
    }
}
