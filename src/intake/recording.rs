use super::LandmarkDetector;
use crate::common::{HandObservation, MAX_HANDS};
use crate::error::{DetectionError, RecordingError};
use serde::Deserialize;
use std::path::Path;

/// One line of a landmark recording: the hands a detector saw in one frame
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordedFrame {
    #[serde(default)]
    pub hands: Vec<Vec<(f32, f32)>>,
}

/// A landmark capture replayed as a video source, one JSON object per line.
///
/// ```text
/// {"hands": [[[0.41, 0.52], [0.43, 0.50], ...21 points]]}
/// {"hands": []}
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recording {
    frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let content = std::fs::read_to_string(path).map_err(|source| RecordingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, RecordingError> {
        let frames = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| RecordingError::Parse {
                    line: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<RecordedFrame>, _>>()?;
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<RecordedFrame> {
        self.frames
    }
}

/// Detector for recorded frames: the landmarks are already in the frame
#[derive(Debug, Default)]
pub struct RecordedLandmarks;

impl LandmarkDetector for RecordedLandmarks {
    type Frame = RecordedFrame;

    fn detect(&mut self, frame: &RecordedFrame) -> Result<Vec<HandObservation>, DetectionError> {
        frame
            .hands
            .iter()
            .take(MAX_HANDS)
            .map(|points| HandObservation::try_from(points.clone()))
            .collect()
    }
}
