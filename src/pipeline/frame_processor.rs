use crate::config::PipelineSettings;
use crate::intake::LandmarkDetector;
use crate::pipeline::services::{ClassifierGate, LandmarkNormalizer, Stabilizer};
use crate::pipeline::types::{ClassificationResult, FeatureVector, GestureLabel};
use crate::pipeline::SharedState;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Callback registered with a video transport.
///
/// The transport owns the thread; it must not call `on_frame` concurrently
/// with itself, which `&mut self` enforces.
pub trait FrameHandler<F>: Send {
    fn on_frame(&mut self, frame: &F) -> FrameOutcome;
}

/// What happened to one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Counted but not sampled
    Skipped,
    /// No hand in view; label cleared, strength untouched
    Idle,
    /// Same landmarks as the last classified frame
    Unchanged,
    Classified {
        result: ClassificationResult,
        label: GestureLabel,
        completed: bool,
    },
    /// Detection or classification failed; the next frame proceeds normally
    Failed,
}

/// The producer side of a session: detection, throttling, normalization,
/// gated classification and stabilization, publishing into [`SharedState`].
pub struct FrameProcessor<D> {
    session_id: Uuid,
    detector: D,
    normalizer: LandmarkNormalizer,
    gate: ClassifierGate,
    stabilizer: Stabilizer<GestureLabel>,
    shared: SharedState,
    skip_unchanged: bool,
    last_features: Option<FeatureVector>,
    epoch: u64,
}

impl<D: LandmarkDetector> FrameProcessor<D> {
    pub fn new(
        session_id: Uuid,
        detector: D,
        gate: ClassifierGate,
        shared: SharedState,
        settings: &PipelineSettings,
    ) -> Self {
        Self {
            session_id,
            detector,
            normalizer: LandmarkNormalizer::new(settings.feature_length),
            gate,
            stabilizer: Stabilizer::new(settings.stabilizer_window, settings.stabilizer_quorum),
            shared,
            skip_unchanged: settings.skip_unchanged_landmarks,
            last_features: None,
            epoch: 0,
        }
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn process(&mut self, frame: &D::Frame) -> FrameOutcome {
        let span = tracing::debug_span!("frame", session = %self.session_id);
        let _entered = span.enter();

        let sampled = self.shared.should_sample();

        let hands = match self.detector.detect(frame) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("Landmark detection failed: {}", e);
                self.shared.set_label(GestureLabel::Error);
                return FrameOutcome::Failed;
            }
        };

        let Some(features) = self.normalizer.normalize(&hands) else {
            self.shared.set_label(GestureLabel::NoHand);
            return FrameOutcome::Idle;
        };

        if !sampled {
            return FrameOutcome::Skipped;
        }

        if self.skip_unchanged && self.last_features.as_ref() == Some(&features) {
            debug!("Landmarks unchanged, skipping classification");
            self.shared.set_label(GestureLabel::MoveHand);
            return FrameOutcome::Unchanged;
        }

        let ticket = self.shared.ticket();
        if ticket.epoch != self.epoch {
            self.stabilizer.clear();
            self.epoch = ticket.epoch;
        }

        let result = match self.gate.classify(&features, ticket.target) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    "Prediction error from {}: {}",
                    self.gate.classifier_name(),
                    e
                );
                self.shared.set_label(GestureLabel::Error);
                return FrameOutcome::Failed;
            }
        };
        self.last_features = Some(features);

        let raw = result.label();
        let label = self.stabilizer.push(raw).unwrap_or(raw);
        let completed = self
            .shared
            .apply_result(ticket, label, result.strength_event());

        debug!(
            "Frame {}: {:?} ({:.2}) -> {:?}",
            self.shared.frame_count(),
            raw,
            result.confidence,
            label
        );
        if completed {
            info!("Challenge complete, waiting for the reward to be claimed");
        }

        FrameOutcome::Classified {
            result,
            label,
            completed,
        }
    }
}

impl<D: LandmarkDetector> FrameHandler<D::Frame> for FrameProcessor<D> {
    fn on_frame(&mut self, frame: &D::Frame) -> FrameOutcome {
        self.process(frame)
    }
}
