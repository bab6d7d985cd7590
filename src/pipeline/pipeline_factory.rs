use crate::common::Vocabulary;
use crate::config::Settings;
use crate::error::AppError;
use crate::intake::LandmarkDetector;
use crate::pipeline::services::{
    ClassifierGate, FrameThrottle, GateThresholds, GestureClassifier, StrengthPolicy,
    TieredStrengthPolicy,
};
use crate::pipeline::{FrameProcessor, SharedState};
use std::sync::Arc;
use uuid::Uuid;

/// Builds the producer and the shared state for one session
pub struct PipelineFactory;

impl PipelineFactory {
    /// Create a session with the default accelerating-tier strength policy
    pub fn create_session<D: LandmarkDetector>(
        settings: &Settings,
        detector: D,
        classifier: Box<dyn GestureClassifier>,
    ) -> Result<(FrameProcessor<D>, SharedState), AppError> {
        Self::create_session_with_policy(
            settings,
            detector,
            classifier,
            Arc::new(TieredStrengthPolicy::default()),
        )
    }

    pub fn create_session_with_policy<D: LandmarkDetector>(
        settings: &Settings,
        detector: D,
        classifier: Box<dyn GestureClassifier>,
        policy: Arc<dyn StrengthPolicy>,
    ) -> Result<(FrameProcessor<D>, SharedState), AppError> {
        settings.validate()?;

        let vocabulary = Vocabulary::new(settings.quiz.vocabulary.iter().cloned());
        let pipeline = &settings.pipeline;

        let shared = SharedState::new(
            vocabulary.clone(),
            FrameThrottle::new(pipeline.sample_every),
            policy,
        );
        let gate = ClassifierGate::new(
            classifier,
            vocabulary,
            GateThresholds {
                free: pipeline.free_confidence_threshold,
                challenge: pipeline.challenge_confidence_threshold,
            },
        );

        let session_id = Uuid::new_v4();
        tracing::info!(
            "Session {} ready: {} gestures, sampling every {} frames",
            session_id,
            settings.quiz.vocabulary.len(),
            pipeline.sample_every
        );

        let processor = FrameProcessor::new(session_id, detector, gate, shared.clone(), pipeline);
        Ok((processor, shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::RecordedLandmarks;
    use crate::pipeline::services::classifier_gate::tests::ScriptedClassifier;

    #[test]
    fn rejects_invalid_settings() {
        let mut settings = Settings::default();
        settings.pipeline.sample_every = 0;
        let result = PipelineFactory::create_session(
            &settings,
            RecordedLandmarks,
            Box::new(ScriptedClassifier::always(vec![0.25; 4])),
        );
        assert!(matches!(result, Err(AppError::Settings(_))));
    }

    #[test]
    fn processor_and_consumer_share_state() {
        let (processor, shared) = PipelineFactory::create_session(
            &Settings::default(),
            RecordedLandmarks,
            Box::new(ScriptedClassifier::always(vec![0.25; 4])),
        )
        .unwrap();

        shared.start_challenge("Schule").unwrap();
        assert_eq!(processor.shared().target(), shared.target());
    }
}
