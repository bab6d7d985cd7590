use crate::common::{GestureId, Vocabulary};
use crate::error::ClassificationError;
use crate::pipeline::types::{ClassificationResult, FeatureVector, Verdict};
use std::panic::{self, AssertUnwindSafe};

/// The externally supplied model.
///
/// Returns one probability per vocabulary entry, in vocabulary order. Only
/// ever called from the producer thread.
pub trait GestureClassifier: Send {
    fn name(&self) -> &'static str;
    fn predict_proba(&mut self, features: &FeatureVector) -> Result<Vec<f32>, ClassificationError>;
}

/// Confidence floors for the two recognition modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateThresholds {
    pub free: f32,
    pub challenge: f32,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            free: 0.1,
            challenge: 0.3,
        }
    }
}

/// Wraps the classifier, validates its output and applies the confidence
/// rules of the active mode.
pub struct ClassifierGate {
    classifier: Box<dyn GestureClassifier>,
    vocabulary: Vocabulary,
    thresholds: GateThresholds,
}

impl ClassifierGate {
    pub fn new(
        classifier: Box<dyn GestureClassifier>,
        vocabulary: Vocabulary,
        thresholds: GateThresholds,
    ) -> Self {
        Self {
            classifier,
            vocabulary,
            thresholds,
        }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Classify one feature vector. `target` selects challenge mode.
    pub fn classify(
        &mut self,
        features: &FeatureVector,
        target: Option<GestureId>,
    ) -> Result<ClassificationResult, ClassificationError> {
        let classifier = &mut self.classifier;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| classifier.predict_proba(features)));
        let probabilities = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(ClassificationError::Inference("classifier panicked".into())),
        };

        let (predicted, confidence) = self.arg_max(&probabilities)?;
        let verdict = match target {
            None if confidence < self.thresholds.free => Verdict::Unknown,
            None => Verdict::Recognized,
            Some(_) if confidence < self.thresholds.challenge => Verdict::LowConfidence,
            Some(target) if predicted == target => Verdict::Match,
            Some(_) => Verdict::Mismatch,
        };

        Ok(ClassificationResult {
            predicted,
            confidence,
            verdict,
        })
    }

    fn arg_max(&self, probabilities: &[f32]) -> Result<(GestureId, f32), ClassificationError> {
        if probabilities.len() != self.vocabulary.len() {
            return Err(ClassificationError::WrongArity {
                expected: self.vocabulary.len(),
                actual: probabilities.len(),
            });
        }
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(ClassificationError::NonFinite(index));
        }

        let empty = || ClassificationError::Inference("empty distribution".to_string());
        let (index, p) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (index, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((index, p)),
            })
            .ok_or_else(empty)?;
        let id = self.vocabulary.id_at(index).ok_or_else(empty)?;
        Ok((id, p.clamp(0.0, 1.0)))
    }
}
