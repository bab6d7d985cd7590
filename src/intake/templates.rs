use crate::common::Vocabulary;
use crate::error::{ClassificationError, RecordingError};
use crate::pipeline::services::GestureClassifier;
use crate::pipeline::types::FeatureVector;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default = "default_temperature")]
    temperature: f32,
    templates: IndexMap<String, Vec<f32>>,
}

fn default_temperature() -> f32 {
    0.5
}

/// Nearest-template classifier used for replays and demos.
///
/// Each gesture has one reference feature vector; probabilities are a
/// softmax over negative Euclidean distances.
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    templates: Vec<Vec<f32>>,
    temperature: f32,
}

impl TemplateClassifier {
    /// Templates must be listed in, and cover, the vocabulary
    pub fn new(
        vocabulary: &Vocabulary,
        mut templates: IndexMap<String, Vec<f32>>,
        feature_length: usize,
        temperature: f32,
    ) -> Result<Self, RecordingError> {
        if temperature <= 0.0 || !temperature.is_finite() {
            return Err(RecordingError::Templates(format!(
                "temperature must be positive, got {temperature}"
            )));
        }

        let mut ordered = Vec::with_capacity(vocabulary.len());
        for id in vocabulary.ids() {
            let name = vocabulary.name(id);
            let Some(template) = templates.swap_remove(name) else {
                return Err(RecordingError::Templates(format!(
                    "no template for `{name}`"
                )));
            };
            if template.len() != feature_length {
                return Err(RecordingError::Templates(format!(
                    "template `{name}` has {} values, expected {feature_length}",
                    template.len()
                )));
            }
            ordered.push(template);
        }
        if let Some(extra) = templates.keys().next() {
            return Err(RecordingError::Templates(format!(
                "`{extra}` is not in the vocabulary"
            )));
        }

        Ok(Self {
            templates: ordered,
            temperature,
        })
    }

    pub fn load(
        path: &Path,
        vocabulary: &Vocabulary,
        feature_length: usize,
    ) -> Result<Self, RecordingError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                let path = path.display().to_string();
                return Err(RecordingError::Io { path, source });
            }
        };
        let file: TemplateFile = serde_json::from_str(&content)
            .map_err(|source| RecordingError::Parse { line: 1, source })?;
        Self::new(vocabulary, file.templates, feature_length, file.temperature)
    }
}

impl GestureClassifier for TemplateClassifier {
    fn name(&self) -> &'static str {
        "template"
    }

    fn predict_proba(
        &mut self,
        features: &FeatureVector,
    ) -> Result<Vec<f32>, ClassificationError> {
        let logits: Vec<f32> = self
            .templates
            .iter()
            .map(|template| {
                let distance = template
                    .iter()
                    .zip(features.as_slice())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>()
                    .sqrt();
                -distance / self.temperature
            })
            .collect();

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exps.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(ClassificationError::Inference(
                "degenerate template distances".to_string(),
            ));
        }
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}
