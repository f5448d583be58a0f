//! Rice leaf disease classifier.

use crate::error::{VisionError, VisionResult};
use crate::labels::ClassNames;
use crate::model::{InferenceBackend, TractBackend};
use crate::preprocess::{preprocess, PreprocessConfig};
use ricewise_config::ClassifierConfig;
use ricewise_core::ClassificationResponse;
use std::sync::Arc;
use tracing::debug;

/// Outcome of classifying one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub index: usize,
    pub probabilities: Vec<f32>,
}

impl From<Prediction> for ClassificationResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            predicted_label: prediction.label,
            class_probabilities: prediction.probabilities,
        }
    }
}

/// Index of the largest score; the first one wins ties. `None` when empty.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Preprocessing, model and class names, loaded once and shared.
pub struct Classifier {
    backend: Arc<dyn InferenceBackend>,
    class_names: ClassNames,
    preprocess: PreprocessConfig,
}

impl Classifier {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        class_names: ClassNames,
        preprocess: PreprocessConfig,
    ) -> Self {
        Self {
            backend,
            class_names,
            preprocess,
        }
    }

    /// Load the ONNX model and class names named in the configuration.
    pub fn from_config(config: &ClassifierConfig) -> VisionResult<Self> {
        let class_names = ClassNames::load(&config.class_names_file())?;
        let backend = TractBackend::load(&config.model_file(), config.input_size)?;
        Ok(Self::new(
            Arc::new(backend),
            class_names,
            PreprocessConfig::from_classifier_config(config),
        ))
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn output_name(&self) -> &str {
        self.backend.output_name()
    }

    /// Classify an encoded image. No thresholding: the top class is always reported.
    ///
    /// CPU bound; async callers should run it on a blocking thread.
    pub fn predict(&self, image: &[u8]) -> VisionResult<Prediction> {
        let input = preprocess(image, &self.preprocess)?;
        let scores = self.backend.run(input, self.preprocess.size)?;

        if scores.len() != self.class_names.len() {
            return Err(VisionError::OutputMismatch {
                expected: self.class_names.len(),
                actual: scores.len(),
            });
        }

        let index = argmax(&scores).ok_or(VisionError::OutputMismatch {
            expected: self.class_names.len(),
            actual: 0,
        })?;
        let label = self
            .class_names
            .get(index)
            .ok_or(VisionError::OutputMismatch {
                expected: self.class_names.len(),
                actual: scores.len(),
            })?
            .to_string();

        debug!("Predicted {} ({:.4})", label, scores[index]);

        Ok(Prediction {
            label,
            index,
            probabilities: scores,
        })
    }
}
