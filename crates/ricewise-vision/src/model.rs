//! ONNX model inference via tract.

use crate::error::{VisionError, VisionResult};
use std::path::Path;
use tracing::info;
use tract_onnx::prelude::*;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Something that maps one NHWC image tensor to a score per class.
pub trait InferenceBackend: Send + Sync {
    /// Name of the output tensor the scores are read from.
    fn output_name(&self) -> &str;

    /// Run one `[1, size, size, 3]` input and return the flattened output.
    fn run(&self, input: Vec<f32>, size: u32) -> VisionResult<Vec<f32>>;
}

/// Classifier exported to ONNX, executed with tract.
pub struct TractBackend {
    model: TractModel,
    output_name: String,
    size: u32,
}

impl TractBackend {
    /// Load and optimize the model for a fixed square input size.
    ///
    /// Fails unless the model has exactly one output.
    pub fn load(path: &Path, size: u32) -> VisionResult<Self> {
        let load_err = |e: TractError| VisionError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if !path.exists() {
            return Err(VisionError::ModelLoad {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }

        let side = size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(0, f32::fact([1, side, side, 3]).into())
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        let outputs = model.model().output_outlets().map_err(load_err)?;
        if outputs.len() != 1 {
            return Err(VisionError::OutputCount {
                count: outputs.len(),
            });
        }
        let output_name = model.model().node(outputs[0].node).name.clone();

        info!(
            "Loaded classifier {} (input {}x{}, output '{}')",
            path.display(),
            size,
            size,
            output_name
        );

        Ok(Self {
            model,
            output_name,
            size,
        })
    }
}

impl InferenceBackend for TractBackend {
    fn output_name(&self) -> &str {
        &self.output_name
    }

    fn run(&self, input: Vec<f32>, size: u32) -> VisionResult<Vec<f32>> {
        if size != self.size {
            return Err(VisionError::Inference(format!(
                "model was loaded for {0}x{0} inputs, got {1}x{1}",
                self.size, size
            )));
        }

        let side = size as usize;
        let tensor = Tensor::from_shape(&[1, side, side, 3], &input)
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| VisionError::Inference("model returned no outputs".to_string()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        Ok(scores.iter().copied().collect())
    }
}
