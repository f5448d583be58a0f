//! Error types for image classification.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or running the classifier.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The model file could not be loaded or optimized.
    #[error("Failed to load model '{path}': {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// The model must produce exactly one output tensor.
    #[error("Model declares {count} outputs, expected exactly one")]
    OutputCount { count: usize },

    /// Inference failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The class-name file is missing or malformed.
    #[error("Invalid class names file '{path}': {message}")]
    ClassNames { path: PathBuf, message: String },

    /// The model output does not line up with the class names.
    #[error("Model produced {actual} scores but {expected} class names are loaded")]
    OutputMismatch { expected: usize, actual: usize },

    /// The upload is not a decodable image.
    #[error("Could not decode image: {0}")]
    Image(#[from] image::ImageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for classification operations.
pub type VisionResult<T> = Result<T, VisionError>;
