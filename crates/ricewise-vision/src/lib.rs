//! Ricewise Vision - Rice leaf disease classification.
//!
//! Uploaded photos are decoded, resized and fed to an ONNX export of the
//! trained classifier. The highest scoring class is reported together with
//! the full probability vector.

mod classifier;
mod error;
mod labels;
mod model;
mod preprocess;

pub use classifier::{argmax, Classifier, Prediction};
pub use error::{VisionError, VisionResult};
pub use labels::ClassNames;
pub use model::{InferenceBackend, TractBackend};
pub use preprocess::{preprocess, PreprocessConfig};
