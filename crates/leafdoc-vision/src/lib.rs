//! Image preprocessing and classification for leafdoc.
//!
//! - [`preprocess`] — Decodes an upload into a `[1, 224, 224, 3]` tensor in `[0, 1]`
//! - [`Classifier`] — Anything that maps that tensor to per-class scores
//! - [`OnnxClassifier`] — [`Classifier`] backed by an ONNX model run with tract
//! - [`predict`] / [`classify_bytes`] — Arg-max over the scores, mapped to a [`ClassLabel`]
//!
//! # Example
//!
//! ```rust
//! use leafdoc_vision::{predict, Classifier, ImageTensor, VisionError};
//!
//! struct Fixed(Vec<f32>);
//!
//! impl Classifier for Fixed {
//!     fn infer(&self, _input: ImageTensor) -> Result<Vec<f32>, VisionError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let model = Fixed(vec![0.05, 0.02, 0.03, 0.85, 0.03, 0.02]);
//! let input = ImageTensor::zeros((1, 224, 224, 3));
//! let prediction = predict(&model, input).unwrap();
//! assert_eq!(prediction.label.as_str(), "Nitrogen");
//! ```
//!
//! [`ClassLabel`]: leafdoc_core::ClassLabel

mod classifier;
mod predict;
mod preprocess;

pub use classifier::{Classifier, OnnxClassifier};
pub use predict::{classify_bytes, predict, prediction_from_scores};
pub use preprocess::{preprocess, ImageTensor, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};

use thiserror::Error;

/// Errors from decoding, model loading or inference.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Upload bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Model artifact missing, unreadable or incompatible.
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    /// Model run failed or produced unusable output.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Model emits a different number of scores than there are labels.
    #[error("Model output has {actual} scores but {expected} labels are configured")]
    OutputWidthMismatch { expected: usize, actual: usize },
}
