//! Model abstraction and the ONNX-backed implementation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tract_onnx::prelude::*;
use tracing::info;

use crate::preprocess::{ImageTensor, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};
use crate::VisionError;

/// A loaded image classifier.
///
/// Implementations are read-only after construction and shared across
/// requests, so `infer` takes `&self`.
pub trait Classifier: Send + Sync {
    /// Runs the model on one preprocessed image and returns its raw per-class
    /// scores in model output order.
    fn infer(&self, input: ImageTensor) -> Result<Vec<f32>, VisionError>;
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier running an ONNX graph through tract.
///
/// The graph must take a single `[1, 224, 224, 3]` f32 input and return class
/// probabilities as its first output.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    /// Loads and optimizes the model at `path`.
    ///
    /// When the graph declares a concrete output shape, its last dimension must
    /// equal `num_classes`. Malformed graphs are reported as
    /// [`VisionError::ModelLoad`], including those that make the ONNX parser
    /// panic.
    pub fn load(path: &Path, num_classes: usize) -> Result<Self, VisionError> {
        let load_err = |e: TractError| VisionError::ModelLoad(format!("{}: {e:#}", path.display()));

        if !path.is_file() {
            return Err(VisionError::ModelLoad(format!("{}: file not found", path.display())));
        }

        let input_fact = InferenceFact::dt_shape(
            f32::datum_type(),
            tvec!(1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS),
        );

        // tract unwraps some optional protobuf fields (e.g. an untyped graph input)
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| {
            tract_onnx::onnx()
                .model_for_path(path)
                .and_then(|m| m.with_input_fact(0, input_fact))
                .and_then(|m| m.into_optimized())
        }))
        .map_err(|payload| {
            VisionError::ModelLoad(format!(
                "{}: malformed model graph ({})",
                path.display(),
                panic_message(payload.as_ref())
            ))
        })?;
        let model = parsed.map_err(load_err)?;

        let output_width = model
            .output_fact(0)
            .map_err(load_err)?
            .shape
            .as_concrete()
            .and_then(|dims| dims.last().copied());

        if let Some(actual) = output_width {
            if actual != num_classes {
                return Err(VisionError::OutputWidthMismatch { expected: num_classes, actual });
            }
        }

        let plan = model.into_runnable().map_err(load_err)?;
        info!("Loaded ONNX model from {} ({} classes)", path.display(), num_classes);

        Ok(Self { plan })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("parser panicked")
}

impl Classifier for OnnxClassifier {
    fn infer(&self, input: ImageTensor) -> Result<Vec<f32>, VisionError> {
        let outputs = self
            .plan
            .run(tvec!(input.into_tensor().into()))
            .map_err(|e| VisionError::Inference(format!("{e:#}")))?;

        let first = outputs
            .first()
            .ok_or_else(|| VisionError::Inference("model produced no outputs".into()))?;
        let scores = first
            .to_array_view::<f32>()
            .map_err(|e| VisionError::Inference(format!("{e:#}")))?;

        Ok(scores.iter().copied().collect())
    }
}
