//! Model scores to labelled prediction.

use std::collections::BTreeMap;

use leafdoc_core::{ClassLabel, Prediction};

use crate::preprocess::{preprocess, ImageTensor};
use crate::{Classifier, VisionError};

/// Runs `classifier` on a preprocessed image and labels the result.
pub fn predict(classifier: &dyn Classifier, input: ImageTensor) -> Result<Prediction, VisionError> {
    let scores = classifier.infer(input)?;
    prediction_from_scores(&scores)
}

/// Decodes, preprocesses and classifies raw upload bytes.
pub fn classify_bytes(classifier: &dyn Classifier, bytes: &[u8]) -> Result<Prediction, VisionError> {
    let input = preprocess(bytes)?;
    predict(classifier, input)
}

/// Maps a score vector onto [`ClassLabel::ALL`].
///
/// The vector length must equal the label count. The highest score wins, the
/// lowest index wins ties and NaN scores never win.
pub fn prediction_from_scores(scores: &[f32]) -> Result<Prediction, VisionError> {
    if scores.len() != ClassLabel::COUNT {
        return Err(VisionError::OutputWidthMismatch {
            expected: ClassLabel::COUNT,
            actual: scores.len(),
        });
    }

    let (index, confidence) = argmax(scores)
        .ok_or_else(|| VisionError::Inference("model output contains only NaN scores".into()))?;
    let label = ClassLabel::from_index(index).ok_or(VisionError::OutputWidthMismatch {
        expected: ClassLabel::COUNT,
        actual: scores.len(),
    })?;

    let probabilities: BTreeMap<ClassLabel, f32> =
        ClassLabel::ALL.into_iter().zip(scores.iter().copied()).collect();

    Ok(Prediction {
        label,
        confidence,
        probabilities,
    })
}

fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best, (i, s)| match best {
            Some((_, top)) if top >= s => best,
            _ => Some((i, s)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScores {
        scores: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedScores {
        fn new(scores: Vec<f32>) -> Self {
            Self { scores, calls: AtomicUsize::new(0) }
        }
    }

    impl Classifier for FixedScores {
        fn infer(&self, input: ImageTensor) -> Result<Vec<f32>, VisionError> {
            assert_eq!(input.shape(), &[1, 224, 224, 3]);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }
    }

    fn blank_input() -> ImageTensor {
        ImageTensor::zeros((1, 224, 224, 3))
    }

    #[test]
    fn test_nitrogen_scenario() {
        let model = FixedScores::new(vec![0.05, 0.02, 0.03, 0.85, 0.03, 0.02]);
        let prediction = predict(&model, blank_input()).unwrap();

        assert_eq!(prediction.label, ClassLabel::Nitrogen);
        assert_eq!(prediction.confidence, 0.85);
        assert_eq!(prediction.probabilities.len(), ClassLabel::COUNT);
        assert_eq!(prediction.probabilities[&ClassLabel::Healthy], 0.02);
        let total: f32 = prediction.probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_probability_keys_are_all_labels_in_order() {
        let prediction = prediction_from_scores(&[0.1, 0.5, 0.1, 0.1, 0.1, 0.1]).unwrap();
        let keys: Vec<ClassLabel> = prediction.probabilities.keys().copied().collect();
        assert_eq!(keys, ClassLabel::ALL.to_vec());
        assert_eq!(prediction.label, ClassLabel::Healthy);
    }

    #[test]
    fn test_first_index_wins_ties() {
        let prediction = prediction_from_scores(&[0.1, 0.4, 0.4, 0.05, 0.05, 0.0]).unwrap();
        assert_eq!(prediction.label, ClassLabel::Healthy);
    }

    #[test]
    fn test_last_index_reachable() {
        let prediction = prediction_from_scores(&[0.0, 0.0, 0.0, 0.0, 0.1, 0.9]).unwrap();
        assert_eq!(prediction.label, ClassLabel::Potassium);
        assert_eq!(prediction.confidence, 0.9);
    }

    #[test]
    fn test_nan_never_wins() {
        let prediction = prediction_from_scores(&[f32::NAN, 0.2, 0.3, 0.1, 0.1, 0.1]).unwrap();
        assert_eq!(prediction.label, ClassLabel::Magnesium);

        let err = prediction_from_scores(&[f32::NAN; 6]).unwrap_err();
        assert!(matches!(err, VisionError::Inference(_)));
    }

    #[test]
    fn test_output_width_mismatch() {
        let err = prediction_from_scores(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, VisionError::OutputWidthMismatch { expected: 6, actual: 2 }));

        let model = FixedScores::new(vec![0.1; 7]);
        let err = predict(&model, blank_input()).unwrap_err();
        assert!(matches!(err, VisionError::OutputWidthMismatch { expected: 6, actual: 7 }));
        assert!(err.to_string().contains("7 scores"));

        assert!(matches!(
            prediction_from_scores(&[]),
            Err(VisionError::OutputWidthMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn test_classify_bytes_rejects_non_image_before_inference() {
        let model = FixedScores::new(vec![0.05, 0.02, 0.03, 0.85, 0.03, 0.02]);
        let err = classify_bytes(&model, b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, VisionError::Decode(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
