//! Class activation map engine
//!
//! Runs a GAP classifier on one image, reads the feature map captured at its pooling
//! anchor and turns the predicted class's weighted channel sum into a colour heatmap.

pub mod colormap;
pub mod normalize;
pub mod reduce;
pub mod resize;
pub mod types;

use ndarray::ArrayView4;
use tracing::{debug, instrument, warn};

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::classifier::{GapClassifier, StageId};
use crate::cam_pipeline::tap::ActivationTap;

pub use colormap::Colormap;
pub use normalize::{DEFAULT_EPSILON, NormalizedMap, normalize_to_u8};
pub use reduce::{argmax_first, weighted_channel_sum};
pub use resize::resize_cubic;
pub use types::CamOutput;

/// CAM engine bound to one classifier.
///
/// The engine borrows the classifier and owns the activation tap. `compute_heatmap`
/// takes `&mut self` because it refills the tap; share an engine across threads only
/// behind a lock.
pub struct CamEngine<'m, M: GapClassifier + ?Sized> {
    model: &'m M,
    tap: ActivationTap,
    colormap: Colormap,
    epsilon: f32,
}

impl<'m, M: GapClassifier + ?Sized> CamEngine<'m, M> {
    /// Attaches to the classifier's only global-average-pooling stage.
    pub fn new(model: &'m M) -> Result<Self> {
        Self::attach(model, None)
    }

    /// Attaches to an explicitly chosen pooling stage.
    pub fn with_anchor(model: &'m M, anchor: StageId) -> Result<Self> {
        Self::attach(model, Some(anchor))
    }

    fn attach(model: &'m M, anchor: Option<StageId>) -> Result<Self> {
        let tap = ActivationTap::attach(model.stages(), anchor)?;
        Ok(Self {
            model,
            tap,
            colormap: Colormap::viridis(),
            epsilon: DEFAULT_EPSILON,
        })
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn anchor(&self) -> StageId {
        self.tap.anchor()
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Computes the class activation heatmap for a `[1, C, H, W]` image.
    ///
    /// The heatmap has the image's height and width whatever the feature map size.
    #[instrument(skip(self, image), fields(shape = ?image.shape()))]
    pub fn compute_heatmap(&mut self, image: ArrayView4<'_, f32>) -> Result<CamOutput> {
        let (batch, _, height, width) = image.dim();
        if batch != 1 {
            return Err(CamError::BatchSizeError(batch));
        }
        if height == 0 || width == 0 {
            return Err(CamError::InvalidDimensions(width, height));
        }

        self.tap.take();
        let scores = self.model.forward(image, &mut self.tap)?;
        let snapshot = self.tap.take().ok_or(CamError::EmptyBatchError)?;

        let weights = self.model.classifier_weights();
        if scores.len() != weights.nrows() {
            return Err(CamError::ShapeMismatchError(format!(
                "classifier returned {} scores for {} weight rows",
                scores.len(),
                weights.nrows()
            )));
        }
        let predicted_class = argmax_first(scores.view()).ok_or_else(|| {
            CamError::ShapeMismatchError("classifier returned no comparable scores".to_string())
        })?;
        debug!(predicted_class, snapshot = ?snapshot.shape(), "Forward pass complete");

        let raw_map = weighted_channel_sum(snapshot.view(), weights.row(predicted_class))?;
        let resized = resize_cubic(raw_map.view(), height, width)?;
        let normalized = normalize_to_u8(resized.view(), self.epsilon);

        if normalized.degenerate {
            warn!(
                min = normalized.min,
                max = normalized.max,
                "Importance map is flat, heatmap will be uniform"
            );
        }

        let heatmap = self.colormap.apply(normalized.intensity.view());

        Ok(CamOutput {
            predicted_class,
            scores,
            raw_map,
            intensity: normalized.intensity,
            heatmap,
            degenerate: normalized.degenerate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cam_pipeline::classifier::{
        PointwiseGapNet, StageDescriptor, StageKind, StageObserver,
    };
    use ndarray::{Array1, Array2, Array3, Array4, ArrayView2, Axis, arr1, arr2, s};

    /// Classifier that reports a fixed feature map and scores it with its own head.
    struct ScriptedClassifier {
        stages: Vec<StageDescriptor>,
        features: Array3<f32>,
        weights: Array2<f32>,
        scores: Array1<f32>,
        emit: bool,
    }

    impl ScriptedClassifier {
        fn new(features: Array3<f32>, weights: Array2<f32>, scores: Array1<f32>) -> Self {
            Self {
                stages: vec![
                    StageDescriptor::new(0, StageKind::Projection, "features"),
                    StageDescriptor::new(1, StageKind::GlobalAvgPool, "gap"),
                    StageDescriptor::new(2, StageKind::Linear, "fc"),
                ],
                features,
                weights,
                scores,
                emit: true,
            }
        }
    }

    impl GapClassifier for ScriptedClassifier {
        fn stages(&self) -> &[StageDescriptor] {
            &self.stages
        }

        fn classifier_weights(&self) -> ArrayView2<'_, f32> {
            self.weights.view()
        }

        fn forward(&self, _image: ArrayView4<'_, f32>, observer: &mut dyn StageObserver) -> Result<Array1<f32>> {
            if self.emit {
                let batched = self.features.clone().insert_axis(Axis(0));
                observer.observe(StageId(1), batched.view());
            }
            Ok(self.scores.clone())
        }
    }

    #[test]
    fn test_end_to_end_identity_head() {
        let features = Array3::from_shape_vec((2, 1, 1), vec![4.0, 1.0]).unwrap();
        let model = ScriptedClassifier::new(
            features,
            arr2(&[[1.0, 0.0], [0.0, 1.0]]),
            arr1(&[4.0, 1.0]),
        );
        let mut engine = CamEngine::new(&model).unwrap();
        let image = Array4::<f32>::zeros((1, 3, 2, 2));

        let output = engine.compute_heatmap(image.view()).unwrap();

        assert_eq!(output.predicted_class, 0);
        assert_eq!(output.raw_map, arr2(&[[4.0]]));
        assert!(output.degenerate);
        assert!(output.intensity.iter().all(|&v| v == 0));
        assert_eq!((output.heatmap.width, output.heatmap.height), (2, 2));
        assert!(output.heatmap.pixels().all(|p| p == [68, 1, 84]));
    }

    #[test]
    fn test_heatmap_matches_input_resolution() {
        let model = PointwiseGapNet::new(
            arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            arr1(&[0.0, 0.0]),
            arr2(&[[1.0, -1.0], [-1.0, 1.0]]),
            arr1(&[0.0, 0.0]),
            8,
        )
        .unwrap();
        let mut engine = CamEngine::new(&model).unwrap();

        for &(h, w) in &[(32usize, 32usize), (40, 24), (9, 17)] {
            let image = Array4::from_shape_fn((1, 3, h, w), |(_, c, y, x)| (c + y + x) as f32 * 0.1);
            let output = engine.compute_heatmap(image.view()).unwrap();
            assert_eq!(output.intensity.dim(), (h, w));
            assert_eq!((output.heatmap.height, output.heatmap.width), (h, w));
            assert_eq!(output.heatmap.data.len(), h * w * 3);
        }
    }

    #[test]
    fn test_heatmap_highlights_class_evidence() {
        // Class 0 responds to red, so the red right half must come out hottest.
        let model = PointwiseGapNet::new(
            arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            arr1(&[0.0, 0.0]),
            arr2(&[[1.0, 0.0], [0.0, 1.0]]),
            arr1(&[0.0, 0.0]),
            4,
        )
        .unwrap();
        let mut image = Array4::<f32>::zeros((1, 3, 16, 16));
        image.slice_mut(s![0, 0, .., 8..]).fill(1.0);
        image.slice_mut(s![0, 1, .., ..8]).fill(0.2);

        let mut engine = CamEngine::new(&model).unwrap();
        let output = engine.compute_heatmap(image.view()).unwrap();

        assert_eq!(output.predicted_class, 0);
        assert!(!output.degenerate);
        assert!(output.intensity[[8, 15]] > 200);
        assert!(output.intensity[[8, 0]] < 50);
        assert!(output.heatmap.pixel(15, 8)[1] > output.heatmap.pixel(0, 8)[1]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let model = PointwiseGapNet::new(
            arr2(&[[0.5, -0.25, 1.0], [1.0, 1.0, -1.0]]),
            arr1(&[0.1, 0.0]),
            arr2(&[[0.3, -0.7], [1.2, 0.4], [-0.5, 0.5]]),
            arr1(&[0.0, 0.1, -0.1]),
            4,
        )
        .unwrap();
        let image = Array4::from_shape_fn((1, 3, 20, 20), |(_, c, y, x)| {
            ((c * 7 + y * 3 + x) % 11) as f32 / 11.0
        });
        let mut engine = CamEngine::new(&model).unwrap();

        let first = engine.compute_heatmap(image.view()).unwrap();
        let second = engine.compute_heatmap(image.view()).unwrap();

        assert_eq!(first.predicted_class, second.predicted_class);
        assert_eq!(first.raw_map, second.raw_map);
        assert_eq!(first.heatmap, second.heatmap);
    }

    #[test]
    fn test_missing_snapshot_is_empty_batch() {
        let features = Array3::from_elem((2, 1, 1), 1.0);
        let mut model = ScriptedClassifier::new(features, arr2(&[[1.0, 0.0], [0.0, 1.0]]), arr1(&[1.0, 1.0]));
        model.emit = false;
        let mut engine = CamEngine::new(&model).unwrap();

        let result = engine.compute_heatmap(Array4::<f32>::zeros((1, 1, 2, 2)).view());
        assert!(matches!(result, Err(CamError::EmptyBatchError)));
    }

    #[test]
    fn test_channel_mismatch_is_reported() {
        let features = Array3::from_elem((3, 2, 2), 1.0);
        let model = ScriptedClassifier::new(features, arr2(&[[1.0, 0.0], [0.0, 1.0]]), arr1(&[1.0, 1.0]));
        let mut engine = CamEngine::new(&model).unwrap();

        let result = engine.compute_heatmap(Array4::<f32>::zeros((1, 1, 4, 4)).view());
        assert!(matches!(result, Err(CamError::ShapeMismatchError(_))));
    }

    #[test]
    fn test_rejects_batches_other_than_one() {
        let features = Array3::from_elem((2, 1, 1), 1.0);
        let model = ScriptedClassifier::new(features, arr2(&[[1.0, 0.0], [0.0, 1.0]]), arr1(&[1.0, 1.0]));
        let mut engine = CamEngine::new(&model).unwrap();

        let result = engine.compute_heatmap(Array4::<f32>::zeros((2, 1, 4, 4)).view());
        assert!(matches!(result, Err(CamError::BatchSizeError(2))));
    }

    #[test]
    fn test_explicit_anchor_on_multi_pool_model() {
        let features = Array3::from_elem((2, 1, 1), 1.0);
        let mut model = ScriptedClassifier::new(features, arr2(&[[1.0, 0.0], [0.0, 1.0]]), arr1(&[1.0, 1.0]));
        model.stages.insert(1, StageDescriptor::new(5, StageKind::GlobalAvgPool, "block_gap"));

        assert!(matches!(CamEngine::new(&model), Err(CamError::ConfigurationError(_))));
        let engine = CamEngine::with_anchor(&model, StageId(1)).unwrap();
        assert_eq!(engine.anchor(), StageId(1));
    }
}
