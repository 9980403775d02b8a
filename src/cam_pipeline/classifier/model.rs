use ndarray::{Array1, ArrayView2, ArrayView4};
use crate::cam_pipeline::common::error::Result;
use crate::cam_pipeline::classifier::stage::{StageDescriptor, StageId};

/// Receives the input tensor of pooling stages during a forward pass.
pub trait StageObserver {
    fn observe(&mut self, stage: StageId, input: ArrayView4<'_, f32>);
}

/// Observer that discards everything, for plain inference.
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn observe(&mut self, _stage: StageId, _input: ArrayView4<'_, f32>) {}
}

/// A convolutional classifier ending in global average pooling and one linear layer.
///
/// Implementations must call [`StageObserver::observe`] with the `[N, C, H, W]`
/// input of every global-average-pooling stage they evaluate.
pub trait GapClassifier {
    /// Stages in evaluation order.
    fn stages(&self) -> &[StageDescriptor];

    /// Final linear layer weights, `[num_classes, num_feature_channels]`.
    fn classifier_weights(&self) -> ArrayView2<'_, f32>;

    /// Runs inference on a `[N, C, H, W]` image batch, returning one score per class
    /// for the first batch item.
    fn forward(&self, image: ArrayView4<'_, f32>, observer: &mut dyn StageObserver) -> Result<Array1<f32>>;

    fn num_classes(&self) -> usize {
        self.classifier_weights().nrows()
    }
}
