//! Reference GAP classifier built from a pointwise projection.
//!
//! Architecture, in evaluation order:
//! 1. patch-average downsampling by `stride`, then a 1x1 projection with bias and ReLU
//! 2. global average pooling over height and width
//! 3. one linear layer with bias

use ndarray::{Array1, Array2, Array4, ArrayView2, ArrayView4, Axis, s};
use tracing::debug;

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::classifier::model::{GapClassifier, StageObserver};
use crate::cam_pipeline::classifier::stage::{StageDescriptor, StageKind};

const PROJECTION_STAGE: u32 = 0;
const POOLING_STAGE: u32 = 1;
const LINEAR_STAGE: u32 = 2;

#[derive(Debug, Clone)]
pub struct PointwiseGapNet {
    /// `[num_feature_channels, input_channels]`
    projection: Array2<f32>,
    projection_bias: Array1<f32>,
    /// `[num_classes, num_feature_channels]`
    fc_weight: Array2<f32>,
    fc_bias: Array1<f32>,
    stride: usize,
    stages: Vec<StageDescriptor>,
}

impl PointwiseGapNet {
    pub fn new(
        projection: Array2<f32>,
        projection_bias: Array1<f32>,
        fc_weight: Array2<f32>,
        fc_bias: Array1<f32>,
        stride: usize,
    ) -> Result<Self> {
        if stride == 0 {
            return Err(CamError::ConfigurationError("stride must be at least 1".to_string()));
        }
        if projection.nrows() == 0 || projection.ncols() == 0 {
            return Err(CamError::ConfigurationError("projection matrix is empty".to_string()));
        }
        if projection_bias.len() != projection.nrows() {
            return Err(CamError::ConfigurationError(format!(
                "projection bias has {} entries, projection has {} output channels",
                projection_bias.len(),
                projection.nrows()
            )));
        }
        if fc_weight.nrows() == 0 {
            return Err(CamError::ConfigurationError("classifier has no classes".to_string()));
        }
        if fc_weight.ncols() != projection.nrows() {
            return Err(CamError::ConfigurationError(format!(
                "classifier expects {} feature channels, projection produces {}",
                fc_weight.ncols(),
                projection.nrows()
            )));
        }
        if fc_bias.len() != fc_weight.nrows() {
            return Err(CamError::ConfigurationError(format!(
                "classifier bias has {} entries for {} classes",
                fc_bias.len(),
                fc_weight.nrows()
            )));
        }

        let stages = vec![
            StageDescriptor::new(PROJECTION_STAGE, StageKind::Projection, "pointwise_projection"),
            StageDescriptor::new(POOLING_STAGE, StageKind::GlobalAvgPool, "global_avg_pool"),
            StageDescriptor::new(LINEAR_STAGE, StageKind::Linear, "fc"),
        ];

        Ok(Self {
            projection,
            projection_bias,
            fc_weight,
            fc_bias,
            stride,
            stages,
        })
    }

    pub fn input_channels(&self) -> usize {
        self.projection.ncols()
    }

    pub fn feature_channels(&self) -> usize {
        self.projection.nrows()
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn downsample(&self, image: ArrayView4<'_, f32>) -> Array4<f32> {
        let (n, c, h, w) = image.dim();
        let s = self.stride;
        let (out_h, out_w) = (h.div_ceil(s), w.div_ceil(s));

        Array4::from_shape_fn((n, c, out_h, out_w), |(b, ch, y, x)| {
            let y_end = ((y + 1) * s).min(h);
            let x_end = ((x + 1) * s).min(w);
            image
                .slice(s![b, ch, y * s..y_end, x * s..x_end])
                .mean()
                .unwrap_or(0.0)
        })
    }

    fn project(&self, downsampled: &Array4<f32>) -> Array4<f32> {
        let (n, _, h, w) = downsampled.dim();
        let mut features = Array4::<f32>::zeros((n, self.feature_channels(), h, w));

        for (mut item, source) in features.outer_iter_mut().zip(downsampled.outer_iter()) {
            for (f, mut out) in item.outer_iter_mut().enumerate() {
                out.fill(self.projection_bias[f]);
                for (c, channel) in source.outer_iter().enumerate() {
                    out.scaled_add(self.projection[[f, c]], &channel);
                }
                out.mapv_inplace(|v| v.max(0.0));
            }
        }

        features
    }
}

impl GapClassifier for PointwiseGapNet {
    fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    fn classifier_weights(&self) -> ArrayView2<'_, f32> {
        self.fc_weight.view()
    }

    fn forward(&self, image: ArrayView4<'_, f32>, observer: &mut dyn StageObserver) -> Result<Array1<f32>> {
        let (n, c, h, w) = image.dim();
        if n == 0 {
            return Err(CamError::BatchSizeError(0));
        }
        if h == 0 || w == 0 {
            return Err(CamError::InvalidDimensions(w, h));
        }
        if c != self.input_channels() {
            return Err(CamError::ShapeMismatchError(format!(
                "image has {} channels, projection expects {}",
                c,
                self.input_channels()
            )));
        }

        let features = self.project(&self.downsample(image));
        debug!(shape = ?features.shape(), "Feature map ready for pooling");

        observer.observe(self.stages[POOLING_STAGE as usize].id, features.view());

        let pooled = features
            .mean_axis(Axis(3))
            .and_then(|m| m.mean_axis(Axis(2)))
            .ok_or_else(|| CamError::ShapeMismatchError("cannot pool an empty feature map".to_string()))?;

        Ok(self.fc_weight.dot(&pooled.row(0)) + &self.fc_bias)
    }
}
