//! Types produced by the CAM engine

use ndarray::{Array1, Array2};
use crate::cam_pipeline::common::types::RgbImage;

/// Everything derived from one CAM computation
#[derive(Debug, Clone)]
pub struct CamOutput {
    /// Arg-max of `scores`, first index on ties
    pub predicted_class: usize,
    /// Class scores returned by the classifier
    pub scores: Array1<f32>,
    /// Weighted channel sum at feature-map resolution
    pub raw_map: Array2<f32>,
    /// Normalized map at input resolution
    pub intensity: Array2<u8>,
    /// Colorized heatmap at input resolution
    pub heatmap: RgbImage,
    /// The importance map was flat, so the heatmap is a single low-intensity colour
    pub degenerate: bool,
}
