//! CAM pipeline configuration types

use crate::cam_pipeline::engine::DEFAULT_EPSILON;
use crate::cam_pipeline::preprocess::Normalization;

/// TIFF compression methods
#[derive(Debug, Clone, Copy)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// What the written image contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLayout {
    /// Colorized heatmap alone
    HeatmapOnly,
    /// Heatmap blended over the input
    Overlay,
    /// Input, heatmap and blend side by side
    SideBySide,
}

/// Configuration for the CAM pipeline
#[derive(Debug, Clone)]
pub struct CamConfig {
    /// Resize input to (height, width) before inference; `None` keeps the decoded size
    pub image_size: Option<(usize, usize)>,
    /// Normalization the classifier was trained with
    pub normalization: Normalization,
    /// Weight of the input image when blending; the heatmap gets `1 - alpha`
    pub alpha: f32,
    /// Range guard used when normalizing the importance map
    pub epsilon: f32,
    pub layout: PanelLayout,
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (2 selects horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to reject empty images before inference
    pub validate_dimensions: bool,
}

impl Default for CamConfig {
    fn default() -> Self {
        Self {
            image_size: None,
            normalization: Normalization::default(),
            alpha: 0.5,
            epsilon: DEFAULT_EPSILON,
            layout: PanelLayout::SideBySide,
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
        }
    }
}

impl CamConfig {
    pub fn builder() -> CamConfigBuilder {
        CamConfigBuilder::default()
    }
}

/// Builder for CamConfig
#[derive(Default)]
pub struct CamConfigBuilder {
    image_size: Option<Option<(usize, usize)>>,
    normalization: Option<Normalization>,
    alpha: Option<f32>,
    epsilon: Option<f32>,
    layout: Option<PanelLayout>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
}

impl CamConfigBuilder {
    pub fn image_size(mut self, size: Option<(usize, usize)>) -> Self {
        self.image_size = Some(size);
        self
    }

    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn layout(mut self, layout: PanelLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> CamConfig {
        let default = CamConfig::default();
        CamConfig {
            image_size: self.image_size.unwrap_or(default.image_size),
            normalization: self.normalization.unwrap_or(default.normalization),
            alpha: self.alpha.unwrap_or(default.alpha),
            epsilon: self.epsilon.unwrap_or(default.epsilon),
            layout: self.layout.unwrap_or(default.layout),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
