//! Conversion of RGB8 images into normalized channel-first tensors.

use ndarray::{Array2, Array4, Axis};
use tracing::debug;

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::common::types::RgbImage;
use crate::cam_pipeline::engine::resize_cubic;

/// Per-channel normalization applied as `(x - mean) / std` on values in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            mean: [0.5, 0.5, 0.5],
            std: [0.5, 0.5, 0.5],
        }
    }
}

impl Normalization {
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.std.iter().position(|&s| s == 0.0 || !s.is_finite()) {
            return Err(CamError::ConfigurationError(format!(
                "standard deviation of channel {} must be finite and non-zero",
                c
            )));
        }
        Ok(())
    }
}

/// Builds a `[1, 3, H, W]` tensor from `image`, resizing to `size` (height, width) first
/// when given.
pub fn to_tensor(image: &RgbImage, normalization: &Normalization, size: Option<(usize, usize)>) -> Result<Array4<f32>> {
    normalization.validate()?;
    if image.width == 0 || image.height == 0 {
        return Err(CamError::InvalidDimensions(image.width, image.height));
    }
    if image.data.len() != image.width * image.height * 3 {
        return Err(CamError::ShapeMismatchError(format!(
            "RGB buffer of {} bytes does not match {}x{}x3",
            image.data.len(),
            image.width,
            image.height
        )));
    }

    let (height, width) = size.unwrap_or((image.height, image.width));
    debug!(
        src_width = image.width,
        src_height = image.height,
        width,
        height,
        "Preparing input tensor"
    );

    let mut tensor = Array4::<f32>::zeros((1, 3, height, width));
    for (c, mut out) in tensor.index_axis_mut(Axis(0), 0).outer_iter_mut().enumerate() {
        let plane = Array2::from_shape_fn((image.height, image.width), |(y, x)| {
            image.data[(y * image.width + x) * 3 + c] as f32 / 255.0
        });
        let plane = resize_cubic(plane.view(), height, width)?;
        let (mean, std) = (normalization.mean[c], normalization.std[c]);
        out.assign(&plane.mapv(|v| (v - mean) / std));
    }

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_each_channel() {
        let image = RgbImage::filled(2, 2, [255, 0, 51]);
        let tensor = to_tensor(&image, &Normalization::default(), None).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 2, 2]);
        assert_eq!(tensor[[0, 0, 1, 1]], 1.0);
        assert_eq!(tensor[[0, 1, 0, 0]], -1.0);
        assert!((tensor[[0, 2, 0, 1]] - (-0.6)).abs() < 1e-6);
    }

    #[test]
    fn test_resizes_to_requested_size() {
        let image = RgbImage::filled(5, 3, [128, 128, 128]);
        let tensor = to_tensor(&image, &Normalization::default(), Some((16, 8))).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 16, 8]);
    }

    #[test]
    fn test_zero_std_is_rejected() {
        let image = RgbImage::filled(1, 1, [0, 0, 0]);
        let normalization = Normalization {
            mean: [0.0; 3],
            std: [1.0, 0.0, 1.0],
        };
        let result = to_tensor(&image, &normalization, None);
        assert!(matches!(result, Err(CamError::ConfigurationError(_))));
    }
}
