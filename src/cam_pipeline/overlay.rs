//! Compositing helpers for presenting a heatmap next to its input.

use ndarray::ArrayView4;

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::common::types::RgbImage;
use crate::cam_pipeline::preprocess::Normalization;

/// Undoes input normalization, giving back a displayable RGB image.
pub fn denormalize(image: ArrayView4<'_, f32>, normalization: &Normalization) -> Result<RgbImage> {
    let (batch, channels, height, width) = image.dim();
    if batch == 0 {
        return Err(CamError::BatchSizeError(0));
    }
    if channels != 3 {
        return Err(CamError::UnsupportedFormat(format!(
            "cannot display a {}-channel image as RGB",
            channels
        )));
    }

    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let v = image[[0, c, y, x]] * normalization.std[c] + normalization.mean[c];
                data.push((255.0 * v).clamp(0.0, 255.0) as u8);
            }
        }
    }
    RgbImage::new(width, height, data)
}

/// Mixes `alpha` of `base` with `1 - alpha` of `heatmap`.
pub fn blend(base: &RgbImage, heatmap: &RgbImage, alpha: f32) -> Result<RgbImage> {
    if (base.width, base.height) != (heatmap.width, heatmap.height) {
        return Err(CamError::InvalidDimensions(heatmap.width, heatmap.height));
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let data = base
        .data
        .iter()
        .zip(heatmap.data.iter())
        .map(|(&b, &h)| (alpha * b as f32 + (1.0 - alpha) * h as f32).round().clamp(0.0, 255.0) as u8)
        .collect();
    RgbImage::new(base.width, base.height, data)
}

/// Places equally tall images side by side, left to right.
pub fn hstack(panels: &[&RgbImage]) -> Result<RgbImage> {
    let Some(first) = panels.first() else {
        return Err(CamError::InvalidDimensions(0, 0));
    };
    let height = first.height;
    if let Some(odd) = panels.iter().find(|p| p.height != height) {
        return Err(CamError::InvalidDimensions(odd.width, odd.height));
    }

    let width: usize = panels.iter().map(|p| p.width).sum();
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for panel in panels {
            let row = y * panel.width * 3;
            data.extend_from_slice(&panel.data[row..row + panel.width * 3]);
        }
    }
    RgbImage::new(width, height, data)
}
