//! Bicubic resampling of single-channel maps.
//!
//! Pixel centers are aligned (`src = (dst + 0.5) * in / out - 0.5`), the kernel uses
//! `A = -0.75` and out-of-range taps replicate the border.

use ndarray::{Array2, ArrayView2};
use crate::cam_pipeline::common::error::{CamError, Result};

const CUBIC_A: f32 = -0.75;

/// Source taps and kernel weights for one output coordinate.
#[derive(Debug, Clone, Copy)]
struct Taps {
    anchor: usize,
    index: [usize; 4],
    weight: [f32; 4],
}

fn cubic_weights(t: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let w2 = ((a + 2.0) * (1.0 - t) - (a + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len as isize - 1;

    (0..dst_len)
        .map(|d| {
            let pos = (d as f32 + 0.5) * scale - 0.5;
            let base = pos.floor();
            let t = pos - base;
            let base = base as isize;
            let clamp = |i: isize| i.clamp(0, last) as usize;
            Taps {
                anchor: clamp(base),
                index: [clamp(base - 1), clamp(base), clamp(base + 1), clamp(base + 2)],
                weight: cubic_weights(t),
            }
        })
        .collect()
}

// Interpolating offsets from the anchor tap keeps flat regions exactly flat.
fn sample(values: impl Fn(usize) -> f32, taps: &Taps) -> f32 {
    let anchor = values(taps.anchor);
    let delta: f32 = taps
        .index
        .iter()
        .zip(taps.weight.iter())
        .map(|(&i, &w)| w * (values(i) - anchor))
        .sum();
    anchor + delta
}

/// Resamples `map` to `height` x `width`.
pub fn resize_cubic(map: ArrayView2<'_, f32>, height: usize, width: usize) -> Result<Array2<f32>> {
    let (src_h, src_w) = map.dim();
    if src_h == 0 || src_w == 0 {
        return Err(CamError::InvalidDimensions(src_w, src_h));
    }
    if height == 0 || width == 0 {
        return Err(CamError::InvalidDimensions(width, height));
    }
    if (src_h, src_w) == (height, width) {
        return Ok(map.to_owned());
    }

    let x_taps = taps(src_w, width);
    let y_taps = taps(src_h, height);

    let horizontal = Array2::from_shape_fn((src_h, width), |(y, x)| {
        sample(|i| map[[y, i]], &x_taps[x])
    });

    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        sample(|i| horizontal[[i, x]], &y_taps[y])
    }))
}
