use ndarray::{Array2, ArrayView1, ArrayView3, Axis};
use crate::cam_pipeline::common::error::{CamError, Result};

/// Index of the highest score; the first one wins on ties and NaN never wins.
pub fn argmax_first(scores: ArrayView1<'_, f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Sums the `[C, H, W]` snapshot over channels, weighting channel `c` by `weights[c]`.
pub fn weighted_channel_sum(snapshot: ArrayView3<'_, f32>, weights: ArrayView1<'_, f32>) -> Result<Array2<f32>> {
    let (channels, height, width) = snapshot.dim();
    if channels != weights.len() {
        return Err(CamError::ShapeMismatchError(format!(
            "activation snapshot has {} channels, class weight vector has {}",
            channels,
            weights.len()
        )));
    }

    let mut map = Array2::<f32>::zeros((height, width));
    for (channel, &weight) in snapshot.axis_iter(Axis(0)).zip(weights.iter()) {
        map.scaled_add(weight, &channel);
    }
    Ok(map)
}
