use ndarray::{Array2, ArrayView2};

/// Guard added to the value range so a flat map does not divide by zero.
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Result of rescaling an importance map to 8-bit intensities
#[derive(Debug, Clone)]
pub struct NormalizedMap {
    pub intensity: Array2<u8>,
    pub min: f32,
    pub max: f32,
    /// Set when the map was flat, so every pixel collapsed to (nearly) zero
    pub degenerate: bool,
}

/// Rescales `map` so its minimum lands on 0 and its maximum on 255.
///
/// Each value becomes `(v - min) / (max - min + epsilon) * 255`, truncated toward
/// zero. NaN entries are skipped when finding the range and map to 0.
pub fn normalize_to_u8(map: ArrayView2<'_, f32>, epsilon: f32) -> NormalizedMap {
    let (min, max) = map
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min > max {
        return NormalizedMap {
            intensity: Array2::zeros(map.dim()),
            min: 0.0,
            max: 0.0,
            degenerate: true,
        };
    }

    let range = max - min;
    let degenerate = range <= f32::EPSILON * max.abs().max(min.abs()).max(1.0);
    let denom = range + epsilon;

    let intensity = map.mapv(|v| ((v - min) / denom * 255.0).clamp(0.0, 255.0) as u8);

    NormalizedMap {
        intensity,
        min,
        max,
        degenerate,
    }
}
