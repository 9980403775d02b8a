//! Viridis lookup table for 8-bit intensity maps.

use ndarray::ArrayView2;
use crate::cam_pipeline::common::types::RgbImage;

/// Canonical viridis colours at evenly spaced positions from 0 to 1.
const VIRIDIS_ANCHORS: [[u8; 3]; 8] = [
    [68, 1, 84],
    [70, 50, 127],
    [54, 92, 141],
    [39, 127, 143],
    [31, 162, 136],
    [74, 194, 110],
    [160, 219, 57],
    [254, 232, 37],
];

/// 256-entry colour lookup table
#[derive(Debug, Clone)]
pub struct Colormap {
    lut: [[u8; 3]; 256],
}

impl Colormap {
    /// Builds a table by linear interpolation between evenly spaced anchor colours.
    pub fn from_anchors(anchors: &[[u8; 3]]) -> Self {
        let mut lut = [[0u8; 3]; 256];
        match anchors {
            [] => {}
            [only] => lut = [*only; 256],
            _ => {
                let segments = (anchors.len() - 1) as f32;
                for (i, entry) in lut.iter_mut().enumerate() {
                    let pos = i as f32 / 255.0 * segments;
                    let lower = (pos.floor() as usize).min(anchors.len() - 2);
                    let t = pos - lower as f32;
                    let (c0, c1) = (anchors[lower], anchors[lower + 1]);
                    let lerp = |a: u8, b: u8| (a as f32 + t * (b as f32 - a as f32)).round() as u8;
                    *entry = [lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2])];
                }
            }
        }
        Self { lut }
    }

    pub fn viridis() -> Self {
        Self::from_anchors(&VIRIDIS_ANCHORS)
    }

    pub fn color(&self, intensity: u8) -> [u8; 3] {
        self.lut[intensity as usize]
    }

    /// Maps every intensity to its colour, producing an image of the same size.
    pub fn apply(&self, intensity: ArrayView2<'_, u8>) -> RgbImage {
        let (height, width) = intensity.dim();
        let data = intensity.iter().flat_map(|&v| self.color(v)).collect();
        RgbImage { width, height, data }
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::viridis()
    }
}
