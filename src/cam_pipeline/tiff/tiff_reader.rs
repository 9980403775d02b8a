//! Input image reader backed by the `tiff` decoder.
//!
//! Accepts 8-bit RGB, RGBA and grayscale images and always hands back interleaved RGB.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::common::types::RgbImage;
use crate::cam_pipeline::tiff::reader::ImageReader;

pub struct TiffImageReader;

impl ImageReader for TiffImageReader {
    fn read_image(&self, data: &[u8]) -> Result<RgbImage> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| CamError::DecodeError(e.to_string()))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| CamError::DecodeError(e.to_string()))?;
        let color_type = decoder
            .colortype()
            .map_err(|e| CamError::DecodeError(e.to_string()))?;

        debug!("Decoded header: {}x{} {:?}", width, height, color_type);

        let samples = match decoder
            .read_image()
            .map_err(|e| CamError::DecodeError(e.to_string()))?
        {
            DecodingResult::U8(samples) => samples,
            _ => {
                return Err(CamError::UnsupportedFormat(format!(
                    "{:?} samples are not 8-bit",
                    color_type
                )));
            }
        };

        let rgb: Vec<u8> = match color_type {
            ColorType::RGB(8) => samples,
            ColorType::RGBA(8) => samples
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
            ColorType::Gray(8) => samples.iter().flat_map(|&v| [v, v, v]).collect(),
            other => {
                return Err(CamError::UnsupportedFormat(format!("{:?}", other)));
            }
        };

        RgbImage::new(width as usize, height as usize, rgb)
    }
}
