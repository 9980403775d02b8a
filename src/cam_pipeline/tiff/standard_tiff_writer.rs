use std::io::Write;
use tracing::debug;
use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::common::types::RgbImage;
use crate::cam_pipeline::tiff::types::{CamConfig, TiffCompression};
use crate::cam_pipeline::tiff::writer::HeatmapWriter;

pub struct StandardTiffWriter;

impl HeatmapWriter for StandardTiffWriter {
    fn write_rgb(&self, image: &RgbImage, output: &mut dyn Write, config: &CamConfig) -> Result<()> {
        debug!("Encoding RGB TIFF image: {}x{}", image.width, image.height);

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| CamError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(2) = config.predictor {
            encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
        }

        encoder.write_image::<tiff::encoder::colortype::RGB8>(
            image.width as u32,
            image.height as u32,
            &image.data,
        ).map_err(|e| CamError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!(bytes = buffer.len(), "TIFF encoding complete");
        Ok(())
    }
}
