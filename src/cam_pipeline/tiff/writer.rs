use std::io::Write;
use crate::cam_pipeline::common::error::Result;
use crate::cam_pipeline::common::types::RgbImage;
use crate::cam_pipeline::tiff::types::CamConfig;

pub trait HeatmapWriter {
    fn write_rgb(&self, image: &RgbImage, output: &mut dyn Write, config: &CamConfig) -> Result<()>;
}
