use crate::cam_pipeline::common::error::Result;
use crate::cam_pipeline::common::types::RgbImage;

pub trait ImageReader {
    fn read_image(&self, data: &[u8]) -> Result<RgbImage>;
}
