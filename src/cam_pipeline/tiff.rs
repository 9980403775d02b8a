//! TIFF I/O module
//!
//! Reads input images and writes heatmap panels as 8-bit RGB TIFF files.

mod reader;
mod tiff_reader;
mod writer;
mod standard_tiff_writer;
pub mod types;

pub use reader::ImageReader;
pub use tiff_reader::TiffImageReader;
pub use writer::HeatmapWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{CamConfig, CamConfigBuilder, PanelLayout, TiffCompression};
