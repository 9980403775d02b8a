//! Pipeline conversions module
//!
//! This module contains orchestration logic from an input image to a written heatmap panel.

mod cam_to_tiff;


pub use cam_to_tiff::{CamPipeline, CamReport};
