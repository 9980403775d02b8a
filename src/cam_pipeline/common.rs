//! Common utilities module
//!
//! Shared error types and the RGB image container used across the CAM pipeline.

pub mod error;
pub mod types;

pub use error::{CamError, Result};
pub use types::RgbImage;
