pub mod cam_pipeline;
pub mod logger;
