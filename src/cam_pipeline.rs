//! Class activation map pipeline module
//!
//! The core is the activation tap and the CAM engine. Around it sit the classifier
//! boundary, preprocessing, compositing, TIFF I/O and the file-to-file orchestration.

pub mod classifier;
pub mod common;
pub mod conversions;
pub mod engine;
pub mod overlay;
pub mod preprocess;
pub mod tap;
pub mod tiff;

pub use common::{
    CamError,
    Result,
    RgbImage,
};

pub use classifier::{
    GapClassifier,
    NullObserver,
    PointwiseGapNet,
    StageDescriptor,
    StageId,
    StageKind,
    StageObserver,
};

pub use tap::ActivationTap;

pub use engine::{
    CamEngine,
    CamOutput,
    Colormap,
};

pub use preprocess::{Normalization, to_tensor};

pub use overlay::{blend, denormalize, hstack};

pub use tiff::{
    CamConfig,
    CamConfigBuilder,
    HeatmapWriter,
    ImageReader,
    PanelLayout,
    StandardTiffWriter,
    TiffCompression,
    TiffImageReader,
};

pub use conversions::{
    CamPipeline,
    CamReport,
};
