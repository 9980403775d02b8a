//! Classifier boundary module
//!
//! A classifier publishes its stages up front so callers can pick the pooling
//! anchor explicitly, and reports pooling-stage inputs to a [`StageObserver`]
//! while it runs.

mod model;
mod pointwise;
pub mod stage;

pub use model::{GapClassifier, NullObserver, StageObserver};
pub use pointwise::PointwiseGapNet;
pub use stage::{StageDescriptor, StageId, StageKind};
