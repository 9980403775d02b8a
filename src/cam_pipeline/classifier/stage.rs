//! Stage descriptors published by classifiers

use std::fmt;

/// Identifier of a stage inside one classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(pub u32);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a stage computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Spatial feature extraction (convolutions, pointwise projections)
    Projection,
    /// Global average pooling over height and width
    GlobalAvgPool,
    /// Fully connected classifier layer
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    pub id: StageId,
    pub kind: StageKind,
    /// Human readable name, used in log and error messages
    pub name: String,
}

impl StageDescriptor {
    pub fn new(id: u32, kind: StageKind, name: impl Into<String>) -> Self {
        Self {
            id: StageId(id),
            kind,
            name: name.into(),
        }
    }
}
