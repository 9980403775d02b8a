//! Activation tap for the pooling anchor of a GAP classifier.

use ndarray::{Array3, ArrayView4, Axis};
use tracing::{debug, trace};

use crate::cam_pipeline::common::error::{CamError, Result};
use crate::cam_pipeline::classifier::{StageDescriptor, StageId, StageKind, StageObserver};

/// Single-slot capture of the feature map entering one pooling stage.
///
/// Each observation of the anchor stage replaces the previous snapshot.
#[derive(Debug)]
pub struct ActivationTap {
    anchor: StageId,
    snapshot: Option<Array3<f32>>,
}

impl ActivationTap {
    /// Attaches to `anchor`, or to the only global-average-pooling stage when `anchor` is `None`.
    pub fn attach(stages: &[StageDescriptor], anchor: Option<StageId>) -> Result<Self> {
        let stage = match anchor {
            Some(id) => {
                let stage = stages.iter().find(|s| s.id == id).ok_or_else(|| {
                    CamError::ConfigurationError(format!("stage {} does not exist", id))
                })?;
                if stage.kind != StageKind::GlobalAvgPool {
                    return Err(CamError::ConfigurationError(format!(
                        "stage {} ({}) is {:?}, not a global average pooling stage",
                        id, stage.name, stage.kind
                    )));
                }
                stage
            }
            None => {
                let pools: Vec<&StageDescriptor> = stages
                    .iter()
                    .filter(|s| s.kind == StageKind::GlobalAvgPool)
                    .collect();
                match pools.as_slice() {
                    [only] => *only,
                    _ => {
                        return Err(CamError::ConfigurationError(format!(
                            "expected exactly one global average pooling stage, found {}",
                            pools.len()
                        )));
                    }
                }
            }
        };

        debug!(anchor = %stage.id, name = %stage.name, "Activation tap attached");

        Ok(Self {
            anchor: stage.id,
            snapshot: None,
        })
    }

    pub fn anchor(&self) -> StageId {
        self.anchor
    }

    pub fn snapshot(&self) -> Option<&Array3<f32>> {
        self.snapshot.as_ref()
    }

    /// Moves the snapshot out, leaving the slot empty.
    pub fn take(&mut self) -> Option<Array3<f32>> {
        self.snapshot.take()
    }
}

impl StageObserver for ActivationTap {
    fn observe(&mut self, stage: StageId, input: ArrayView4<'_, f32>) {
        if stage != self.anchor || input.len_of(Axis(0)) == 0 {
            return;
        }
        trace!(shape = ?input.shape(), "Capturing pooling input");
        self.snapshot = Some(input.index_axis(Axis(0), 0).to_owned());
    }
}
