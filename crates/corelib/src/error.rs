//! Core errors (renderer-agnostic).

use thiserror::Error;

use crate::Vec3;
use crate::hierarchy::TransformId;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Scale components must be finite and positive, got {scale}")]
    InvalidScale { scale: Vec3 },
    #[error("Transform {0:?} does not belong to this tree")]
    UnknownTransform(TransformId),
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        child: TransformId,
        parent: TransformId,
    },
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("Failed to start worker threads: {0}")]
    WorkerPool(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
