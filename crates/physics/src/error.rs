use thiserror::Error;

use crate::types::Vec3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("octree depth {depth} exceeds the supported maximum of {max}")]
    DepthTooLarge { depth: u32, max: u32 },
    #[error("octree half-size must be finite and positive on every axis, got {0}")]
    InvalidTreeSize(Vec3),
}
