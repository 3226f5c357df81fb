//! Core types: math re-exports, Transform hierarchy, Camera, errors.

pub use glam::{Mat3, Vec2, Vec3, vec2, vec3};

pub mod camera;
pub mod error;
pub mod hierarchy;
pub mod math;
pub mod transform;

pub use camera::Camera;
pub use error::{CoreError, CoreResult};
pub use hierarchy::{TransformId, TransformTree};
pub use transform::Transform;
