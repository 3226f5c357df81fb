//! Asset loading: flattened meshes, textures and the resource directory.

pub mod mesh;
pub mod obj;
pub mod primitives;
pub mod resources;
pub mod texture;

pub use mesh::{Mesh, MeshVertex};
pub use resources::Resources;
pub use texture::Texture;
