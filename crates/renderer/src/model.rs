use std::sync::Arc;

use asset::Mesh;
use corelib::{Camera, CoreResult, TransformId, TransformTree};
use glam::{Vec2, Vec3};

use crate::shader::Shader;

/// One projected corner of a clipped triangle, ready for scan conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RasterVertex {
    /// View-space z.
    pub depth: f32,
    pub screen: Vec2,
    pub tex_coord: Vec2,
    pub normal: Vec3,
}

/// A mesh placed in the scene with a shader.
pub struct Model {
    pub name: String,
    pub transform: TransformId,
    pub mesh: Arc<Mesh>,
    pub shader: Arc<dyn Shader>,
    /// Rebuilt every frame by the vertex stage.
    pub(crate) raster_triangles: Vec<[RasterVertex; 3]>,
}

impl Model {
    pub fn new(
        name: impl Into<String>,
        transform: TransformId,
        mesh: Arc<Mesh>,
        shader: Arc<dyn Shader>,
    ) -> Self {
        Self {
            name: name.into(),
            transform,
            mesh,
            shader,
            raster_triangles: Vec::new(),
        }
    }

    /// Projected triangles from the last rendered frame.
    #[inline]
    pub fn raster_triangles(&self) -> &[[RasterVertex; 3]] {
        &self.raster_triangles
    }

    /// The same, flattened into consecutive vertex triples.
    #[inline]
    pub fn raster_vertices(&self) -> &[RasterVertex] {
        self.raster_triangles.as_flattened()
    }
}

/// Everything one frame renders: the transform arena, the camera and the
/// models, in submission order.
pub struct SceneData {
    pub transforms: TransformTree,
    pub camera: Camera,
    pub models: Vec<Model>,
}

impl SceneData {
    /// Fresh tree holding only a camera node at the origin.
    pub fn new(fov_y_rad: f32) -> Self {
        let mut transforms = TransformTree::new();
        let camera = Camera::new(transforms.insert(Default::default()), fov_y_rad);
        Self {
            transforms,
            camera,
            models: Vec::new(),
        }
    }

    /// Adds a model on a new root transform node.
    pub fn add_model(
        &mut self,
        name: impl Into<String>,
        mesh: Arc<Mesh>,
        shader: Arc<dyn Shader>,
    ) -> TransformId {
        let id = self.transforms.insert(Default::default());
        self.models.push(Model::new(name, id, mesh, shader));
        id
    }

    /// Adds a model whose transform node hangs under `parent`.
    pub fn add_child_model(
        &mut self,
        name: impl Into<String>,
        parent: TransformId,
        mesh: Arc<Mesh>,
        shader: Arc<dyn Shader>,
    ) -> CoreResult<TransformId> {
        let id = self.transforms.insert_child(Default::default(), parent)?;
        self.models.push(Model::new(name, id, mesh, shader));
        Ok(id)
    }
}
