use crate::hierarchy::{TransformId, TransformTree};
use crate::{Vec2, Vec3};

/// Pinhole camera: a node in the transform tree plus a vertical field of view.
///
/// View space is the camera node's local space (+x right, +y up, +z forward).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub transform: TransformId,
    pub fov_y_rad: f32,
}

impl Camera {
    pub fn new(transform: TransformId, fov_y_rad: f32) -> Self {
        Self {
            transform,
            fov_y_rad,
        }
    }

    /// Height of the image plane at unit distance.
    #[inline]
    pub fn screen_height_world(&self) -> f32 {
        (self.fov_y_rad * 0.5).tan() * 2.0
    }

    #[inline]
    pub fn world_to_view(&self, tree: &TransformTree, world: Vec3) -> Vec3 {
        tree.to_local(self.transform, world)
    }

    /// Perspective projection of a view-space point into pixel space of a
    /// target of `target_size` pixels. Row 0 is the bottom of the target.
    ///
    /// `view.z` must be positive; callers clip before projecting.
    #[inline]
    pub fn view_to_screen(&self, view: Vec3, target_size: Vec2) -> Vec2 {
        let pixels_per_unit = target_size.y / self.screen_height_world() / view.z;
        target_size * 0.5 + Vec2::new(view.x, view.y) * pixels_per_unit
    }
}
