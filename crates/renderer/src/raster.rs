//! Scan conversion of one projected triangle with a double-checked depth
//! test.

use std::ops::RangeInclusive;

use corelib::math::point_in_triangle;
use glam::{Vec2, Vec3};

use crate::framebuffer::FrameBuffer;
use crate::model::RasterVertex;
use crate::shader::Shader;

/// Per-triangle setup for perspective-correct interpolation: attributes
/// divided by depth are linear in screen space, so they are blended with the
/// barycentric weights and multiplied back by the interpolated depth.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveSetup {
    inv_depth: Vec3,
    tex_over_z: [Vec2; 3],
    normal_over_z: [Vec3; 3],
}

impl PerspectiveSetup {
    pub fn new(tri: &[RasterVertex; 3]) -> Self {
        let inv_depth = Vec3::new(1.0 / tri[0].depth, 1.0 / tri[1].depth, 1.0 / tri[2].depth);
        Self {
            inv_depth,
            tex_over_z: [
                tri[0].tex_coord * inv_depth.x,
                tri[1].tex_coord * inv_depth.y,
                tri[2].tex_coord * inv_depth.z,
            ],
            normal_over_z: [
                tri[0].normal * inv_depth.x,
                tri[1].normal * inv_depth.y,
                tri[2].normal * inv_depth.z,
            ],
        }
    }

    /// View-space depth at barycentric weights `w`.
    #[inline]
    pub fn depth(&self, w: Vec3) -> f32 {
        1.0 / self.inv_depth.dot(w)
    }

    #[inline]
    pub fn tex_coord(&self, w: Vec3, depth: f32) -> Vec2 {
        let [a, b, c] = self.tex_over_z;
        (a * w.x + b * w.y + c * w.z) * depth
    }

    #[inline]
    pub fn normal(&self, w: Vec3, depth: f32) -> Vec3 {
        let [a, b, c] = self.normal_over_z;
        (a * w.x + b * w.y + c * w.z) * depth
    }
}

/// Pixel block covering the screen bounds of `abc`, clamped to the target.
/// `None` when the bounds miss the target entirely.
pub fn pixel_bounds(
    a: Vec2,
    b: Vec2,
    c: Vec2,
    width: usize,
    height: usize,
) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
    let min = a.min(b).min(c);
    let max = a.max(b).max(c);
    let (max_x, max_y) = ((width - 1) as f32, (height - 1) as f32);
    if max.x < 0.0 || max.y < 0.0 || min.x > max_x || min.y > max_y {
        return None;
    }

    // Casts saturate (and map NaN to 0), the clamps do the rest.
    let clamp_x = |v: f32| (v as i64).clamp(0, width as i64 - 1) as usize;
    let clamp_y = |v: f32| (v as i64).clamp(0, height as i64 - 1) as usize;
    Some((
        clamp_x(min.x)..=clamp_x(max.x.ceil()),
        clamp_y(min.y)..=clamp_y(max.y.ceil()),
    ))
}

/// Scan-convert one triangle into `target`. Safe to call concurrently for
/// any number of triangles sharing the same target.
///
/// Returns how many fragments won their pixel at the time they were written.
pub fn rasterize_triangle(tri: &[RasterVertex; 3], shader: &dyn Shader, target: &FrameBuffer) -> usize {
    let (a, b, c) = (tri[0].screen, tri[1].screen, tri[2].screen);
    let Some((xs, ys)) = pixel_bounds(a, b, c, target.width(), target.height()) else {
        return 0;
    };
    let setup = PerspectiveSetup::new(tri);
    let mut written = 0;

    for y in ys {
        for x in xs.clone() {
            let p = Vec2::new(x as f32, y as f32);
            let Some(w) = point_in_triangle(a, b, c, p) else {
                continue;
            };

            let depth = setup.depth(w);
            let index = target.index(x, y);
            if !target.is_nearer(index, depth) {
                continue;
            }

            // Shading runs unlocked; another worker may still win the pixel.
            let tex_coord = setup.tex_coord(w, depth);
            let normal = setup.normal(w, depth);
            let colour = shader.pixel_colour(p, tex_coord, normal, depth);

            if target.write_if_nearer(index, depth, colour) {
                written += 1;
            }
        }
    }

    written
}
