//! Scalar and 2D helpers shared by the clipper, the scan converter and shaders.

use crate::{Vec2, Vec3};

/// Linear blend with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Maps `value` from `[min, max]` onto `[0, 1]`, clamped.
#[inline]
pub fn remap01(value: f32, min: f32, max: f32) -> f32 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Twice the signed area of triangle `abc`: the 2D cross product
/// `(b - a) x (c - a)`. Positive when `abc` winds counter-clockwise
/// in a y-up plane.
#[inline]
pub fn signed_parallelogram_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Inside test for point `p` against triangle `abc`.
///
/// Returns the barycentric weights of `a`, `b` and `c` when `p` lies inside
/// (edges included) a triangle of strictly positive area. Clockwise and
/// degenerate triangles never contain any point, which doubles as back-face
/// culling.
#[inline]
pub fn point_in_triangle(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<Vec3> {
    let area_abp = signed_parallelogram_area(a, b, p);
    let area_bcp = signed_parallelogram_area(b, c, p);
    let area_cap = signed_parallelogram_area(c, a, p);
    let total = area_abp + area_bcp + area_cap;

    if area_abp >= 0.0 && area_bcp >= 0.0 && area_cap >= 0.0 && total > 0.0 {
        let inv_total = 1.0 / total;
        Some(Vec3::new(
            area_bcp * inv_total,
            area_cap * inv_total,
            area_abp * inv_total,
        ))
    } else {
        None
    }
}
