//! Near-plane clipping of view-space triangles.

use glam::{Vec2, Vec3};

/// Depth at or below which a view-space vertex counts as clipped. Keeps the
/// later `1 / z` well away from zero rather than modelling a real near plane.
pub const NEAR_CLIP: f32 = 0.01;

/// A triangle corner in view space with its raw (not depth-weighted)
/// attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewVertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
    pub normal: Vec3,
}

impl ViewVertex {
    /// Position and attributes blended with the same fraction.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            tex_coord: self.tex_coord.lerp(other.tex_coord, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

/// Zero, one or two triangles left after clipping one input triangle.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClippedTriangles {
    triangles: [[ViewVertex; 3]; 2],
    len: usize,
}

impl ClippedTriangles {
    fn push(&mut self, tri: [ViewVertex; 3]) {
        self.triangles[self.len] = tri;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[[ViewVertex; 3]] {
        &self.triangles[..self.len]
    }
}

/// Point on the edge `from -> to` whose depth equals `near`.
#[inline]
fn edge_crossing(from: ViewVertex, to: ViewVertex, near: f32) -> ViewVertex {
    let t = (near - from.position.z) / (to.position.z - from.position.z);
    from.lerp(to, t)
}

/// Clip `tri` against `z = near`, keeping the input winding.
///
/// A vertex is clipped when its depth is `<= near`. One clipped vertex
/// leaves a quad that is split in two; two clipped vertices leave one smaller
/// triangle; three leave nothing.
pub fn clip_triangle(tri: &[ViewVertex; 3], near: f32) -> ClippedTriangles {
    let clipped = tri.map(|v| v.position.z <= near);
    let mut out = ClippedTriangles::default();

    match clipped.iter().filter(|&&c| c).count() {
        0 => out.push(*tri),
        1 => {
            let i_clip = clipped.iter().position(|&c| c).unwrap_or(0);
            let i_next = (i_clip + 1) % 3;
            let i_prev = (i_clip + 2) % 3;
            let (c, a, b) = (tri[i_clip], tri[i_next], tri[i_prev]);

            let edge_a = edge_crossing(c, a, near);
            let edge_b = edge_crossing(c, b, near);
            out.push([edge_b, edge_a, b]);
            out.push([edge_a, a, b]);
        }
        2 => {
            let i_keep = clipped.iter().position(|&c| !c).unwrap_or(0);
            let i_next = (i_keep + 1) % 3;
            let i_prev = (i_keep + 2) % 3;
            let (k, a, b) = (tri[i_keep], tri[i_next], tri[i_prev]);

            let edge_a = edge_crossing(k, a, near);
            let edge_b = edge_crossing(k, b, near);
            out.push([edge_b, k, edge_a]);
        }
        // Entirely behind the camera.
        _ => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use corelib::{Camera, TransformTree};

    use super::*;

    fn vv(x: f32, y: f32, z: f32) -> ViewVertex {
        ViewVertex {
            position: Vec3::new(x, y, z),
            tex_coord: Vec2::new(x, y),
            normal: Vec3::new(0.0, 0.0, z),
        }
    }

    /// Sign matches the screen-space winding once every vertex is in front.
    fn orientation(tri: &[ViewVertex; 3]) -> f32 {
        let [a, b, c] = tri.map(|v| v.position);
        a.dot(b.cross(c))
    }

    fn area(tri: &[ViewVertex; 3]) -> f32 {
        let [a, b, c] = tri.map(|v| v.position);
        (b - a).cross(c - a).length() * 0.5
    }

    #[test]
    fn nothing_clipped_passes_through() {
        let tri = [vv(0.0, 0.0, 1.0), vv(1.0, 0.0, 1.0), vv(0.0, 1.0, 1.0)];
        let out = clip_triangle(&tri, NEAR_CLIP);
        assert_eq!(out.as_slice(), &[tri]);
    }

    #[test]
    fn one_behind_gives_two_triangles() {
        let tri = [vv(0.0, 0.0, -5.0), vv(0.0, 4.0, 5.0), vv(4.0, 0.0, 5.0)];
        let out = clip_triangle(&tri, NEAR_CLIP);
        assert_eq!(out.len(), 2);
        for t in out.as_slice() {
            assert!(t.iter().all(|v| v.position.z >= NEAR_CLIP - 1e-5));
            assert!(orientation(t) > 0.0, "winding flipped: {t:?}");
        }
    }

    #[test]
    fn two_behind_gives_one_triangle() {
        let tri = [vv(0.0, 0.0, 5.0), vv(4.0, 0.0, -5.0), vv(0.0, 4.0, -5.0)];
        let out = clip_triangle(&tri, NEAR_CLIP);
        assert_eq!(out.len(), 1);
        let t = out.as_slice()[0];
        assert_eq!(t[1], tri[0]);
        assert!((t[0].position.z - NEAR_CLIP).abs() < 1e-5);
        assert!((t[2].position.z - NEAR_CLIP).abs() < 1e-5);
    }

    #[test]
    fn all_behind_gives_nothing() {
        let tri = [vv(0.0, 0.0, -5.0), vv(1.0, 0.0, -5.0), vv(0.0, 1.0, 0.0)];
        assert!(clip_triangle(&tri, NEAR_CLIP).is_empty());
    }

    #[test]
    fn attributes_follow_the_same_fraction() {
        // Crossing sits exactly halfway along both clipped edges.
        let tri = [vv(0.0, 0.0, -1.0), vv(2.0, 0.0, 1.0), vv(0.0, 2.0, 1.0)];
        let out = clip_triangle(&tri, 0.0);
        let first = out.as_slice()[0];
        // edge towards the previous vertex (index 2)
        assert!(first[0].position.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
        assert!(first[0].tex_coord.abs_diff_eq(Vec2::new(0.0, 1.0), 1e-6));
        assert!(first[0].normal.abs_diff_eq(Vec3::ZERO, 1e-6));
        // edge towards the next vertex (index 1)
        assert!(first[1].position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn winding_is_kept_for_every_rotation_of_the_input() {
        let one = [vv(-1.0, -1.0, -2.0), vv(3.0, -1.0, 4.0), vv(-1.0, 3.0, 6.0)];
        let two = [vv(-1.0, -1.0, 2.0), vv(3.0, -1.0, -4.0), vv(-1.0, 3.0, -6.0)];
        for base in [one, two] {
            for tri in [base, [base[0], base[2], base[1]]] {
                for r in 0..3 {
                    let rotated = [tri[r], tri[(r + 1) % 3], tri[(r + 2) % 3]];
                    let sign = orientation(&rotated).signum();
                    let out = clip_triangle(&rotated, NEAR_CLIP);
                    assert!(!out.is_empty());
                    for t in out.as_slice() {
                        assert_eq!(orientation(t).signum(), sign, "{t:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn kept_area_matches_visible_part() {
        // One clipped: the cut-off corner at the clipped vertex is the
        // original scaled by both edge fractions.
        let tri = [vv(0.0, 0.0, -2.0), vv(6.0, 0.0, 2.0), vv(0.0, 6.0, 6.0)];
        let (ta, tb) = (2.0 / 4.0, 2.0 / 8.0);
        let kept: f32 = clip_triangle(&tri, 0.0).as_slice().iter().map(area).sum();
        assert!((kept - area(&tri) * (1.0 - ta * tb)).abs() < 1e-3);

        // Two clipped: only the corner at the kept vertex survives.
        let tri = [vv(0.0, 0.0, 2.0), vv(6.0, 0.0, -2.0), vv(0.0, 6.0, -6.0)];
        let (ta, tb) = (2.0 / 4.0, 2.0 / 8.0);
        let kept: f32 = clip_triangle(&tri, 0.0).as_slice().iter().map(area).sum();
        assert!((kept - area(&tri) * ta * tb).abs() < 1e-3);
    }

    /// Signed shoelace area of the polygon after projection onto a 64x64
    /// target; positive when it winds counter-clockwise on screen.
    fn screen_area(camera: &Camera, polygon: &[Vec3]) -> f32 {
        let size = Vec2::splat(64.0);
        let p: Vec<Vec2> = polygon.iter().map(|v| camera.view_to_screen(*v, size)).collect();
        (0..p.len()).map(|i| p[i].perp_dot(p[(i + 1) % p.len()])).sum::<f32>() * 0.5
    }

    fn kept_screen_area(camera: &Camera, out: &ClippedTriangles) -> f32 {
        out.as_slice()
            .iter()
            .map(|t| {
                let piece = screen_area(camera, &t.map(|v| v.position));
                assert!(piece > 0.0, "piece flipped or empty: {t:?}");
                piece
            })
            .sum()
    }

    #[test]
    fn kept_screen_area_matches_visible_part() {
        let mut tree = TransformTree::new();
        let camera = Camera::new(tree.insert(Default::default()), 60f32.to_radians());
        let crossing = |p: Vec3, q: Vec3| p + (q - p) * ((NEAR_CLIP - p.z) / (q.z - p.z));
        let tri = |a: Vec3, b: Vec3, c: Vec3| [a, b, c].map(|p| vv(p.x, p.y, p.z));

        // One behind: what is left is the quad between the crossings.
        let (c, a, b) = (Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 4.0, 5.0), Vec3::new(4.0, 0.0, 5.0));
        let visible = screen_area(&camera, &[crossing(c, a), a, b, crossing(c, b)]);
        let out = clip_triangle(&tri(c, a, b), NEAR_CLIP);
        assert_eq!(out.len(), 2);
        assert!(visible > 0.0);
        let kept = kept_screen_area(&camera, &out);
        assert!((kept - visible).abs() < visible * 1e-3, "{kept} vs {visible}");

        // Two behind: only the corner at the kept vertex is left.
        let (k, b, a) = (Vec3::new(0.0, 0.0, 5.0), Vec3::new(4.0, 0.0, -5.0), Vec3::new(0.0, 4.0, -5.0));
        let visible = screen_area(&camera, &[k, crossing(k, b), crossing(k, a)]);
        let out = clip_triangle(&tri(k, b, a), NEAR_CLIP);
        assert_eq!(out.len(), 1);
        assert!(visible > 0.0);
        let kept = kept_screen_area(&camera, &out);
        assert!((kept - visible).abs() < visible * 1e-3, "{kept} vs {visible}");
    }
}
