//! Procedural meshes that need no asset files.
//!
//! Front faces wind counter-clockwise on screen when seen from outside
//! through a camera with +x right, +y up, +z forward. In object space that
//! means `(b - a) x (c - a)` points against the outward normal.

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshVertex};

/// Square in the XZ plane facing +y, centred on the origin.
pub fn quad(half: f32) -> Mesh {
    Mesh::from_triangles(face(Vec3::ZERO, Vec3::Y, Vec3::X * half, Vec3::Z * half))
}

/// Axis-aligned cube centred on the origin, one UV square per face.
pub fn cube(half: f32) -> Mesh {
    // (outward normal, u, v) with u x v == -normal
    let faces = [
        (-Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::Z, -Vec3::X, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (-Vec3::Y, Vec3::X, -Vec3::Z),
        (Vec3::X, Vec3::Z, Vec3::Y),
        (-Vec3::X, -Vec3::Z, Vec3::Y),
    ];
    Mesh::from_triangles(
        faces
            .into_iter()
            .flat_map(|(n, u, v)| face(n * half, n, u * half, v * half)),
    )
}

fn face(centre: Vec3, normal: Vec3, u: Vec3, v: Vec3) -> [[MeshVertex; 3]; 2] {
    let corner = |su: f32, sv: f32| MeshVertex {
        position: centre + u * su + v * sv,
        normal,
        tex_coord: Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5),
    };
    let (c0, c1, c2, c3) = (
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    );
    [[c0, c1, c2], [c0, c2, c3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_front_faces_outward(mesh: &Mesh) {
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|v| v.position);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(tri[0].normal) < 0.0, "{tri:?}");
        }
    }

    #[test]
    fn cube_has_twelve_outward_triangles() {
        let mesh = cube(0.5);
        assert_eq!(mesh.triangle_count(), 12);
        assert_front_faces_outward(&mesh);
        assert!(mesh.positions().iter().all(|p| p.abs().max_element() == 0.5));
    }

    #[test]
    fn quad_faces_up() {
        let mesh = quad(2.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert_front_faces_outward(&mesh);
        assert!(mesh.positions().iter().all(|p| p.y == 0.0));
    }
}
