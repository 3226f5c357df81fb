//! CPU-side mesh representation: a flattened triangle list.

use corelib::{CoreError, CoreResult};
use glam::{Vec2, Vec3};

/// Immutable triangle soup. Three parallel arrays indexed identically; every
/// three consecutive entries form one triangle (no index buffer).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
}

/// One corner of a mesh triangle, in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, tex_coords: Vec<Vec2>) -> CoreResult<Self> {
        if positions.len() != normals.len() || positions.len() != tex_coords.len() {
            return Err(CoreError::InvalidMesh(format!(
                "attribute lengths differ: {} positions, {} normals, {} tex coords",
                positions.len(),
                normals.len(),
                tex_coords.len()
            )));
        }
        if positions.len() % 3 != 0 {
            return Err(CoreError::InvalidMesh(format!(
                "vertex count {} is not a multiple of 3",
                positions.len()
            )));
        }
        Ok(Self {
            positions,
            normals,
            tex_coords,
        })
    }

    /// Build from whole triangles, which keeps the length invariant by
    /// construction.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [MeshVertex; 3]>) -> Self {
        let mut mesh = Self::default();
        for tri in triangles {
            for v in tri {
                mesh.positions.push(v.position);
                mesh.normals.push(v.normal);
                mesh.tex_coords.push(v.tex_coord);
            }
        }
        mesh
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> MeshVertex {
        MeshVertex {
            position: self.positions[i],
            normal: self.normals[i],
            tex_coord: self.tex_coords[i],
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [MeshVertex; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let i = t * 3;
            [self.vertex(i), self.vertex(i + 1), self.vertex(i + 2)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_must_match_and_be_triangles() {
        let p = vec![Vec3::ZERO; 3];
        let n = vec![Vec3::Z; 3];
        let t = vec![Vec2::ZERO; 3];
        assert!(Mesh::new(p.clone(), n.clone(), t.clone()).is_ok());
        assert!(matches!(
            Mesh::new(p.clone(), n[..2].to_vec(), t.clone()),
            Err(CoreError::InvalidMesh(_))
        ));
        assert!(matches!(
            Mesh::new(p[..2].to_vec(), n[..2].to_vec(), t[..2].to_vec()),
            Err(CoreError::InvalidMesh(_))
        ));
    }

    #[test]
    fn triangles_walk_in_groups_of_three() {
        let v = |x: f32| MeshVertex {
            position: Vec3::splat(x),
            ..Default::default()
        };
        let mesh = Mesh::from_triangles([[v(0.0), v(1.0), v(2.0)], [v(3.0), v(4.0), v(5.0)]]);
        assert_eq!(mesh.triangle_count(), 2);
        let second = mesh.triangles().nth(1).expect("two triangles");
        assert_eq!(second[2].position, Vec3::splat(5.0));
    }
}
