//! On-disk resource layout: `<root>/Models/<name>.obj` and
//! `<root>/Textures/<name>.bytes` (or `.png`).

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::mesh::Mesh;
use crate::obj::load_obj_from_path;
use crate::texture::Texture;

#[derive(Clone, Debug)]
pub struct Resources {
    root: PathBuf,
}

impl Resources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `./Resources` relative to the working directory.
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?.join("Resources")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mesh_path(&self, name: &str) -> PathBuf {
        self.root.join("Models").join(format!("{name}.obj"))
    }

    pub fn mesh(&self, name: &str) -> Result<Mesh> {
        load_obj_from_path(self.mesh_path(name))
    }

    /// Prefers the raw `.bytes` texture and falls back to `.png`.
    pub fn texture(&self, name: &str) -> Result<Texture> {
        let dir = self.root.join("Textures");
        let raw = dir.join(format!("{name}.bytes"));
        if raw.is_file() {
            return Texture::load_bytes_file(raw);
        }
        let png = dir.join(format!("{name}.png"));
        if png.is_file() {
            return Texture::load_png(png);
        }
        bail!("No texture named '{}' under {}", name, dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_layout() {
        let res = Resources::new("/data");
        assert_eq!(res.mesh_path("fox"), PathBuf::from("/data/Models/fox.obj"));
    }

    #[test]
    fn loads_from_disk() {
        let root = std::env::temp_dir().join(format!("asset-res-{}", std::process::id()));
        std::fs::create_dir_all(root.join("Models")).expect("mkdir models");
        std::fs::create_dir_all(root.join("Textures")).expect("mkdir textures");
        std::fs::write(root.join("Models/tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
            .expect("write obj");
        std::fs::write(root.join("Textures/dot.bytes"), [1, 0, 1, 0, 10, 20, 30])
            .expect("write bytes");

        let res = Resources::new(&root);
        assert_eq!(res.mesh("tri").expect("mesh").triangle_count(), 1);
        let tex = res.texture("dot").expect("texture");
        assert_eq!((tex.width(), tex.height()), (1, 1));
        assert!((tex.texel(0, 0) * 255.0).abs_diff_eq(glam::Vec3::new(10.0, 20.0, 30.0), 1e-3));
        assert!(res.texture("missing").is_err());

        std::fs::remove_dir_all(&root).ok();
    }
}
