//! Textures as normalized RGB texels with nearest-sample lookup.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use glam::Vec3;

/// Row-major RGB texels in `[0, 1]`. Row 0 is `v = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Vec3>,
}

impl Texture {
    pub fn new(width: usize, height: usize, texels: Vec<Vec3>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "Texture must not be empty ({width}x{height})");
        ensure!(
            texels.len() == width * height,
            "Texel count {} doesn't match {}x{}",
            texels.len(),
            width,
            height
        );
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Decode the raw `.bytes` layout: little-endian u16 width and height,
    /// then one R, G, B byte triple per texel, row by row.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(bytes.len() >= 4, "Texture header truncated ({} bytes)", bytes.len());
        let width = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
        let height = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
        let body = &bytes[4..];
        ensure!(
            body.len() >= width * height * 3,
            "Texture body holds {} bytes, {}x{} needs {}",
            body.len(),
            width,
            height,
            width * height * 3
        );

        let texels = body
            .chunks_exact(3)
            .take(width * height)
            .map(|rgb| Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0)
            .collect();
        Self::new(width, height, texels)
    }

    /// Load a `.bytes` texture file.
    pub fn load_bytes_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read texture {}", path.display()))?;
        let tex = Self::from_rgb_bytes(&bytes)
            .with_context(|| format!("Failed to decode texture {}", path.display()))?;
        log::info!("Loaded texture {} ({}x{})", path.display(), tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from PNG file. Image rows are flipped so that `v` grows
    /// upwards.
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?
            .to_rgb8();
        let (width, height) = (img.width() as usize, img.height() as usize);

        let mut texels = Vec::with_capacity(width * height);
        for y in (0..height).rev() {
            for x in 0..width {
                let [r, g, b] = img.get_pixel(x as u32, y as u32).0;
                texels.push(Vec3::new(r as f32, g as f32, b as f32) / 255.0);
            }
        }

        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Self::new(width, height, texels)
    }

    /// Create a simple test texture (checkerboard pattern of `cell` texels).
    pub fn checkerboard(size: usize, cell: usize, a: Vec3, b: Vec3) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let texels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b }
            })
            .collect();
        Self {
            width: size,
            height: size,
            texels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Vec3 {
        self.texels[y * self.width + x]
    }

    /// Nearest texel; coordinates wrap, so only their fractional part matters.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let fu = u - u.floor();
        let fv = v - v.floor();
        // `as` saturates, and NaN lands on 0.
        let x = ((fu * (self.width - 1) as f32) as usize).min(self.width - 1);
        let y = ((fv * (self.height - 1) as f32) as usize).min(self.height - 1);
        self.texel(x, y)
    }
}
