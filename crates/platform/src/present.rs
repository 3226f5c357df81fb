//! Presenters: where finished frames go.

use std::path::PathBuf;

use anyhow::{Context, Result};
use corelib::Vec3;
use renderer::FrameBuffer;

/// Receives every finished frame.
pub trait Presenter {
    fn present(&mut self, frame: usize, target: &FrameBuffer) -> Result<()>;
}

/// Drops frames (benchmarks, tests).
#[derive(Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: usize, _target: &FrameBuffer) -> Result<()> {
        Ok(())
    }
}

/// 8-bit RGBA with the top row first. The buffer keeps its bottom row first,
/// so rows are flipped here.
pub fn to_rgba8(target: &FrameBuffer) -> Vec<u8> {
    let (w, h) = (target.width(), target.height());
    let colours = target.colours();
    let mut out = Vec::with_capacity(w * h * 4);
    for row in colours.chunks_exact(w).rev() {
        for c in row {
            let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            out.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
        }
    }
    out
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
pub struct PngSequence {
    dir: PathBuf,
}

impl PngSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn frame_path(&self, frame: usize) -> PathBuf {
        self.dir.join(format!("frame_{frame:05}.png"))
    }
}

impl Presenter for PngSequence {
    fn present(&mut self, frame: usize, target: &FrameBuffer) -> Result<()> {
        let path = self.frame_path(frame);
        image::save_buffer(
            &path,
            &to_rgba8(target),
            target.width() as u32,
            target.height() as u32,
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_rows_are_flipped_and_clamped() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.clear(Vec3::ZERO);
        // Bottom-left in the buffer, over-bright.
        fb.set_colour(0, 0, Vec3::new(2.0, 0.5, -1.0));
        let rgba = to_rgba8(&fb);
        assert_eq!(rgba.len(), 16);
        // Top row of the image is buffer row 1: black.
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
        // Bottom-left of the image.
        assert_eq!(&rgba[8..12], &[255, 127, 0, 255]);
    }

    #[test]
    fn png_sequence_names_frames() {
        let dir = std::env::temp_dir().join(format!("platform-png-{}", std::process::id()));
        let seq = PngSequence::new(&dir).unwrap();
        assert_eq!(seq.frame_path(7), dir.join("frame_00007.png"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn png_sequence_writes_decodable_frames() {
        let dir = std::env::temp_dir().join(format!("platform-png-write-{}", std::process::id()));
        let mut seq = PngSequence::new(&dir).unwrap();
        let mut fb = FrameBuffer::new(3, 2);
        fb.clear(Vec3::new(1.0, 0.0, 0.0));
        seq.present(0, &fb).unwrap();
        let img = image::open(seq.frame_path(0)).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
