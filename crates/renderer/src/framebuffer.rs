//! Colour + depth target shared by all scan-conversion workers.
//!
//! Every pixel owns a lock around its colour. Depth lives next to it as
//! atomic `f32` bits: workers read it without the lock to reject hidden
//! fragments early, and only ever store it while holding the pixel's lock,
//! in the same critical section as the colour. Within a frame each pixel's
//! depth therefore only decreases, and colour only changes together with it.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Vec2, Vec3};
use parking_lot::Mutex;

pub struct FrameBuffer {
    width: usize,
    height: usize,
    colour: Vec<Mutex<Vec3>>,
    depth: Vec<AtomicU32>,
}

impl FrameBuffer {
    /// Allocates colour, depth and locks once; the pixel count is fixed for
    /// the buffer's lifetime. Starts cleared to black.
    ///
    /// A zero `width` or `height` is raised to 1: a buffer always holds at
    /// least one pixel, so scan conversion never sees an empty pixel range.
    pub fn new(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            log::warn!("Frame buffer size {width}x{height} raised to at least 1x1");
        }
        let width = width.max(1);
        let height = height.max(1);
        let len = width * height;
        Self {
            width,
            height,
            colour: (0..len).map(|_| Mutex::new(Vec3::ZERO)).collect(),
            depth: (0..len)
                .map(|_| AtomicU32::new(f32::INFINITY.to_bits()))
                .collect(),
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
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Reset every depth to +inf and every colour to `background`.
    pub fn clear(&mut self, background: Vec3) {
        for c in &mut self.colour {
            *c.get_mut() = background;
        }
        for d in &mut self.depth {
            *d.get_mut() = f32::INFINITY.to_bits();
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth_of(self.index(x, y))
    }

    #[inline]
    pub fn colour_at(&self, x: usize, y: usize) -> Vec3 {
        *self.colour[self.index(x, y)].lock()
    }

    /// Overwrite one pixel's colour outside of rendering; depth is untouched.
    pub fn set_colour(&mut self, x: usize, y: usize, colour: Vec3) {
        let i = self.index(x, y);
        *self.colour[i].get_mut() = colour;
    }

    /// Snapshot of all colours, row 0 first (row 0 is the bottom row).
    pub fn colours(&self) -> Vec<Vec3> {
        self.colour.iter().map(|c| *c.lock()).collect()
    }

    /// Snapshot of all depths, row 0 first.
    pub fn depths(&self) -> Vec<f32> {
        (0..self.len()).map(|i| self.depth_of(i)).collect()
    }

    #[inline]
    pub(crate) fn depth_of(&self, index: usize) -> f32 {
        f32::from_bits(self.depth[index].load(Ordering::Relaxed))
    }

    /// Lock-free early test; a stale read only costs wasted shading.
    #[inline]
    pub(crate) fn is_nearer(&self, index: usize, depth: f32) -> bool {
        depth < self.depth_of(index)
    }

    /// Write `colour` and `depth` if `depth` is still the nearest once the
    /// pixel is locked. Returns whether the fragment won.
    #[inline]
    pub(crate) fn write_if_nearer(&self, index: usize, depth: f32, colour: Vec3) -> bool {
        let mut slot = self.colour[index].lock();
        if depth < self.depth_of(index) {
            *slot = colour;
            self.depth[index].store(depth.to_bits(), Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_and_is_idempotent() {
        let sky = Vec3::new(0.65, 0.84, 0.98);
        let mut fb = FrameBuffer::new(4, 3);
        assert!(fb.write_if_nearer(fb.index(2, 1), 5.0, Vec3::ONE));

        fb.clear(sky);
        let first = (fb.colours(), fb.depths());
        fb.clear(sky);
        let second = (fb.colours(), fb.depths());

        assert_eq!(first, second);
        assert!(first.0.iter().all(|c| *c == sky));
        assert!(first.1.iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn only_nearer_fragments_replace() {
        let fb = FrameBuffer::new(2, 2);
        let i = fb.index(1, 1);
        assert!(fb.write_if_nearer(i, 3.0, Vec3::X));
        assert!(!fb.write_if_nearer(i, 4.0, Vec3::Y));
        assert!(!fb.write_if_nearer(i, 3.0, Vec3::Z));
        assert!(fb.write_if_nearer(i, 1.0, Vec3::Z));
        assert_eq!(fb.colour_at(1, 1), Vec3::Z);
        assert_eq!(fb.depth_at(1, 1), 1.0);
        assert!(!fb.is_nearer(i, 2.0));
        assert!(fb.is_nearer(fb.index(0, 0), 1e30));
    }

    #[test]
    fn zero_size_is_clamped() {
        let fb = FrameBuffer::new(0, 0);
        assert_eq!((fb.width(), fb.height()), (1, 1));
        assert_eq!(fb.len(), 1);
        let wide = FrameBuffer::new(7, 0);
        assert_eq!((wide.width(), wide.height()), (7, 1));
        assert_eq!(wide.depths(), vec![f32::INFINITY; 7]);
        assert_eq!(fb.size(), Vec2::ONE);
    }
}
