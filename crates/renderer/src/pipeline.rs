//! Frame orchestration: vertex stage across models, barrier, scan conversion
//! across every triangle of every model.

use std::sync::atomic::{AtomicUsize, Ordering};

use corelib::{Camera, CoreError, CoreResult, TransformId, TransformTree};
use glam::{Vec2, Vec3};

use crate::clip::{NEAR_CLIP, ViewVertex, clip_triangle};
use crate::framebuffer::FrameBuffer;
use crate::model::{Model, RasterVertex, SceneData};
use crate::pool::WorkerPool;
use crate::raster::rasterize_triangle;

/// Rasterizer settings.
#[derive(Clone, Copy, Debug)]
pub struct RasterConfig {
    /// Worker threads; 0 picks one per available core.
    pub threads: usize,
    /// View-space depth at or below which vertices are clipped.
    pub near_clip: f32,
    /// Smallest run of triangles one scan-conversion task handles.
    pub chunk: usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            near_clip: NEAR_CLIP,
            chunk: 64,
        }
    }
}

impl RasterConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_near_clip(mut self, near_clip: f32) -> Self {
        self.near_clip = near_clip;
        self
    }
}

/// Read-only state every pipeline step of one frame needs.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub transforms: &'a TransformTree,
    pub target_size: Vec2,
    pub near_clip: f32,
}

impl RenderContext<'_> {
    #[inline]
    fn to_view(&self, node: TransformId, local: Vec3) -> Vec3 {
        let world = self.transforms.to_world(node, local);
        self.camera.world_to_view(self.transforms, world)
    }

    #[inline]
    fn project(&self, v: &ViewVertex) -> RasterVertex {
        RasterVertex {
            depth: v.position.z,
            screen: self.camera.view_to_screen(v.position, self.target_size),
            tex_coord: v.tex_coord,
            normal: v.normal,
        }
    }
}

/// Counters for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub models: usize,
    pub input_triangles: usize,
    pub raster_triangles: usize,
    /// Fragments that won their pixel when written (overdraw included).
    pub fragments_written: usize,
}

/// Rebuild `model`'s projected triangles: model -> world -> view, clip
/// against the near plane, project every surviving corner.
pub fn process_model(model: &mut Model, ctx: &RenderContext<'_>) {
    model.raster_triangles.clear();

    for tri in model.mesh.triangles() {
        let view = tri.map(|v| ViewVertex {
            position: ctx.to_view(model.transform, v.position),
            tex_coord: v.tex_coord,
            normal: v.normal,
        });
        for clipped in clip_triangle(&view, ctx.near_clip).as_slice() {
            let projected = clipped.map(|v| ctx.project(&v));
            model.raster_triangles.push(projected);
        }
    }
}

pub struct Rasterizer {
    pool: WorkerPool,
    config: RasterConfig,
}

impl Rasterizer {
    /// Starts the worker threads; they live as long as the rasterizer.
    pub fn new(config: RasterConfig) -> CoreResult<Self> {
        let pool =
            WorkerPool::new(config.threads).map_err(|e| CoreError::WorkerPool(e.to_string()))?;
        log::info!(
            "Rasterizer ready: {} worker thread(s), near clip {}",
            pool.threads(),
            config.near_clip
        );
        Ok(Self { pool, config })
    }

    #[inline]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// Render `scene` into `target`. The target is not cleared here.
    ///
    /// Fails only if the camera or a model refers to a transform outside
    /// `scene.transforms`; nothing is drawn in that case.
    pub fn render(&self, target: &mut FrameBuffer, scene: &mut SceneData) -> CoreResult<FrameStats> {
        let SceneData {
            transforms,
            camera,
            models,
        } = scene;

        for id in std::iter::once(camera.transform).chain(models.iter().map(|m| m.transform)) {
            if !transforms.contains(id) {
                return Err(CoreError::UnknownTransform(id));
            }
        }

        let target: &FrameBuffer = target;
        let ctx = RenderContext {
            camera,
            transforms,
            target_size: target.size(),
            near_clip: self.config.near_clip,
        };

        // Stage 1: each task owns one model's triangle list.
        self.pool.for_each_mut(models, |model| process_model(model, &ctx));

        // Stage 2: global triangle index -> (model, local index).
        let models: &[Model] = models;
        let mut starts = Vec::with_capacity(models.len());
        let mut total = 0;
        for model in models {
            starts.push(total);
            total += model.raster_triangles.len();
        }

        let fragments = AtomicUsize::new(0);
        self.pool.for_each_index(total, self.config.chunk, |i| {
            let m = starts.partition_point(|&s| s <= i) - 1;
            let model = &models[m];
            let tri = &model.raster_triangles[i - starts[m]];
            let written = rasterize_triangle(tri, model.shader.as_ref(), target);
            if written > 0 {
                fragments.fetch_add(written, Ordering::Relaxed);
            }
        });

        let stats = FrameStats {
            models: models.len(),
            input_triangles: models.iter().map(|m| m.mesh.triangle_count()).sum(),
            raster_triangles: total,
            fragments_written: fragments.into_inner(),
        };
        log::debug!(
            "Frame: {} models, {} -> {} triangles, {} fragments, {} threads",
            stats.models,
            stats.input_triangles,
            stats.raster_triangles,
            stats.fragments_written,
            self.pool.threads()
        );
        Ok(stats)
    }
}
