//! Platform layer: headless frame loop.
//!
//! Drives a [`Scene`] for a fixed number of frames at a fixed time step,
//! renders each frame with the CPU rasterizer and hands the result to a
//! [`Presenter`].

mod present;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use corelib::Vec3;
use renderer::{FrameBuffer, RasterConfig, Rasterizer, SceneData};

pub use present::{NullPresenter, PngSequence, Presenter, to_rgba8};

/// User code driving a scene: animate, then expose the data to render.
pub trait Scene {
    /// Called once per frame before rendering. `target` has already been
    /// cleared to the run's background.
    fn update(&mut self, target: &mut FrameBuffer, dt: f32);

    fn data_mut(&mut self) -> &mut SceneData;
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    /// Seconds passed to [`Scene::update`] every frame.
    pub fixed_dt: f32,
    /// Worker threads; 0 picks one per available core.
    pub threads: usize,
    pub show_fps: bool,
    /// Where [`RunConfig::presenter`] writes PNG frames; `None` discards them.
    pub out_dir: Option<PathBuf>,
    pub background: Vec3,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frames: 120,
            fixed_dt: 1.0 / 60.0,
            threads: 0,
            show_fps: false,
            out_dir: None,
            background: Vec3::ZERO,
        }
    }
}

impl RunConfig {
    /// Presenter matching `out_dir`.
    pub fn presenter(&self) -> Result<Box<dyn Presenter>> {
        Ok(match &self.out_dir {
            Some(dir) => Box::new(PngSequence::new(dir)?),
            None => Box::new(NullPresenter),
        })
    }
}

/// Totals over a whole run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunStats {
    pub frames: usize,
    pub raster_triangles: usize,
    pub fragments_written: usize,
    /// Time spent rendering (scene updates and presenting excluded).
    pub render_time: Duration,
    pub total_time: Duration,
}

impl RunStats {
    /// Frames per second over the whole run, presenting included.
    pub fn average_fps(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 { self.frames as f64 / secs } else { 0.0 }
    }
}

/// Render `config.frames` frames of `scene` and present each one.
pub fn run_headless<S, P>(scene: &mut S, presenter: &mut P, config: &RunConfig) -> Result<RunStats>
where
    S: Scene + ?Sized,
    P: Presenter + ?Sized,
{
    let rasterizer = Rasterizer::new(RasterConfig::default().with_threads(config.threads))
        .context("Failed to create rasterizer")?;
    let mut target = FrameBuffer::new(config.width, config.height);
    log::info!(
        "Headless run: {}x{}, {} frame(s), dt={:.4}s",
        target.width(),
        target.height(),
        config.frames,
        config.fixed_dt
    );

    let mut stats = RunStats::default();
    let run_start = Instant::now();
    let mut fps_window_start = run_start;
    let mut fps_window_frames = 0u32;

    for frame in 0..config.frames {
        target.clear(config.background);
        scene.update(&mut target, config.fixed_dt);

        let render_start = Instant::now();
        let frame_stats = rasterizer
            .render(&mut target, scene.data_mut())
            .with_context(|| format!("Failed to render frame {frame}"))?;
        stats.render_time += render_start.elapsed();

        presenter
            .present(frame, &target)
            .with_context(|| format!("Failed to present frame {frame}"))?;

        stats.frames += 1;
        stats.raster_triangles += frame_stats.raster_triangles;
        stats.fragments_written += frame_stats.fragments_written;
        log::trace!("Frame {frame}: {frame_stats:?}");

        if config.show_fps {
            fps_window_frames += 1;
            let window = fps_window_start.elapsed();
            if window >= Duration::from_secs(1) {
                log::info!("FPS: {:.1}", fps_window_frames as f64 / window.as_secs_f64());
                fps_window_start = Instant::now();
                fps_window_frames = 0;
            }
        }
    }

    stats.total_time = run_start.elapsed();
    log::info!(
        "Rendered {} frame(s) in {:.2?} ({:.1} fps avg, {:.2?} rasterizing)",
        stats.frames,
        stats.total_time,
        stats.average_fps(),
        stats.render_time
    );
    Ok(stats)
}
