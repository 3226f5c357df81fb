//! CPU triangle rasterizer: near-plane clipping, perspective-correct scan
//! conversion and a per-pixel locked depth test, spread over a worker pool.

pub mod clip;
pub mod framebuffer;
pub mod model;
pub mod pipeline;
pub mod pool;
pub mod raster;
pub mod shader;

pub use framebuffer::FrameBuffer;
pub use model::{Model, RasterVertex, SceneData};
pub use pipeline::{FrameStats, RasterConfig, Rasterizer, RenderContext};
pub use pool::WorkerPool;
pub use shader::{CloudShader, LitShader, LitTextureShader, Shader, TerrainShader, TextureShader};
