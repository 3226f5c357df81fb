//! Pixel shading capability and the built-in shaders.

use std::sync::Arc;

use asset::Texture;
use corelib::math::lerp;
use glam::{Vec2, Vec3};

/// Maps interpolated per-pixel attributes to a colour.
///
/// Called concurrently from every scan-conversion worker with no
/// synchronisation, so implementations must be pure.
pub trait Shader: Send + Sync {
    /// `normal` is interpolated and not unit length; `depth` is view-space z.
    fn pixel_colour(&self, pixel: Vec2, tex_coord: Vec2, normal: Vec3, depth: f32) -> Vec3;
}

/// Half-Lambert term in `[0, 1]`.
#[inline]
fn light_intensity(normal: Vec3, direction_to_light: Vec3) -> f32 {
    (normal.normalize_or_zero().dot(direction_to_light) + 1.0) * 0.5
}

/// Exponential fog weight used by the outdoor shaders.
#[inline]
fn aerial_perspective(depth: f32) -> f32 {
    const ATMOSPHERE_DENSITY: f32 = 0.0075;
    1.0 - (-depth * ATMOSPHERE_DENSITY).exp()
}

/// Flat colour with diffuse lighting.
#[derive(Clone, Debug)]
pub struct LitShader {
    pub direction_to_light: Vec3,
    pub tint: Vec3,
}

impl LitShader {
    pub fn new(direction_to_light: Vec3, tint: Vec3) -> Self {
        Self {
            direction_to_light: direction_to_light.normalize_or_zero(),
            tint,
        }
    }
}

impl Default for LitShader {
    /// White, lit from straight above.
    fn default() -> Self {
        Self::new(Vec3::Y, Vec3::ONE)
    }
}

impl Shader for LitShader {
    fn pixel_colour(&self, _pixel: Vec2, _tex_coord: Vec2, normal: Vec3, _depth: f32) -> Vec3 {
        let i = lerp(0.1, 1.0, light_intensity(normal, self.direction_to_light));
        self.tint * i
    }
}

/// Texture with diffuse lighting.
#[derive(Clone, Debug)]
pub struct LitTextureShader {
    pub direction_to_light: Vec3,
    pub texture: Arc<Texture>,
    pub texture_scale: f32,
}

impl LitTextureShader {
    pub fn new(direction_to_light: Vec3, texture: Arc<Texture>) -> Self {
        Self {
            direction_to_light: direction_to_light.normalize_or_zero(),
            texture,
            texture_scale: 1.0,
        }
    }

    pub fn with_texture_scale(mut self, scale: f32) -> Self {
        self.texture_scale = scale;
        self
    }
}

impl Shader for LitTextureShader {
    fn pixel_colour(&self, _pixel: Vec2, tex_coord: Vec2, normal: Vec3, _depth: f32) -> Vec3 {
        let i = lerp(0.4, 1.0, light_intensity(normal, self.direction_to_light));
        let uv = tex_coord * self.texture_scale;
        self.texture.sample(uv.x, uv.y) * i
    }
}

/// Unlit texture.
#[derive(Clone, Debug)]
pub struct TextureShader {
    pub texture: Arc<Texture>,
}

impl TextureShader {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self { texture }
    }
}

impl Shader for TextureShader {
    fn pixel_colour(&self, _pixel: Vec2, tex_coord: Vec2, _normal: Vec3, _depth: f32) -> Vec3 {
        self.texture.sample(tex_coord.x, tex_coord.y)
    }
}

/// Height-banded terrain. The elevation is carried in `tex_coord.x`; band `i`
/// is used once the elevation exceeds `heights[i - 1]`.
#[derive(Clone, Debug)]
pub struct TerrainShader {
    pub direction_to_light: Vec3,
    /// Ascending upper bound of every band except the last.
    pub heights: Vec<f32>,
    /// One more entry than `heights`.
    pub colours: Vec<Vec3>,
    pub sky_colour: Vec3,
}

impl TerrainShader {
    pub fn new(direction_to_light: Vec3, sky_colour: Vec3) -> Self {
        Self {
            direction_to_light: direction_to_light.normalize_or_zero(),
            heights: vec![0.0, 0.6, 2.5, 12.0],
            colours: vec![
                Vec3::new(0.2, 0.6, 0.98), // water
                Vec3::new(235.0, 205.0, 94.0) / 255.0, // sand
                Vec3::new(0.2, 0.6, 0.1), // grass
                Vec3::new(0.5, 0.35, 0.3), // mountain
                Vec3::new(0.93, 0.93, 0.91), // snow
            ],
            sky_colour,
        }
    }

    fn band(&self, elevation: f32) -> Vec3 {
        let band = self
            .heights
            .iter()
            .take_while(|&&h| elevation > h)
            .count();
        self.colours
            .get(band)
            .or(self.colours.last())
            .copied()
            .unwrap_or(Vec3::ZERO)
    }
}

impl Shader for TerrainShader {
    fn pixel_colour(&self, _pixel: Vec2, tex_coord: Vec2, normal: Vec3, depth: f32) -> Vec3 {
        let lit = self.band(tex_coord.x) * light_intensity(normal, self.direction_to_light);
        lit.lerp(self.sky_colour, aerial_perspective(depth))
    }
}

/// Opaque cloud: softly lit tint fading into the atmosphere with distance.
#[derive(Clone, Debug)]
pub struct CloudShader {
    pub direction_to_light: Vec3,
    pub tint: Vec3,
    pub atmosphere_colour: Vec3,
}

impl CloudShader {
    pub fn new(direction_to_light: Vec3, tint: Vec3, atmosphere_colour: Vec3) -> Self {
        Self {
            direction_to_light: direction_to_light.normalize_or_zero(),
            tint,
            atmosphere_colour,
        }
    }
}

impl Shader for CloudShader {
    fn pixel_colour(&self, _pixel: Vec2, _tex_coord: Vec2, normal: Vec3, depth: f32) -> Vec3 {
        let i = lerp(0.8, 1.0, light_intensity(normal, self.direction_to_light));
        (self.tint * i).lerp(self.atmosphere_colour, aerial_perspective(depth))
    }
}
