//! Built-in scene: checkered floor, a spinning cube and a smaller cube
//! orbiting it as a child.

use std::sync::Arc;

use anyhow::{Context, Result};
use asset::{Texture, primitives};
use corelib::{TransformId, Vec3, vec3};
use platform::Scene;
use renderer::{FrameBuffer, LitShader, LitTextureShader, SceneData};

pub const SKY: Vec3 = Vec3::new(0.53, 0.72, 0.9);

const SPIN_SPEED: f32 = 0.8;
const MOON_SPIN_SPEED: f32 = 2.5;

pub struct DemoScene {
    data: SceneData,
    cube: TransformId,
    moon: TransformId,
    time: f32,
}

impl DemoScene {
    pub fn new() -> Result<Self> {
        let mut data = SceneData::new(60f32.to_radians());

        let camera = data.camera.transform;
        let eye = data
            .transforms
            .get_mut(camera)
            .context("Camera transform missing")?;
        eye.position = vec3(0.0, 2.5, -5.0);
        eye.set_pitch(-0.35);

        let checker = Arc::new(Texture::checkerboard(
            64,
            8,
            vec3(0.85, 0.85, 0.85),
            vec3(0.25, 0.3, 0.25),
        ));
        data.add_model(
            "floor",
            Arc::new(primitives::quad(6.0)),
            Arc::new(LitTextureShader::new(Vec3::Y, checker).with_texture_scale(4.0)),
        );

        let cube_mesh = Arc::new(primitives::cube(0.5));
        let cube = data.add_model(
            "cube",
            cube_mesh.clone(),
            Arc::new(LitShader::new(vec3(0.4, 1.0, -0.6), vec3(0.9, 0.35, 0.2))),
        );
        if let Some(t) = data.transforms.get_mut(cube) {
            t.position = vec3(0.0, 0.75, 0.0);
        }

        let moon = data.add_child_model(
            "moon",
            cube,
            cube_mesh,
            Arc::new(LitShader::new(vec3(0.4, 1.0, -0.6), vec3(0.3, 0.5, 0.95))),
        )?;
        let satellite = data
            .transforms
            .get_mut(moon)
            .context("Moon transform missing")?;
        satellite.position = vec3(1.6, 0.4, 0.0);
        satellite.set_scale(Vec3::splat(0.35))?;

        log::info!(
            "Demo scene: {} model(s), {} triangle(s)",
            data.models.len(),
            data.models.iter().map(|m| m.mesh.triangle_count()).sum::<usize>()
        );
        Ok(Self {
            data,
            cube,
            moon,
            time: 0.0,
        })
    }
}

impl Scene for DemoScene {
    fn update(&mut self, _target: &mut FrameBuffer, dt: f32) {
        self.time += dt;
        if let Some(t) = self.data.transforms.get_mut(self.cube) {
            t.set_yaw(self.time * SPIN_SPEED);
        }
        if let Some(t) = self.data.transforms.get_mut(self.moon) {
            t.set_rotation(self.time * MOON_SPIN_SPEED, 0.0, self.time);
        }
    }

    fn data_mut(&mut self) -> &mut SceneData {
        &mut self.data
    }
}
