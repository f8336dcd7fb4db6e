//! Engine context: everything a running engine owns, passed explicitly.

use std::{path::Path, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use corelib::{EngineConfig, Vec3, camera::Camera, ecs::World};
use renderer::{GpuState, builtin};
use winit::window::Window;

use crate::{
    scene,
    timing::{FixedStep, FpsCounter},
};

/// Angular speed of the built-in cube, radians per second.
const CUBE_SPIN: [f32; 3] = [0.5, 1.0, 0.0];

pub struct EngineContext {
    pub config: EngineConfig,
    pub window: Arc<Window>,
    pub gpu: GpuState,
    pub camera: Camera,
    pub world: World,
    spin: Option<[f32; 3]>,
    fixed: FixedStep,
    fps: Option<FpsCounter>,
    last_frame: Instant,
}

impl EngineContext {
    pub fn new(
        config: EngineConfig,
        window: Arc<Window>,
        backends: wgpu::Backends,
        show_fps: bool,
        scene_path: Option<&Path>,
    ) -> Result<Self> {
        let mut gpu = pollster::block_on(GpuState::new(window.clone(), backends))
            .context("GPU initialization failed")?;
        let mut world = World::new();

        let (bounds, spin) = match scene_path {
            Some(path) => (scene::load_scene(&mut gpu, &mut world, path)?, None),
            None => {
                let cube = builtin::cube_mesh();
                scene::spawn_meshes(&mut gpu, &mut world, std::slice::from_ref(&cube));
                log::info!("No scene given; showing the built-in cube");
                (scene::mesh_bounds([&cube]), Some(CUBE_SPIN))
            }
        };
        let (min, max) = bounds.unwrap_or((Vec3::splat(-1.0), Vec3::splat(1.0)));
        let camera = Camera::framing(min, max, gpu.aspect());

        let now = Instant::now();
        Ok(Self {
            fixed: FixedStep::new(config.update_step()),
            config,
            window,
            gpu,
            camera,
            world,
            spin,
            fps: show_fps.then(|| FpsCounter::new(now)),
            last_frame: now,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.camera = self.camera.with_aspect(self.gpu.aspect());
    }

    /// Run pending fixed updates, then draw one frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        for _ in 0..self.fixed.advance(dt) {
            self.update(self.fixed.step());
        }

        if let Err(e) = self.gpu.render(&self.camera, &self.world) {
            if GpuState::is_surface_lost(&e) {
                log::warn!("Surface lost/outdated, recreating");
                self.gpu.recreate_surface();
            } else {
                log::error!("Render error: {e:?}");
            }
        }

        if let Some(fps) = self.fps.as_mut().and_then(|c| c.frame(now)) {
            log::info!("FPS: {fps:.1}");
        }
    }

    fn update(&mut self, step: f32) {
        if let Some(speed) = self.spin {
            self.world.system_rotate_all(step, speed);
        }
    }
}
