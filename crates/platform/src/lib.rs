//! Platform layer: window, event loop and the engine context that drives the renderer.

mod context;
pub mod scene;
pub mod timing;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use corelib::EngineConfig;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

pub use context::EngineContext;

/// Everything the app layer decides before the window opens.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub config: EngineConfig,
    pub scene: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            show_fps: false,
            config: EngineConfig::default(),
            scene: None,
        }
    }
}

/// Open the window and run until it is closed.
pub fn run_with_renderer(options: RunOptions) -> Result<()> {
    options.config.validate()?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        options,
        engine: None,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with error")?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    options: RunOptions,
    engine: Option<EngineContext>,
    error: Option<anyhow::Error>,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EngineContext> {
        let config = &self.options.config;
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        EngineContext::new(
            config.clone(),
            window,
            self.options.backends,
            self.options.show_fps,
            self.options.scene.as_deref(),
        )
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                log::error!("Engine start failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                engine.resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {:.3}", scale_factor);
                let size = engine.window.inner_size();
                engine.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => engine.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.window.request_redraw();
        }
    }
}
