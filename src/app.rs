use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::controls::ZoomControls;
use crate::error::{QuadviewError, Result};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::labs::{Lab, LabConfig};
use crate::render::GpuRenderer;
use crate::scene::Scene;
use crate::viewer::{FrameContext, QuadViewer};

/// Window and lab settings for [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub lab: Lab,
    pub model_path: PathBuf,
    /// Spin the scenes from the first frame. Off by default, so every view
    /// opens on its axis-aligned pose. `R` toggles it at runtime.
    pub rotate_scenes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "quadview".to_string(),
            width: 800,
            height: 600,
            lab: Lab::PhongCube,
            model_path: LabConfig::default().model_path,
            rotate_scenes: false,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn lab(mut self, lab: Lab) -> Self {
        self.lab = lab;
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn rotate_scenes(mut self, rotate: bool) -> Self {
        self.rotate_scenes = rotate;
        self
    }
}

/// Opens a window and runs the configured lab until it is closed.
///
/// # Example
/// ```no_run
/// use quadview::{AppConfig, Lab};
///
/// quadview::run(AppConfig::new().lab(Lab::GradientCube).size(1280, 720))?;
/// # Ok::<(), quadview::QuadviewError>(())
/// ```
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = QuadviewApp {
        state: AppState::Pending { config },
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct QuadviewApp {
    state: AppState,
    /// First fatal error; ends the event loop.
    error: Option<QuadviewError>,
}

enum AppState {
    Pending { config: AppConfig },
    Running(Box<Running>),
}

struct Running {
    window: Arc<Window>,
    renderer: GpuRenderer,
    scenes: Vec<Scene>,
    cameras: Vec<Camera>,
    viewer: QuadViewer,
    input: Input,
    zoom: ZoomControls,
    rotate_scenes: bool,
    last_frame: Instant,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(format!("{} - {}", config.title, config.lab.title()))
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let (width, height) = (gpu.width(), gpu.height());
        let renderer = GpuRenderer::new(gpu);

        let lab_config = LabConfig {
            aspect: width as f32 / height.max(1) as f32,
            model_path: config.model_path.clone(),
            ..LabConfig::default()
        };
        let setup = config.lab.build(&lab_config);

        log::info!(
            "running '{}' at {width}x{height}, press R to toggle rotation",
            config.lab.title()
        );

        Ok(Self {
            window,
            renderer,
            scenes: setup.scenes,
            cameras: setup.cameras,
            viewer: setup.viewer,
            input: Input::new(),
            zoom: ZoomControls::new(),
            rotate_scenes: config.rotate_scenes,
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        log::debug!("resized to {width}x{height}");
        self.renderer.resize(width, height);
        QuadViewer::resize(&mut self.cameras, width, height);
        self.frame()
    }

    fn frame(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.input.key_pressed(KeyCode::KeyR) {
            self.rotate_scenes = !self.rotate_scenes;
            log::info!("scene rotation {}", if self.rotate_scenes { "on" } else { "off" });
        }
        self.zoom.update(&self.input, &mut self.cameras);

        self.renderer.begin_frame();
        let mut ctx = FrameContext {
            scenes: &mut self.scenes,
            cameras: &mut self.cameras,
            rotate_scenes: self.rotate_scenes,
            dt,
        };
        self.viewer.render_frame(&mut self.renderer, &mut ctx);
        self.input.begin_frame();

        self.renderer.finish_frame()
    }
}

impl QuadviewApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: QuadviewError) {
        log::error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for QuadviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config } = &self.state else {
            return;
        };

        match Running::start(event_loop, config) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = AppState::Running(Box::new(running));
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        running.input.handle_event(&event);

        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => running.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if running.input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                }
                let result = running.frame();
                running.window.request_redraw();
                result
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_sets_fields() {
        let config = AppConfig::new()
            .title("labs")
            .size(1024, 768)
            .lab(Lab::ModelViews)
            .model_path("assets/bunny.stl")
            .rotate_scenes(true);

        assert_eq!(config.title, "labs");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.lab, Lab::ModelViews);
        assert_eq!(config.model_path, PathBuf::from("assets/bunny.stl"));
        assert!(config.rotate_scenes);
    }

    #[test]
    fn scenes_start_still() {
        assert!(!AppConfig::default().rotate_scenes);
    }

    #[test]
    fn default_model_path_matches_lab_default() {
        assert_eq!(AppConfig::default().model_path, LabConfig::default().model_path);
    }
}
