//! # quadview
//!
//! **Four views of one scene, side by side.**
//!
//! quadview splits a window into four quadrants and renders a different
//! scene/camera pose into each one: the front, top and side orthographic
//! projections plus an isometric (or perspective) view. It ships the labs it
//! was built for (a Phong cube, a loaded model, a gradient-mapped cube and a
//! projective transform with extended edge guides) and the pieces to build
//! more.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quadview::{AppConfig, Lab};
//!
//! fn main() -> Result<(), quadview::QuadviewError> {
//!     quadview::init_logging(Default::default());
//!     quadview::run(AppConfig::new().lab(Lab::ProjectiveEdges))
//! }
//! ```
//!
//! ## Without a window
//!
//! The viewer talks to a [`Renderer`], so the whole frame sequence can run
//! against a [`RecordingRenderer`]:
//!
//! ```
//! use quadview::*;
//!
//! let setup = Lab::PhongCube.build(&LabConfig::default());
//! let (mut scenes, mut cameras) = (setup.scenes, setup.cameras);
//! let mut renderer = RecordingRenderer::new(800, 600);
//!
//! let mut ctx = FrameContext {
//!     scenes: &mut scenes,
//!     cameras: &mut cameras,
//!     rotate_scenes: false,
//!     dt: 0.0,
//! };
//! setup.viewer.render_frame(&mut renderer, &mut ctx);
//! assert_eq!(renderer.render_count(), 4);
//! ```

mod app;
mod camera;
mod color;
mod controls;
pub mod edges;
mod error;
mod geometry;
mod gpu;
mod input;
pub mod labs;
mod logging;
mod material;
mod mesh;
pub mod render;
pub mod scene;
mod texture;
mod viewer;
mod viewport;

pub use app::{AppConfig, run};
pub use camera::{Camera, CameraPose, Projection};
pub use color::Color;
pub use controls::ZoomControls;
pub use edges::{Axis, AxisBuckets, EdgeError, EdgeSegment, add_extended_edges, extrude_edges};
pub use error::{QuadviewError, Result};
pub use geometry::{
    GeometryError, GeometryId, Group, LineGeometry, ModelLoader, RawGeometry, Vertex3d,
};
pub use gpu::{GpuContext, SurfaceErrorAction};
pub use input::Input;
pub use labs::{Lab, LabConfig, LabSetup};
pub use logging::{LoggingConfig, init_logging};
pub use material::{
    BasicMaterial, Material, PhongMaterial, ProjectiveMaterial, ProjectiveTransform,
};
pub use mesh::{GpuMesh, Transform};
pub use render::{GpuRenderer, RecordingRenderer, RenderCommand, RenderState, Renderer};
pub use scene::{Light, LightId, LightKind, LineSegments, Scene, SceneId, SceneMesh, SceneObject};
pub use texture::{Texture, TextureData, TextureId};
pub use viewer::{CameraId, FrameContext, LightSetting, QuadViewer, QuadrantView, SPIN_SPEED};
pub use viewport::{Quadrant, ViewportRect, quadrant_rects};

// Re-export glam math types for convenience
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
