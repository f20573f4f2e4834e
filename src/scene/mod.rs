//! Scene graph: objects, lights and a rotatable root.
//!
//! A [`Scene`] is a flat list of [`SceneObject`]s and [`Light`]s under a single
//! root transform. Labs build several scenes that share geometry through
//! `Arc`, then hand them to the [`QuadViewer`](crate::QuadViewer), which
//! renders one per quadrant.
//!
//! # Example
//!
//! ```
//! use quadview::*;
//! use std::sync::Arc;
//!
//! let cube = Arc::new(RawGeometry::cuboid(1.0, 1.0, 1.0));
//!
//! let mut scene = Scene::new("front");
//! scene.add(SceneMesh::new(cube, Material::phong(Color::RED)));
//! let light = scene.add_light(Light::point(Color::WHITE, 1.0, 1000.0));
//!
//! if let Some(light) = scene.light_mut(light) {
//!     light.position = Vec3::new(0.0, 0.0, 1.8);
//! }
//! assert_eq!(scene.object_count(), 1);
//! ```

mod light;
mod object;
#[allow(clippy::module_inception)]
mod scene;

pub use light::{Light, LightId, LightKind};
pub use object::{LineSegments, SceneMesh, SceneObject};
pub use scene::{Scene, SceneId};
