//! Spatial transforms and GPU-resident geometry buffers.
//!
//! - [`Transform`] places a scene object relative to its scene root
//! - [`GpuMesh`] holds the uploaded vertex (and optional index) buffers
//!
//! # Transforms
//!
//! [`Transform`] uses a builder pattern:
//!
//! ```
//! use quadview::{Transform, Vec3, Quat};
//!
//! let guide = Transform::new()
//!     .position(Vec3::new(0.0, 2.0, -5.0))
//!     .rotation(Quat::from_rotation_y(0.5))
//!     .scale(Vec3::new(100.0, 1.0, 1.0));
//! ```

use crate::geometry::{LineGeometry, RawGeometry, Vertex3d};
use crate::gpu::GpuContext;
use glam::{Mat4, Quat, Vec3};

/// Uploaded geometry, ready to bind in a render pass.
///
/// Triangle meshes are indexed; line sets are drawn straight from the
/// vertex buffer.
#[derive(Debug)]
pub struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: Option<wgpu::Buffer>,
}

impl GpuMesh {
    /// Uploads raw vertex and index data.
    ///
    /// An empty index slice produces a non-indexed mesh.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32], label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = (!indices.is_empty()).then(|| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Index Buffer")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn from_geometry(gpu: &GpuContext, geometry: &RawGeometry) -> Self {
        Self::new(gpu, &geometry.vertices, &geometry.indices, "Mesh")
    }

    pub fn from_lines(gpu: &GpuContext, lines: &LineGeometry) -> Self {
        Self::new(gpu, &lines.vertices(), &[], "Lines")
    }
}

/// Position, rotation and scale of a scene object.
///
/// The matrix applies scale first, then rotation, then translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Non-uniform scale, e.g. stretching a guide line along one axis.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_by_default() {
        assert_eq!(Transform::new().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn scale_applies_before_translation() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .scale(Vec3::new(100.0, 1.0, 1.0));
        let p = t.matrix().transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(p, Vec3::new(51.0, 0.5, 0.0));
    }
}
