use crate::geometry::{LineGeometry, RawGeometry};
use crate::material::{BasicMaterial, Material};
use crate::mesh::Transform;
use std::sync::Arc;

/// Triangle geometry with one material per geometry group.
#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub geometry: Arc<RawGeometry>,
    pub materials: Vec<Material>,
    pub transform: Transform,
}

impl SceneMesh {
    pub fn new(geometry: Arc<RawGeometry>, material: Material) -> Self {
        Self::with_materials(geometry, vec![material])
    }

    /// Mesh whose geometry groups index into `materials`.
    pub fn with_materials(geometry: Arc<RawGeometry>, materials: Vec<Material>) -> Self {
        Self {
            geometry,
            materials,
            transform: Transform::default(),
        }
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Material for a group, falling back to the first one.
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index).or_else(|| self.materials.first())
    }
}

/// Line-list geometry drawn unlit.
#[derive(Clone, Debug)]
pub struct LineSegments {
    pub geometry: Arc<LineGeometry>,
    pub material: Material,
    pub transform: Transform,
}

impl LineSegments {
    pub fn new(geometry: Arc<LineGeometry>, material: Material) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    /// Lines colored by the geometry's own vertex colors.
    pub fn vertex_colored(geometry: Arc<LineGeometry>) -> Self {
        Self::new(geometry, BasicMaterial::vertex_colored().into())
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

#[derive(Clone, Debug)]
pub enum SceneObject {
    Mesh(SceneMesh),
    Lines(LineSegments),
}

impl SceneObject {
    pub fn transform(&self) -> &Transform {
        match self {
            SceneObject::Mesh(m) => &m.transform,
            SceneObject::Lines(l) => &l.transform,
        }
    }
}

impl From<SceneMesh> for SceneObject {
    fn from(mesh: SceneMesh) -> Self {
        SceneObject::Mesh(mesh)
    }
}

impl From<LineSegments> for SceneObject {
    fn from(lines: LineSegments) -> Self {
        SceneObject::Lines(lines)
    }
}
