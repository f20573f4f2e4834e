use super::{Light, LightId, SceneObject};
use glam::{EulerRot, Mat4, Vec3};

/// Index of a scene in the list handed to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(pub usize);

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scene #{}", self.0)
    }
}

/// A named collection of objects and lights under one root transform.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    name: String,
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    /// Root rotation as XYZ Euler angles in radians.
    pub rotation: Vec3,
    /// Extra rotation about Y applied on top of `rotation` while the
    /// rotation toggle is on.
    pub spin: f32,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an object. Adding the same object twice draws it twice.
    pub fn add(&mut self, object: impl Into<SceneObject>) {
        self.objects.push(object.into());
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id.0)
    }

    /// Root transform: `spin` about Y, after the Euler `rotation`.
    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.spin)
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }
}
