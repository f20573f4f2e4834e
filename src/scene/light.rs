//! Light sources.

use crate::color::Color;
use glam::Vec3;

/// Index of a light within its scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Radiates from `position`. Contribution fades to zero at `distance`;
    /// a distance of 0 means no cutoff.
    Point { distance: f32 },
    /// Parallel rays travelling from `position` towards the origin.
    Directional,
    /// Uniform light from everywhere; `position` is ignored.
    Ambient,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    /// Position relative to the scene root.
    pub position: Vec3,
}

impl Light {
    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point { distance },
            color,
            intensity,
            position: Vec3::ZERO,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
            position: Vec3::Y,
        }
    }

    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            position: Vec3::ZERO,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}
