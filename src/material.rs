//! Surface materials.
//!
//! Three shading models cover the labs:
//!
//! - [`PhongMaterial`]: lit, with specular highlights and an optional map
//! - [`BasicMaterial`]: unlit flat or per-vertex color (axes, guide lines)
//! - [`ProjectiveMaterial`]: unlit, vertices pushed through a
//!   [`ProjectiveTransform`] before the camera

use crate::color::Color;
use crate::texture::TextureData;
use glam::{Mat4, Vec3, Vec4};
use std::sync::Arc;

/// Blinn-Phong style lit surface.
#[derive(Clone, Debug)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    /// Multiplied with `color` when present.
    pub map: Option<Arc<TextureData>>,
}

impl PhongMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            specular: Color::rgb(0.067, 0.067, 0.067),
            shininess: 30.0,
            map: None,
        }
    }

    pub fn specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn map(mut self, texture: Arc<TextureData>) -> Self {
        self.map = Some(texture);
        self
    }
}

/// Unlit surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    /// Multiply by the geometry's per-vertex colors.
    pub vertex_colors: bool,
}

impl BasicMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            vertex_colors: false,
        }
    }

    /// White material that shows the geometry's own vertex colors.
    pub fn vertex_colored() -> Self {
        Self {
            color: Color::WHITE,
            vertex_colors: true,
        }
    }
}

/// Projective map with intercepts `a`, `b`, `c` on the three axes.
///
/// As a row-major matrix acting on row vectors `[x y z 1]`:
///
/// ```text
/// | 1 0 0 -1/a |
/// | 0 1 0 -1/b |
/// | 0 0 1 -1/c |
/// | 0 0 0   1  |
/// ```
///
/// so `x, y, z` are kept and `w' = 1 - x/a - y/b - z/c`. Points on the plane
/// `x/a + y/b + z/c = 1` go to infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectiveTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ProjectiveTransform {
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// The matrix in the row-major layout shown above.
    ///
    /// glam stores columns, so the columns of the returned value are the rows
    /// of the table. Read as a column-vector operator it is the transpose of
    /// the table, and `m * p` equals the row-vector product `p * table`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, -1.0 / self.a),
            Vec4::new(0.0, 1.0, 0.0, -1.0 / self.b),
            Vec4::new(0.0, 0.0, 1.0, -1.0 / self.c),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Homogeneous image of `p`.
    pub fn apply(&self, p: Vec3) -> Vec4 {
        self.matrix() * p.extend(1.0)
    }
}

impl Default for ProjectiveTransform {
    fn default() -> Self {
        Self::new(4.0, 4.0, 4.0)
    }
}

/// Flat color shaded after a projective vertex transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectiveMaterial {
    pub color: Color,
    pub transform: ProjectiveTransform,
}

impl ProjectiveMaterial {
    pub fn new(color: Color, transform: ProjectiveTransform) -> Self {
        Self { color, transform }
    }
}

#[derive(Clone, Debug)]
pub enum Material {
    Phong(PhongMaterial),
    Basic(BasicMaterial),
    Projective(ProjectiveMaterial),
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Material::Phong(PhongMaterial::new(color))
    }

    pub fn basic(color: Color) -> Self {
        Material::Basic(BasicMaterial::new(color))
    }

    pub fn color(&self) -> Color {
        match self {
            Material::Phong(m) => m.color,
            Material::Basic(m) => m.color,
            Material::Projective(m) => m.color,
        }
    }

    /// Whether lights affect this material.
    pub fn is_lit(&self) -> bool {
        matches!(self, Material::Phong(_))
    }
}

impl From<PhongMaterial> for Material {
    fn from(m: PhongMaterial) -> Self {
        Material::Phong(m)
    }
}

impl From<BasicMaterial> for Material {
    fn from(m: BasicMaterial) -> Self {
        Material::Basic(m)
    }
}

impl From<ProjectiveMaterial> for Material {
    fn from(m: ProjectiveMaterial) -> Self {
        Material::Projective(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projective_w_drops_with_each_axis() {
        let t = ProjectiveTransform::new(4.0, 4.0, 4.0);
        let out = t.apply(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(out.truncate(), Vec3::ONE);
        assert!((out.w - 0.25).abs() < 1e-6);

        let origin = t.apply(Vec3::ZERO);
        assert_eq!(origin, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn projective_plane_maps_to_infinity() {
        let t = ProjectiveTransform::new(2.0, 4.0, 8.0);
        let on_plane = Vec3::new(1.0, 1.0, 2.0);
        assert!(t.apply(on_plane).w.abs() < 1e-6);
    }

    #[test]
    fn matrix_rows_match_layout() {
        let m = ProjectiveTransform::new(4.0, 2.0, 1.0).matrix();
        assert_eq!(m.x_axis, Vec4::new(1.0, 0.0, 0.0, -0.25));
        assert_eq!(m.y_axis.w, -0.5);
        assert_eq!(m.z_axis.w, -1.0);
        assert_eq!(m.w_axis, Vec4::W);
    }

    #[test]
    fn only_phong_is_lit() {
        assert!(Material::phong(Color::RED).is_lit());
        assert!(!Material::basic(Color::RED).is_lit());
        let projective = ProjectiveMaterial::new(Color::GREEN, ProjectiveTransform::default());
        assert!(!Material::from(projective).is_lit());
        assert_eq!(Material::from(projective).color(), Color::GREEN);
    }
}
