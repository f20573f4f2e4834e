//! CPU-side geometry: triangle meshes, line sets and model loading.
//!
//! Geometry lives on the CPU until a renderer first draws it. Each piece of
//! geometry carries a [`GeometryId`]; scene objects share geometry through
//! `Arc`, so a model cloned into four scenes is uploaded once.
//!
//! # Provided shapes
//!
//! | Constructor | Result |
//! |---|---|
//! | [`RawGeometry::cuboid`] | box with one material group per face |
//! | [`LineGeometry::edges`] | feature edges of a triangle mesh |
//! | [`LineGeometry::axes`] | three colored axis lines from the origin |
//! | [`ModelLoader`] | STL files, binary or ASCII |

use crate::color::Color;
use glam::Vec3;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors that can occur when loading geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown geometry format: '{0}'")]
    UnknownFormat(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Identity of a geometry buffer, used as the GPU upload cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A vertex with position, normal, texture coordinates and color.
///
/// Layout (44 bytes):
///
/// | Attribute | Format    | Offset | Location |
/// |-----------|-----------|--------|----------|
/// | position  | Float32x3 | 0      | 0        |
/// | normal    | Float32x3 | 12     | 1        |
/// | uv        | Float32x2 | 24     | 2        |
/// | color     | Float32x3 | 32     | 3        |
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex3d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    /// A white vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            color: [1.0, 1.0, 1.0],
        }
    }

    /// A bare colored point, as used by line sets.
    pub fn point(position: Vec3, color: Color) -> Self {
        Self {
            position: position.into(),
            normal: [0.0, 0.0, 0.0],
            uv: [0.0, 0.0],
            color: [color.r, color.g, color.b],
        }
    }
}

/// A range of indices drawn with one material of a multi-material mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

/// Indexed triangle geometry.
#[derive(Clone, Debug)]
pub struct RawGeometry {
    id: GeometryId,
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
    /// Material groups; empty means "everything uses material 0".
    pub groups: Vec<Group>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self {
            id: GeometryId::next(),
            vertices,
            indices,
            groups: Vec::new(),
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    /// Box centered at the origin with one material group per face.
    ///
    /// Face order (and group material index): +X, -X, +Y, -Y, +Z, -Z.
    /// Texture coordinates put `v = 0` on the upper edge of the side faces.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;

        // (normal, u axis, v axis) per face; corners are normal ± u ± v.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::NEG_Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::NEG_Y),
            (Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::Z, Vec3::X, Vec3::NEG_Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::NEG_Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        let mut groups = Vec::with_capacity(6);

        for (material_index, (normal, u, v)) in faces.into_iter().enumerate() {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * h;
                let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
                vertices.push(Vertex3d::new(p.into(), normal.into(), uv));
            }

            // Wind counter-clockwise seen from outside.
            let tri = if u.cross(v).dot(normal) > 0.0 {
                [0, 1, 2, 2, 3, 0]
            } else {
                [0, 3, 2, 2, 1, 0]
            };
            groups.push(Group {
                start: indices.len() as u32,
                count: 6,
                material_index,
            });
            indices.extend(tri.iter().map(|i| base + i));
        }

        Self {
            id: GeometryId::next(),
            vertices,
            indices,
            groups,
        }
    }

    /// Material groups, synthesizing a single group when none are set.
    pub fn draw_groups(&self) -> Vec<Group> {
        if self.groups.is_empty() {
            vec![Group {
                start: 0,
                count: self.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).into();
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) * factor).into();
        }
    }

    pub fn recenter(&mut self) {
        let center = self.center();
        self.translate(-center);
    }

    /// Scales the geometry to fit within a unit cube.
    pub fn normalize(&mut self) {
        let size = self.size();
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim > 0.0 {
            self.scale(1.0 / max_dim);
        }
    }

    /// Smooth normals: area-weighted average of adjacent face normals.
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);
            let face_normal = (p1 - p0).cross(p2 - p0);

            for i in [i0, i1, i2] {
                let n = Vec3::from(self.vertices[i].normal) + face_normal;
                self.vertices[i].normal = n.into();
            }
        }

        for v in &mut self.vertices {
            v.normal = Vec3::from(v.normal).normalize_or_zero().into();
        }
    }
}

/// Line-list geometry: consecutive position pairs are segments.
#[derive(Clone, Debug)]
pub struct LineGeometry {
    id: GeometryId,
    positions: Vec<Vec3>,
    colors: Vec<Color>,
}

impl LineGeometry {
    /// White segments from a flat list of endpoint pairs.
    pub fn new(positions: Vec<Vec3>) -> Self {
        let colors = vec![Color::WHITE; positions.len()];
        Self {
            id: GeometryId::next(),
            positions,
            colors,
        }
    }

    /// Segments with one color per vertex.
    ///
    /// Missing colors are padded with white; extra colors are dropped.
    pub fn with_colors(positions: Vec<Vec3>, mut colors: Vec<Color>) -> Self {
        colors.resize(positions.len(), Color::WHITE);
        Self {
            id: GeometryId::next(),
            positions,
            colors,
        }
    }

    /// Axis lines of length `size` from the origin, colored per axis.
    pub fn axes(size: f32, colors: [Color; 3]) -> Self {
        let positions = vec![
            Vec3::ZERO,
            Vec3::X * size,
            Vec3::ZERO,
            Vec3::Y * size,
            Vec3::ZERO,
            Vec3::Z * size,
        ];
        let vertex_colors = colors.iter().flat_map(|&c| [c, c]).collect();
        Self::with_colors(positions, vertex_colors)
    }

    /// Axis lines with the default fading palette (red, green, blue tips).
    pub fn default_axes(size: f32) -> Self {
        let positions = vec![
            Vec3::ZERO,
            Vec3::X * size,
            Vec3::ZERO,
            Vec3::Y * size,
            Vec3::ZERO,
            Vec3::Z * size,
        ];
        let colors = vec![
            Color::RED,
            Color::rgb(1.0, 0.6, 0.0),
            Color::GREEN,
            Color::rgb(0.6, 1.0, 0.0),
            Color::BLUE,
            Color::rgb(0.0, 0.6, 1.0),
        ];
        Self::with_colors(positions, colors)
    }

    /// Feature edges of a triangle mesh.
    ///
    /// An edge is kept when it borders a single triangle, or when the two
    /// triangles sharing it meet at more than `threshold_degrees`. Vertices
    /// are welded by position, so split-normal meshes (like
    /// [`RawGeometry::cuboid`]) report their hard edges once.
    ///
    /// Edges are emitted in first-seen order, oriented as in the first
    /// triangle that contained them.
    pub fn edges(geometry: &RawGeometry, threshold_degrees: f32) -> Self {
        const PRECISION: f32 = 1e4;
        let key = |p: Vec3| {
            (
                (p.x * PRECISION).round() as i64,
                (p.y * PRECISION).round() as i64,
                (p.z * PRECISION).round() as i64,
            )
        };
        let threshold_dot = threshold_degrees.to_radians().cos();

        struct EdgeRecord {
            start: Vec3,
            end: Vec3,
            normals: Vec<Vec3>,
        }

        let mut lookup = HashMap::new();
        let mut records: Vec<EdgeRecord> = Vec::new();

        for tri in geometry.indices.chunks_exact(3) {
            let p = [
                Vec3::from(geometry.vertices[tri[0] as usize].position),
                Vec3::from(geometry.vertices[tri[1] as usize].position),
                Vec3::from(geometry.vertices[tri[2] as usize].position),
            ];
            let keys = [key(p[0]), key(p[1]), key(p[2])];
            if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
                continue;
            }
            let normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();

            for j in 0..3 {
                let (a, b) = (j, (j + 1) % 3);
                let edge_key = if keys[a] < keys[b] {
                    (keys[a], keys[b])
                } else {
                    (keys[b], keys[a])
                };
                let index = *lookup.entry(edge_key).or_insert_with(|| {
                    records.push(EdgeRecord {
                        start: p[a],
                        end: p[b],
                        normals: Vec::new(),
                    });
                    records.len() - 1
                });
                records[index].normals.push(normal);
            }
        }

        let mut positions = Vec::new();
        for record in &records {
            let keep = match record.normals.as_slice() {
                [_] => true,
                [n0, n1] => n0.dot(*n1) <= threshold_dot,
                _ => true,
            };
            if keep {
                positions.push(record.start);
                positions.push(record.end);
            }
        }

        Self::new(positions)
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Endpoint pairs. A trailing unpaired position is ignored.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.positions.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Vertices ready for upload.
    pub fn vertices(&self) -> Vec<Vertex3d> {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(&p, &c)| Vertex3d::point(p, c))
            .collect()
    }
}

/// Loads triangle geometry from model files with optional cleanup steps.
///
/// Steps run in a fixed order: center, normalize, scale, smooth normals.
///
/// ```no_run
/// use quadview::ModelLoader;
///
/// let teapot = ModelLoader::from_file("models/teapot.stl")
///     .centered()
///     .normalized()
///     .scaled(100.0)
///     .load();
/// ```
#[derive(Clone)]
pub struct ModelLoader {
    result: Result<RawGeometry, String>,
    center: bool,
    normalize: bool,
    smooth_normals: bool,
    scale_factor: Option<f32>,
}

impl ModelLoader {
    /// Loads a model file, detecting the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::with_result(load_file(path.as_ref()).map_err(|e| e.to_string()))
    }

    /// Parses STL data held in memory.
    pub fn from_stl_bytes(bytes: &[u8]) -> Self {
        let mut cursor = std::io::Cursor::new(bytes);
        Self::with_result(parse_stl(&mut cursor).map_err(|e| e.to_string()))
    }

    fn with_result(result: Result<RawGeometry, String>) -> Self {
        Self {
            result,
            center: false,
            normalize: false,
            smooth_normals: false,
            scale_factor: None,
        }
    }

    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    pub fn smooth_normals(mut self) -> Self {
        self.smooth_normals = true;
        self
    }

    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale_factor = Some(factor);
        self
    }

    /// Runs the requested steps and returns the geometry.
    pub fn load(self) -> Result<RawGeometry, GeometryError> {
        let mut geometry = self.result.map_err(GeometryError::Parse)?;

        if self.center {
            geometry.recenter();
        }
        if self.normalize {
            geometry.normalize();
        }
        if let Some(scale) = self.scale_factor {
            geometry.scale(scale);
        }
        if self.smooth_normals {
            geometry.recalculate_normals();
        }

        Ok(geometry)
    }
}

fn load_file(path: &Path) -> Result<RawGeometry, GeometryError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "stl" => {
            let file = std::fs::File::open(path)?;
            let mut reader = std::io::BufReader::new(file);
            parse_stl(&mut reader)
        }
        _ => Err(GeometryError::UnknownFormat(ext)),
    }
}

fn parse_stl<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
) -> Result<RawGeometry, GeometryError> {
    let stl = stl_io::read_stl(reader)
        .map_err(|e| GeometryError::Parse(format!("STL parse error: {}", e)))?;

    let mut vertices = Vec::with_capacity(stl.faces.len() * 3);
    let mut indices = Vec::with_capacity(stl.faces.len() * 3);

    for face in &stl.faces {
        let normal: [f32; 3] = face.normal.into();
        for &vertex_idx in &face.vertices {
            let vertex = stl.vertices.get(vertex_idx).ok_or_else(|| {
                GeometryError::Parse(format!("vertex index {} out of range", vertex_idx))
            })?;
            indices.push(vertices.len() as u32);
            vertices.push(Vertex3d::new((*vertex).into(), normal, [0.0, 0.0]));
        }
    }

    Ok(RawGeometry::new(vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_geometry_bounds() {
        let vertices = vec![
            Vertex3d::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex3d::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex3d::new([-1.0, -1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
        ];
        let geom = RawGeometry::new(vertices, vec![0, 1, 2]);

        let (min, max) = geom.bounds();
        assert_eq!(min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn raw_geometry_recenter() {
        let vertices = vec![
            Vertex3d::new([2.0, 2.0, 2.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex3d::new([4.0, 4.0, 4.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
        ];
        let mut geom = RawGeometry::new(vertices, vec![0, 1, 0]);

        geom.recenter();

        assert!(geom.center().length() < 0.001);
    }

    #[test]
    fn cuboid_has_six_groups_and_outward_winding() {
        let cube = RawGeometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.groups.len(), 6);

        let (min, max) = cube.bounds();
        assert_eq!(min, Vec3::splat(-0.5));
        assert_eq!(max, Vec3::splat(0.5));

        for tri in cube.indices.chunks_exact(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from(cube.vertices[i as usize].position))
                .collect();
            let n = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!((p[1] - p[0]).cross(p[2] - p[0]).dot(n) > 0.0);
        }
    }

    #[test]
    fn cuboid_groups_follow_face_order() {
        let cube = RawGeometry::cuboid(2.0, 2.0, 2.0);
        let expected = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (group, normal) in cube.groups.iter().zip(expected) {
            let first = cube.indices[group.start as usize] as usize;
            assert_eq!(Vec3::from(cube.vertices[first].normal), normal);
        }
    }

    #[test]
    fn box_edges_are_the_twelve_hard_edges() {
        let cube = RawGeometry::cuboid(1.0, 1.0, 1.0);
        let edges = LineGeometry::edges(&cube, 1.0);
        assert_eq!(edges.segment_count(), 12);

        for (a, b) in edges.segments() {
            assert!(((b - a).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn open_triangle_keeps_boundary_edges() {
        let vertices = vec![
            Vertex3d::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex3d::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex3d::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        ];
        let tri = RawGeometry::new(vertices, vec![0, 1, 2]);
        let edges = LineGeometry::edges(&tri, 1.0);
        assert_eq!(edges.segment_count(), 3);
        assert_eq!(edges.positions()[0], Vec3::ZERO);
        assert_eq!(edges.positions()[1], Vec3::X);
    }

    #[test]
    fn axes_color_each_line() {
        let axes = LineGeometry::axes(5.0, [Color::RED, Color::GREEN, Color::BLUE]);
        assert_eq!(axes.segment_count(), 3);
        assert_eq!(axes.positions()[3], Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(axes.colors()[4], Color::BLUE);
        assert_eq!(axes.vertices().len(), 6);
    }

    #[test]
    fn with_colors_pads_to_positions() {
        let lines = LineGeometry::with_colors(vec![Vec3::ZERO, Vec3::X], vec![Color::RED]);
        assert_eq!(lines.colors(), &[Color::RED, Color::WHITE]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ModelLoader::from_file("teapot/scene.gltf").load().unwrap_err();
        assert!(err.to_string().contains("gltf"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ModelLoader::from_file("does/not/exist.stl").load().is_err());
    }

    #[test]
    fn ascii_stl_loads_and_normalizes() {
        let stl = b"solid t
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 4 0 0
vertex 0 2 0
endloop
endfacet
endsolid t
";
        let geom = ModelLoader::from_stl_bytes(stl)
            .centered()
            .normalized()
            .load()
            .unwrap();
        assert_eq!(geom.indices.len(), 3);
        let size = geom.size();
        assert!((size.x - 1.0).abs() < 1e-5);
        assert!((size.y - 0.5).abs() < 1e-5);
        assert!(geom.center().length() < 1e-5);
    }

    #[test]
    fn model_pipeline_centers_and_scales_to_size() {
        let stl = b"solid t
facet normal 0 0 1
outer loop
vertex 2 2 0
vertex 6 2 0
vertex 2 4 1
endloop
endfacet
endsolid t
";
        let geom = ModelLoader::from_stl_bytes(stl)
            .centered()
            .normalized()
            .scaled(100.0)
            .smooth_normals()
            .load()
            .unwrap();

        let size = geom.size();
        assert!((size.max_element() - 100.0).abs() < 1e-3);
        assert!(geom.center().length() < 1e-3);
        for v in &geom.vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }
}
