//! Extended edge guides.
//!
//! Takes the edges of a box, pushes each one a unit further out at both
//! ends, and sorts them by the axis they run along. Each axis group becomes
//! one [`LineSegments`] object, colored and stretched along its own axis, so
//! the guides reach far past the box and show where parallel edges meet
//! under a projective transform.
//!
//! | Axis | Color | Scale |
//! |------|-------|-------|
//! | X | red | `(100, 1, 1)` |
//! | Y | green | `(1, 100, 1)` |
//! | Z | blue | `(1, 1, 100)` |

use crate::color::Color;
use crate::geometry::LineGeometry;
use crate::material::Material;
use crate::mesh::Transform;
use crate::scene::{LineSegments, Scene};
use glam::Vec3;
use std::sync::Arc;
use thiserror::Error;

/// Stretch applied to each guide object along its own axis.
pub const GUIDE_SCALE: f32 = 100.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeError {
    #[error("edge buffer has {0} positions; edges need pairs")]
    UnpairedVertex(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// First non-zero component of `direction`, checked in x, y, z order.
    pub fn classify(direction: Vec3) -> Axis {
        if direction.x != 0.0 {
            Axis::X
        } else if direction.y != 0.0 {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn color(self) -> Color {
        match self {
            Axis::X => Color::RED,
            Axis::Y => Color::GREEN,
            Axis::Z => Color::BLUE,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Scale stretching an object by [`GUIDE_SCALE`] along this axis only.
    pub fn guide_scale(self) -> Vec3 {
        Vec3::ONE + self.unit() * (GUIDE_SCALE - 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    pub start: Vec3,
    pub end: Vec3,
}

impl EdgeSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, `None` for degenerate edges.
    pub fn direction(&self) -> Option<Vec3> {
        let d = (self.end - self.start).normalize_or_zero();
        (d != Vec3::ZERO && d.is_finite()).then_some(d)
    }

    /// The segment moved one unit further out at each end.
    pub fn extended(&self, direction: Vec3) -> Self {
        Self {
            start: self.start - direction,
            end: self.end + direction,
        }
    }
}

/// Extended edges grouped by axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisBuckets {
    pub x: Vec<EdgeSegment>,
    pub y: Vec<EdgeSegment>,
    pub z: Vec<EdgeSegment>,
    /// Zero-length or non-finite edges left out of every bucket.
    pub skipped: usize,
}

impl AxisBuckets {
    pub fn bucket(&self, axis: Axis) -> &[EdgeSegment] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn bucket_mut(&mut self, axis: Axis) -> &mut Vec<EdgeSegment> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.x.len() + self.y.len() + self.z.len()
    }

    /// One line set per axis, endpoints interleaved.
    pub fn to_lines(&self, axis: Axis) -> LineGeometry {
        let positions = self
            .bucket(axis)
            .iter()
            .flat_map(|s| [s.start, s.end])
            .collect();
        LineGeometry::new(positions)
    }
}

/// Extends and buckets a flat buffer of edge endpoints.
///
/// Degenerate edges are skipped and counted in [`AxisBuckets::skipped`].
pub fn extrude_edges(positions: &[Vec3]) -> Result<AxisBuckets, EdgeError> {
    if positions.len() % 2 != 0 {
        return Err(EdgeError::UnpairedVertex(positions.len()));
    }

    let mut buckets = AxisBuckets::default();
    for pair in positions.chunks_exact(2) {
        let edge = EdgeSegment::new(pair[0], pair[1]);
        let Some(direction) = edge.direction() else {
            log::warn!(
                "skipping degenerate edge {:?} -> {:?}",
                edge.start,
                edge.end
            );
            buckets.skipped += 1;
            continue;
        };
        buckets
            .bucket_mut(Axis::classify(direction))
            .push(edge.extended(direction));
    }

    Ok(buckets)
}

/// Builds the three axis guide objects for `edges` and adds them to `scene`.
///
/// `material` picks the material for an axis color. Calling this twice adds
/// the guides twice.
pub fn add_extended_edges(
    scene: &mut Scene,
    edges: &LineGeometry,
    material: impl Fn(Color) -> Material,
) -> Result<AxisBuckets, EdgeError> {
    let buckets = extrude_edges(edges.positions())?;

    for axis in Axis::ALL {
        let lines = LineSegments::new(Arc::new(buckets.to_lines(axis)), material(axis.color()))
            .transform(Transform::new().scale(axis.guide_scale()));
        scene.add(lines);
    }

    log::debug!(
        "added edge guides to '{}': {} x, {} y, {} z, {} skipped",
        scene.name(),
        buckets.x.len(),
        buckets.y.len(),
        buckets.z.len(),
        buckets.skipped
    );
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RawGeometry;
    use crate::scene::SceneObject;

    fn box_edges() -> LineGeometry {
        LineGeometry::edges(&RawGeometry::cuboid(1.0, 1.0, 1.0), 1.0)
    }

    #[test]
    fn single_x_edge_is_extended_both_ways() {
        let buckets = extrude_edges(&[Vec3::ZERO, Vec3::X]).unwrap();
        assert_eq!(
            buckets.x,
            vec![EdgeSegment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0))]
        );
        assert!(buckets.y.is_empty());
        assert!(buckets.z.is_empty());
    }

    #[test]
    fn single_axis_edges_land_in_their_bucket() {
        for axis in Axis::ALL {
            let start = Vec3::new(0.3, -0.2, 0.5);
            let buckets = extrude_edges(&[start, start + axis.unit() * 2.5]).unwrap();
            for other in Axis::ALL {
                let expected = usize::from(other == axis);
                assert_eq!(buckets.bucket(other).len(), expected, "{axis:?} into {other:?}");
            }
        }
    }

    #[test]
    fn extension_adds_two_units_along_the_edge() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let end = Vec3::new(4.0, -2.0, 3.0);
        let original = EdgeSegment::new(start, end);
        let buckets = extrude_edges(&[start, end]).unwrap();
        let extended = buckets.x[0];

        assert!((extended.length() - (original.length() + 2.0)).abs() < 1e-5);

        let dir = original.direction().unwrap();
        assert!((extended.start - start).cross(dir).length() < 1e-5);
        assert!((extended.end - end).cross(dir).length() < 1e-5);
    }

    #[test]
    fn buckets_partition_the_input() {
        let positions = box_edges().positions().to_vec();
        let buckets = extrude_edges(&positions).unwrap();

        assert_eq!(buckets.edge_count() + buckets.skipped, positions.len() / 2);
        assert_eq!(buckets.skipped, 0);
        assert_eq!(buckets.x.len(), 4);
        assert_eq!(buckets.y.len(), 4);
        assert_eq!(buckets.z.len(), 4);
    }

    #[test]
    fn tie_prefers_x_then_y() {
        assert_eq!(Axis::classify(Vec3::new(1.0, 1.0, 0.0)), Axis::X);
        assert_eq!(Axis::classify(Vec3::new(0.0, -1.0, 1.0)), Axis::Y);
        assert_eq!(Axis::classify(Vec3::new(0.0, 0.0, -1.0)), Axis::Z);
    }

    #[test]
    fn degenerate_edges_are_skipped() {
        let p = Vec3::new(0.5, 0.5, 0.5);
        let buckets = extrude_edges(&[p, p, Vec3::ZERO, Vec3::Y]).unwrap();
        assert_eq!(buckets.skipped, 1);
        assert_eq!(buckets.edge_count(), 1);
        assert_eq!(buckets.y.len(), 1);
    }

    #[test]
    fn odd_buffer_is_rejected() {
        assert_eq!(
            extrude_edges(&[Vec3::ZERO, Vec3::X, Vec3::Y]),
            Err(EdgeError::UnpairedVertex(3))
        );
    }

    #[test]
    fn guides_are_colored_and_scaled_per_axis() {
        let mut scene = Scene::new("edges");
        add_extended_edges(&mut scene, &box_edges(), Material::basic).unwrap();
        assert_eq!(scene.object_count(), 3);

        let expected = [
            (Color::RED, Vec3::new(100.0, 1.0, 1.0)),
            (Color::GREEN, Vec3::new(1.0, 100.0, 1.0)),
            (Color::BLUE, Vec3::new(1.0, 1.0, 100.0)),
        ];
        for (object, (color, scale)) in scene.objects().iter().zip(expected) {
            let SceneObject::Lines(lines) = object else {
                panic!("expected line segments");
            };
            assert_eq!(lines.material.color(), color);
            assert_eq!(lines.transform.scale, scale);
            assert_eq!(lines.geometry.segment_count(), 4);
        }
    }

    #[test]
    fn building_twice_duplicates_guides() {
        let mut scene = Scene::new("edges");
        let edges = box_edges();
        add_extended_edges(&mut scene, &edges, Material::basic).unwrap();
        add_extended_edges(&mut scene, &edges, Material::basic).unwrap();
        assert_eq!(scene.object_count(), 6);
    }
}
