//! The four lab setups.
//!
//! Each lab builds four scenes, the cameras they are seen through and the
//! [`QuadViewer`] that lays them out:
//!
//! | Lab | Scenes | Camera |
//! |---|---|---|
//! | [`Lab::PhongCube`] | Phong cube, axes, point light | orthographic, 2 tall |
//! | [`Lab::ModelViews`] | loaded model, axes, directional light | orthographic, 180 tall |
//! | [`Lab::GradientCube`] | gradient-mapped cube, point + ambient light | orthographic and perspective |
//! | [`Lab::ProjectiveEdges`] | projective cube with extended edge guides | orthographic, 2 tall |

use crate::camera::Camera;
use crate::color::Color;
use crate::edges::add_extended_edges;
use crate::geometry::{LineGeometry, ModelLoader, RawGeometry};
use crate::material::{Material, PhongMaterial, ProjectiveMaterial, ProjectiveTransform};
use crate::scene::{Light, LightId, SceneMesh, LineSegments, Scene, SceneId};
use crate::texture::TextureData;
use crate::viewer::{CameraId, LightSetting, QuadViewer, QuadrantView};
use crate::viewport::Quadrant;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};
use std::path::PathBuf;
use std::sync::Arc;

/// Face colors in box face order: +X, -X, +Y, -Y, +Z, -Z.
const FACE_COLORS: [Color; 6] = [
    Color::BLUE,
    Color::YELLOW,
    Color::CYAN,
    Color::RED,
    Color::MAGENTA,
    Color::GREEN,
];

const SHININESS: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Lab {
    /// Phong-shaded cube from four orthographic views.
    PhongCube,
    /// A loaded model cloned into four views.
    ModelViews,
    /// Gradient-textured cube with an isometric and a perspective view.
    GradientCube,
    /// Projective transform with extended edge guides.
    ProjectiveEdges,
}

impl Lab {
    pub const ALL: [Lab; 4] = [
        Lab::PhongCube,
        Lab::ModelViews,
        Lab::GradientCube,
        Lab::ProjectiveEdges,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Lab::PhongCube => "Phong cube",
            Lab::ModelViews => "Model views",
            Lab::GradientCube => "Gradient cube",
            Lab::ProjectiveEdges => "Projective edges",
        }
    }

    /// Builds the lab for a canvas with the given aspect ratio.
    pub fn build(self, config: &LabConfig) -> LabSetup {
        let aspect = if config.aspect.is_finite() && config.aspect > 0.0 {
            config.aspect
        } else {
            1.0
        };
        let setup = match self {
            Lab::PhongCube => phong_cube(aspect),
            Lab::ModelViews => model_views(aspect, config),
            Lab::GradientCube => gradient_cube(aspect),
            Lab::ProjectiveEdges => projective_edges(aspect),
        };
        log::info!(
            "built lab '{}': {} scenes, {} cameras",
            self.title(),
            setup.scenes.len(),
            setup.cameras.len()
        );
        setup
    }
}

/// Inputs a lab needs beyond its fixed layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LabConfig {
    /// Canvas width over height.
    pub aspect: f32,
    /// Model for [`Lab::ModelViews`].
    pub model_path: PathBuf,
    /// Size the loaded model is scaled to, in world units.
    pub model_size: f32,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            aspect: 4.0 / 3.0,
            model_path: PathBuf::from("models/teapot.stl"),
            model_size: 100.0,
        }
    }
}

/// A ready-to-run lab.
#[derive(Debug)]
pub struct LabSetup {
    pub scenes: Vec<Scene>,
    pub cameras: Vec<Camera>,
    pub viewer: QuadViewer,
}

/// The four quadrants of the labs: front, top, side and isometric, each with
/// its own backdrop.
fn standard_views(
    camera: CameraId,
    lights: &[LightId; 4],
    distance: f32,
    iso: f32,
    light_offset: [Vec3; 4],
) -> [QuadrantView; 4] {
    [
        QuadrantView::new(Quadrant::TopLeft, SceneId(0), camera)
            .clear_color(Color::PINK_BACKDROP)
            .looking_from([0.0, 0.0, distance])
            .light(LightSetting::new(lights[0], light_offset[0])),
        QuadrantView::new(Quadrant::TopRight, SceneId(1), camera)
            .clear_color(Color::MINT_BACKDROP)
            .looking_from([0.0, distance, 0.0])
            .light(LightSetting::new(lights[1], light_offset[1])),
        QuadrantView::new(Quadrant::BottomLeft, SceneId(2), camera)
            .clear_color(Color::LAVENDER_BACKDROP)
            .looking_from([distance, 0.0, 0.0])
            .light(LightSetting::new(lights[2], light_offset[2])),
        QuadrantView::new(Quadrant::BottomRight, SceneId(3), camera)
            .clear_color(Color::ROSE_BACKDROP)
            .looking_from([iso, iso, iso])
            .light(LightSetting::new(lights[3], light_offset[3])),
    ]
}

fn scenes(names: [&str; 4]) -> Vec<Scene> {
    names.into_iter().map(Scene::new).collect()
}

fn phong_face_materials() -> Vec<Material> {
    FACE_COLORS
        .iter()
        .map(|&color| {
            PhongMaterial::new(color)
                .specular(Color::WHITE)
                .shininess(SHININESS)
                .into()
        })
        .collect()
}

/// Adds the cube and axes shared by the cube labs, plus a point light.
fn cube_scene(scene: &mut Scene, cube: &Arc<RawGeometry>, materials: &[Material]) -> LightId {
    scene.add(SceneMesh::with_materials(cube.clone(), materials.to_vec()));
    scene.add(LineSegments::vertex_colored(Arc::new(
        LineGeometry::default_axes(5.0),
    )));
    scene.add_light(Light::point(Color::WHITE, 1.0, 1000.0))
}

fn phong_cube(aspect: f32) -> LabSetup {
    let cube = Arc::new(RawGeometry::cuboid(1.0, 1.0, 1.0));
    let materials = phong_face_materials();

    let mut scenes = scenes(["xoy", "xoz", "yoz", "isometric"]);
    let lights: Vec<LightId> = scenes
        .iter_mut()
        .map(|scene| cube_scene(scene, &cube, &materials))
        .collect();
    let lights = [lights[0], lights[1], lights[2], lights[3]];

    let mut views = standard_views(
        CameraId(0),
        &lights,
        2.0,
        1.125,
        [
            Vec3::new(0.0, 0.0, 1.8),
            Vec3::new(0.0, 1.8, 0.0),
            Vec3::new(1.8, 0.0, 0.0),
            Vec3::ONE,
        ],
    );
    views[3].lights[0] = views[3].lights[0].intensity(10.0);

    LabSetup {
        scenes,
        cameras: vec![Camera::orthographic(2.0, aspect)],
        viewer: QuadViewer::new(views),
    }
}

fn model_views(aspect: f32, config: &LabConfig) -> LabSetup {
    let model = ModelLoader::from_file(&config.model_path)
        .centered()
        .normalized()
        .scaled(config.model_size)
        .smooth_normals()
        .load();
    let model = match model {
        Ok(geometry) => Some(Arc::new(geometry)),
        Err(err) => {
            log::error!(
                "failed to load model '{}': {err}; showing axes only",
                config.model_path.display()
            );
            None
        }
    };

    let axes = Arc::new(LineGeometry::axes(
        200.0,
        [Color::RED, Color::GREEN, Color::BLUE],
    ));
    let material = Material::from(PhongMaterial::new(Color::WHITE));

    let mut scenes = scenes(["xoy", "xoz", "yoz", "isometric"]);
    let mut lights = Vec::with_capacity(4);
    for scene in &mut scenes {
        if let Some(model) = &model {
            scene.add(SceneMesh::new(model.clone(), material.clone()));
        }
        scene.add(LineSegments::vertex_colored(axes.clone()));
        lights.push(scene.add_light(Light::directional(Color::WHITE, 1.0)));
    }
    let lights = [lights[0], lights[1], lights[2], lights[3]];

    let views = standard_views(
        CameraId(0),
        &lights,
        150.0,
        85.0,
        [Vec3::Z, Vec3::Y, Vec3::X, Vec3::ONE],
    );

    LabSetup {
        scenes,
        cameras: vec![Camera::orthographic(180.0, aspect)],
        viewer: QuadViewer::new(views),
    }
}

fn gradient_cube(aspect: f32) -> LabSetup {
    let cube = Arc::new(RawGeometry::cuboid(1.0, 1.0, 1.0));
    let gradient = Arc::new(TextureData::vertical_gradient(256, Color::RED, Color::YELLOW));
    let side: Material = PhongMaterial::new(Color::WHITE)
        .specular(Color::WHITE)
        .shininess(SHININESS)
        .map(gradient)
        .into();
    let cap = |color| -> Material {
        PhongMaterial::new(color)
            .specular(Color::WHITE)
            .shininess(SHININESS)
            .into()
    };
    let materials = vec![
        side.clone(),
        side.clone(),
        cap(Color::RED),
        cap(Color::YELLOW),
        side.clone(),
        side,
    ];
    let axes = Arc::new(LineGeometry::axes(
        200.0,
        [Color::RED, Color::GREEN, Color::BLUE],
    ));

    // Scene order: top, back, isometric, perspective.
    let mut scenes = scenes(["xoz", "xoy", "isometric", "yoz"]);
    let mut lights = Vec::with_capacity(4);
    for scene in &mut scenes {
        scene.add(SceneMesh::with_materials(cube.clone(), materials.clone()));
        scene.add(LineSegments::vertex_colored(axes.clone()));
        lights.push(scene.add_light(Light::point(Color::WHITE, 1.0, 2000.0)));
        scene.add_light(Light::ambient(Color::WHITE, 1.0));
    }

    let ortho = CameraId(0);
    let perspective = CameraId(1);
    let tilt = Vec3::new(FRAC_PI_4, FRAC_PI_6, 0.0);
    let offset = 2.0;

    let views = [
        QuadrantView::new(Quadrant::TopLeft, SceneId(0), ortho)
            .clear_color(Color::MINT_BACKDROP)
            .looking_from([0.0, offset, 0.0])
            .light(LightSetting::new(lights[0], [0.0, 2.0, 0.0])),
        QuadrantView::new(Quadrant::TopRight, SceneId(1), ortho)
            .clear_color(Color::PINK_BACKDROP)
            .looking_from([0.0, 0.0, -offset])
            .light(LightSetting::new(lights[1], [0.0, 0.0, -2.2])),
        QuadrantView::new(Quadrant::BottomLeft, SceneId(2), ortho)
            .clear_color(Color::ROSE_BACKDROP)
            .looking_from([0.0, 0.0, offset])
            .scene_rotation(tilt)
            .light(LightSetting::new(lights[2], [-0.2, 0.8, 1.0]).intensity(2.0)),
        QuadrantView::new(Quadrant::BottomRight, SceneId(3), perspective)
            .clear_color(Color::LAVENDER_BACKDROP)
            .looking_from([0.0, 0.0, offset])
            .scene_rotation(tilt)
            .light(LightSetting::new(lights[3], [-0.2, 0.8, 1.0]).intensity(2.0)),
    ];

    LabSetup {
        scenes,
        cameras: vec![
            Camera::orthographic(2.0, aspect),
            Camera::perspective(50.0, aspect, 0.1, 1000.0),
        ],
        viewer: QuadViewer::new(views),
    }
}

fn projective_edges(aspect: f32) -> LabSetup {
    let cube = Arc::new(RawGeometry::cuboid(1.0, 1.0, 1.0));
    let edges = LineGeometry::edges(&cube, 1.0);
    let transform = ProjectiveTransform::new(4.0, 4.0, 4.0);
    let projective = |color| -> Material { ProjectiveMaterial::new(color, transform).into() };
    let materials: Vec<Material> = FACE_COLORS.iter().map(|&c| projective(c)).collect();

    let mut scenes = scenes(["xoy", "xoz", "yoz", "isometric"]);
    let mut lights = Vec::with_capacity(4);
    for scene in &mut scenes {
        lights.push(cube_scene(scene, &cube, &materials));
        if let Err(err) = add_extended_edges(scene, &edges, projective) {
            log::error!("could not build edge guides for '{}': {err}", scene.name());
        }
    }
    let lights = [lights[0], lights[1], lights[2], lights[3]];

    let mut views = standard_views(
        CameraId(0),
        &lights,
        2.0,
        1.125,
        [
            Vec3::new(0.0, 0.0, 1.8),
            Vec3::new(0.0, 1.8, 0.0),
            Vec3::new(1.8, 0.0, 0.0),
            Vec3::ONE,
        ],
    );
    views[3].lights[0] = views[3].lights[0].intensity(10.0);

    LabSetup {
        scenes,
        cameras: vec![Camera::orthographic(2.0, aspect)],
        viewer: QuadViewer::new(views),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    #[test]
    fn every_lab_has_four_scenes_and_valid_ids() {
        let config = LabConfig {
            model_path: PathBuf::from("missing/model.stl"),
            ..Default::default()
        };
        for lab in Lab::ALL {
            let setup = lab.build(&config);
            assert_eq!(setup.scenes.len(), 4, "{lab:?}");
            for view in setup.viewer.views() {
                assert!(view.scene.0 < setup.scenes.len());
                assert!(view.camera.0 < setup.cameras.len());
                for light in &view.lights {
                    assert!(setup.scenes[view.scene.0].light(light.light).is_some());
                }
            }
        }
    }

    #[test]
    fn phong_cube_faces_follow_palette() {
        let setup = Lab::PhongCube.build(&LabConfig::default());
        let SceneObject::Mesh(cube) = &setup.scenes[0].objects()[0] else {
            panic!("first object should be the cube");
        };
        let colors: Vec<Color> = cube.materials.iter().map(Material::color).collect();
        assert_eq!(colors, FACE_COLORS.to_vec());
        assert!(cube.materials.iter().all(Material::is_lit));
    }

    #[test]
    fn isometric_view_brightens_its_light() {
        let setup = Lab::PhongCube.build(&LabConfig::default());
        let iso = &setup.viewer.views()[3];
        assert_eq!(iso.lights[0].intensity, Some(10.0));
        assert_eq!(iso.pose.position, Vec3::splat(1.125));
    }

    #[test]
    fn projective_scenes_carry_edge_guides() {
        let setup = Lab::ProjectiveEdges.build(&LabConfig::default());
        for scene in &setup.scenes {
            // cube, axes, three guides
            assert_eq!(scene.object_count(), 5);
            let guides = scene
                .objects()
                .iter()
                .filter(|o| matches!(o, SceneObject::Lines(l) if matches!(l.material, Material::Projective(_))))
                .count();
            assert_eq!(guides, 3);
        }
    }

    #[test]
    fn missing_model_leaves_axes_only() {
        let config = LabConfig {
            model_path: PathBuf::from("missing/teapot.stl"),
            ..Default::default()
        };
        let setup = Lab::ModelViews.build(&config);
        for scene in &setup.scenes {
            assert_eq!(scene.object_count(), 1);
        }
    }

    #[test]
    fn gradient_lab_tilts_lower_scenes() {
        let setup = Lab::GradientCube.build(&LabConfig::default());
        let views = setup.viewer.views();
        assert!(views[0].scene_rotation.is_none());
        assert_eq!(
            views[2].scene_rotation,
            Some(Vec3::new(FRAC_PI_4, FRAC_PI_6, 0.0))
        );
        assert_eq!(views[3].camera, CameraId(1));
        assert_eq!(setup.scenes[0].lights().len(), 2);
    }
}
