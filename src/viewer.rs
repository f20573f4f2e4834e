//! Four-quadrant viewer.
//!
//! A [`QuadViewer`] holds one [`QuadrantView`] per canvas quadrant. Every
//! frame it asks the renderer for the canvas size, recomputes the quadrant
//! rectangles and renders each view through the shared camera:
//!
//! 1. scissor test on
//! 2. first quadrant with auto-clear still on
//! 3. auto-clear off
//! 4. remaining quadrants, each cleared inside its own scissor
//! 5. scissor test off, auto-clear back on
//!
//! Before each render the view's camera pose, light placement and scene
//! rotation are applied in place, so the shared camera ends the frame in the
//! pose of the last quadrant.

use crate::camera::{Camera, CameraPose};
use crate::color::Color;
use crate::render::Renderer;
use crate::scene::{LightId, Scene, SceneId};
use crate::viewport::{Quadrant, ViewportRect};
use glam::Vec3;

/// Radians per second the scenes turn while rotation is toggled on.
pub const SPIN_SPEED: f32 = 0.5;

/// Index of a camera in the list handed to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CameraId(pub usize);

/// Where to put a scene light for one quadrant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSetting {
    pub light: LightId,
    pub position: Vec3,
    /// New intensity, or `None` to leave it as is.
    pub intensity: Option<f32>,
}

impl LightSetting {
    pub fn new(light: LightId, position: impl Into<Vec3>) -> Self {
        Self {
            light,
            position: position.into(),
            intensity: None,
        }
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }
}

/// Everything needed to render one quadrant.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadrantView {
    pub quadrant: Quadrant,
    pub scene: SceneId,
    pub camera: CameraId,
    pub clear_color: Color,
    pub pose: CameraPose,
    pub lights: Vec<LightSetting>,
    /// Root rotation (Euler XYZ) to give the scene before rendering.
    pub scene_rotation: Option<Vec3>,
}

impl QuadrantView {
    pub fn new(quadrant: Quadrant, scene: SceneId, camera: CameraId) -> Self {
        Self {
            quadrant,
            scene,
            camera,
            clear_color: Color::BLACK,
            pose: CameraPose::default(),
            lights: Vec::new(),
            scene_rotation: None,
        }
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn pose(mut self, pose: CameraPose) -> Self {
        self.pose = pose;
        self
    }

    /// Camera at `position` looking at the origin, +Y up.
    pub fn looking_from(self, position: impl Into<Vec3>) -> Self {
        self.pose(CameraPose::looking_at_origin(position))
    }

    pub fn light(mut self, setting: LightSetting) -> Self {
        self.lights.push(setting);
        self
    }

    pub fn scene_rotation(mut self, rotation: impl Into<Vec3>) -> Self {
        self.scene_rotation = Some(rotation.into());
        self
    }
}

/// Mutable state one frame works on.
///
/// The canvas size is not stored here; the viewer asks the renderer for it
/// every frame.
pub struct FrameContext<'a> {
    pub scenes: &'a mut [Scene],
    pub cameras: &'a mut [Camera],
    pub rotate_scenes: bool,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Renders four views of a set of scenes into the four canvas quadrants.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadViewer {
    views: [QuadrantView; 4],
}

impl QuadViewer {
    /// Views are rendered in the given order; the first one is drawn with
    /// auto-clear on.
    pub fn new(views: [QuadrantView; 4]) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &[QuadrantView; 4] {
        &self.views
    }

    /// Renders one frame.
    ///
    /// Views naming a scene or camera that does not exist are skipped with a
    /// warning; the rest of the frame still renders and the renderer state is
    /// restored at the end.
    pub fn render_frame<R: Renderer + ?Sized>(&self, renderer: &mut R, ctx: &mut FrameContext<'_>) {
        let (width, height) = renderer.size();

        if ctx.rotate_scenes {
            for scene in ctx.scenes.iter_mut() {
                scene.spin = (scene.spin + SPIN_SPEED * ctx.dt) % std::f32::consts::TAU;
            }
        }

        renderer.set_scissor_test(true);

        for (i, view) in self.views.iter().enumerate() {
            if i == 1 {
                renderer.set_auto_clear(false);
            }

            let rect = view.quadrant.rect(width, height);
            self.render_view(renderer, ctx, view, rect);
        }

        renderer.set_scissor_test(false);
        renderer.set_auto_clear(true);
    }

    fn render_view<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        ctx: &mut FrameContext<'_>,
        view: &QuadrantView,
        rect: ViewportRect,
    ) {
        renderer.set_viewport(rect);
        renderer.set_scissor(rect);
        renderer.set_clear_color(view.clear_color);
        renderer.clear();

        let Some(camera) = ctx.cameras.get_mut(view.camera.0) else {
            log::warn!(
                "{} quadrant refers to missing camera #{}",
                view.quadrant.name(),
                view.camera.0
            );
            return;
        };
        camera.apply_pose(&view.pose);

        let Some(scene) = ctx.scenes.get_mut(view.scene.0) else {
            log::warn!(
                "{} quadrant refers to missing {}",
                view.quadrant.name(),
                view.scene
            );
            return;
        };

        for setting in &view.lights {
            match scene.light_mut(setting.light) {
                Some(light) => {
                    light.position = setting.position;
                    if let Some(intensity) = setting.intensity {
                        light.intensity = intensity;
                    }
                }
                None => log::warn!(
                    "{} quadrant refers to a missing light in '{}'",
                    view.quadrant.name(),
                    scene.name()
                ),
            }
        }

        if let Some(rotation) = view.scene_rotation {
            scene.rotation = rotation;
        }

        renderer.render(scene, camera);
    }

    /// Updates every camera for a new canvas size.
    ///
    /// Each quadrant is half the canvas in both directions, so its aspect
    /// ratio is the canvas aspect. A zero-sized canvas leaves cameras as they
    /// are.
    pub fn resize(cameras: &mut [Camera], width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect = width as f32 / height as f32;
        for camera in cameras {
            camera.set_aspect(aspect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingRenderer, RenderCommand};
    use crate::scene::Light;

    fn fixture() -> (QuadViewer, Vec<Scene>, Vec<Camera>) {
        let mut scenes = Vec::new();
        let mut lights = Vec::new();
        for name in ["xoy", "xoz", "yoz", "iso"] {
            let mut scene = Scene::new(name);
            lights.push(scene.add_light(Light::point(Color::WHITE, 1.0, 1000.0)));
            scenes.push(scene);
        }

        let camera = CameraId(0);
        let viewer = QuadViewer::new([
            QuadrantView::new(Quadrant::TopLeft, SceneId(0), camera)
                .clear_color(Color::PINK_BACKDROP)
                .looking_from([0.0, 0.0, 2.0])
                .light(LightSetting::new(lights[0], [0.0, 0.0, 1.8])),
            QuadrantView::new(Quadrant::TopRight, SceneId(1), camera)
                .clear_color(Color::MINT_BACKDROP)
                .looking_from([0.0, 2.0, 0.0])
                .light(LightSetting::new(lights[1], [0.0, 1.8, 0.0])),
            QuadrantView::new(Quadrant::BottomLeft, SceneId(2), camera)
                .clear_color(Color::LAVENDER_BACKDROP)
                .looking_from([2.0, 0.0, 0.0])
                .light(LightSetting::new(lights[2], [1.8, 0.0, 0.0])),
            QuadrantView::new(Quadrant::BottomRight, SceneId(3), camera)
                .clear_color(Color::ROSE_BACKDROP)
                .looking_from([1.125, 1.125, 1.125])
                .light(LightSetting::new(lights[3], [1.0, 1.0, 1.0]).intensity(10.0))
                .scene_rotation([0.5, 0.25, 0.0]),
        ]);

        (viewer, scenes, vec![Camera::orthographic(2.0, 4.0 / 3.0)])
    }

    fn run_frame(
        viewer: &QuadViewer,
        renderer: &mut RecordingRenderer,
        scenes: &mut [Scene],
        cameras: &mut [Camera],
    ) {
        let mut ctx = FrameContext {
            scenes,
            cameras,
            rotate_scenes: false,
            dt: 0.016,
        };
        viewer.render_frame(renderer, &mut ctx);
    }

    #[test]
    fn one_render_per_quadrant_in_order() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        let rendered: Vec<(String, ViewportRect)> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Render {
                    scene, viewport, ..
                } => Some((scene.clone(), *viewport)),
                _ => None,
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("xoy".to_string(), ViewportRect::new(0, 300, 400, 300)),
                ("xoz".to_string(), ViewportRect::new(400, 300, 400, 300)),
                ("yoz".to_string(), ViewportRect::new(0, 0, 400, 300)),
                ("iso".to_string(), ViewportRect::new(400, 0, 400, 300)),
            ]
        );
    }

    #[test]
    fn scissor_and_auto_clear_bracket_the_frame() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        let commands = renderer.commands();
        assert_eq!(commands.first(), Some(&RenderCommand::SetScissorTest(true)));
        assert_eq!(
            &commands[commands.len() - 2..],
            &[
                RenderCommand::SetScissorTest(false),
                RenderCommand::SetAutoClear(true)
            ]
        );

        let first_render = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::Render { .. }))
            .unwrap();
        let auto_clear_off = commands
            .iter()
            .position(|c| *c == RenderCommand::SetAutoClear(false))
            .unwrap();
        assert!(first_render < auto_clear_off);
        assert!(!renderer.state().scissor_test);
        assert!(renderer.state().auto_clear);
    }

    #[test]
    fn clears_stay_inside_their_quadrant() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        let clears: Vec<(ViewportRect, Color)> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Clear { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect();

        // Explicit clear per quadrant, plus the auto-clear of the first render.
        assert_eq!(clears.len(), 5);
        assert_eq!(clears[0], (ViewportRect::new(0, 300, 400, 300), Color::PINK_BACKDROP));
        assert_eq!(clears[1], clears[0]);
        assert_eq!(
            clears[4],
            (ViewportRect::new(400, 0, 400, 300), Color::ROSE_BACKDROP)
        );
    }

    #[test]
    fn camera_ends_in_last_pose() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        assert_eq!(
            cameras[0].pose(),
            CameraPose::looking_at_origin([1.125, 1.125, 1.125])
        );
    }

    #[test]
    fn lights_and_rotation_are_applied() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        let iso = &scenes[3].lights()[0];
        assert_eq!(iso.position, Vec3::ONE);
        assert_eq!(iso.intensity, 10.0);
        assert_eq!(scenes[0].lights()[0].position, Vec3::new(0.0, 0.0, 1.8));
        assert_eq!(scenes[0].lights()[0].intensity, 1.0);
        assert_eq!(scenes[3].rotation, Vec3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn zero_canvas_still_runs() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(0, 0);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        assert_eq!(renderer.render_count(), 4);
        for command in renderer.commands() {
            if let RenderCommand::Render { viewport, .. } = command {
                assert!(viewport.is_empty());
            }
        }
    }

    #[test]
    fn missing_scene_is_skipped() {
        let (viewer, _, mut cameras) = fixture();
        let mut scenes = vec![Scene::new("only")];
        let mut renderer = RecordingRenderer::new(800, 600);
        run_frame(&viewer, &mut renderer, &mut scenes, &mut cameras);

        assert_eq!(renderer.render_count(), 1);
        assert!(renderer.state().auto_clear);
    }

    #[test]
    fn rotation_toggle_spins_scenes() {
        let (viewer, mut scenes, mut cameras) = fixture();
        let mut renderer = RecordingRenderer::new(800, 600);
        let mut ctx = FrameContext {
            scenes: &mut scenes,
            cameras: &mut cameras,
            rotate_scenes: true,
            dt: 1.0,
        };
        viewer.render_frame(&mut renderer, &mut ctx);
        assert!(scenes.iter().all(|s| (s.spin - SPIN_SPEED).abs() < 1e-6));
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut cameras = vec![
            Camera::orthographic(2.0, 1.0),
            Camera::perspective(50.0, 1.0, 0.1, 1000.0),
        ];
        QuadViewer::resize(&mut cameras, 1600, 800);
        assert!(cameras.iter().all(|c| c.aspect() == 2.0));

        QuadViewer::resize(&mut cameras, 0, 800);
        assert!(cameras.iter().all(|c| c.aspect() == 2.0));
    }
}
