//! wgpu implementation of [`Renderer`].
//!
//! Calls made during a frame are recorded as [`FrameOp`]s. [`GpuRenderer::finish_frame`]
//! then acquires the surface texture and replays them in a single render pass,
//! switching viewport and scissor per op. Clears are drawn as scissored
//! fullscreen triangles, so a quadrant clear never touches its neighbours.

use super::pipeline::{
    self, DrawUniforms, GpuLight, LIGHT_AMBIENT, LIGHT_DIRECTIONAL, LIGHT_POINT, MAX_LIGHTS,
    MODE_PHONG, MODE_PROJECTIVE, MODE_UNLIT, ScenePipelines,
};
use super::{RenderState, Renderer};
use crate::camera::Camera;
use crate::color::Color;
use crate::error::{QuadviewError, Result};
use crate::geometry::GeometryId;
use crate::gpu::{GpuContext, SurfaceErrorAction};
use crate::material::Material;
use crate::mesh::GpuMesh;
use crate::scene::{LightKind, Scene, SceneObject};
use crate::texture::{Texture, TextureId};
use crate::viewport::ViewportRect;
use glam::{Mat3, Mat4};
use std::collections::HashMap;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Topology {
    Triangles,
    Lines,
}

#[derive(Clone, Debug)]
enum FrameOp {
    Clear {
        rect: ViewportRect,
        uniform: usize,
    },
    Draw {
        viewport: ViewportRect,
        scissor: ViewportRect,
        topology: Topology,
        geometry: GeometryId,
        texture: Option<TextureId>,
        range: Range<u32>,
        uniform: usize,
    },
}

/// Renders scenes into the window surface.
pub struct GpuRenderer {
    gpu: GpuContext,
    pipelines: ScenePipelines,
    state: RenderState,
    ops: Vec<FrameOp>,
    uniforms: Vec<DrawUniforms>,
    meshes: HashMap<GeometryId, GpuMesh>,
    textures: HashMap<TextureId, wgpu::BindGroup>,
    white_texture: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl GpuRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let pipelines = ScenePipelines::new(&gpu);
        let white = Texture::white(&gpu);
        let white_texture = pipelines.create_texture_bind_group(&gpu, &white);
        let (_, depth_view) = pipeline::create_depth_texture(&gpu);
        let state = RenderState::new(gpu.width(), gpu.height());
        let depth_size = (gpu.width(), gpu.height());

        Self {
            gpu,
            pipelines,
            state,
            ops: Vec::new(),
            uniforms: Vec::new(),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            white_texture,
            depth_view,
            depth_size,
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Tracks the window size. A zero size is kept in the render state (so
    /// quadrants come out empty) but the surface keeps its last real size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.state.resize(width, height);
        self.ensure_depth_size();
    }

    fn ensure_depth_size(&mut self) {
        let size = (self.gpu.width(), self.gpu.height());
        if self.depth_size != size {
            let (_, view) = pipeline::create_depth_texture(&self.gpu);
            self.depth_view = view;
            self.depth_size = size;
        }
    }

    /// Drops anything recorded so far and starts a new frame.
    pub fn begin_frame(&mut self) {
        self.ops.clear();
        self.uniforms.clear();
    }

    /// Draws the recorded frame and presents it.
    ///
    /// Transient surface problems skip the frame; only an out-of-memory
    /// surface is reported as an error.
    pub fn finish_frame(&mut self) -> Result<()> {
        let ops = std::mem::take(&mut self.ops);
        let uniforms = std::mem::take(&mut self.uniforms);

        if self.state.width == 0 || self.state.height == 0 {
            return Ok(());
        }

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(QuadviewError::SurfaceOutOfMemory),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(()),
                };
            }
        };

        self.pipelines.upload(&self.gpu, &uniforms);

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Quadview Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quadview Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Color::BLACK.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.encode(&mut pass, &ops);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn encode(&self, pass: &mut wgpu::RenderPass<'_>, ops: &[FrameOp]) {
        let (width, height) = (self.gpu.width(), self.gpu.height());

        for op in ops {
            match op {
                FrameOp::Clear { rect, uniform } => {
                    let Some(rect) = surface_rect(*rect, width, height) else {
                        continue;
                    };
                    pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
                    pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
                    pass.set_pipeline(&self.pipelines.clear);
                    pass.set_bind_group(
                        0,
                        &self.pipelines.uniform_bind_group,
                        &[self.pipelines.offset(*uniform)],
                    );
                    pass.draw(0..3, 0..1);
                }
                FrameOp::Draw {
                    viewport,
                    scissor,
                    topology,
                    geometry,
                    texture,
                    range,
                    uniform,
                } => {
                    let Some(mesh) = self.meshes.get(geometry) else {
                        continue;
                    };
                    // wgpu rejects viewports outside the target, so the
                    // viewport is clipped to the surface like the scissor.
                    let (Some(vp), Some(sc)) = (
                        surface_rect(*viewport, width, height),
                        surface_rect(*scissor, width, height),
                    ) else {
                        continue;
                    };

                    pass.set_viewport(
                        vp.x as f32,
                        vp.y as f32,
                        vp.width as f32,
                        vp.height as f32,
                        0.0,
                        1.0,
                    );
                    pass.set_scissor_rect(sc.x, sc.y, sc.width, sc.height);

                    let texture_group = texture
                        .and_then(|id| self.textures.get(&id))
                        .unwrap_or(&self.white_texture);

                    match topology {
                        Topology::Triangles => pass.set_pipeline(&self.pipelines.triangles),
                        Topology::Lines => pass.set_pipeline(&self.pipelines.lines),
                    }
                    pass.set_bind_group(
                        0,
                        &self.pipelines.uniform_bind_group,
                        &[self.pipelines.offset(*uniform)],
                    );
                    pass.set_bind_group(1, texture_group, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

                    match (&mesh.index_buffer, topology) {
                        (Some(indices), Topology::Triangles) => {
                            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                            pass.draw_indexed(range.clone(), 0, 0..1);
                        }
                        _ => pass.draw(range.clone(), 0..1),
                    }
                }
            }
        }
    }

    fn push_uniforms(&mut self, uniforms: DrawUniforms) -> usize {
        self.uniforms.push(uniforms);
        self.uniforms.len() - 1
    }

    fn push_clear(&mut self) {
        let rect = self.state.clear_rect();
        let uniform = self.push_uniforms(DrawUniforms {
            color: self.state.clear_color.to_linear().to_array(),
            ..Default::default()
        });
        self.ops.push(FrameOp::Clear { rect, uniform });
    }

    fn upload_texture(&mut self, material: &Material) -> Option<TextureId> {
        let Material::Phong(phong) = material else {
            return None;
        };
        let data = phong.map.as_ref()?;
        let id = data.id();
        if !self.textures.contains_key(&id) {
            let texture = Texture::from_data(&self.gpu, data);
            let bind_group = self.pipelines.create_texture_bind_group(&self.gpu, &texture);
            self.textures.insert(id, bind_group);
        }
        Some(id)
    }

    fn draw_rects(&self) -> (ViewportRect, ViewportRect) {
        let scissor = if self.state.scissor_test {
            self.state.draw_rect()
        } else {
            self.state.viewport.clamp_to(self.state.width, self.state.height)
        };
        (self.state.viewport, scissor)
    }
}

impl Renderer for GpuRenderer {
    fn set_scissor_test(&mut self, enabled: bool) {
        self.state.scissor_test = enabled;
    }

    fn set_auto_clear(&mut self, enabled: bool) {
        self.state.auto_clear = enabled;
    }

    fn set_viewport(&mut self, rect: ViewportRect) {
        self.state.viewport = rect;
    }

    fn set_scissor(&mut self, rect: ViewportRect) {
        self.state.scissor = rect;
    }

    fn set_clear_color(&mut self, color: Color) {
        self.state.clear_color = color;
    }

    fn clear(&mut self) {
        self.push_clear();
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        if self.state.auto_clear {
            self.push_clear();
        }

        let root = scene.root_matrix();
        let frame = FrameUniforms::new(scene, camera, root);
        let (viewport, scissor) = self.draw_rects();

        for object in scene.objects() {
            let model = root * object.transform().matrix();

            match object {
                SceneObject::Mesh(mesh) => {
                    let geometry = &mesh.geometry;
                    if geometry.indices.is_empty() {
                        continue;
                    }
                    if !self.meshes.contains_key(&geometry.id()) {
                        let uploaded = GpuMesh::from_geometry(&self.gpu, geometry);
                        self.meshes.insert(geometry.id(), uploaded);
                    }

                    for group in geometry.draw_groups() {
                        let Some(material) = mesh.material(group.material_index) else {
                            continue;
                        };
                        let texture = self.upload_texture(material);
                        let uniform = self.push_uniforms(frame.draw(model, material, texture.is_some()));
                        self.ops.push(FrameOp::Draw {
                            viewport,
                            scissor,
                            topology: Topology::Triangles,
                            geometry: geometry.id(),
                            texture,
                            range: group.start..group.start + group.count,
                            uniform,
                        });
                    }
                }
                SceneObject::Lines(lines) => {
                    let geometry = &lines.geometry;
                    if geometry.segment_count() == 0 {
                        continue;
                    }
                    if !self.meshes.contains_key(&geometry.id()) {
                        let uploaded = GpuMesh::from_lines(&self.gpu, geometry);
                        self.meshes.insert(geometry.id(), uploaded);
                    }

                    let uniform = self.push_uniforms(frame.draw(model, &lines.material, false));
                    self.ops.push(FrameOp::Draw {
                        viewport,
                        scissor,
                        topology: Topology::Lines,
                        geometry: geometry.id(),
                        texture: None,
                        range: 0..(geometry.segment_count() * 2) as u32,
                        uniform,
                    });
                }
            }
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }
}

/// Per-render values shared by every draw of one scene.
struct FrameUniforms {
    view_proj: Mat4,
    camera_pos: [f32; 4],
    lights: [GpuLight; MAX_LIGHTS],
    light_count: u32,
}

impl FrameUniforms {
    fn new(scene: &Scene, camera: &Camera, root: Mat4) -> Self {
        let mut lights = [GpuLight::default(); MAX_LIGHTS];
        let mut light_count = 0;

        if scene.lights().len() > MAX_LIGHTS {
            log::warn!(
                "scene '{}' has {} lights; only the first {MAX_LIGHTS} are used",
                scene.name(),
                scene.lights().len()
            );
        }

        for (slot, light) in lights.iter_mut().zip(scene.lights()) {
            let color = light.color.to_linear();
            let rgb = [
                color.r * light.intensity,
                color.g * light.intensity,
                color.b * light.intensity,
            ];
            let (kind, position, cutoff) = match light.kind {
                LightKind::Point { distance } => {
                    (LIGHT_POINT, root.transform_point3(light.position), distance)
                }
                LightKind::Directional => (
                    LIGHT_DIRECTIONAL,
                    root.transform_vector3(light.position),
                    0.0,
                ),
                LightKind::Ambient => (LIGHT_AMBIENT, light.position, 0.0),
            };
            *slot = GpuLight {
                position: [position.x, position.y, position.z, kind],
                color: [rgb[0], rgb[1], rgb[2], cutoff],
            };
            light_count += 1;
        }

        Self {
            view_proj: camera.view_projection(),
            camera_pos: camera.position.extend(1.0).to_array(),
            lights,
            light_count,
        }
    }

    fn draw(&self, model: Mat4, material: &Material, textured: bool) -> DrawUniforms {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose())
        } else {
            Mat4::IDENTITY
        };

        let mut uniforms = DrawUniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            camera_pos: self.camera_pos,
            color: material.color().to_linear().to_array(),
            ..Default::default()
        };

        match material {
            Material::Phong(phong) => {
                let s = phong.specular.to_linear();
                uniforms.specular = [s.r, s.g, s.b, phong.shininess];
                uniforms.params = [MODE_PHONG, 0, self.light_count, u32::from(textured)];
                uniforms.lights = self.lights;
            }
            Material::Basic(basic) => {
                uniforms.params = [MODE_UNLIT, u32::from(basic.vertex_colors), 0, 0];
            }
            Material::Projective(projective) => {
                uniforms.projective = projective.transform.matrix().to_cols_array_2d();
                uniforms.params = [MODE_PROJECTIVE, 0, 0, 0];
            }
        }

        uniforms
    }
}

/// Converts a bottom-left rect to the surface's top-left space, clipped.
/// `None` when nothing is left to draw.
fn surface_rect(rect: ViewportRect, width: u32, height: u32) -> Option<ViewportRect> {
    let clipped = rect.clamp_to(width, height);
    (!clipped.is_empty()).then(|| clipped.to_top_left(height))
}
