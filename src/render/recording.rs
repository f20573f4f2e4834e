use super::{RenderState, Renderer};
use crate::camera::{Camera, CameraPose};
use crate::color::Color;
use crate::scene::Scene;
use crate::viewport::ViewportRect;

/// One call observed by a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    SetScissorTest(bool),
    SetAutoClear(bool),
    SetViewport(ViewportRect),
    SetScissor(ViewportRect),
    SetClearColor(Color),
    /// A clear, explicit or automatic, with the pixels it touched.
    Clear { rect: ViewportRect, color: Color },
    Render {
        scene: String,
        pose: CameraPose,
        viewport: ViewportRect,
        /// `None` when the scissor test was off.
        scissor: Option<ViewportRect>,
        objects: usize,
    },
}

/// Renderer that draws nothing and records every call.
///
/// Used by the test suite and by the `--trace` flag, which prints the
/// command stream of one frame.
#[derive(Clone, Debug)]
pub struct RecordingRenderer {
    state: RenderState,
    commands: Vec<RenderCommand>,
}

impl RecordingRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: RenderState::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(width, height);
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the recorded commands, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn render_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Render { .. }))
            .count()
    }

    fn record_clear(&mut self) {
        self.commands.push(RenderCommand::Clear {
            rect: self.state.clear_rect(),
            color: self.state.clear_color,
        });
    }
}

impl Renderer for RecordingRenderer {
    fn set_scissor_test(&mut self, enabled: bool) {
        self.state.scissor_test = enabled;
        self.commands.push(RenderCommand::SetScissorTest(enabled));
    }

    fn set_auto_clear(&mut self, enabled: bool) {
        self.state.auto_clear = enabled;
        self.commands.push(RenderCommand::SetAutoClear(enabled));
    }

    fn set_viewport(&mut self, rect: ViewportRect) {
        self.state.viewport = rect;
        self.commands.push(RenderCommand::SetViewport(rect));
    }

    fn set_scissor(&mut self, rect: ViewportRect) {
        self.state.scissor = rect;
        self.commands.push(RenderCommand::SetScissor(rect));
    }

    fn set_clear_color(&mut self, color: Color) {
        self.state.clear_color = color;
        self.commands.push(RenderCommand::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.record_clear();
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        if self.state.auto_clear {
            self.record_clear();
        }
        self.commands.push(RenderCommand::Render {
            scene: scene.name().to_string(),
            pose: camera.pose(),
            viewport: self.state.viewport,
            scissor: self.state.scissor_test.then_some(self.state.scissor),
            objects: scene.object_count(),
        });
    }

    fn size(&self) -> (u32, u32) {
        (self.state.width, self.state.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_clear_adds_a_clear_before_render() {
        let mut renderer = RecordingRenderer::new(100, 100);
        let scene = Scene::new("s");
        let camera = Camera::orthographic(2.0, 1.0);

        renderer.render(&scene, &camera);
        renderer.set_auto_clear(false);
        renderer.render(&scene, &camera);

        let commands = renderer.take_commands();
        assert!(matches!(commands[0], RenderCommand::Clear { .. }));
        assert!(matches!(commands[1], RenderCommand::Render { .. }));
        assert_eq!(commands[2], RenderCommand::SetAutoClear(false));
        assert!(matches!(commands[3], RenderCommand::Render { .. }));
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn scoped_clear_uses_scissor() {
        let mut renderer = RecordingRenderer::new(800, 600);
        renderer.set_scissor_test(true);
        renderer.set_scissor(ViewportRect::new(0, 300, 400, 300));
        renderer.set_clear_color(Color::PINK_BACKDROP);
        renderer.clear();

        assert_eq!(
            renderer.commands().last(),
            Some(&RenderCommand::Clear {
                rect: ViewportRect::new(0, 300, 400, 300),
                color: Color::PINK_BACKDROP,
            })
        );
    }
}
