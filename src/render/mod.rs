//! The rendering capability the viewer draws through.
//!
//! [`Renderer`] mirrors the small state-machine API of classic GL-style
//! renderers: set a viewport, a scissor rectangle and a clear color, clear,
//! then render a scene through a camera. Two implementations exist:
//!
//! - [`GpuRenderer`]: draws with wgpu into the window surface
//! - [`RecordingRenderer`]: logs every call, for tests and `--trace`
//!
//! Both share [`RenderState`] so they agree on what a call means.

mod gpu_renderer;
mod pipeline;
mod recording;

pub use gpu_renderer::GpuRenderer;
pub use recording::{RenderCommand, RecordingRenderer};

use crate::camera::Camera;
use crate::color::Color;
use crate::scene::Scene;
use crate::viewport::ViewportRect;

/// Per-call rendering capability.
///
/// Rectangles use a bottom-left origin. State set through the setters
/// persists until changed; in particular the scissor test and auto-clear
/// flags outlive a single render.
pub trait Renderer {
    fn set_scissor_test(&mut self, enabled: bool);

    /// When on, every [`render`](Renderer::render) clears first.
    fn set_auto_clear(&mut self, enabled: bool);

    fn set_viewport(&mut self, rect: ViewportRect);

    fn set_scissor(&mut self, rect: ViewportRect);

    fn set_clear_color(&mut self, color: Color);

    /// Clears color and depth. With the scissor test on, only the scissor
    /// rectangle is touched.
    fn clear(&mut self);

    fn render(&mut self, scene: &Scene, camera: &Camera);

    /// Current canvas size in pixels.
    fn size(&self) -> (u32, u32);
}

/// Renderer state shared by all backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub width: u32,
    pub height: u32,
    pub scissor_test: bool,
    pub auto_clear: bool,
    pub viewport: ViewportRect,
    pub scissor: ViewportRect,
    pub clear_color: Color,
}

impl RenderState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scissor_test: false,
            auto_clear: true,
            viewport: ViewportRect::full(width, height),
            scissor: ViewportRect::full(width, height),
            clear_color: Color::BLACK,
        }
    }

    /// Resets viewport and scissor to the new canvas.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.viewport = ViewportRect::full(width, height);
        self.scissor = ViewportRect::full(width, height);
    }

    /// Pixels a clear touches: the scissor with the test on, else everything.
    pub fn clear_rect(&self) -> ViewportRect {
        let rect = if self.scissor_test {
            self.scissor
        } else {
            ViewportRect::full(self.width, self.height)
        };
        rect.clamp_to(self.width, self.height)
    }

    /// Pixels a draw may touch: viewport, cut by the scissor when enabled.
    pub fn draw_rect(&self) -> ViewportRect {
        let viewport = self.viewport.clamp_to(self.width, self.height);
        if !self.scissor_test {
            return viewport;
        }
        let scissor = self.clear_rect();
        let x = viewport.x.max(scissor.x);
        let y = viewport.y.max(scissor.y);
        let right = viewport.right().min(scissor.right()).max(x);
        let top = viewport.top().min(scissor.top()).max(y);
        ViewportRect::new(x, y, right - x, top - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_respects_scissor_test() {
        let mut state = RenderState::new(800, 600);
        state.scissor = ViewportRect::new(400, 300, 400, 300);
        assert_eq!(state.clear_rect(), ViewportRect::full(800, 600));

        state.scissor_test = true;
        assert_eq!(state.clear_rect(), ViewportRect::new(400, 300, 400, 300));
    }

    #[test]
    fn draw_rect_is_viewport_cut_by_scissor() {
        let mut state = RenderState::new(800, 600);
        state.viewport = ViewportRect::new(0, 0, 400, 300);
        state.scissor = ViewportRect::new(200, 100, 400, 300);
        assert_eq!(state.draw_rect(), ViewportRect::new(0, 0, 400, 300));

        state.scissor_test = true;
        assert_eq!(state.draw_rect(), ViewportRect::new(200, 100, 200, 200));

        state.scissor = ViewportRect::new(500, 400, 10, 10);
        assert!(state.draw_rect().is_empty());
    }

    #[test]
    fn resize_resets_rects() {
        let mut state = RenderState::new(800, 600);
        state.viewport = ViewportRect::new(0, 0, 10, 10);
        state.resize(1024, 768);
        assert_eq!(state.viewport, ViewportRect::full(1024, 768));
        assert_eq!(state.clear_rect(), ViewportRect::full(1024, 768));
    }
}
