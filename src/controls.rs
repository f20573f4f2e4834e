//! Scroll-wheel zoom shared by every camera.

use crate::camera::Camera;
use crate::input::Input;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomControls {
    pub zoom: f32,
    /// Zoom factor change per scroll line (0.1 = 10%).
    pub sensitivity: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ZoomControls {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            sensitivity: 0.1,
            min_zoom: 0.1,
            max_zoom: 20.0,
        }
    }
}

impl ZoomControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Sets the zoom range. Limits given in the wrong order are swapped;
    /// non-finite or non-positive limits are ignored.
    pub fn zoom_limits(mut self, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if !(min.is_finite() && max.is_finite() && min > 0.0) {
            log::warn!("ignoring zoom limits {min}..{max}");
            return self;
        }
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
        self
    }

    /// Applies `lines` of scroll (positive zooms in). Returns whether the
    /// zoom changed.
    pub fn scroll(&mut self, lines: f32) -> bool {
        if lines == 0.0 || !lines.is_finite() {
            return false;
        }
        let previous = self.zoom;
        self.zoom = (self.zoom * (1.0 + self.sensitivity).powf(lines))
            .clamp(self.min_zoom, self.max_zoom);
        self.zoom != previous
    }

    /// Reads this frame's scroll and pushes the zoom to every camera.
    pub fn update(&mut self, input: &Input, cameras: &mut [Camera]) {
        if self.scroll(input.scroll_delta().y) {
            log::trace!("zoom {:.2}", self.zoom);
        }
        for camera in cameras {
            camera.zoom = self.zoom;
        }
    }
}
