//! Canvas partitioning into four quadrants.
//!
//! Rectangles use a bottom-left origin (y grows upwards), matching the
//! convention of `set_viewport`/`set_scissor` on the [`Renderer`] trait.
//! The GPU backend flips them with [`ViewportRect::to_top_left`] before
//! handing them to wgpu.
//!
//! [`Renderer`]: crate::Renderer

/// A pixel rectangle on the canvas, bottom-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewportRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` canvas.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn top(&self) -> u32 {
        self.y + self.height
    }

    /// Area shared with `other`, in pixels.
    pub fn overlap(&self, other: &ViewportRect) -> u64 {
        let w = self.right().min(other.right()).saturating_sub(self.x.max(other.x));
        let h = self.top().min(other.top()).saturating_sub(self.y.max(other.y));
        w as u64 * h as u64
    }

    /// Clips the rectangle to a `width` x `height` canvas.
    pub fn clamp_to(&self, width: u32, height: u32) -> ViewportRect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        ViewportRect {
            x,
            y,
            width: self.right().min(width) - x,
            height: self.top().min(height) - y,
        }
    }

    /// Converts to a top-left origin rectangle on a canvas of the given height.
    pub fn to_top_left(&self, canvas_height: u32) -> ViewportRect {
        ViewportRect {
            x: self.x,
            y: canvas_height.saturating_sub(self.top()),
            width: self.width,
            height: self.height,
        }
    }
}

/// One of the four canvas quadrants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in the order the labs render them.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// The quadrant's rectangle on a `width` x `height` canvas.
    ///
    /// Left and bottom quadrants get `width / 2` and `height / 2`; the right
    /// and top ones take the remainder, so odd sizes still tile exactly.
    pub fn rect(self, width: u32, height: u32) -> ViewportRect {
        let half_w = width / 2;
        let half_h = height / 2;
        let (x, w) = match self {
            Quadrant::TopLeft | Quadrant::BottomLeft => (0, half_w),
            Quadrant::TopRight | Quadrant::BottomRight => (half_w, width - half_w),
        };
        let (y, h) = match self {
            Quadrant::BottomLeft | Quadrant::BottomRight => (0, half_h),
            Quadrant::TopLeft | Quadrant::TopRight => (half_h, height - half_h),
        };
        ViewportRect::new(x, y, w, h)
    }

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }
}

/// Rectangles for all four quadrants, in [`Quadrant::ALL`] order.
pub fn quadrant_rects(width: u32, height: u32) -> [ViewportRect; 4] {
    Quadrant::ALL.map(|q| q.rect(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_for_800x600() {
        let rects = quadrant_rects(800, 600);
        assert_eq!(rects[0], ViewportRect::new(0, 300, 400, 300));
        assert_eq!(rects[1], ViewportRect::new(400, 300, 400, 300));
        assert_eq!(rects[2], ViewportRect::new(0, 0, 400, 300));
        assert_eq!(rects[3], ViewportRect::new(400, 0, 400, 300));
    }

    fn assert_tiles(width: u32, height: u32) {
        let rects = quadrant_rects(width, height);
        let total: u64 = rects.iter().map(|r| r.area()).sum();
        assert_eq!(total, width as u64 * height as u64, "{width}x{height}");

        for (i, a) in rects.iter().enumerate() {
            assert!(a.right() <= width && a.top() <= height);
            for b in &rects[i + 1..] {
                assert_eq!(a.overlap(b), 0, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn quadrants_tile_the_canvas() {
        for (w, h) in [(800, 600), (1, 1), (801, 599), (1920, 1080), (3, 7)] {
            assert_tiles(w, h);
        }
    }

    #[test]
    fn zero_canvas_gives_empty_rects() {
        for rect in quadrant_rects(0, 0) {
            assert!(rect.is_empty());
            assert_eq!(rect.area(), 0);
        }
    }

    #[test]
    fn flips_to_top_left_origin() {
        let top_left = Quadrant::TopLeft.rect(800, 600);
        assert_eq!(top_left.to_top_left(600), ViewportRect::new(0, 0, 400, 300));

        let bottom_right = Quadrant::BottomRight.rect(800, 600);
        assert_eq!(
            bottom_right.to_top_left(600),
            ViewportRect::new(400, 300, 400, 300)
        );
    }

    #[test]
    fn clamp_cuts_overhang() {
        let rect = ViewportRect::new(300, 200, 400, 300);
        assert_eq!(rect.clamp_to(500, 400), ViewportRect::new(300, 200, 200, 200));
        assert!(rect.clamp_to(100, 100).is_empty());
    }
}
