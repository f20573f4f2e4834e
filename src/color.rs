//! Colors and the lab palette.
//!
//! All colors are authored in sRGB, the way the lab scenes specify them.
//! The GPU backend renders into an sRGB surface, so anything that ends up
//! in a uniform or a clear value goes through [`Color::to_linear`] first.

/// RGBA color in sRGB space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        )
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

    /// Background of the top-left quadrant in the lab layouts.
    pub const PINK_BACKDROP: Color = Color::rgb(0.9, 0.7, 0.8);
    /// Background of the top-right quadrant.
    pub const MINT_BACKDROP: Color = Color::rgb(0.8, 0.9, 0.7);
    /// Background of the bottom-left quadrant.
    pub const LAVENDER_BACKDROP: Color = Color::rgb(0.8, 0.8, 0.9);
    /// Background of the bottom-right quadrant.
    pub const ROSE_BACKDROP: Color = Color::rgb(0.9, 0.8, 0.8);

    /// Converts the color channels to linear space. Alpha is left untouched.
    pub fn to_linear(self) -> Self {
        Self {
            r: srgb_to_linear(self.r),
            g: srgb_to_linear(self.g),
            b: srgb_to_linear(self.b),
            a: self.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear-space clear value for a render pass.
    pub fn to_wgpu(self) -> wgpu::Color {
        let linear = self.to_linear();
        wgpu::Color {
            r: linear.r as f64,
            g: linear.g as f64,
            b: linear.b as f64,
            a: linear.a as f64,
        }
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Quantizes to 8-bit RGBA, as stored in texture data.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_matches_components() {
        assert_eq!(Color::hex(0xffffff), Color::WHITE);
        assert_eq!(Color::hex(0xff0000), Color::RED);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        let white = Color::WHITE.to_linear();
        let black = Color::BLACK.to_linear();
        assert!((white.r - 1.0).abs() < 1e-6);
        assert_eq!(black.g, 0.0);

        // Mid grey is darker once linearized.
        assert!(Color::GREY.to_linear().r < 0.25);
    }

    #[test]
    fn lerp_clamps_t() {
        let c = Color::RED.lerp(Color::YELLOW, 2.0);
        assert_eq!(c, Color::YELLOW);
        let mid = Color::RED.lerp(Color::YELLOW, 0.5);
        assert!((mid.g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rgba8_rounds() {
        assert_eq!(Color::rgb(1.0, 0.5, 0.0).to_rgba8(), [255, 128, 0, 255]);
    }
}
