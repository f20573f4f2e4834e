//! Texture images on the CPU and their GPU counterparts.
//!
//! Scenes reference [`TextureData`]; the renderer uploads each image once,
//! keyed by its [`TextureId`], the first time a material using it is drawn.

use crate::color::Color;
use crate::gpu::GpuContext;
use image::RgbaImage;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a CPU-side texture image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

/// An RGBA8 image that can be mapped onto a material.
#[derive(Clone, Debug)]
pub struct TextureData {
    id: TextureId,
    image: RgbaImage,
}

impl TextureData {
    pub fn new(image: RgbaImage) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self {
            id: TextureId(NEXT.fetch_add(1, Ordering::Relaxed)),
            image,
        }
    }

    /// Square image fading from `top` (row 0) to `bottom` (last row).
    pub fn vertical_gradient(size: u32, top: Color, bottom: Color) -> Self {
        let span = size.saturating_sub(1).max(1) as f32;
        let image = RgbaImage::from_fn(size, size, |_, y| {
            image::Rgba(top.lerp(bottom, y as f32 / span).to_rgba8())
        });
        Self::new(image)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw sRGB RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    pub fn from_data(gpu: &GpuContext, data: &TextureData) -> Self {
        Self::from_rgba(
            gpu,
            data.image.as_raw(),
            data.width(),
            data.height(),
            "Material Texture",
        )
    }

    /// 1x1 white texture bound when a material has no map.
    pub fn white(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &[255, 255, 255, 255], 1, 1, "White Texture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_runs_top_to_bottom() {
        let tex = TextureData::vertical_gradient(256, Color::RED, Color::YELLOW);
        assert_eq!((tex.width(), tex.height()), (256, 256));
        assert_eq!(tex.image().get_pixel(10, 0).0, [255, 0, 0, 255]);
        assert_eq!(tex.image().get_pixel(10, 255).0, [255, 255, 0, 255]);

        let mid = tex.image().get_pixel(0, 128).0;
        assert!(mid[1] > 120 && mid[1] < 135);
    }

    #[test]
    fn gradient_rows_are_uniform() {
        let tex = TextureData::vertical_gradient(8, Color::RED, Color::YELLOW);
        for y in 0..8 {
            let first = *tex.image().get_pixel(0, y);
            assert!((0..8).all(|x| *tex.image().get_pixel(x, y) == first));
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = TextureData::vertical_gradient(2, Color::RED, Color::BLUE);
        let b = a.clone();
        let c = TextureData::vertical_gradient(2, Color::RED, Color::BLUE);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }
}
