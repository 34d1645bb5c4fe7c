//! Sprite images
//!
//! Image decoding is the platform's business; the renderer only needs RGBA8
//! pixels and their dimensions. `ProceduralAssets` paints simple stand-ins
//! so the demo runs without any image files.

use glam::Vec2;

use super::scene::{ImageSize, SceneImages, SpriteId};
use crate::consts::BALL_SIZE;

/// RGBA8 image, row-major, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Paint an image pixel by pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }
}

/// Supplies the image for each sprite slot
pub trait AssetProvider {
    fn image(&self, sprite: SpriteId) -> &SpriteImage;

    /// Dimensions of every sprite, for scene layout
    fn scene_images(&self) -> SceneImages {
        SceneImages {
            flat_background: self.image(SpriteId::BackgroundFlat).size(),
            slope_background: self.image(SpriteId::BackgroundSlope).size(),
            overlay: self.image(SpriteId::SlopeOverlay).size(),
            ball: self.image(SpriteId::Ball).size(),
        }
    }
}

/// Generated placeholder artwork
#[derive(Debug, Clone)]
pub struct ProceduralAssets {
    images: [SpriteImage; 4],
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Sky gradient over ground, with evenly spaced posts so scrolling is visible
fn background(width: u32, height: u32, sky: [u8; 3], ground: [u8; 3], horizon: f32) -> SpriteImage {
    let horizon_y = (height as f32 * horizon) as u32;
    SpriteImage::from_fn(width, height, |x, y| {
        let [r, g, b] = if y < horizon_y {
            lerp_color([250, 250, 255], sky, 1.0 - y as f32 / horizon_y.max(1) as f32)
        } else if x % 128 < 6 {
            [90, 70, 50]
        } else {
            ground
        };
        [r, g, b, 255]
    })
}

/// Translucent-edged road band running up to the right
fn road_overlay(width: u32, height: u32) -> SpriteImage {
    SpriteImage::from_fn(width, height, |x, y| {
        // Diagonal from bottom-left up to the right edge at mid-height
        let edge = height as f32 * (1.0 - 0.5 * x as f32 / width.max(1) as f32);
        let y = y as f32;
        if y < edge - 24.0 {
            [0, 0, 0, 0]
        } else if y < edge {
            [240, 240, 240, 255]
        } else {
            [70, 70, 78, 255]
        }
    })
}

/// Disc with a stripe through it so the tilt reads on screen
fn ball(size: u32) -> SpriteImage {
    let center = Vec2::splat(size as f32 / 2.0);
    let radius = size as f32 / 2.0 - 1.0;
    SpriteImage::from_fn(size, size, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
        let d = p.length();
        if d > radius {
            [0, 0, 0, 0]
        } else if p.y.abs() < size as f32 * 0.06 {
            [255, 255, 255, 255]
        } else {
            let shade = lerp_color([255, 120, 60], [180, 40, 20], d / radius);
            [shade[0], shade[1], shade[2], 255]
        }
    })
}

impl ProceduralAssets {
    pub fn new() -> Self {
        Self {
            images: [
                background(1024, 512, [120, 180, 240], [110, 170, 90], 0.7),
                background(1024, 768, [240, 170, 120], [150, 130, 90], 0.5),
                road_overlay(512, 256),
                ball(BALL_SIZE),
            ],
        }
    }
}

impl Default for ProceduralAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProvider for ProceduralAssets {
    fn image(&self, sprite: SpriteId) -> &SpriteImage {
        &self.images[sprite.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_buffers_match_dimensions() {
        let assets = ProceduralAssets::new();
        for sprite in SpriteId::ALL {
            let img = assets.image(sprite);
            assert_eq!(img.rgba.len(), (img.width * img.height * 4) as usize);
        }
    }

    #[test]
    fn test_ball_prescaled_and_transparent_corners() {
        let assets = ProceduralAssets::new();
        let ball = assets.image(SpriteId::Ball);
        assert_eq!(ball.size(), ImageSize::new(BALL_SIZE, BALL_SIZE));
        assert_eq!(ball.pixel(0, 0).map(|p| p[3]), Some(0));
        let mid = BALL_SIZE / 2;
        assert_eq!(ball.pixel(mid, mid).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_overlay_has_transparent_sky() {
        let assets = ProceduralAssets::new();
        let overlay = assets.image(SpriteId::SlopeOverlay);
        assert_eq!(overlay.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(overlay.pixel(0, overlay.height - 1).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_scene_images() {
        let sizes = ProceduralAssets::new().scene_images();
        assert_eq!(sizes.ball, ImageSize::new(BALL_SIZE, BALL_SIZE));
        assert_eq!(sizes.overlay, ImageSize::new(512, 256));
        assert!(!sizes.flat_background.is_empty());
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let img = SpriteImage::from_fn(2, 2, |_, _| [1, 2, 3, 4]);
        assert_eq!(img.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(2, 0), None);
    }
}
