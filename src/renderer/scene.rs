//! Scene layout
//!
//! Turns the current speed into a list of sprite draws: a horizontally
//! looping background, the optional road overlay and the tilted ball. No GPU
//! types here; the pipeline (or any other `Canvas`) consumes the draw list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ModeProfile;

/// Images the scene knows how to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    BackgroundFlat,
    BackgroundSlope,
    SlopeOverlay,
    Ball,
}

impl SpriteId {
    pub const ALL: [SpriteId; 4] = [
        SpriteId::BackgroundFlat,
        SpriteId::BackgroundSlope,
        SpriteId::SlopeOverlay,
        SpriteId::Ball,
    ];

    /// Stable index for lookup tables
    pub fn index(&self) -> usize {
        match self {
            SpriteId::BackgroundFlat => 0,
            SpriteId::BackgroundSlope => 1,
            SpriteId::SlopeOverlay => 2,
            SpriteId::Ball => 3,
        }
    }
}

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Drawable area in pixels
pub type Viewport = ImageSize;

/// Source dimensions of every sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneImages {
    pub flat_background: ImageSize,
    pub slope_background: ImageSize,
    pub overlay: ImageSize,
    /// Ball image, already scaled to its on-screen size
    pub ball: ImageSize,
}

impl SceneImages {
    pub fn size_of(&self, sprite: SpriteId) -> ImageSize {
        match sprite {
            SpriteId::BackgroundFlat => self.flat_background,
            SpriteId::BackgroundSlope => self.slope_background,
            SpriteId::SlopeOverlay => self.overlay,
            SpriteId::Ball => self.ball,
        }
    }
}

/// One sprite placement, rotated about its own centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub sprite: SpriteId,
    /// Top-left corner before rotation
    pub pos: Vec2,
    pub size: Vec2,
    /// Clockwise rotation in degrees (screen space, y down)
    pub rotation_deg: f32,
}

impl SpriteDraw {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Draw primitive seam between the layout and whatever rasterizes it
pub trait Canvas {
    fn draw_sprite(&mut self, draw: &SpriteDraw);
}

/// Recording canvas
impl Canvas for Vec<SpriteDraw> {
    fn draw_sprite(&mut self, draw: &SpriteDraw) {
        self.push(*draw);
    }
}

/// Scale `image` preserving aspect ratio until it covers `viewport`.
///
/// Dimensions truncate to whole pixels. Returns `None` for empty inputs.
pub fn cover_fit(image: ImageSize, viewport: Viewport) -> Option<ImageSize> {
    if image.is_empty() || viewport.is_empty() {
        return None;
    }
    let (w, h) = (viewport.width as f32, viewport.height as f32);
    let screen_ratio = w / h;
    let image_ratio = image.width as f32 / image.height as f32;

    let (fit_w, fit_h) = if screen_ratio > image_ratio {
        (w, w / image_ratio)
    } else {
        (h * image_ratio, h)
    };
    Some(ImageSize::new((fit_w as u32).max(1), (fit_h as u32).max(1)))
}

/// Size of the road overlay for a viewport
pub fn overlay_size(viewport: Viewport) -> Option<ImageSize> {
    if viewport.is_empty() {
        return None;
    }
    let w = (viewport.width as f32 * SLOPE_WIDTH_SCALE) as u32;
    let h = (viewport.height as f32 * SLOPE_HEIGHT_RATIO) as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some(ImageSize::new(w, h))
}

/// Wrap a scroll offset into `(-tile_width, 0]`
pub fn wrap_offset(offset: f32, tile_width: f32) -> f32 {
    if !(tile_width > 0.0) || !offset.is_finite() {
        return 0.0;
    }
    let r = offset.rem_euclid(tile_width);
    if r <= 0.0 || r >= tile_width {
        0.0
    } else {
        r - tile_width
    }
}

/// Horizontal background scroll
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    offset: f32,
}

impl ScrollState {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Move the background left by `speed` pixels and wrap
    pub fn advance(&mut self, speed: f32, tile_width: f32) -> f32 {
        self.offset = wrap_offset(self.offset - speed, tile_width);
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

/// Per-frame scene builder
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    images: SceneImages,
    profile: ModeProfile,
    viewport: Viewport,
    background: Option<ImageSize>,
    overlay: Option<ImageSize>,
    scroll: ScrollState,
}

impl SceneRenderer {
    pub fn new(images: SceneImages, profile: ModeProfile) -> Self {
        Self {
            images,
            profile,
            viewport: Viewport::default(),
            background: None,
            overlay: None,
            scroll: ScrollState::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn profile(&self) -> ModeProfile {
        self.profile
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn reset_scroll(&mut self) {
        self.scroll.reset();
    }

    /// Scaled background size (None until a viewport is set)
    pub fn background_size(&self) -> Option<ImageSize> {
        self.background
    }

    pub fn overlay_size(&self) -> Option<ImageSize> {
        self.overlay
    }

    fn background_sprite(&self) -> SpriteId {
        if self.profile.slope_background {
            SpriteId::BackgroundSlope
        } else {
            SpriteId::BackgroundFlat
        }
    }

    fn rebuild_background(&mut self) {
        let source = self.images.size_of(self.background_sprite());
        self.background = cover_fit(source, self.viewport);
    }

    /// Viewport changed: rescale background and overlay
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.rebuild_background();
        self.overlay = overlay_size(viewport);
        log::debug!(
            "Scene resized to {}x{}: background {:?}, overlay {:?}",
            viewport.width,
            viewport.height,
            self.background,
            self.overlay
        );
    }

    /// Switch visual flags (background, overlay, ball tilt)
    pub fn set_profile(&mut self, profile: ModeProfile) {
        let background_changed = profile.slope_background != self.profile.slope_background;
        self.profile = profile;
        if background_changed && !self.viewport.is_empty() {
            self.rebuild_background();
        }
    }

    /// Advance the scroll by `speed` and lay out one frame
    pub fn frame(&mut self, speed: f32) -> Vec<SpriteDraw> {
        let mut draws = Vec::with_capacity(4);
        self.draw(&mut draws, speed);
        draws
    }

    /// Advance the scroll by `speed` and issue this frame's draws to `canvas`
    pub fn draw(&mut self, canvas: &mut impl Canvas, speed: f32) {
        let Some(background) = self.background else {
            return;
        };
        let view = self.viewport.as_vec2();

        // 1) Looping background
        let tile = background.as_vec2();
        let sprite = self.background_sprite();
        let mut x = self.scroll.advance(speed, tile.x);
        while x < view.x {
            canvas.draw_sprite(&SpriteDraw {
                sprite,
                pos: Vec2::new(x, 0.0),
                size: tile,
                rotation_deg: 0.0,
            });
            x += tile.x;
        }

        // 2) Road overlay hugging the bottom edge
        let overlay = self.overlay.filter(|_| self.profile.show_overlay);
        let mut overlay_top = 0.0;
        if let Some(overlay) = overlay {
            let size = overlay.as_vec2();
            overlay_top = view.y - size.y + SLOPE_VERTICAL_OFFSET;
            canvas.draw_sprite(&SpriteDraw {
                sprite: SpriteId::SlopeOverlay,
                pos: Vec2::new((view.x - size.x) / 2.0, overlay_top),
                size,
                rotation_deg: 0.0,
            });
        }

        // 3) Ball
        let ball = self.images.ball.as_vec2();
        let ball_y = match overlay {
            Some(overlay) => overlay_top + overlay.height as f32 * SLOPE_BALL_ANCHOR_RATIO,
            None => view.y - FLAT_BALL_BOTTOM_OFFSET,
        };
        canvas.draw_sprite(&SpriteDraw {
            sprite: SpriteId::Ball,
            pos: Vec2::new(view.x / 2.0 - ball.x / 2.0, ball_y),
            size: ball,
            rotation_deg: self.profile.ball_tilt_deg,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Mode;
    use proptest::prelude::*;

    fn images() -> SceneImages {
        SceneImages {
            flat_background: ImageSize::new(1000, 500),
            slope_background: ImageSize::new(800, 800),
            overlay: ImageSize::new(512, 256),
            ball: ImageSize::new(BALL_SIZE, BALL_SIZE),
        }
    }

    const PHONE: Viewport = ImageSize::new(1080, 1920);

    #[test]
    fn test_cover_fit() {
        // Tall screen, wide image: match height
        assert_eq!(
            cover_fit(ImageSize::new(1000, 500), PHONE),
            Some(ImageSize::new(3840, 1920))
        );
        // Wide screen, square image: match width
        assert_eq!(
            cover_fit(ImageSize::new(800, 800), ImageSize::new(1920, 1080)),
            Some(ImageSize::new(1920, 1920))
        );
        assert_eq!(cover_fit(ImageSize::new(0, 10), PHONE), None);
        assert_eq!(cover_fit(ImageSize::new(10, 10), ImageSize::new(0, 0)), None);
    }

    #[test]
    fn test_wrap_offset() {
        assert_eq!(wrap_offset(0.0, 100.0), 0.0);
        assert_eq!(wrap_offset(-30.0, 100.0), -30.0);
        assert_eq!(wrap_offset(-100.0, 100.0), 0.0);
        assert_eq!(wrap_offset(-130.0, 100.0), -30.0);
        assert_eq!(wrap_offset(50.0, 100.0), -50.0);
        assert_eq!(wrap_offset(-30.0, 0.0), 0.0);
        assert_eq!(wrap_offset(f32::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_flat_frame_layout() {
        let mut scene = SceneRenderer::new(images(), Mode::Flat.profile());
        scene.resize(PHONE);

        let draws = scene.frame(10.0);
        assert_eq!(draws.len(), 2, "one background tile + ball");

        assert_eq!(draws[0].sprite, SpriteId::BackgroundFlat);
        assert_eq!(draws[0].pos, Vec2::new(-10.0, 0.0));
        assert_eq!(draws[0].size, Vec2::new(3840.0, 1920.0));

        let ball = draws[1];
        assert_eq!(ball.sprite, SpriteId::Ball);
        assert_eq!(ball.pos, Vec2::new(465.0, 1670.0));
        assert_eq!(ball.rotation_deg, 0.0);
    }

    #[test]
    fn test_slope_frame_layout() {
        let mut scene = SceneRenderer::new(images(), Mode::Slope.profile());
        scene.resize(PHONE);

        let draws = scene.frame(0.0);
        let sprites: Vec<SpriteId> = draws.iter().map(|d| d.sprite).collect();
        assert_eq!(
            sprites,
            vec![SpriteId::BackgroundSlope, SpriteId::SlopeOverlay, SpriteId::Ball]
        );

        let overlay = draws[1];
        assert_eq!(overlay.size, Vec2::new(1296.0, 864.0));
        assert_eq!(overlay.pos, Vec2::new(-108.0, 1136.0));

        let ball = draws[2];
        assert_eq!(ball.pos.x, 465.0);
        assert!((ball.pos.y - (1136.0 + 864.0 * 0.35)).abs() < 1e-3);
        assert_eq!(ball.rotation_deg, -15.0);
    }

    #[test]
    fn test_tiles_cover_viewport() {
        // Wide viewport with a background exactly viewport-sized
        let mut imgs = images();
        imgs.flat_background = ImageSize::new(400, 300);
        let mut scene = SceneRenderer::new(imgs, Mode::Flat.profile());
        scene.resize(ImageSize::new(400, 300));

        let draws = scene.frame(150.0);
        let tiles: Vec<f32> = draws
            .iter()
            .filter(|d| d.sprite == SpriteId::BackgroundFlat)
            .map(|d| d.pos.x)
            .collect();
        assert_eq!(tiles, vec![-150.0, 250.0]);
    }

    #[test]
    fn test_profile_switch_rebuilds_background() {
        let mut scene = SceneRenderer::new(images(), Mode::Flat.profile());
        scene.resize(PHONE);
        assert_eq!(scene.background_size(), Some(ImageSize::new(3840, 1920)));

        scene.set_profile(Mode::Member.profile());
        assert_eq!(scene.background_size(), Some(ImageSize::new(1920, 1920)));
    }

    #[test]
    fn test_no_viewport_draws_nothing() {
        let mut scene = SceneRenderer::new(images(), Mode::Flat.profile());
        assert!(scene.frame(25.0).is_empty());
        assert_eq!(scene.scroll_offset(), 0.0);
    }

    #[test]
    fn test_sprite_center() {
        let d = SpriteDraw {
            sprite: SpriteId::Ball,
            pos: Vec2::new(10.0, 20.0),
            size: Vec2::new(150.0, 150.0),
            rotation_deg: 0.0,
        };
        assert_eq!(d.center(), Vec2::new(85.0, 95.0));
    }

    proptest! {
        #[test]
        fn prop_scroll_stays_in_tile(
            speeds in proptest::collection::vec(0.0f32..500.0, 1..200),
            tile in 1.0f32..4000.0,
        ) {
            let mut scroll = ScrollState::default();
            for speed in speeds {
                let offset = scroll.advance(speed, tile);
                prop_assert!(offset <= 0.0);
                prop_assert!(offset >= -tile);
            }
        }
    }
}
