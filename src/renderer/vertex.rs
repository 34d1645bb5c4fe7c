//! Vertex types for sprite rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::scene::{SpriteDraw, Viewport};

/// Textured 2D vertex in normalized device coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Vertices per sprite quad (two triangles)
pub const QUAD_VERTICES: usize = 6;

/// Convert a screen-space pixel position (origin top-left, y down) to NDC
pub fn screen_to_ndc(p: Vec2, viewport: Viewport) -> Vec2 {
    let size = viewport.as_vec2().max(Vec2::ONE);
    Vec2::new(p.x / size.x * 2.0 - 1.0, 1.0 - p.y / size.y * 2.0)
}

/// Build the two triangles for a sprite, rotated about its centre
pub fn sprite_quad(draw: &SpriteDraw, viewport: Viewport) -> [SpriteVertex; QUAD_VERTICES] {
    let center = draw.center();
    let half = draw.size * 0.5;
    // Clockwise on screen because y grows downward
    let rot = Vec2::from_angle(draw.rotation_deg.to_radians());

    let corner = |dx: f32, dy: f32, u: f32, v: f32| {
        let p = center + rot.rotate(Vec2::new(dx * half.x, dy * half.y));
        let ndc = screen_to_ndc(p, viewport);
        SpriteVertex::new(ndc.x, ndc.y, u, v)
    };

    let tl = corner(-1.0, -1.0, 0.0, 0.0);
    let tr = corner(1.0, -1.0, 1.0, 0.0);
    let bl = corner(-1.0, 1.0, 0.0, 1.0);
    let br = corner(1.0, 1.0, 1.0, 1.0);

    [tl, bl, tr, tr, bl, br]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::scene::{ImageSize, SpriteId};

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn test_full_screen_quad() {
        let viewport = ImageSize::new(200, 100);
        let draw = SpriteDraw {
            sprite: SpriteId::BackgroundFlat,
            pos: Vec2::ZERO,
            size: Vec2::new(200.0, 100.0),
            rotation_deg: 0.0,
        };
        let quad = sprite_quad(&draw, viewport);
        assert!(approx(quad[0].position, [-1.0, 1.0])); // top-left
        assert!(approx(quad[5].position, [1.0, -1.0])); // bottom-right
        assert_eq!(quad[0].uv, [0.0, 0.0]);
        assert_eq!(quad[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_rotation_about_center() {
        let viewport = ImageSize::new(100, 100);
        let draw = SpriteDraw {
            sprite: SpriteId::Ball,
            pos: Vec2::new(40.0, 40.0),
            size: Vec2::new(20.0, 20.0),
            rotation_deg: 90.0,
        };
        let quad = sprite_quad(&draw, viewport);
        // Top-left corner (40,40) turns clockwise onto the top-right spot (60,40)
        let expected = screen_to_ndc(Vec2::new(60.0, 40.0), viewport);
        assert!(approx(quad[0].position, [expected.x, expected.y]));

        // Centre of the quad is unchanged
        let sum = quad[0].position[0] + quad[5].position[0];
        assert!(sum.abs() < 1e-5);
    }

    #[test]
    fn test_screen_to_ndc() {
        let viewport = ImageSize::new(400, 200);
        assert_eq!(screen_to_ndc(Vec2::new(200.0, 100.0), viewport), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
    }
}
