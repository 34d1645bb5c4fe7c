//! Rendering module
//!
//! `scene` lays out sprites for a frame; `pipeline` draws them with WebGPU.

pub mod assets;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use assets::{AssetProvider, ProceduralAssets, SpriteImage};
pub use pipeline::SpriteRenderState;
pub use scene::{Canvas, ImageSize, SceneImages, SceneRenderer, SpriteDraw, SpriteId, Viewport};
