//! Rendering boundary
//!
//! The engine produces a [`RenderFrame`] every tick: the blade ribbon vertex
//! buffer, textured sprites for objects and menu elements, and HUD text.

pub mod frame;
pub mod texture;
pub mod vertex;

pub use frame::{RenderFrame, Renderer, Sprite};
pub use texture::{TextureCache, TextureKey};
pub use vertex::{Vertex, as_floats, colors};
