//! Renders a static air hockey scene: a textured table lying on the
//! xz-plane, two colored mallets and a puck, seen through a perspective
//! camera slightly above and behind the table.
//!
//! The scene issues every GPU operation through the narrow [`gpu::GraphicsApi`]
//! interface. Production uses the wgpu backend in [`gpu`]; tests drive the
//! same scene against a recording stub.

pub mod assets;
mod error;
pub mod gpu;
mod objects;
mod programs;
mod renderer;
mod scene;
mod texture;

pub use error::RenderError;
pub use renderer::{Renderer, RendererBuilder};
pub use scene::SceneRenderer;
