//! Narrow interface to the graphics device.
//!
//! The scene issues every GPU operation through [`GraphicsApi`], which keeps
//! the 2.0-class contract the renderer was written against: shader programs
//! with compile/link checking, vertex buffers with one of two fixed layouts,
//! mipmapped 2D textures, per-draw uniforms, and the triangle-fan,
//! triangle-strip and line topologies.
//!
//! Resource creation is only permitted while a surface is being (re)built;
//! the draw path reuses the handles created there. Handles become invalid
//! when the surface is lost and must not outlive it.

mod backend;

pub use backend::{GpuResources, WgpuApi};

use crate::RenderError;
use glam::Mat4;

/// A linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHandle(pub u32);

/// A server-side vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHandle(pub u32);

/// A 2D texture with a full mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle(pub u32);

/// Primitive topology of a single draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleFan,
    TriangleStrip,
    Lines,
}

/// Vertex layout understood by a shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// interleaved `(x, y, s, t)`; positions are extended to `z = 0, w = 1`
    PositionTexture,
    /// `(x, y, z)`; positions are extended to `w = 1`
    Position,
}

impl VertexLayout {
    #[must_use]
    pub fn floats_per_vertex(self) -> usize {
        match self {
            Self::PositionTexture => 4,
            Self::Position => 3,
        }
    }
}

/// Stage sources and vertex layout of a program about to be linked.
pub struct ProgramDesc<'a> {
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub layout: VertexLayout,
}

/// One mip level of decoded RGBA pixels.
pub struct TextureLevel {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A decoded texture with its complete mip chain, finest level first.
pub struct TextureImage {
    pub levels: Vec<TextureLevel>,
}

pub trait GraphicsApi {
    /// Sets the color the frame buffer is cleared with.
    fn set_clear_color(&mut self, rgba: [f32; 4]);

    /// Sets the drawable region to the full surface.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Compiles and links a shader program; on failure the driver log is
    /// carried in the error and the program is not usable.
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, RenderError>;

    /// Uploads immutable vertex data.
    fn create_vertex_buffer(&mut self, layout: VertexLayout, data: &[f32]) -> BufferHandle;

    /// Uploads a texture with all its mip levels; minification is
    /// linear-mipmap-linear, magnification linear, wrap clamped to edge.
    fn create_texture(&mut self, image: &TextureImage) -> TextureHandle;

    /// Clears the color buffer; the first operation of a frame.
    fn clear(&mut self);

    /// Makes the program current for subsequent draws.
    fn use_program(&mut self, program: ProgramHandle);

    /// Binds the vertex buffer for subsequent draws. Idempotent within a frame.
    fn bind_vertex_buffer(&mut self, buffer: BufferHandle);

    /// Sets the model-view-projection matrix for the next draw.
    fn set_matrix(&mut self, matrix: Mat4);

    /// Sets the flat fragment color for the next draw.
    fn set_color(&mut self, rgb: [f32; 3]);

    /// Binds the texture sampled by the next draw.
    fn set_texture(&mut self, texture: TextureHandle);

    /// Draws `count` consecutive vertices starting at `first` from the bound
    /// vertex buffer.
    fn draw(&mut self, topology: Topology, first: u32, count: u32);
}
