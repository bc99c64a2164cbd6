//! The two shader programs of the scene.
//!
//! Both are concrete types over the shared [`GraphicsApi::create_program`]
//! helper; construction reads the stage sources from the asset store and
//! fails with the driver log if they do not compile or link.
//!
//! [`GraphicsApi::create_program`]: crate::gpu::GraphicsApi::create_program

mod color;
mod texture;

pub(crate) use color::ColorShaderProgram;
pub(crate) use texture::TextureShaderProgram;
