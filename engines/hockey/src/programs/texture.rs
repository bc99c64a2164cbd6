use crate::{
    assets::AssetStore,
    gpu::{GraphicsApi, ProgramDesc, ProgramHandle, TextureHandle, VertexLayout},
    RenderError,
};
use glam::Mat4;

const VERTEX_SHADER: &str = "shaders/texture.vert.wgsl";
const FRAGMENT_SHADER: &str = "shaders/texture.frag.wgsl";

/// Samples a 2D texture across a `(position, uv)` mesh.
pub(crate) struct TextureShaderProgram {
    program: ProgramHandle,
}

impl TextureShaderProgram {
    pub(crate) fn new(
        gpu: &mut impl GraphicsApi,
        assets: &impl AssetStore,
    ) -> Result<Self, RenderError> {
        let vertex_source = assets.read_text(VERTEX_SHADER)?;
        let fragment_source = assets.read_text(FRAGMENT_SHADER)?;
        let program = gpu.create_program(&ProgramDesc {
            vertex_source: &vertex_source,
            fragment_source: &fragment_source,
            layout: VertexLayout::PositionTexture,
        })?;
        Ok(Self { program })
    }

    pub(crate) fn use_program(&self, gpu: &mut impl GraphicsApi) {
        gpu.use_program(self.program);
    }

    pub(crate) fn set_uniforms(
        &self,
        gpu: &mut impl GraphicsApi,
        matrix: Mat4,
        texture: TextureHandle,
    ) {
        gpu.set_matrix(matrix);
        gpu.set_texture(texture);
    }
}
