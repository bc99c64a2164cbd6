use crate::{
    assets::AssetStore,
    gpu::{GraphicsApi, ProgramDesc, ProgramHandle, VertexLayout},
    RenderError,
};
use glam::Mat4;

const VERTEX_SHADER: &str = "shaders/color.vert.wgsl";
const FRAGMENT_SHADER: &str = "shaders/color.frag.wgsl";

/// Fills a position-only mesh with one flat color.
pub(crate) struct ColorShaderProgram {
    program: ProgramHandle,
}

impl ColorShaderProgram {
    pub(crate) fn new(
        gpu: &mut impl GraphicsApi,
        assets: &impl AssetStore,
    ) -> Result<Self, RenderError> {
        let vertex_source = assets.read_text(VERTEX_SHADER)?;
        let fragment_source = assets.read_text(FRAGMENT_SHADER)?;
        let program = gpu.create_program(&ProgramDesc {
            vertex_source: &vertex_source,
            fragment_source: &fragment_source,
            layout: VertexLayout::Position,
        })?;
        Ok(Self { program })
    }

    pub(crate) fn use_program(&self, gpu: &mut impl GraphicsApi) {
        gpu.use_program(self.program);
    }

    pub(crate) fn set_uniforms(&self, gpu: &mut impl GraphicsApi, matrix: Mat4, rgb: [f32; 3]) {
        gpu.set_matrix(matrix);
        gpu.set_color(rgb);
    }
}
