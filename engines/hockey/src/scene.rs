//! The air hockey scene: a textured table with two mallets and a puck.

use crate::{
    assets::AssetStore,
    gpu::{GraphicsApi, TextureHandle},
    objects::{Mallet, Puck, Table},
    programs::{ColorShaderProgram, TextureShaderProgram},
    texture, RenderError,
};
use glam::{Mat4, Vec3};
use lib_geometry::{transform, Camera, Projection};
use log::warn;

const TABLE_TEXTURE: &str = "textures/table.png";

const Y_FOV: f32 = 45.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 10.0;
/// above and behind the table, looking down at its center
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 1.2, 2.2);

const MALLET_RADIUS: f32 = 0.08;
const MALLET_HEIGHT: f32 = 0.15;
const PUCK_RADIUS: f32 = 0.06;
const PUCK_HEIGHT: f32 = 0.02;
const CIRCLE_POINTS: u32 = 32;

const MALLET_RED: [f32; 3] = [1.0, 0.0, 0.0];
const MALLET_BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const PUCK_COLOR: [f32; 3] = [0.8, 0.8, 1.0];

/// Owns the scene's meshes, programs and camera and replays them into a
/// frame on every [`draw_frame`](Self::draw_frame).
pub struct SceneRenderer {
    projection: Projection,
    camera: Camera,
    table: Table,
    mallet: Mallet,
    puck: Puck,
    texture_program: TextureShaderProgram,
    color_program: ColorShaderProgram,
    table_texture: Option<TextureHandle>,
}

impl SceneRenderer {
    /// Creates all GPU resources of the scene. Must be called while the
    /// surface is current; the handles it creates die with the surface.
    pub fn new(gpu: &mut impl GraphicsApi, assets: &impl AssetStore) -> Result<Self, RenderError> {
        gpu.set_clear_color([0.0, 0.0, 0.0, 0.0]);

        let table = Table::new(gpu);
        let mallet = Mallet::new(gpu, MALLET_RADIUS, MALLET_HEIGHT, CIRCLE_POINTS);
        let puck = Puck::new(gpu, PUCK_RADIUS, PUCK_HEIGHT, CIRCLE_POINTS);

        let texture_program = TextureShaderProgram::new(gpu, assets)?;
        let color_program = ColorShaderProgram::new(gpu, assets)?;

        // the scene stays usable without its texture, the table is just
        // skipped while drawing
        let table_texture = match texture::load_texture(gpu, assets, TABLE_TEXTURE) {
            Ok(texture) => Some(texture),
            Err(error) => {
                warn!("table texture unavailable: {error}");
                None
            }
        };

        Ok(Self {
            projection: Projection::new_perspective((1, 1), Y_FOV, Z_NEAR..Z_FAR),
            camera: Camera::new(CAMERA_POSITION, Vec3::ZERO),
            table,
            mallet,
            puck,
            texture_program,
            color_program,
            table_texture,
        })
    }

    /// Adopts new surface dimensions; the next frame uses the new aspect
    /// ratio.
    pub fn surface_changed(&mut self, gpu: &mut impl GraphicsApi, width: u32, height: u32) {
        gpu.set_viewport(width, height);
        self.projection.set_surface_dimensions((width, height));
    }

    /// Draws one complete frame. Objects are drawn back to front in a fixed
    /// order, so no depth buffer is needed.
    pub fn draw_frame(&mut self, gpu: &mut impl GraphicsApi) {
        gpu.clear();

        let view_projection = self.projection.matrix() * self.camera.matrix();

        if let Some(table_texture) = self.table_texture {
            self.texture_program.use_program(gpu);
            // the quad lives in the xy-plane; lay it flat onto xz
            let matrix = view_projection * transform::rotation(-90.0, Vec3::X);
            self.texture_program.set_uniforms(gpu, matrix, table_texture);
            self.table.bind_data(gpu);
            self.table.draw(gpu);
        }

        self.color_program.use_program(gpu);

        let mallet_y = self.mallet.height / 2.0;
        let matrix = Self::position_object(view_projection, 0.0, mallet_y, -0.4);
        self.color_program.set_uniforms(gpu, matrix, MALLET_RED);
        self.mallet.bind_data(gpu);
        self.mallet.draw(gpu);

        let matrix = Self::position_object(view_projection, 0.0, mallet_y, 0.4);
        self.color_program.set_uniforms(gpu, matrix, MALLET_BLUE);
        self.mallet.draw(gpu);

        let matrix = Self::position_object(view_projection, 0.0, self.puck.height / 2.0, 0.0);
        self.color_program.set_uniforms(gpu, matrix, PUCK_COLOR);
        self.puck.bind_data(gpu);
        self.puck.draw(gpu);
    }

    fn position_object(view_projection: Mat4, x: f32, y: f32, z: f32) -> Mat4 {
        view_projection * transform::translation(x, y, z)
    }
}
