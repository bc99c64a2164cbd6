//! Drives the scene against a recording device and checks the exact
//! stream of GPU calls a frame produces.

use engine_hockey::{
    assets::AssetStore,
    gpu::{
        BufferHandle, GraphicsApi, ProgramDesc, ProgramHandle, TextureHandle, TextureImage,
        Topology, VertexLayout,
    },
    RenderError, SceneRenderer,
};
use glam::{Mat4, Vec3, Vec4};
use image::{Rgba, RgbaImage};
use lib_geometry::{transform, Camera, Projection};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetClearColor([f32; 4]),
    SetViewport(u32, u32),
    CreateProgram(VertexLayout),
    CreateVertexBuffer(VertexLayout, usize),
    CreateTexture(usize),
    Clear,
    UseProgram(ProgramHandle),
    BindVertexBuffer(BufferHandle),
    SetMatrix(Mat4),
    SetColor([f32; 3]),
    SetTexture(TextureHandle),
    Draw(Topology, u32, u32),
}

/// Records every call in order and hands out sequential handles.
#[derive(Default)]
struct RecordingApi {
    calls: Vec<Call>,
    programs: u32,
    buffers: u32,
    textures: u32,
}

impl GraphicsApi for RecordingApi {
    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.calls.push(Call::SetClearColor(rgba));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::SetViewport(width, height));
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, RenderError> {
        self.calls.push(Call::CreateProgram(desc.layout));
        let handle = ProgramHandle(self.programs);
        self.programs += 1;
        Ok(handle)
    }

    fn create_vertex_buffer(&mut self, layout: VertexLayout, data: &[f32]) -> BufferHandle {
        self.calls.push(Call::CreateVertexBuffer(layout, data.len()));
        let handle = BufferHandle(self.buffers);
        self.buffers += 1;
        handle
    }

    fn create_texture(&mut self, image: &TextureImage) -> TextureHandle {
        self.calls.push(Call::CreateTexture(image.levels.len()));
        let handle = TextureHandle(self.textures);
        self.textures += 1;
        handle
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(Call::BindVertexBuffer(buffer));
    }

    fn set_matrix(&mut self, matrix: Mat4) {
        self.calls.push(Call::SetMatrix(matrix));
    }

    fn set_color(&mut self, rgb: [f32; 3]) {
        self.calls.push(Call::SetColor(rgb));
    }

    fn set_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::SetTexture(texture));
    }

    fn draw(&mut self, topology: Topology, first: u32, count: u32) {
        self.calls.push(Call::Draw(topology, first, count));
    }
}

/// In-memory assets: empty shader stubs and a tiny solid texture.
struct TestAssets;

impl AssetStore for TestAssets {
    fn read_text(&self, _id: &str) -> Result<String, RenderError> {
        Ok(String::from("fn vs_main() {}"))
    }

    fn read_image(&self, _id: &str) -> Result<RgbaImage, RenderError> {
        Ok(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])))
    }
}

/// Assets without any decodable image.
struct TexturelessAssets;

impl AssetStore for TexturelessAssets {
    fn read_text(&self, _id: &str) -> Result<String, RenderError> {
        Ok(String::from("fn vs_main() {}"))
    }

    fn read_image(&self, id: &str) -> Result<RgbaImage, RenderError> {
        Err(RenderError::Asset {
            id: id.into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

const SURFACE: (u32, u32) = (800, 480);

fn scene_on(gpu: &mut RecordingApi, assets: &impl AssetStore) -> SceneRenderer {
    let mut scene = SceneRenderer::new(gpu, assets).expect("scene creation succeeds");
    scene.surface_changed(gpu, SURFACE.0, SURFACE.1);
    scene
}

/// The view-projection matrix the scene is expected to use.
fn view_projection() -> Mat4 {
    let projection = Projection::new_perspective(SURFACE, 45.0, 1.0..10.0);
    let camera = Camera::new(Vec3::new(0.0, 1.2, 2.2), Vec3::ZERO);
    projection.matrix() * camera.matrix()
}

/// Compares call streams, allowing floating point slack in the matrices.
fn assert_calls(actual: &[Call], expected: &[Call]) {
    assert_eq!(actual.len(), expected.len(), "call count\n{actual:#?}");
    for (index, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        match (actual, expected) {
            (Call::SetMatrix(actual), Call::SetMatrix(expected)) => {
                assert!(
                    actual.abs_diff_eq(*expected, 1e-5),
                    "matrix mismatch at call {index}: {actual} != {expected}"
                );
            }
            (actual, expected) => {
                assert_eq!(actual, expected, "call {index}");
            }
        }
    }
}

#[test]
fn a_frame_draws_table_mallets_and_puck_back_to_front() {
    let mut gpu = RecordingApi::default();
    let mut scene = scene_on(&mut gpu, &TestAssets);

    gpu.calls.clear();
    scene.draw_frame(&mut gpu);

    let vp = view_projection();
    let mallet_draws = [
        Call::Draw(Topology::TriangleFan, 0, 34),
        Call::Draw(Topology::TriangleStrip, 34, 66),
        Call::Draw(Topology::TriangleFan, 100, 34),
        Call::Draw(Topology::TriangleStrip, 134, 66),
    ];

    let mut expected = vec![
        Call::Clear,
        Call::UseProgram(ProgramHandle(0)),
        Call::SetMatrix(vp * transform::rotation(-90.0, Vec3::X)),
        Call::SetTexture(TextureHandle(0)),
        Call::BindVertexBuffer(BufferHandle(0)),
        Call::Draw(Topology::TriangleFan, 0, 6),
        Call::Draw(Topology::Lines, 6, 2),
        Call::Draw(Topology::Lines, 8, 2),
        Call::UseProgram(ProgramHandle(1)),
        Call::SetMatrix(vp * transform::translation(0.0, 0.075, -0.4)),
        Call::SetColor([1.0, 0.0, 0.0]),
        Call::BindVertexBuffer(BufferHandle(1)),
    ];
    expected.extend(mallet_draws.iter().cloned());
    expected.push(Call::SetMatrix(vp * transform::translation(0.0, 0.075, 0.4)));
    expected.push(Call::SetColor([0.0, 0.0, 1.0]));
    expected.extend(mallet_draws.iter().cloned());
    expected.push(Call::SetMatrix(vp * transform::translation(0.0, 0.01, 0.0)));
    expected.push(Call::SetColor([0.8, 0.8, 1.0]));
    expected.push(Call::BindVertexBuffer(BufferHandle(2)));
    expected.push(Call::Draw(Topology::TriangleFan, 0, 34));
    expected.push(Call::Draw(Topology::TriangleStrip, 34, 66));
    expected.push(Call::Draw(Topology::TriangleFan, 100, 34));

    assert_calls(&gpu.calls, &expected);
}

#[test]
fn scene_creation_uploads_every_resource_up_front() {
    let mut gpu = RecordingApi::default();
    let mut scene = scene_on(&mut gpu, &TestAssets);

    let creations: Vec<_> = gpu
        .calls
        .iter()
        .filter(|call| {
            matches!(
                call,
                Call::CreateProgram(_) | Call::CreateVertexBuffer(..) | Call::CreateTexture(_)
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        creations,
        [
            Call::CreateVertexBuffer(VertexLayout::PositionTexture, 40),
            Call::CreateVertexBuffer(VertexLayout::Position, 200 * 3),
            Call::CreateVertexBuffer(VertexLayout::Position, 134 * 3),
            Call::CreateProgram(VertexLayout::PositionTexture),
            Call::CreateProgram(VertexLayout::Position),
            Call::CreateTexture(2),
        ]
    );

    // frames only replay, they never create
    gpu.calls.clear();
    scene.draw_frame(&mut gpu);
    assert!(!gpu.calls.iter().any(|call| {
        matches!(
            call,
            Call::CreateProgram(_) | Call::CreateVertexBuffer(..) | Call::CreateTexture(_)
        )
    }));
}

#[test]
fn the_clear_color_is_transparent_black() {
    let mut gpu = RecordingApi::default();
    let _scene = scene_on(&mut gpu, &TestAssets);

    assert_eq!(gpu.calls[0], Call::SetClearColor([0.0, 0.0, 0.0, 0.0]));
}

#[test]
fn resizing_adjusts_viewport_and_aspect_ratio() {
    let mut gpu = RecordingApi::default();
    let mut scene = scene_on(&mut gpu, &TestAssets);

    scene.draw_frame(&mut gpu);
    let wide = table_matrix(&gpu.calls);

    gpu.calls.clear();
    scene.surface_changed(&mut gpu, SURFACE.1, SURFACE.0);
    assert_eq!(gpu.calls[0], Call::SetViewport(SURFACE.1, SURFACE.0));

    scene.draw_frame(&mut gpu);
    let tall = table_matrix(&gpu.calls);
    assert!(!wide.abs_diff_eq(tall, 1e-6));
}

fn table_matrix(calls: &[Call]) -> Mat4 {
    calls
        .iter()
        .find_map(|call| match call {
            Call::SetMatrix(matrix) => Some(*matrix),
            _ => None,
        })
        .expect("a frame sets at least one matrix")
}

#[test]
fn the_table_center_projects_onto_the_middle_of_the_screen() {
    let mut gpu = RecordingApi::default();
    let mut scene = scene_on(&mut gpu, &TestAssets);

    gpu.calls.clear();
    scene.draw_frame(&mut gpu);

    // the last matrix positions the puck 0.01 above the table center, so
    // pulling its local origin back down lands on the world origin
    let puck = gpu
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::SetMatrix(matrix) => Some(*matrix),
            _ => None,
        })
        .last()
        .expect("the frame positions the puck");

    let clip = puck * Vec4::new(0.0, -0.01, 0.0, 1.0);
    let ndc = clip / clip.w;
    assert!(ndc.x.abs() < 1e-5);
    assert!(ndc.y.abs() < 1e-5);
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}

#[test]
fn a_missing_table_texture_skips_the_table_but_keeps_the_rest() {
    let mut gpu = RecordingApi::default();
    let mut scene = scene_on(&mut gpu, &TexturelessAssets);

    gpu.calls.clear();
    scene.draw_frame(&mut gpu);

    assert!(!gpu.calls.iter().any(|call| matches!(call, Call::SetTexture(_))));
    assert_eq!(gpu.calls[0], Call::Clear);
    // the first thing drawn is the red mallet under the color program
    assert_eq!(gpu.calls[1], Call::UseProgram(ProgramHandle(1)));
    let draws = gpu
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Draw(..)))
        .count();
    assert_eq!(draws, 11);
}
