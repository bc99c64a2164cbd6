use crate::gpu::{BufferHandle, GraphicsApi, Topology, VertexLayout};

/// Interleaved `(x, y, s, t)`. The corner t-coordinates stay inside the
/// image so the clamped border of the texture stretches towards the long
/// edges of the table.
#[rustfmt::skip]
const VERTEX_DATA: [f32; 40] = [
    // triangle fan: center, four corners, first corner repeated
     0.0,  0.0,   0.5, 0.5,
    -0.5, -0.8,   0.0, 0.9,
     0.5, -0.8,   1.0, 0.9,
     0.5,  0.8,   1.0, 0.1,
    -0.5,  0.8,   0.0, 0.1,
    -0.5, -0.8,   0.0, 0.9,
    // center line, drawn in two halves
    -0.5,  0.0,   0.0, 0.5,
     0.0,  0.0,   0.5, 0.5,
     0.0,  0.0,   0.5, 0.5,
     0.5,  0.0,   1.0, 0.5,
];

/// The textured table top: a quad in the z = 0 plane of its local frame,
/// laid onto the xz-plane by the scene's -90° rotation about x.
pub(crate) struct Table {
    buffer: BufferHandle,
}

impl Table {
    pub(crate) fn new(gpu: &mut impl GraphicsApi) -> Self {
        Self {
            buffer: gpu.create_vertex_buffer(VertexLayout::PositionTexture, &VERTEX_DATA),
        }
    }

    pub(crate) fn bind_data(&self, gpu: &mut impl GraphicsApi) {
        gpu.bind_vertex_buffer(self.buffer);
    }

    pub(crate) fn draw(&self, gpu: &mut impl GraphicsApi) {
        gpu.draw(Topology::TriangleFan, 0, 6);
        gpu.draw(Topology::Lines, 6, 2);
        gpu.draw(Topology::Lines, 8, 2);
    }
}
