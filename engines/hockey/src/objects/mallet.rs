use super::builder::{DrawRange, MeshBuilder};
use crate::gpu::{BufferHandle, GraphicsApi, VertexLayout};

/// A mallet: a wide base cylinder with a narrower handle stacked on top.
/// Seen from the scene's camera it reads as a thick colored disc.
pub(crate) struct Mallet {
    pub(crate) height: f32,
    buffer: BufferHandle,
    ranges: Vec<DrawRange>,
}

impl Mallet {
    pub(crate) fn new(gpu: &mut impl GraphicsApi, radius: f32, height: f32, num_points: u32) -> Self {
        let base_height = height * 0.25;
        let handle_height = height * 0.75;
        let handle_radius = radius / 3.0;

        let mut builder = MeshBuilder::new();
        // the base fills the lower quarter, capped on top
        builder.append_disc(-height / 2.0 + base_height, radius, num_points);
        builder.append_open_cylinder(-height / 2.0 + base_height / 2.0, radius, base_height, num_points);
        // the handle fills the rest
        builder.append_disc(height / 2.0, handle_radius, num_points);
        builder.append_open_cylinder(height / 2.0 - handle_height / 2.0, handle_radius, handle_height, num_points);
        let (vertices, ranges) = builder.build();

        Self {
            height,
            buffer: gpu.create_vertex_buffer(VertexLayout::Position, &vertices),
            ranges,
        }
    }

    pub(crate) fn bind_data(&self, gpu: &mut impl GraphicsApi) {
        gpu.bind_vertex_buffer(self.buffer);
    }

    pub(crate) fn draw(&self, gpu: &mut impl GraphicsApi) {
        for range in &self.ranges {
            gpu.draw(range.topology, range.first, range.count);
        }
    }
}
