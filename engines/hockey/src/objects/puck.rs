use super::builder::{DrawRange, MeshBuilder};
use crate::gpu::{BufferHandle, GraphicsApi, VertexLayout};

/// A puck: a short cylinder capped on both ends.
pub(crate) struct Puck {
    pub(crate) height: f32,
    buffer: BufferHandle,
    ranges: Vec<DrawRange>,
}

impl Puck {
    pub(crate) fn new(gpu: &mut impl GraphicsApi, radius: f32, height: f32, num_points: u32) -> Self {
        let mut builder = MeshBuilder::new();
        builder.append_disc(height / 2.0, radius, num_points);
        builder.append_open_cylinder(0.0, radius, height, num_points);
        builder.append_disc(-height / 2.0, radius, num_points);
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
