use crate::gpu::Topology;
use std::f32::consts::TAU;

/// A draw call into a mesh, expressed as a consecutive range of vertices.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DrawRange {
    pub(crate) topology: Topology,
    pub(crate) first: u32,
    pub(crate) count: u32,
}

/// Accumulates the vertices of a solid of revolution, three floats per
/// vertex, along with the draw ranges that render them.
///
/// All parts are centered on the y-axis; the model matrix positions the
/// finished solid in the scene.
pub(crate) struct MeshBuilder {
    vertices: Vec<f32>,
    ranges: Vec<DrawRange>,
}

impl MeshBuilder {
    pub(crate) fn new() -> Self {
        Self {
            vertices: Vec::new(),
            ranges: Vec::new(),
        }
    }

    fn vertex_count(&self) -> u32 {
        u32::try_from(self.vertices.len() / 3).unwrap()
    }

    fn push_vertex(&mut self, x: f32, y: f32, z: f32) {
        self.vertices.extend_from_slice(&[x, y, z]);
    }

    /// Appends a filled disc at height `center_y` as a triangle fan around
    /// its center: `num_points + 2` vertices, the rim closed by repeating
    /// the first rim vertex.
    pub(crate) fn append_disc(&mut self, center_y: f32, radius: f32, num_points: u32) {
        let first = self.vertex_count();

        self.push_vertex(0.0, center_y, 0.0);
        for point in 0..=num_points {
            // wrap the closing vertex back to angle zero so the rim closes
            // bit-exactly instead of at sin(TAU)
            let angle = TAU * (point % num_points) as f32 / num_points as f32;
            self.push_vertex(radius * angle.cos(), center_y, radius * angle.sin());
        }

        self.ranges.push(DrawRange {
            topology: Topology::TriangleFan,
            first,
            count: num_points + 2,
        });
    }

    /// Appends the side wall of a cylinder centered at `center_y` as a
    /// triangle strip alternating between the top and bottom rim:
    /// `2 * (num_points + 1)` vertices.
    pub(crate) fn append_open_cylinder(
        &mut self,
        center_y: f32,
        radius: f32,
        height: f32,
        num_points: u32,
    ) {
        let first = self.vertex_count();
        let top = center_y + height / 2.0;
        let bottom = center_y - height / 2.0;

        for point in 0..=num_points {
            // same exact closure as the disc rim, so caps and wall share a seam
            let angle = TAU * (point % num_points) as f32 / num_points as f32;
            let x = radius * angle.cos();
            let z = radius * angle.sin();
            self.push_vertex(x, top, z);
            self.push_vertex(x, bottom, z);
        }

        self.ranges.push(DrawRange {
            topology: Topology::TriangleStrip,
            first,
            count: 2 * (num_points + 1),
        });
    }

    pub(crate) fn build(self) -> (Vec<f32>, Vec<DrawRange>) {
        (self.vertices, self.ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::MeshBuilder;
    use crate::gpu::Topology;
    use std::f32::consts::TAU;

    #[test]
    fn a_disc_is_one_closed_triangle_fan() {
        let mut builder = MeshBuilder::new();
        builder.append_disc(0.5, 2.0, 8);
        let (vertices, ranges) = builder.build();

        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].topology, Topology::TriangleFan);
        assert_eq!(ranges[0].first, 0);
        assert_eq!(ranges[0].count, 10);
        assert_eq!(vertices.len(), 10 * 3);

        // center vertex, then the rim starting at angle zero
        assert_eq!(&vertices[0..3], &[0.0, 0.5, 0.0]);
        assert_eq!(&vertices[3..6], &[2.0, 0.5, 0.0]);
        // the fan is closed: last rim vertex equals the first
        assert_eq!(&vertices[27..30], &vertices[3..6]);
    }

    #[test]
    fn a_cylinder_side_is_a_strip_of_paired_rim_vertices() {
        let num_points = 32;
        let radius = 0.06;
        let mut builder = MeshBuilder::new();
        builder.append_open_cylinder(0.0, radius, 0.02, num_points);
        let (vertices, ranges) = builder.build();

        assert_eq!(ranges[0].topology, Topology::TriangleStrip);
        assert_eq!(ranges[0].count, 2 * (num_points + 1));
        assert_eq!(vertices.len() as u32, 2 * (num_points + 1) * 3);

        // circumferential vertex k sits at angle 2πk/N on both rims
        for point in 0..=num_points {
            let angle = TAU * point as f32 / num_points as f32;
            let top = &vertices[(point as usize * 6)..][..3];
            let bottom = &vertices[(point as usize * 6 + 3)..][..3];
            assert!((top[0] - radius * angle.cos()).abs() < 1e-6);
            assert!((top[2] - radius * angle.sin()).abs() < 1e-6);
            assert!((top[1] - 0.01).abs() < 1e-6);
            assert!((bottom[1] + 0.01).abs() < 1e-6);
        }

        // the closing pair repeats the first pair, so the wall has no seam gap
        assert_eq!(
            &vertices[(num_points as usize) * 6..][..6],
            &vertices[0..6]
        );
    }

    #[test]
    fn ranges_of_stacked_parts_are_consecutive() {
        let mut builder = MeshBuilder::new();
        builder.append_disc(0.0, 1.0, 8);
        builder.append_open_cylinder(0.0, 1.0, 1.0, 8);
        let (_, ranges) = builder.build();

        assert_eq!(ranges[0].first, 0);
        assert_eq!(ranges[1].first, 10);
        assert_eq!(ranges[1].count, 18);
    }
}
