use crate::transform;
use glam::Mat4;
use std::ops::Range;

/// Perspective projection tied to the dimensions of the render surface.
///
/// Only the surface dimensions change over the lifetime of the scene; the
/// field of view and depth range are fixed at construction.
pub struct Projection {
    surface_width: u32,
    surface_height: u32,
    /// vertical field of view in degrees
    y_fov: f32,
    z_range: Range<f32>,
}

impl Projection {
    #[must_use]
    pub fn new_perspective(
        (surface_width, surface_height): (u32, u32),
        y_fov_degrees: f32,
        z_range: Range<f32>,
    ) -> Self {
        Self {
            surface_width,
            surface_height,
            y_fov: y_fov_degrees,
            z_range,
        }
    }

    fn aspect_ratio(&self) -> f32 {
        self.surface_width as f32 / self.surface_height as f32
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        transform::perspective(
            self.y_fov,
            self.aspect_ratio(),
            self.z_range.start,
            self.z_range.end,
        )
    }

    pub fn set_surface_dimensions(&mut self, (width, height): (u32, u32)) {
        self.surface_width = width;
        self.surface_height = height;
    }
}
