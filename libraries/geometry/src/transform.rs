//! Matrix helpers for composing object transforms.
//!
//! Angles are taken in degrees at this API surface and converted to radians
//! internally. All matrices are column-major and compose by post-multiplying
//! column vectors, so a full object transform reads
//! `projection * view * model`. Products are computed into fresh values;
//! callers never write through an operand.

use glam::{Mat4, Vec3};

/// Perspective projection with the GL depth convention: right-handed,
/// z pointing out of the screen, NDC z in `[-1, 1]`.
///
/// The aperture is defined by the vertical field of view.
#[must_use]
pub fn perspective(y_fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(y_fov_degrees.to_radians(), aspect_ratio, near, far)
}

/// Right-handed view matrix moving `eye` into the origin and the direction
/// towards `center` onto `-z`.
#[must_use]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, center, up)
}

/// Rotation about an axis; the axis does not need to be normalized.
#[must_use]
pub fn rotation(degrees: f32, axis: Vec3) -> Mat4 {
    Mat4::from_axis_angle(axis.normalize(), degrees.to_radians())
}

#[must_use]
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}
