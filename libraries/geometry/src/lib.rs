//! Geometric building blocks for the scene renderer: a perspective
//! [`Projection`], a look-at [`Camera`] and the matrix helpers in
//! [`transform`].

mod camera;
mod projection;
pub mod transform;

pub use camera::Camera;
pub use projection::Projection;
