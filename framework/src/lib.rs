//! Hosting layer for the scene renderer: window creation, wgpu surface and
//! device setup, and the event loop dispatching resize and redraw callbacks.
//!
//! The renderer behind the surface only sees the [`renderer`] traits; a valid
//! graphics context is current for the duration of each callback.

pub mod application;
pub mod logging;
mod render_surface;
pub mod renderer;
