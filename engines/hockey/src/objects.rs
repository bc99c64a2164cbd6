//! The three meshes of the scene. Each is built once per surface and never
//! mutated; drawing replays a fixed list of ranges from its vertex buffer.

mod builder;
mod mallet;
mod puck;
mod table;

pub(crate) use mallet::Mallet;
pub(crate) use puck::Puck;
pub(crate) use table::Table;
