//! Read-only access to shader sources and texture images.

use crate::RenderError;
use image::RgbaImage;
use std::{fs, path::PathBuf};

/// The store the scene reads its assets from during surface creation.
///
/// Reads may block; they only happen while a surface is being built.
pub trait AssetStore {
    fn read_text(&self, id: &str) -> Result<String, RenderError>;

    /// Decodes an image asset into RGBA pixels at its stored resolution;
    /// no scaling is applied.
    fn read_image(&self, id: &str) -> Result<RgbaImage, RenderError>;
}

/// Assets served from a directory on the local file system.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for DirectoryStore {
    fn read_text(&self, id: &str) -> Result<String, RenderError> {
        fs::read_to_string(self.root.join(id)).map_err(|source| RenderError::Asset {
            id: id.into(),
            source,
        })
    }

    fn read_image(&self, id: &str) -> Result<RgbaImage, RenderError> {
        let bytes = fs::read(self.root.join(id)).map_err(|source| RenderError::Asset {
            id: id.into(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| RenderError::ImageDecode {
            id: id.into(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}
