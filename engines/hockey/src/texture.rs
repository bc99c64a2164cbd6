//! Turns an image asset into a GPU texture with a full mip chain.

use crate::{
    assets::AssetStore,
    gpu::{GraphicsApi, TextureHandle, TextureImage, TextureLevel},
    RenderError,
};
use image::{
    imageops::{self, FilterType},
    RgbaImage,
};

/// Decodes an image asset and uploads it with all mip levels.
pub(crate) fn load_texture(
    gpu: &mut impl GraphicsApi,
    assets: &impl AssetStore,
    id: &str,
) -> Result<TextureHandle, RenderError> {
    let image = assets.read_image(id)?;
    Ok(gpu.create_texture(&TextureImage {
        levels: mip_chain(image),
    }))
}

/// Downsamples the image level by level until 1x1, finest level first.
///
/// The device cannot generate mipmaps itself, so the chain is built on the
/// CPU during surface creation.
fn mip_chain(image: RgbaImage) -> Vec<TextureLevel> {
    let mut levels = Vec::new();
    let mut current = image;
    loop {
        let (width, height) = current.dimensions();
        levels.push(TextureLevel {
            width,
            height,
            rgba: current.as_raw().clone(),
        });
        if width <= 1 && height <= 1 {
            break;
        }
        current = imageops::resize(
            &current,
            (width / 2).max(1),
            (height / 2).max(1),
            FilterType::Triangle,
        );
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::{load_texture, mip_chain};
    use crate::{
        assets::AssetStore,
        gpu::tests::NullApi,
        RenderError,
    };
    use image::{Rgba, RgbaImage};

    #[test]
    fn the_mip_chain_halves_down_to_one_texel() {
        let levels = mip_chain(RgbaImage::new(8, 4));
        let dimensions: Vec<_> = levels.iter().map(|level| (level.width, level.height)).collect();
        assert_eq!(dimensions, [(8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn a_single_texel_image_has_one_level() {
        let levels = mip_chain(RgbaImage::new(1, 1));
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn the_base_level_keeps_the_decoded_pixels() {
        let mut checker = RgbaImage::new(2, 2);
        checker.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        checker.put_pixel(1, 1, Rgba([255, 0, 0, 255]));

        let levels = mip_chain(checker);
        assert_eq!(&levels[0].rgba[0..4], &[255, 0, 0, 255]);
        assert_eq!(&levels[0].rgba[4..8], &[0, 0, 0, 0]);
    }

    struct CheckerAssets;

    impl AssetStore for CheckerAssets {
        fn read_text(&self, id: &str) -> Result<String, RenderError> {
            Err(RenderError::Asset {
                id: id.into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        fn read_image(&self, _id: &str) -> Result<RgbaImage, RenderError> {
            Ok(RgbaImage::from_pixel(2, 2, Rgba([0, 128, 0, 255])))
        }
    }

    #[test]
    fn loading_yields_a_usable_handle() {
        let mut gpu = NullApi::default();
        let texture = load_texture(&mut gpu, &CheckerAssets, "textures/checker.png");
        assert!(texture.is_ok());
    }
}
