//! Texture asset loading
//!
//! Decodes image files into raw RGBA pixel data.

use std::path::Path;

use crate::assets::AssetError;

/// Decoded texture data
#[derive(Debug, Clone)]
pub struct TextureAsset {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl TextureAsset {
    /// Load a texture from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading texture from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|e| AssetError::Parse {
            path: path_ref.display().to_string(),
            message: format!("Failed to decode image: {}", e),
        })?;

        // RGBA8 is the one pixel format everything downstream accepts
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded texture {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color texture (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// Get the size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}
