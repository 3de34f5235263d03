use crate::LoadError;
use std::path::Path;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        tracing::info!(path = %path.display(), width, height, "loaded texture");
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Load, or log and substitute a single white texel.
    pub fn load_or_white(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("failed to load texture {}: {e}", path.display());
            Self::white()
        })
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn white() -> Self {
        Self::solid([255, 255, 255, 255])
    }

    /// Tangent-space normal pointing straight out of the surface.
    pub fn flat_normal() -> Self {
        Self::solid([128, 128, 255, 255])
    }

    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let tex = TextureData::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.rgba.len(), 3 * 2 * 4);
        assert_eq!(&tex.rgba[..4], &[255, 0, 0, 255]);
        assert_eq!(tex.bytes_per_row(), 12);
    }

    #[test]
    fn missing_texture_becomes_white() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Field.png");
        assert!(TextureData::load(&path).is_err());
        assert_eq!(TextureData::load_or_white(&path), TextureData::white());
    }

    #[test]
    fn placeholders_are_single_texels() {
        assert_eq!(TextureData::white().rgba, vec![255; 4]);
        assert_eq!(TextureData::flat_normal().width, 1);
    }
}
