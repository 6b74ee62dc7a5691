use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::RgbaImage;

use crate::error::Result;

// ============================================================================
// IMAGE IO
// Two-phase loading: decode fully first, composite second. A failed decode
// never touches a surface.
// ============================================================================

/// A fully decoded RGBA bitmap, the only input `draw_image_fit` accepts.
#[derive(Debug, Clone)]
pub struct DecodedImage(RgbaImage);

impl DecodedImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.0
    }
}

/// Decodes an image file. Any failure surfaces here, before drawing begins.
pub fn load_image(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let decoded = image::open(path)?.to_rgba8();
    Ok(DecodedImage(decoded))
}

/// Decodes image bytes already in memory, as returned by the polish seam.
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DecodedImage> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    Ok(DecodedImage(decoded))
}

/// PNG-encodes a raster into a byte buffer.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    #[allow(deprecated)]
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// PNG-encodes a raster straight to disk.
pub fn write_png(path: impl AsRef<Path>, image: &RgbaImage) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut writer);
    #[allow(deprecated)]
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    writer.flush()?;
    Ok(())
}
