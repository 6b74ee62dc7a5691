use std::sync::atomic::{AtomicU64, Ordering};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::{AtelierError, Result};
use crate::io::DecodedImage;

// ============================================================================
// PIXEL SURFACE
// Fixed-size RGBA raster with stroke, clear and image-fit primitives.
// ============================================================================

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic identity. Later surfaces always compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How stroke stamps combine with existing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Zeroes destination alpha along the stroke regardless of stroke color.
    Erase,
}

/// A fixed-size straight-alpha RGBA raster. The buffer is always exactly
/// `width * height * 4` bytes.
#[derive(Debug)]
pub struct PixelSurface {
    id: SurfaceId,
    pixels: RgbaImage,
}

impl PixelSurface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId::next(),
            pixels: RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read-only view of the raw raster, used by compositing and export.
    #[inline]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    #[inline]
    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(AtelierError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    pub fn read_pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        self.check_bounds(x, y)?;
        Ok(self.pixels.get_pixel(x, y).0)
    }

    pub fn write_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        self.check_bounds(x, y)?;
        self.pixels.put_pixel(x, y, Rgba(rgba));
        Ok(())
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    /// Draws a continuous round-capped segment by stamping filled circles
    /// along the path. A zero-length segment is a single dot. Stamps whose
    /// center falls outside the surface are skipped; the rest clip at the
    /// edges.
    pub fn stroke_segment(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: [u8; 3],
        width: f32,
        mode: BlendMode,
    ) {
        let (x0, y0) = from;
        let (x1, y1) = to;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let distance = (dx * dx + dy * dy).sqrt();
        let bounds_w = self.width() as f32;
        let bounds_h = self.height() as f32;

        if distance < 0.1 {
            if x0 >= 0.0 && x0 < bounds_w && y0 >= 0.0 && y0 < bounds_h {
                self.stamp_round(x0, y0, color, width, mode);
            }
            return;
        }

        let steps = distance.ceil() as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + dx * t;
            let y = y0 + dy * t;
            if x < 0.0 || x >= bounds_w || y < 0.0 || y >= bounds_h {
                continue;
            }
            self.stamp_round(x, y, color, width, mode);
        }
    }

    /// A single standalone round mark, as used for mirrored strokes.
    pub fn stamp_dot(&mut self, pos: (f32, f32), color: [u8; 3], width: f32, mode: BlendMode) {
        self.stroke_segment(pos, pos, color, width, mode);
    }

    fn stamp_round(&mut self, cx: f32, cy: f32, color: [u8; 3], width: f32, mode: BlendMode) {
        let radius = width / 2.0;
        let radius_sq = radius * radius;
        if radius_sq < 0.001 {
            return;
        }

        let (w, h) = (self.width(), self.height());
        let min_x = (cx - radius).max(0.0) as u32;
        let max_x = ((cx + radius) as u32).min(w.saturating_sub(1));
        let min_y = (cy - radius).max(0.0) as u32;
        let max_y = ((cy + radius) as u32).min(h.saturating_sub(1));
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let dest = self.pixels.get_pixel_mut(x, y);
                match mode {
                    BlendMode::Normal => *dest = Rgba([color[0], color[1], color[2], 255]),
                    BlendMode::Erase => *dest = Rgba([0, 0, 0, 0]),
                }
            }
        }
    }

    /// Scales the image uniformly to fit, centers it, and composites it over
    /// the existing content. Aspect ratio is preserved; the surface is never
    /// resized.
    pub fn draw_image_fit(&mut self, image: &DecodedImage) {
        let (iw, ih) = (image.width(), image.height());
        if iw == 0 || ih == 0 {
            return;
        }

        let scale = (self.width() as f32 / iw as f32).min(self.height() as f32 / ih as f32);
        let scaled_w = ((iw as f32 * scale).round() as u32).max(1);
        let scaled_h = ((ih as f32 * scale).round() as u32).max(1);
        let resized = imageops::resize(image.as_rgba(), scaled_w, scaled_h, FilterType::Lanczos3);

        let offset_x = (self.width().saturating_sub(scaled_w) / 2) as i64;
        let offset_y = (self.height().saturating_sub(scaled_h) / 2) as i64;
        imageops::overlay(&mut self.pixels, &resized, offset_x, offset_y);
    }
}
