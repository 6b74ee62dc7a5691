use std::collections::HashMap;
use std::fmt;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AtelierError, Result};
use crate::surface::PixelSurface;

/// Name given to the first layer of every fresh stack.
pub const BASE_LAYER_NAME: &str = "Base Manuscript";

// ============================================================================
// LAYER STACK
// Ordered, toggleable layers over an arena of pixel surfaces. Index 0 is
// the bottom of the stack; compositing walks bottom to top.
// ============================================================================

/// Identity of a layer within a stack. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a layer holds, carried through to the gallery metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Sketch,
    AiPolish,
    Reference,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub kind: LayerKind,
}

/// Backdrop a composite is flattened onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Preview and thumbnail flattening.
    Transparent,
    /// Download flattening.
    White,
}

pub struct LayerStack {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    surfaces: HashMap<LayerId, PixelSurface>,
    active: LayerId,
    next_layer_id: u64,
}

impl LayerStack {
    /// A stack starts with one transparent, visible, active layer.
    pub fn new(width: u32, height: u32) -> Self {
        let mut stack = Self {
            width,
            height,
            layers: Vec::new(),
            surfaces: HashMap::new(),
            active: LayerId(0),
            next_layer_id: 1,
        };
        stack.push_layer(BASE_LAYER_NAME.to_string(), LayerKind::Sketch);
        stack
    }

    fn push_layer(&mut self, name: String, kind: LayerKind) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.layers.push(Layer {
            id,
            name,
            visible: true,
            kind,
        });
        self.surfaces
            .insert(id, PixelSurface::new(self.width, self.height));
        self.active = id;
        id
    }

    /// Appends a transparent sketch layer on top, named after the new stack
    /// size, and makes it active.
    pub fn add_layer(&mut self) -> LayerId {
        let name = format!("Layer {}", self.layers.len() + 1);
        self.push_layer(name, LayerKind::Sketch)
    }

    /// Appends a named layer on top and makes it active.
    pub fn add_layer_named(&mut self, name: impl Into<String>, kind: LayerKind) -> LayerId {
        self.push_layer(name.into(), kind)
    }

    /// Removes a layer and its surface. The final remaining layer can never
    /// be deleted. When the active layer goes away, the bottom layer takes
    /// over as active.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<()> {
        if self.layers.len() <= 1 {
            return Err(AtelierError::LastLayer);
        }
        let index = self
            .index_of(id)
            .ok_or(AtelierError::LayerNotFound(id))?;
        self.layers.remove(index);
        self.surfaces.remove(&id);
        if self.active == id {
            self.active = self.layers[0].id;
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: LayerId) -> Result<()> {
        if self.index_of(id).is_none() {
            return Err(AtelierError::LayerNotFound(id));
        }
        self.active = id;
        Ok(())
    }

    /// Flips composite inclusion only. A hidden layer stays fully paintable
    /// while it is active; tools never consult visibility.
    pub fn toggle_visible(&mut self, id: LayerId) -> Result<()> {
        let layer = self
            .layer_entry_mut(id)
            .ok_or(AtelierError::LayerNotFound(id))?;
        layer.visible = !layer.visible;
        Ok(())
    }

    /// Swaps the layer with the one above it. Already at the top is a no-op.
    pub fn move_layer_up(&mut self, id: LayerId) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or(AtelierError::LayerNotFound(id))?;
        if index + 1 >= self.layers.len() {
            return Ok(());
        }
        self.layers.swap(index, index + 1);
        Ok(())
    }

    /// Swaps the layer with the one below it. Already at the bottom is a
    /// no-op.
    pub fn move_layer_down(&mut self, id: LayerId) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or(AtelierError::LayerNotFound(id))?;
        if index == 0 {
            return Ok(());
        }
        self.layers.swap(index, index - 1);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bottom-to-top layer order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn active(&self) -> LayerId {
        self.active
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    fn layer_entry_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn surface(&self, id: LayerId) -> Option<&PixelSurface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: LayerId) -> Option<&mut PixelSurface> {
        self.surfaces.get_mut(&id)
    }

    /// Flattens the visible layers bottom to top over the requested backdrop.
    /// Layer buffers are only read; the output is a fresh raster.
    pub fn composite(&self, background: Background) -> RgbaImage {
        let base = match background {
            Background::Transparent => [0u8, 0, 0, 0],
            Background::White => [255u8, 255, 255, 255],
        };
        let visible: Vec<&RgbaImage> = self
            .layers
            .iter()
            .filter(|layer| layer.visible)
            .filter_map(|layer| self.surfaces.get(&layer.id))
            .map(|surface| surface.as_image())
            .collect();

        let width = self.width;
        let mut output = RgbaImage::from_pixel(self.width, self.height, Rgba(base));
        let row_len = (width as usize) * 4;
        let buffer: &mut [u8] = &mut output;
        buffer
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(row, chunk)| {
                let y = row as u32;
                for x in 0..width {
                    let mut pixel = base;
                    for layer in &visible {
                        pixel = blend_pixel(pixel, layer.get_pixel(x, y).0);
                    }
                    let offset = (x as usize) * 4;
                    chunk[offset..offset + 4].copy_from_slice(&pixel);
                }
            });
        output
    }
}

/// Source-over blend of two straight-alpha RGBA pixels.
#[inline(always)]
fn blend_pixel(base: [u8; 4], top: [u8; 4]) -> [u8; 4] {
    // Fast path: fully transparent top pixel.
    if top[3] == 0 {
        return base;
    }
    // Fast path: fully opaque top pixel.
    if top[3] == 255 {
        return top;
    }

    let top_a = top[3] as f32 / 255.0;
    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a == 0.0 {
        return [0, 0, 0, 0];
    }

    let base_weight = base_a * (1.0 - top_a);
    let out_r = ((top[0] as f32 / 255.0) * top_a + (base[0] as f32 / 255.0) * base_weight) / out_a;
    let out_g = ((top[1] as f32 / 255.0) * top_a + (base[1] as f32 / 255.0) * base_weight) / out_a;
    let out_b = ((top[2] as f32 / 255.0) * top_a + (base[2] as f32 / 255.0) * base_weight) / out_a;

    [
        (out_r * 255.0).clamp(0.0, 255.0) as u8,
        (out_g * 255.0).clamp(0.0, 255.0) as u8,
        (out_b * 255.0).clamp(0.0, 255.0) as u8,
        (out_a * 255.0).clamp(0.0, 255.0) as u8,
    ]
}
