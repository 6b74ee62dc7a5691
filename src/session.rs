use log::debug;

use crate::canvas::{LayerId, LayerStack};
use crate::fill;
use crate::mirror;
use crate::surface::BlendMode;

// ============================================================================
// DRAWING SESSION
// Routes pointer events to the active layer. Stale events referring to a
// deleted layer are dropped silently; nothing here interrupts the
// interactive loop.
// ============================================================================

/// Default brush color, the studio's burgundy ink.
pub const DEFAULT_BRUSH_COLOR: [u8; 3] = [128, 0, 32];
pub const DEFAULT_BRUSH_WIDTH: f32 = 2.0;
/// The eraser sweeps a swath this many times wider than the brush.
pub const ERASER_WIDTH_SCALE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    FloodFill,
    Eyedropper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    Stroking { layer: LayerId, last: (f32, f32) },
}

pub struct DrawingSession {
    pub tool: Tool,
    pub color: [u8; 3],
    pub brush_width: f32,
    pub mirror: bool,
    state: SessionState,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self {
            tool: Tool::Brush,
            color: DEFAULT_BRUSH_COLOR,
            brush_width: DEFAULT_BRUSH_WIDTH,
            mirror: false,
            state: SessionState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begins or performs a tool action on the active layer.
    ///
    /// Brush and eraser only anchor the stroke here; no mark lands until the
    /// pointer moves. Flood fill is one atomic action. The eyedropper samples
    /// the layer and hands the session back to the brush. The latter two
    /// leave the session idle.
    pub fn pointer_down(&mut self, stack: &mut LayerStack, pos: (f32, f32)) {
        let layer = stack.active();
        match self.tool {
            Tool::Brush | Tool::Eraser => {
                self.state = SessionState::Stroking { layer, last: pos };
            }
            Tool::FloodFill => {
                let Some(surface) = stack.surface_mut(layer) else {
                    self.drop_stale(layer);
                    return;
                };
                let Some(seed) = to_pixel(pos, surface.width(), surface.height()) else {
                    return;
                };
                match fill::flood_fill(surface, seed, self.color) {
                    Ok(filled) => debug!("flood fill wrote {} pixels on layer {}", filled, layer),
                    Err(err) => debug!("flood fill ignored: {}", err),
                }
            }
            Tool::Eyedropper => {
                let Some(surface) = stack.surface(layer) else {
                    self.drop_stale(layer);
                    return;
                };
                let Some((x, y)) = to_pixel(pos, surface.width(), surface.height()) else {
                    return;
                };
                if let Ok(pixel) = surface.read_pixel(x, y) {
                    self.color = [pixel[0], pixel[1], pixel[2]];
                    self.tool = Tool::Brush;
                }
            }
        }
    }

    /// Extends the stroke with one continuous segment, plus a standalone
    /// mirrored dot when mirroring is on.
    pub fn pointer_move(&mut self, stack: &mut LayerStack, pos: (f32, f32)) {
        let SessionState::Stroking { layer, last } = self.state else {
            return;
        };
        let Some(surface) = stack.surface_mut(layer) else {
            self.drop_stale(layer);
            return;
        };

        let (width, mode) = match self.tool {
            Tool::Eraser => (self.brush_width * ERASER_WIDTH_SCALE, BlendMode::Erase),
            _ => (self.brush_width, BlendMode::Normal),
        };
        surface.stroke_segment(last, pos, self.color, width, mode);
        if self.mirror {
            let reflected = mirror::mirrored(pos, surface.width());
            surface.stamp_dot(reflected, self.color, width, mode);
        }
        self.state = SessionState::Stroking { layer, last: pos };
    }

    pub fn pointer_up(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Invalidates any in-flight stroke, keeping the selected tool. Called
    /// when the artist switches projects mid-gesture.
    pub fn cancel_stroke(&mut self) {
        self.state = SessionState::Idle;
    }

    fn drop_stale(&mut self, layer: LayerId) {
        debug!("dropping pointer event for missing layer {}", layer);
        self.state = SessionState::Idle;
    }
}

/// Maps a pointer position to pixel coordinates, or `None` when it falls
/// outside the surface.
fn to_pixel(pos: (f32, f32), width: u32, height: u32) -> Option<(u32, u32)> {
    let (x, y) = pos;
    if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
        return None;
    }
    Some((x as u32, y as u32))
}
