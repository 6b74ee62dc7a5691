//! Atelier Master core: a layered raster canvas for fashion illustration,
//! with a flood-fill engine, mirrored strokes, gallery metadata and a
//! remote polish seam.

pub mod canvas;
pub mod cli;
pub mod error;
pub mod export;
pub mod fill;
pub mod io;
pub mod mirror;
pub mod polish;
pub mod project;
pub mod session;
pub mod surface;

pub use canvas::{Background, Layer, LayerId, LayerKind, LayerStack, BASE_LAYER_NAME};
pub use error::{AtelierError, Result};
pub use io::DecodedImage;
pub use polish::{Annotation, AnnotationPoint, PolishRequest, PolishService};
pub use project::{LayerInfo, Project, ProjectStatus, ProjectStore};
pub use session::{DrawingSession, SessionState, Tool};
pub use surface::{BlendMode, PixelSurface, SurfaceId};

/// Manuscript canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 500;
/// Manuscript canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 700;
