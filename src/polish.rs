use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::canvas::{LayerId, LayerKind, LayerStack};
use crate::error::{AtelierError, Result};
use crate::export;
use crate::io::{self, DecodedImage};

// ============================================================================
// POLISH COLLABORATOR
// The remote refinement seam. The collaborator receives the flattened
// sketch plus the artist's fabric annotations and may return a refined
// image, which lands as a new top layer. A decline changes nothing.
// ============================================================================

/// Name of the layer a successful polish lands on.
pub const POLISH_LAYER_NAME: &str = "AI Polished Finish";
/// Light-source angle sent when the artist has not picked one. Degrees,
/// 0 to 360.
pub const DEFAULT_LIGHTING_DEGREES: u16 = 45;

/// A polyline vertex in percent coordinates of the canvas, 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPoint {
    pub x: f32,
    pub y: f32,
}

/// A labelled fabric instruction anchored to a marker polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub label: String,
    pub instruction: String,
    pub points: Vec<AnnotationPoint>,
}

impl Annotation {
    pub fn new(
        id: u64,
        label: impl Into<String>,
        instruction: impl Into<String>,
        points: Vec<AnnotationPoint>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            instruction: instruction.into(),
            points,
        }
    }
}

/// Everything the collaborator needs for one refinement pass.
#[derive(Debug, Clone)]
pub struct PolishRequest {
    /// Data-embeddable PNG string of the flattened sketch.
    pub image_data: String,
    pub annotations: Vec<Annotation>,
    /// Light-source angle in degrees.
    pub lighting: u16,
}

impl PolishRequest {
    pub fn new(image_data: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            image_data: image_data.into(),
            annotations,
            lighting: DEFAULT_LIGHTING_DEGREES,
        }
    }
}

/// The remote seam. `Ok(None)` means the collaborator declined; callers must
/// leave every surface as it was.
pub trait PolishService {
    fn polish(&self, request: &PolishRequest) -> Result<Option<String>>;
}

/// Builds the refinement instructions sent alongside the sketch.
pub fn build_prompt(annotations: &[Annotation], lighting: u16) -> String {
    let summary = annotations
        .iter()
        .map(|a| format!("- {}: {}", a.label, a.instruction))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a professional fashion illustrator.\n\
         Your task is to REFINE AND POLISH the provided fashion sketch.\n\
         \n\
         RULES:\n\
         1. DO NOT add new design elements (sleeves, buttons, or extra items not in the original).\n\
         2. STABILIZE line-weights: Make lines cleaner and more professional.\n\
         3. CORRECT symmetry where applicable.\n\
         4. APPLY FABRIC TEXTURES based on these specific user instructions:\n\
         {summary}\n\
         5. Adjust lighting based on a {lighting} degree light source.\n\
         \n\
         Output the refined illustration as a high-quality image."
    )
}

/// The base64 payload of a data string: everything after the first comma,
/// or the whole string when no prefix is present.
pub fn strip_data_url(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// Decodes the collaborator's returned data string into a bitmap.
pub fn decode_polish_result(data: &str) -> Result<DecodedImage> {
    let bytes = STANDARD
        .decode(strip_data_url(data))
        .map_err(|err| AtelierError::Remote(format!("undecodable polish payload: {}", err)))?;
    io::load_image_from_memory(&bytes)
}

/// Lands a refined image as a new active top layer.
pub fn apply_polish(stack: &mut LayerStack, image: &DecodedImage) -> LayerId {
    let id = stack.add_layer_named(POLISH_LAYER_NAME, LayerKind::AiPolish);
    if let Some(surface) = stack.surface_mut(id) {
        surface.draw_image_fit(image);
    }
    id
}

/// One full refinement round trip: flatten, ask the collaborator, land the
/// result. Returns the new layer id, or `None` when the collaborator
/// declined and the stack was left untouched.
pub fn run_polish(
    service: &dyn PolishService,
    stack: &mut LayerStack,
    annotations: &[Annotation],
    lighting: u16,
) -> Result<Option<LayerId>> {
    let image_data = export::to_thumbnail(stack)?;
    let request = PolishRequest {
        image_data,
        annotations: annotations.to_vec(),
        lighting,
    };
    let Some(data_url) = service.polish(&request)? else {
        debug!("polish declined, stack left untouched");
        return Ok(None);
    };
    let image = decode_polish_result(&data_url)?;
    Ok(Some(apply_polish(stack, &image)))
}
