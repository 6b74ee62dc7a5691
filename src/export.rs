use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::canvas::{Background, LayerStack};
use crate::error::Result;
use crate::io;

// ============================================================================
// COMPOSITE EXPORT
// Thumbnails keep transparency for embedding; downloads flatten onto
// opaque white paper.
// ============================================================================

/// Flattens the stack over a transparent backdrop into a data-embeddable
/// PNG string.
pub fn to_thumbnail(stack: &LayerStack) -> Result<String> {
    let flat = stack.composite(Background::Transparent);
    let png = io::encode_png(&flat)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Flattens the stack over white and returns the suggested download
/// filename together with the PNG bytes.
pub fn to_download(stack: &LayerStack, title: &str) -> Result<(String, Vec<u8>)> {
    let flat = stack.composite(Background::White);
    let png = io::encode_png(&flat)?;
    let title = if title.trim().is_empty() {
        "export"
    } else {
        title
    };
    Ok((format!("manuscript-{}.png", title), png))
}
