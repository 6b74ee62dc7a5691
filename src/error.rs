use crate::canvas::LayerId;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AtelierError>;

/// Everything that can go wrong in the editor core.
///
/// Surface and stack violations are loud so tests can pin them down; the
/// interactive layer treats them as no-ops from stale UI events.
#[derive(Debug, Error)]
pub enum AtelierError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("layer {0} does not exist")]
    LayerNotFound(LayerId),

    #[error("a stack keeps at least one layer")]
    LastLayer,

    #[error("image codec error: {0}")]
    ResourceLoad(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gallery snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("remote polish failed: {0}")]
    Remote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_names_the_offending_pixel() {
        let err = AtelierError::OutOfBounds {
            x: 500,
            y: 0,
            width: 500,
            height: 700,
        };
        assert_eq!(
            err.to_string(),
            "pixel (500, 0) is outside the 500x700 surface"
        );
    }

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            AtelierError::Remote("declined".into())
                .to_string()
                .contains("remote polish failed")
        );
        assert!(AtelierError::LastLayer.to_string().contains("at least one"));
    }
}
