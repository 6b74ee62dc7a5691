// ============================================================================
// MIRROR PROJECTOR
// Vertical-centerline symmetry for strokes. Mirrored marks are standalone
// dots; they are never connected to the previously reflected position.
// ============================================================================

/// Reflects an x coordinate across the vertical centerline of a surface.
#[inline]
pub fn reflect(x: f32, surface_width: u32) -> f32 {
    surface_width as f32 - x
}

/// The reflected companion of a primary stamp position.
#[inline]
pub fn mirrored(pos: (f32, f32), surface_width: u32) -> (f32, f32) {
    (reflect(pos.0, surface_width), pos.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_across_the_centerline() {
        assert_eq!(reflect(100.0, 500), 400.0);
        assert_eq!(reflect(400.0, 500), 100.0);
        assert_eq!(mirrored((10.0, 42.0), 500), (490.0, 42.0));
    }

    #[test]
    fn centerline_reflects_onto_itself() {
        assert_eq!(reflect(250.0, 500), 250.0);
    }

    #[test]
    fn edge_reflects_past_the_far_column() {
        // x = 0 lands at the full width, one past the last pixel column.
        assert_eq!(reflect(0.0, 500), 500.0);
    }
}
