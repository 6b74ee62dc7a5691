use std::collections::VecDeque;

use crate::error::Result;
use crate::surface::PixelSurface;

// ============================================================================
// FLOOD FILL
// 4-connected BFS over a single surface. Matching compares RGB only;
// written pixels are always fully opaque.
// ============================================================================

#[inline(always)]
fn rgb_eq(pixel: [u8; 4], rgb: [u8; 3]) -> bool {
    pixel[0] == rgb[0] && pixel[1] == rgb[1] && pixel[2] == rgb[2]
}

/// Fills the 4-connected region around `seed` whose RGB matches the seed
/// pixel, writing `fill_color` at full opacity. Returns how many pixels were
/// written. Seeding on a pixel that already carries the fill RGB returns
/// immediately without touching anything, alpha included.
pub fn flood_fill(
    surface: &mut PixelSurface,
    seed: (u32, u32),
    fill_color: [u8; 3],
) -> Result<usize> {
    let (width, height) = (surface.width(), surface.height());
    let (seed_x, seed_y) = seed;
    let seed_pixel = surface.read_pixel(seed_x, seed_y)?;

    if rgb_eq(seed_pixel, fill_color) {
        return Ok(0);
    }

    let target = [seed_pixel[0], seed_pixel[1], seed_pixel[2]];
    let fill = [fill_color[0], fill_color[1], fill_color[2], 255];

    let mut visited = vec![false; (width as usize) * (height as usize)];
    let mut queue = VecDeque::new();
    visited[(seed_y * width + seed_x) as usize] = true;
    queue.push_back((seed_x, seed_y));

    let mut filled = 0usize;
    while let Some((x, y)) = queue.pop_front() {
        surface.write_pixel(x, y, fill)?;
        filled += 1;

        let neighbors = [
            (x.saturating_sub(1), y),
            (x + 1, y),
            (x, y.saturating_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= width || ny >= height {
                continue;
            }
            let index = (ny * width + nx) as usize;
            if visited[index] {
                continue;
            }
            visited[index] = true;
            if let Ok(pixel) = surface.read_pixel(nx, ny) {
                if rgb_eq(pixel, target) {
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    Ok(filled)
}
