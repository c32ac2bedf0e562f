//! World-space extent of the rendered grid.

use crate::automaton::Dimensions;

/// Axis-aligned box covering every rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// `(w, h, d) * cell_size + (w - 1, h - 1, d - 1) * spacing`
    pub size: [f32; 3],
    /// Half of `size`.
    pub center: [f32; 3],
}

impl Bounds {
    pub fn new(dims: &Dimensions, cell_size: f32, spacing: f32) -> Self {
        let axes = [dims.width(), dims.height(), dims.depth()];
        let size = axes.map(|n| n as f32 * cell_size + (n - 1) as f32 * spacing);
        Bounds {
            size,
            center: size.map(|s| s / 2.0),
        }
    }
}
