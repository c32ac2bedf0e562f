//! Grid dimensions, index mapping and neighbor counting.

use crate::error::ConfigError;

/// Immutable `(width, height, depth)` of a voxel grid.
///
/// Cells are stored x-fastest: `index = x + y * width + z * width * height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: usize,
    height: usize,
    depth: usize,
}

impl Dimensions {
    /// Validate and build grid dimensions. Every axis must be at least 1 and
    /// the total cell count must be addressable.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(ConfigError::ZeroDimension {
                width,
                height,
                depth,
            });
        }
        width
            .checked_mul(height)
            .and_then(|plane| plane.checked_mul(depth))
            .ok_or(ConfigError::CellCountOverflow {
                width,
                height,
                depth,
            })?;
        Ok(Dimensions {
            width,
            height,
            depth,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of cells, `width * height * depth`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Calculate the linear index for a 3D coordinate.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.height * self.width + y * self.width + x
    }

    /// Inverse of [`Dimensions::index_of`].
    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize, usize) {
        let plane = self.width * self.height;
        let z = index / plane;
        let remainder = index % plane;
        (remainder % self.width, remainder / self.width, z)
    }

    /// Check if signed coordinates are within grid bounds.
    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && (x as usize) < self.width
            && y >= 0
            && (y as usize) < self.height
            && z >= 0
            && (z as usize) < self.depth
    }

    /// Number of in-bounds Moore neighbors of a cell. Interior cells have 26.
    pub fn neighbor_slots(&self, x: usize, y: usize, z: usize) -> usize {
        let span = |c: usize, dim: usize| 1 + usize::from(c > 0) + usize::from(c + 1 < dim);
        span(x, self.width) * span(y, self.height) * span(z, self.depth) - 1
    }
}

/// Count alive neighbors of `(x, y, z)` in `cells` using the Moore
/// neighborhood (26 neighbors). Any non-zero cell counts as alive. Grid
/// edges are hard: out-of-range neighbors contribute nothing and nothing
/// wraps around.
pub fn count_neighbors(dims: &Dimensions, cells: &[u8], x: usize, y: usize, z: usize) -> u8 {
    let mut count = 0;

    for dz in -1isize..=1 {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                // Skip the center cell
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }

                let nx = x as isize + dx;
                let ny = y as isize + dy;
                let nz = z as isize + dz;

                if dims.in_bounds(nx, ny, nz) {
                    let idx = dims.index_of(nx as usize, ny as usize, nz as usize);
                    count += u8::from(cells[idx] != 0);
                }
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_reject_zero_axis() {
        assert_eq!(
            Dimensions::new(4, 0, 4),
            Err(ConfigError::ZeroDimension {
                width: 4,
                height: 0,
                depth: 4
            })
        );
        assert!(Dimensions::new(1, 1, 1).is_ok());
    }

    #[test]
    fn test_dimensions_reject_overflow() {
        assert!(matches!(
            Dimensions::new(usize::MAX, 2, 1),
            Err(ConfigError::CellCountOverflow { .. })
        ));
    }

    #[test]
    fn test_index_of() {
        let dims = Dimensions::new(4, 4, 4).unwrap();

        // First cell
        assert_eq!(dims.index_of(0, 0, 0), 0);
        // Last cell
        assert_eq!(dims.index_of(3, 3, 3), 63);
        // Various cells
        assert_eq!(dims.index_of(1, 0, 0), 1);
        assert_eq!(dims.index_of(0, 1, 0), 4);
        assert_eq!(dims.index_of(0, 0, 1), 16);
    }

    #[test]
    fn test_coords_round_trip_on_uneven_grid() {
        let dims = Dimensions::new(5, 3, 2).unwrap();
        for index in 0..dims.cell_count() {
            let (x, y, z) = dims.coords_of(index);
            assert!(x < 5 && y < 3 && z < 2);
            assert_eq!(dims.index_of(x, y, z), index);
        }
        assert_eq!(dims.coords_of(16), (1, 0, 1));
    }

    #[test]
    fn test_in_bounds() {
        let dims = Dimensions::new(4, 4, 4).unwrap();

        // Valid bounds
        assert!(dims.in_bounds(0, 0, 0));
        assert!(dims.in_bounds(3, 3, 3));
        assert!(dims.in_bounds(2, 2, 2));

        // Out of bounds
        assert!(!dims.in_bounds(-1, 0, 0));
        assert!(!dims.in_bounds(4, 0, 0));
        assert!(!dims.in_bounds(0, -1, 0));
        assert!(!dims.in_bounds(0, 4, 0));
        assert!(!dims.in_bounds(0, 0, -1));
        assert!(!dims.in_bounds(0, 0, 4));
    }

    #[test]
    fn test_count_neighbors() {
        let dims = Dimensions::new(8, 8, 8).unwrap();
        let mut cells = vec![0u8; dims.cell_count()];

        // Cross pattern: center + 4 neighbors
        for (x, y, z) in [(4, 4, 4), (3, 4, 4), (5, 4, 4), (4, 3, 4), (4, 5, 4)] {
            cells[dims.index_of(x, y, z)] = 1;
        }

        // Center should have 4 neighbors (left, right, front, back)
        assert_eq!(count_neighbors(&dims, &cells, 4, 4, 4), 4);

        // Each arm sees the center and the two arms beside it
        assert_eq!(count_neighbors(&dims, &cells, 3, 4, 4), 3);
        assert_eq!(count_neighbors(&dims, &cells, 5, 4, 4), 3);
        assert_eq!(count_neighbors(&dims, &cells, 4, 3, 4), 3);
        assert_eq!(count_neighbors(&dims, &cells, 4, 5, 4), 3);

        // Far cell should have 0 neighbors
        assert_eq!(count_neighbors(&dims, &cells, 0, 0, 0), 0);
    }

    #[test]
    fn test_corner_sees_only_clipped_neighbors() {
        for (w, h, d) in [(1, 1, 1), (2, 1, 1), (3, 3, 1), (2, 2, 2), (5, 4, 3)] {
            let dims = Dimensions::new(w, h, d).unwrap();
            let cells = vec![1u8; dims.cell_count()];
            let expected = w.min(2) * h.min(2) * d.min(2) - 1;

            assert_eq!(count_neighbors(&dims, &cells, 0, 0, 0) as usize, expected);
            assert_eq!(dims.neighbor_slots(0, 0, 0), expected);
        }
    }

    #[test]
    fn test_no_wraparound_at_far_edge() {
        let dims = Dimensions::new(4, 4, 4).unwrap();
        let mut cells = vec![0u8; dims.cell_count()];
        cells[dims.index_of(0, 0, 0)] = 1;

        // A toroidal grid would see (0,0,0) from the opposite corner.
        assert_eq!(count_neighbors(&dims, &cells, 3, 3, 3), 0);
        assert_eq!(count_neighbors(&dims, &cells, 3, 0, 0), 0);
        assert_eq!(count_neighbors(&dims, &cells, 1, 1, 1), 1);
    }
}
