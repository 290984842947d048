use glam::Vec3;

/// Node layout of a rectangular surface split into `columns x rows` quads.
///
/// Nodes are numbered row by row from the top edge, left to right:
/// `index = row * (columns + 1) + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridTopology {
    pub columns: usize,
    pub rows: usize,
}

impl GridTopology {
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub const fn stride(&self) -> usize {
        self.columns + 1
    }

    pub const fn node_count(&self) -> usize {
        (self.columns + 1) * (self.rows + 1)
    }

    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col
    }

    /// `(row, col)` of a node index.
    pub const fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.stride(), index % self.stride())
    }

    /// Neighbour pairs for structural constraints: right neighbour, then the one below.
    pub fn structural_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::with_capacity(2 * self.columns * self.rows + self.columns + self.rows);
        for i in 0..self.node_count() {
            let (row, col) = self.coords(i);
            if col < self.columns {
                pairs.push((i, i + 1));
            }
            if row < self.rows {
                pairs.push((i, i + self.stride()));
            }
        }
        pairs
    }

    /// Indices of the pinned edge.
    pub fn top_row(&self) -> impl Iterator<Item = usize> {
        0..self.stride()
    }

    /// Vertices of a unit plane centred on the origin, top row first (+y up).
    pub fn unit_plane_positions(&self) -> Vec<Vec3> {
        let mut positions = Vec::with_capacity(self.node_count());
        for row in 0..=self.rows {
            let y = 0.5 - row as f32 / self.rows as f32;
            for col in 0..=self.columns {
                let x = col as f32 / self.columns as f32 - 0.5;
                positions.push(Vec3::new(x, y, 0.0));
            }
        }
        positions
    }

    /// Counter-clockwise triangle indices, two per quad.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.columns * self.rows * 6);
        for row in 0..self.rows {
            for col in 0..self.columns {
                let a = self.index(row, col) as u32;
                let b = self.index(row + 1, col) as u32;
                let c = self.index(row + 1, col + 1) as u32;
                let d = self.index(row, col + 1) as u32;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        indices
    }

    /// Texture coordinates, `v` growing downward.
    pub fn uvs(&self) -> Vec<[f32; 2]> {
        (0..self.node_count())
            .map(|i| {
                let (row, col) = self.coords(i);
                [col as f32 / self.columns as f32, row as f32 / self.rows as f32]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, 8, 81)]
    #[case(4, 2, 15)]
    #[case(1, 1, 4)]
    fn test_node_count(#[case] columns: usize, #[case] rows: usize, #[case] expected: usize) {
        let grid = GridTopology::new(columns, rows);
        assert_eq!(grid.node_count(), expected);
        assert_eq!(grid.unit_plane_positions().len(), expected);
        assert_eq!(grid.uvs().len(), expected);
    }

    #[test]
    fn test_index_coords_round_trip_on_non_square_grid() {
        let grid = GridTopology::new(5, 3);
        assert_eq!(grid.index(2, 4), 16);
        assert_eq!(grid.coords(16), (2, 4));
        assert_eq!(grid.coords(grid.node_count() - 1), (3, 5));
    }

    #[test]
    fn test_structural_pairs_for_8x8() {
        let grid = GridTopology::new(8, 8);
        let pairs = grid.structural_pairs();
        let right = pairs.iter().filter(|(a, b)| b - a == 1).count();
        let down = pairs.iter().filter(|(a, b)| b - a == grid.stride()).count();
        assert_eq!(right, 72);
        assert_eq!(down, 72);
        assert_eq!(pairs.len(), 144);
    }

    #[test]
    fn test_unit_plane_corners() {
        let grid = GridTopology::new(8, 8);
        let positions = grid.unit_plane_positions();
        assert_eq!(positions[0], Vec3::new(-0.5, 0.5, 0.0));
        assert_eq!(positions[8], Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(positions[80], Vec3::new(0.5, -0.5, 0.0));
    }

    #[test]
    fn test_triangle_indices_reference_every_node() {
        let grid = GridTopology::new(3, 2);
        let indices = grid.triangle_indices();
        assert_eq!(indices.len(), 3 * 2 * 6);
        for i in 0..grid.node_count() as u32 {
            assert!(indices.contains(&i));
        }
    }
}
