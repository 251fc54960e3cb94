use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Whole seconds, used for elapsed game time and recorded scores.
pub type Seconds = u32;

/// Grid index of `coords` in an `Array2` laid out by rows.
pub fn nd_index((row, column): Coord2) -> [usize; 2] {
    [row.into(), column.into()]
}

/// Dimensions of a board grid. Grids are built from `Coord2` sizes, so the axes always fit.
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, columns) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        columns.try_into().unwrap_or(Coord::MAX),
    )
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The up-to-8 cells touching `center` on a board of `size`, row by row.
pub fn neighbors(center: Coord2, size: Coord2) -> impl Iterator<Item = Coord2> {
    let (row, column) = center;
    OFFSETS.into_iter().filter_map(move |(d_row, d_column)| {
        let row = row.checked_add_signed(d_row).filter(|&r| r < size.0)?;
        let column = column.checked_add_signed(d_column).filter(|&c| c < size.1)?;
        Some((row, column))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let found: Vec<_> = neighbors((0, 0), (3, 3)).collect();
        assert_eq!(found, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(neighbors((1, 1), (3, 3)).count(), 8);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn edge_of_wide_board() {
        let found: Vec<_> = neighbors((0, 29), (16, 30)).collect();
        assert_eq!(found, [(0, 28), (1, 28), (1, 29)]);
    }

    #[test]
    fn grid_size_matches_shape() {
        let grid: Array2<bool> = Array2::default(nd_index((4, 7)));
        assert_eq!(grid_size(&grid), (4, 7));
    }
}
