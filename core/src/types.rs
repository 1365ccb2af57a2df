use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Row-major position of a cell on the board: `row * columns + column`.
pub type CellIndex = usize;

/// `ndarray` index of a cell, or the `ndarray` shape of a board size.
pub const fn nd_index((row, column): Coord2) -> [usize; 2] {
    [row as usize, column as usize]
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Converts `(row, column)` into a row-major index for a board `columns` wide.
pub const fn to_index((row, column): Coord2, columns: Coord) -> CellIndex {
    row as CellIndex * columns as CellIndex + column as CellIndex
}

/// Converts a row-major index into `(row, column)` for a board `columns` wide.
///
/// The index must already be in bounds.
pub const fn to_coords(index: CellIndex, columns: Coord) -> Coord2 {
    let columns = columns as CellIndex;
    ((index / columns) as Coord, (index % columns) as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, columns) = self.dim();
        let size = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(columns).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, size)
    }
}

/// Walks the 3x3 block around `center`, clipped to the board, in row-major order and skipping `center`.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    first_column: Coord,
    last: Coord2,
    next: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, (rows, columns): Coord2) -> Self {
        let (row, column) = center;
        let inside = row < rows && column < columns;
        Self {
            center,
            first_column: column.saturating_sub(1),
            last: (
                row.saturating_add(1).min(rows.saturating_sub(1)),
                column.saturating_add(1).min(columns.saturating_sub(1)),
            ),
            next: inside.then(|| (row.saturating_sub(1), column.saturating_sub(1))),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current @ (row, column) = self.next?;
            let (last_row, last_column) = self.last;
            self.next = if column < last_column {
                Some((row, column + 1))
            } else if row < last_row {
                Some((row + 1, self.first_column))
            } else {
                None
            };
            if current != self.center {
                return Some(current);
            }
        }
    }
}
