use std::iter;

use super::{
    piece::{PieceKind, Shape},
    position::Position,
};

/// What occupies a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Block of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// Whether a cell belongs to the active piece or has been folded into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum CellState {
    /// Empty, or drawn by the active piece for the current frame only.
    #[default]
    Clear,
    /// Part of a settled piece.
    Merged,
}

/// A single board cell: its block and its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub block: Block,
    pub state: CellState,
}

impl Cell {
    pub const EMPTY: Self = Self::new(Block::Empty, CellState::Clear);

    #[must_use]
    pub const fn new(block: Block, state: CellState) -> Self {
        Self { block, state }
    }

    #[must_use]
    pub const fn merged(kind: PieceKind) -> Self {
        Self::new(Block::Piece(kind), CellState::Merged)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.block.is_empty()
    }

    #[must_use]
    pub fn is_merged(self) -> bool {
        self.state.is_merged()
    }
}

/// A single row of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    cells: Vec<Cell>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Cell::EMPTY; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A row is complete when none of its cells is empty.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }
}

/// The playing grid.
///
/// Rows are stored top to bottom; `y` grows downward. Width and height never
/// change after construction: clearing rows inserts the same number of empty
/// rows at the top.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let board = Board::new(12, 20);
/// assert_eq!(board.width(), 12);
/// assert_eq!(board.height(), 20);
/// assert!(board.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates a board of the given dimensions filled with empty cells.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![BoardRow::empty(width); height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(|cell| cell.is_empty()))
    }

    /// Returns the cell at signed board coordinates, or `None` when out of bounds.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied()
    }

    fn cell_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get_mut(y)?.cells.get_mut(x)
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the board.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y].cells[x] = cell;
    }

    /// Returns true if `shape` placed with its top-left corner at `position`
    /// leaves the board or overlaps a merged cell.
    ///
    /// Cells in [`CellState::Clear`] never collide: they are either empty or
    /// drawn by the moving piece itself.
    #[must_use]
    pub fn is_colliding(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied_cells().into_iter().any(|(dx, dy)| {
            let (x, y) = position.cell(dx, dy);
            self.cell_at(x, y).is_none_or(Cell::is_merged)
        })
    }

    /// Resets every non-merged cell to empty.
    pub fn reset_clear_cells(&mut self) {
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            if !cell.is_merged() {
                *cell = Cell::EMPTY;
            }
        }
    }

    /// Draws `shape` at `position` with the given state.
    ///
    /// Out-of-bounds blocks are skipped and merged cells are never overwritten.
    pub fn fill_shape(&mut self, shape: &Shape, position: Position, state: CellState) {
        for (dx, dy) in shape.occupied_cells() {
            let (x, y) = position.cell(dx, dy);
            let Some(block) = shape.block(dx, dy) else {
                continue;
            };
            if let Some(cell) = self.cell_at_mut(x, y)
                && !cell.is_merged()
            {
                *cell = Cell::new(block, state);
            }
        }
    }

    /// Removes complete rows and returns how many were removed.
    ///
    /// The remaining rows keep their relative order and the same number of
    /// empty rows is inserted at the top.
    pub fn clear_filled_rows(&mut self) -> usize {
        let height = self.rows.len();
        self.rows.retain(|row| !row.is_filled());
        let cleared = height - self.rows.len();
        if cleared > 0 {
            let kept = std::mem::take(&mut self.rows);
            self.rows = iter::repeat_n(BoardRow::empty(self.width), cleared)
                .chain(kept)
                .collect();
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, kind: PieceKind) {
        for x in 0..board.width() {
            board.set_cell(x, y, Cell::merged(kind));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        for (width, height) in [(12, 20), (10, 22), (4, 4), (1, 1)] {
            let board = Board::new(width, height);
            assert_eq!(board.width(), width);
            assert_eq!(board.height(), height);
            assert!(board.is_empty());
            for row in board.rows() {
                assert_eq!(row.cells().len(), width);
                assert!(row.cells().iter().all(|cell| *cell == Cell::EMPTY));
            }
        }
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let board = Board::new(12, 20);
        assert_eq!(board.cell_at(0, 0), Some(Cell::EMPTY));
        assert_eq!(board.cell_at(11, 19), Some(Cell::EMPTY));
        assert_eq!(board.cell_at(-1, 0), None);
        assert_eq!(board.cell_at(0, -1), None);
        assert_eq!(board.cell_at(12, 0), None);
        assert_eq!(board.cell_at(0, 20), None);
    }

    #[test]
    fn test_row_is_filled() {
        let mut board = Board::new(4, 2);
        assert!(!board.rows[1].is_filled());
        for x in 0..3 {
            board.set_cell(x, 1, Cell::merged(PieceKind::I));
        }
        assert!(!board.rows[1].is_filled());
        board.set_cell(3, 1, Cell::merged(PieceKind::I));
        assert!(board.rows[1].is_filled());
    }

    #[test]
    fn test_clear_filled_rows_none() {
        let mut board = Board::new(4, 4);
        board.set_cell(0, 3, Cell::merged(PieceKind::T));
        let before = board.clone();

        assert_eq!(board.clear_filled_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_filled_rows_shifts_down_preserving_order() {
        let mut board = Board::new(4, 6);
        board.set_cell(0, 1, Cell::merged(PieceKind::S));
        fill_row(&mut board, 2, PieceKind::I);
        board.set_cell(1, 3, Cell::merged(PieceKind::Z));
        fill_row(&mut board, 4, PieceKind::O);
        board.set_cell(2, 5, Cell::merged(PieceKind::L));

        assert_eq!(board.clear_filled_rows(), 2);
        assert_eq!(board.height(), 6);

        // Two fresh rows on top, then the survivors in their original order.
        assert!(board.rows[0].cells().iter().all(|c| c.is_empty()));
        assert!(board.rows[1].cells().iter().all(|c| c.is_empty()));
        assert!(board.rows[2].cells().iter().all(|c| c.is_empty()));
        assert_eq!(board.cell_at(0, 3), Some(Cell::merged(PieceKind::S)));
        assert_eq!(board.cell_at(1, 4), Some(Cell::merged(PieceKind::Z)));
        assert_eq!(board.cell_at(2, 5), Some(Cell::merged(PieceKind::L)));
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::new(3, 5);
        for y in 0..5 {
            fill_row(&mut board, y, PieceKind::J);
        }
        assert_eq!(board.clear_filled_rows(), 5);
        assert_eq!(board.height(), 5);
        assert!(board.is_empty());
    }

    #[test]
    fn test_reset_clear_cells_keeps_merged() {
        let mut board = Board::new(4, 4);
        board.set_cell(0, 3, Cell::merged(PieceKind::T));
        board.set_cell(1, 1, Cell::new(Block::Piece(PieceKind::I), CellState::Clear));

        board.reset_clear_cells();
        assert_eq!(board.cell_at(0, 3), Some(Cell::merged(PieceKind::T)));
        assert_eq!(board.cell_at(1, 1), Some(Cell::EMPTY));
    }

    #[test]
    fn test_fill_shape_does_not_overwrite_merged() {
        let mut board = Board::new(4, 4);
        board.set_cell(1, 1, Cell::merged(PieceKind::Z));

        board.fill_shape(
            &PieceKind::O.shape(),
            Position::new(0, 0),
            CellState::Clear,
        );
        let active = Cell::new(Block::Piece(PieceKind::O), CellState::Clear);
        assert_eq!(board.cell_at(0, 0), Some(active));
        assert_eq!(board.cell_at(1, 0), Some(active));
        assert_eq!(board.cell_at(0, 1), Some(active));
        assert_eq!(board.cell_at(1, 1), Some(Cell::merged(PieceKind::Z)));
    }
}
