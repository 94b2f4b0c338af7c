use crate::core::{Board, CellState, Player};

/// The board as displayed: merged cells plus the active piece.
///
/// The stage is recomputed after every change to the player. Cells drawn by the
/// previous frame's piece are wiped and the piece is drawn again at its current
/// position. Once the player is flagged as collided the piece is written in
/// merged state instead and complete rows are swept.
#[derive(Debug, Clone)]
pub struct Stage {
    board: Board,
}

impl Stage {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            board: Board::new(width, height),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Recomputes the stage for `player` and returns the number of rows cleared.
    ///
    /// Rows are only cleared when the player has collided; otherwise the result
    /// is always 0.
    pub fn update(&mut self, player: &Player) -> usize {
        self.board.reset_clear_cells();
        let state = if player.collided {
            CellState::Merged
        } else {
            CellState::Clear
        };
        self.board
            .fill_shape(player.piece.shape(), player.position, state);

        if player.collided {
            self.board.clear_filled_rows()
        } else {
            0
        }
    }
}
