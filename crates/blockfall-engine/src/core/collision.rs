use super::{board::Board, player::Player, position::Offset};

/// Returns true if moving `player` by `offset` would leave the board or land on
/// a merged cell.
///
/// The check is pure: the player is never moved. Cells drawn by the player's own
/// piece are in clear state on the stage and therefore never block it.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Offset, Piece, PieceKind, Player, Position, check_collision};
///
/// let board = Board::new(12, 20);
/// let player = Player::new(Piece::new(PieceKind::O), Position::new(0, 0));
///
/// assert!(!check_collision(&player, &board, Offset::RIGHT));
/// assert!(check_collision(&player, &board, Offset::LEFT));
/// ```
#[must_use]
pub fn check_collision(player: &Player, board: &Board, offset: Offset) -> bool {
    board.is_colliding(player.piece.shape(), player.position.offset(offset))
}
