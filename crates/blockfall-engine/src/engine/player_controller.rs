use crate::core::{Board, Offset, Player, Position, RotationDirection, check_collision};

use super::piece_generator::PieceGenerator;

/// Owns the active piece and the generator that supplies the next one.
///
/// Moves are not validated here: callers probe with
/// [`check_collision`] first and only then call [`Self::update_position`].
/// Rotation is the exception because it has to search for a free spot.
#[derive(Debug, Clone)]
pub struct PlayerController {
    player: Player,
    generator: PieceGenerator,
    spawn_position: Position,
}

impl PlayerController {
    /// Creates a controller whose pieces spawn horizontally centered on a
    /// board `board_width` cells wide.
    #[must_use]
    pub fn new(mut generator: PieceGenerator, board_width: usize) -> Self {
        let spawn_position = spawn_position(board_width);
        let player = Player::new(generator.next_piece(), spawn_position);
        Self {
            player,
            generator,
            spawn_position,
        }
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn spawn_position(&self) -> Position {
        self.spawn_position
    }

    /// Replaces the active piece with a fresh one at the spawn position.
    ///
    /// Whether the new piece already overlaps the stack is for the caller to
    /// check; such a spawn ends the game.
    pub fn reset(&mut self) {
        self.player = Player::new(self.generator.next_piece(), self.spawn_position);
    }

    /// Moves the piece by `(dx, dy)` and sets the collided flag.
    pub fn update_position(&mut self, offset: Offset, collided: bool) {
        self.player.position = self.player.position.offset(offset);
        self.player.collided = collided;
    }

    /// Rotates the piece a quarter turn, nudging it sideways if needed.
    ///
    /// The rotated piece is tried in place first, then at the horizontal
    /// offsets +1, -1, +2, ... relative to the current column, for as long as
    /// the shape width allows. If no spot is free the piece keeps its previous
    /// orientation and position.
    ///
    /// Returns whether the rotation was applied.
    pub fn rotate(&mut self, board: &Board, direction: RotationDirection) -> bool {
        let mut candidate = Player {
            piece: self.player.piece.rotated(direction),
            ..self.player.clone()
        };

        let fits = kick_offsets(candidate.piece.shape().size())
            .find(|dx| !check_collision(&candidate, board, Offset::horizontal(*dx)));
        let Some(dx) = fits else {
            return false;
        };

        candidate.position = candidate.position.offset(Offset::horizontal(dx));
        self.player = candidate;
        true
    }
}

/// Spawn column: the 4-wide spawn box centered on the board.
fn spawn_position(board_width: usize) -> Position {
    let x = i32::try_from(board_width / 2).unwrap_or(i32::MAX) - 2;
    Position::new(x, 0)
}

/// Column offsets tried for a rotated shape `shape_width` cells wide.
///
/// The piece walks from its column in steps of +1, -2, +3, -4, ..., visiting
/// 0, +1, -1, +2, -2, .... The walk ends before the position whose next step
/// to the right would exceed the shape width, so 3- and 4-wide shapes try
/// 0, +1, -1, +2 and the 2-wide O tries 0, +1.
fn kick_offsets(shape_width: usize) -> impl Iterator<Item = i32> {
    let width = i32::try_from(shape_width).unwrap_or(i32::MAX);
    let nudges = (1..)
        .take_while(move |&n: &i32| n % 2 == 1 || n < width)
        .map(|n| if n % 2 == 1 { (n + 1) / 2 } else { -(n / 2) });
    std::iter::once(0).chain(nudges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Cell, Piece, PieceKind},
        engine::piece_generator::{GeneratorPolicy, PieceSeed},
    };

    const WIDTH: usize = 12;
    const HEIGHT: usize = 20;

    fn controller() -> PlayerController {
        let generator =
            PieceGenerator::with_seed(GeneratorPolicy::Uniform, PieceSeed::from_u128(1));
        PlayerController::new(generator, WIDTH)
    }

    fn controller_with(kind: PieceKind, position: Position) -> PlayerController {
        let mut controller = controller();
        controller.player = Player::new(Piece::new(kind), position);
        controller
    }

    #[test]
    fn test_spawn_is_centered_at_top() {
        let controller = controller();
        assert_eq!(controller.player().position, Position::new(4, 0));
        assert!(!controller.player().collided);
        assert_eq!(spawn_position(10), Position::new(3, 0));
    }

    #[test]
    fn test_kick_offsets_alternate() {
        assert_eq!(kick_offsets(4).collect::<Vec<_>>(), [0, 1, -1, 2]);
        assert_eq!(kick_offsets(3).collect::<Vec<_>>(), [0, 1, -1, 2]);
        assert_eq!(kick_offsets(2).collect::<Vec<_>>(), [0, 1]);
        assert_eq!(kick_offsets(5).collect::<Vec<_>>(), [0, 1, -1, 2, -2, 3]);
    }

    #[test]
    fn test_update_position_is_unchecked() {
        let mut controller = controller();
        controller.update_position(Offset::new(-10, 3), true);
        assert_eq!(controller.player().position, Position::new(-6, 3));
        assert!(controller.player().collided);
    }

    #[test]
    fn test_reset_clears_collided_and_respawns() {
        let mut controller = controller();
        controller.update_position(Offset::new(2, 7), true);
        controller.reset();
        assert_eq!(controller.player().position, Position::new(4, 0));
        assert!(!controller.player().collided);
        assert_eq!(
            controller.player().piece.shape(),
            &controller.player().piece.kind().shape()
        );
    }

    #[test]
    fn test_rotate_in_open_space() {
        let board = Board::new(WIDTH, HEIGHT);
        let mut controller = controller_with(PieceKind::T, Position::new(4, 5));

        assert!(controller.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(controller.player().position, Position::new(4, 5));
        assert_eq!(
            controller.player().piece.shape(),
            &PieceKind::T.shape().rotated(RotationDirection::Clockwise)
        );
    }

    #[test]
    fn test_rotate_twice_matches_half_turn() {
        let board = Board::new(WIDTH, HEIGHT);
        let mut controller = controller_with(PieceKind::L, Position::new(4, 5));
        let before = controller.player().piece.shape().clone();

        assert!(controller.rotate(&board, RotationDirection::Clockwise));
        assert!(controller.rotate(&board, RotationDirection::Clockwise));

        let half_turn = before
            .rotated(RotationDirection::CounterClockwise)
            .rotated(RotationDirection::CounterClockwise);
        assert_eq!(controller.player().piece.shape(), &half_turn);
    }

    #[test]
    fn test_rotate_against_wall_kicks_inward() {
        let board = Board::new(WIDTH, HEIGHT);
        // Vertical I in column 1 of its box; the box hangs one column off the left edge.
        let mut controller = controller_with(PieceKind::I, Position::new(-1, 5));
        assert!(!check_collision(controller.player(), &board, Offset::NONE));

        assert!(controller.rotate(&board, RotationDirection::Clockwise));
        // Horizontal I needs the whole box inside: one nudge to the right.
        assert_eq!(controller.player().position, Position::new(0, 5));
        assert!(!check_collision(controller.player(), &board, Offset::NONE));
    }

    #[test]
    fn test_rotate_against_right_wall_needs_two_left_nudges() {
        let board = Board::new(WIDTH, HEIGHT);
        // Vertical I in the last column; lying flat it would need x = 8, two to the left.
        let mut controller = controller_with(PieceKind::I, Position::new(10, 5));
        let before = controller.player().clone();
        assert!(!check_collision(&before, &board, Offset::NONE));

        assert!(!controller.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(controller.player(), &before);
    }

    #[test]
    fn test_rotate_reverts_when_boxed_in() {
        let mut board = Board::new(4, 6);
        // Leave only column 1 open so a vertical I fits but a horizontal one never does.
        for y in 0..6 {
            for x in [0, 2, 3] {
                board.set_cell(x, y, Cell::merged(PieceKind::O));
            }
        }
        let mut controller = controller_with(PieceKind::I, Position::new(0, 1));
        let before = controller.player().clone();
        assert!(!check_collision(&before, &board, Offset::NONE));

        assert!(!controller.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(controller.player(), &before);
    }
}
