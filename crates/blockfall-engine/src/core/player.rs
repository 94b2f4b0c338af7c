use super::{piece::Piece, position::Position};

/// The active piece together with where it is and whether it has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub position: Position,
    pub piece: Piece,
    /// Set when a downward move was rejected; the stage merges the piece next.
    pub collided: bool,
}

impl Player {
    #[must_use]
    pub fn new(piece: Piece, position: Position) -> Self {
        Self {
            position,
            piece,
            collided: false,
        }
    }
}
