use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::board::Block;

/// Largest side length of a shape matrix (the I-piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Cell offsets `(x, y)` occupied by a shape, relative to its top-left corner.
pub type OccupiedCells = ArrayVec<(usize, usize), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in declaration order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Display color of the piece as an RGB triple.
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (80, 227, 230),
            PieceKind::J => (36, 95, 223),
            PieceKind::L => (223, 173, 36),
            PieceKind::O => (223, 217, 36),
            PieceKind::S => (48, 211, 56),
            PieceKind::T => (132, 61, 198),
            PieceKind::Z => (227, 78, 78),
        }
    }

    /// Returns the spawn-orientation shape of this piece kind.
    #[must_use]
    pub fn shape(self) -> Shape {
        let c = Block::Piece(self);
        let e = Block::Empty;
        let rows = match self {
            PieceKind::I => vec![vec![e, c, e, e]; 4],
            PieceKind::J => vec![vec![e, c, e], vec![e, c, e], vec![c, c, e]],
            PieceKind::L => vec![vec![e, c, e], vec![e, c, e], vec![e, c, c]],
            PieceKind::O => vec![vec![c, c], vec![c, c]],
            PieceKind::S => vec![vec![e, c, c], vec![c, c, e], vec![e, e, e]],
            PieceKind::T => vec![vec![e, e, e], vec![c, c, c], vec![e, c, e]],
            PieceKind::Z => vec![vec![c, c, e], vec![e, c, c], vec![e, e, e]],
        };
        Shape { rows }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Square matrix of blocks describing a piece in one orientation.
///
/// Rotation never mutates a shape in place; [`Shape::rotated`] builds a new
/// matrix, so a shape can be compared against an earlier orientation by value.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, RotationDirection};
///
/// let shape = PieceKind::T.shape();
/// let half_turn = shape
///     .rotated(RotationDirection::Clockwise)
///     .rotated(RotationDirection::Clockwise);
/// let back = half_turn
///     .rotated(RotationDirection::CounterClockwise)
///     .rotated(RotationDirection::CounterClockwise);
/// assert_eq!(back, shape);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<Block>>,
}

impl Shape {
    /// Builds a shape from its rows.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square or is larger than [`MAX_SHAPE_SIZE`].
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Block>>) -> Self {
        let size = rows.len();
        assert!(size <= MAX_SHAPE_SIZE, "shape too large: {size}");
        assert!(
            rows.iter().all(|row| row.len() == size),
            "shape must be a square matrix"
        );
        Self { rows }
    }

    /// Side length of the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn block(&self, x: usize, y: usize) -> Option<Block> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Offsets `(x, y)` of every non-empty block.
    #[must_use]
    pub fn occupied_cells(&self) -> OccupiedCells {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, block)| !block.is_empty())
                    .map(move |(x, _)| (x, y))
            })
            .collect()
    }

    /// Returns the shape turned 90° in `direction`.
    ///
    /// The matrix is transposed, then each row is reversed for a clockwise turn
    /// or the row order is reversed for a counter-clockwise turn.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let size = self.size();
        let mut rows: Vec<Vec<Block>> = (0..size)
            .map(|x| self.rows.iter().map(|row| row[x]).collect())
            .collect();
        match direction {
            RotationDirection::Clockwise => rows.iter_mut().for_each(|row| row.reverse()),
            RotationDirection::CounterClockwise => rows.reverse(),
        }
        Self { rows }
    }
}

/// A tetromino: its kind and its current orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        self.kind.color()
    }

    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated(direction),
        }
    }
}
