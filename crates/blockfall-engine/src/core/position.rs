use serde::{Deserialize, Serialize};

/// Top-left corner of a piece's bounding box in board coordinates.
///
/// Coordinates are signed: while probing a move the box may sit partly outside
/// the board, which the collision check then rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }

    /// Board coordinates of the shape cell `(dx, dy)` when the box is placed here.
    #[must_use]
    pub fn cell(self, dx: usize, dy: usize) -> (i32, i32) {
        // Shape offsets are bounded by `MAX_SHAPE_SIZE`.
        let dx = i32::try_from(dx).unwrap_or(i32::MAX);
        let dy = i32::try_from(dy).unwrap_or(i32::MAX);
        (self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Relative displacement applied to a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const NONE: Self = Self::new(0, 0);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, 1);

    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub const fn horizontal(dx: i32) -> Self {
        Self::new(dx, 0)
    }
}
