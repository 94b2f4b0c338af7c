pub use self::{board::*, collision::*, piece::*, player::*, position::*};

pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod piece;
pub(crate) mod player;
pub(crate) mod position;
