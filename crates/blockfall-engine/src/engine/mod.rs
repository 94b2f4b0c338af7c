//! Game rules and session state.
//!
//! This module builds the rules of play on top of the core data structures:
//!
//! - [`PieceGenerator`] - Random piece sequence, uniform or 7-bag
//! - [`PlayerController`] - The active piece: spawning, moving and rotating with wall kicks
//! - [`Stage`] - The displayed board, merging settled pieces and clearing rows
//! - [`GameStatus`] - Score, cleared rows and level
//! - [`DropScheduler`] - Elapsed-time driven automatic drops
//! - [`GameSession`] - Game lifecycle, input commands and saved scores
//! - [`SavedScores`] - Finished-game results kept in a [`KeyValueStore`]
//! - [`GameConfig`] - Tunable rules
//!
//! # Game Flow
//!
//! 1. [`GameSession::start_game`] resets the board and spawns the first piece
//! 2. Commands move and rotate the piece; the timer or a soft drop pulls it down
//! 3. A piece that cannot move down is merged and complete rows are cleared
//! 4. The next piece spawns; if it does not fit, the game ends and its score
//!    is saved

pub use self::{
    config::*, drop_scheduler::*, game_session::*, game_status::*, piece_generator::*,
    player_controller::*, saved_scores::*, stage::*,
};

mod config;
mod drop_scheduler;
mod game_session;
mod game_status;
mod piece_generator;
mod player_controller;
mod saved_scores;
mod stage;
