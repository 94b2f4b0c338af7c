use serde::{Deserialize, Serialize};

use super::{
    drop_scheduler::DropSpeed,
    game_status::ScoreTable,
    piece_generator::{GeneratorPolicy, PieceGenerator, PieceSeed},
};

/// Tunable rules of a game.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GeneratorPolicy};
///
/// let config: GameConfig = serde_json::from_str(r#"{ "generator": "seven-bag" }"#).unwrap();
/// assert_eq!(config.generator, GeneratorPolicy::SevenBag);
/// assert_eq!((config.width, config.height), (12, 20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub score_table: ScoreTable,
    /// Rows per level; the level rises once more than `(level + 1) * lines_per_level`
    /// rows have been cleared.
    pub lines_per_level: u32,
    pub drop_speed: DropSpeed,
    pub generator: GeneratorPolicy,
    /// Fixed piece sequence; `None` seeds from the thread-local RNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 20,
            score_table: ScoreTable::default(),
            lines_per_level: 10,
            drop_speed: DropSpeed::default(),
            generator: GeneratorPolicy::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Builds the piece generator for a new game.
    #[must_use]
    pub fn piece_generator(&self) -> PieceGenerator {
        match self.seed {
            Some(seed) => PieceGenerator::with_seed(self.generator, seed),
            None => PieceGenerator::new(self.generator),
        }
    }
}
