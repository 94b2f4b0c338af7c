use serde::{Deserialize, Serialize};

/// Points awarded per clear, indexed by the number of rows cleared at once.
///
/// The base value is multiplied by `level + 1`. Clears larger than the table
/// use its last entry.
///
/// # Example
///
/// ```
/// use blockfall_engine::ScoreTable;
///
/// let table = ScoreTable::default();
/// assert_eq!(table.points(1, 0), 40);
/// assert_eq!(table.points(4, 2), 3600);
/// assert_eq!(table.points(0, 5), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ScoreTable(Vec<u64>);

impl Default for ScoreTable {
    fn default() -> Self {
        Self(vec![40, 100, 300, 1200])
    }
}

impl ScoreTable {
    #[must_use]
    pub fn new(points: Vec<u64>) -> Self {
        Self(points)
    }

    /// Points for clearing `rows` rows at once on `level`.
    #[must_use]
    pub fn points(&self, rows: usize, level: u32) -> u64 {
        let Some(index) = rows.checked_sub(1) else {
            return 0;
        };
        let base = self
            .0
            .get(index)
            .or_else(|| self.0.last())
            .copied()
            .unwrap_or(0);
        base.saturating_mul(u64::from(level) + 1)
    }
}

/// Score, cleared rows and level of the running game.
///
/// # Leveling
///
/// The tracker only answers whether a level-up is due
/// ([`Self::level_up_due`]); the drop cycle performs it, one level per drop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameStatus {
    score: u64,
    rows: u32,
    level: u32,
}

impl GameStatus {
    /// Creates a tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            rows: 0,
            level: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Total rows cleared in this game.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Applies a clear of `cleared` rows at the current level.
    pub fn record_clear(&mut self, cleared: usize, table: &ScoreTable) {
        if cleared == 0 {
            return;
        }
        self.score = self
            .score
            .saturating_add(table.points(cleared, self.level));
        self.rows = self
            .rows
            .saturating_add(u32::try_from(cleared).unwrap_or(u32::MAX));
    }

    /// True when more than `(level + 1) * lines_per_level` rows have been cleared.
    #[must_use]
    pub fn level_up_due(&self, lines_per_level: u32) -> bool {
        self.rows > (self.level + 1).saturating_mul(lines_per_level)
    }

    /// Raises the level by one.
    pub fn level_up(&mut self) {
        self.level += 1;
    }
}
