use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which the score list is persisted.
pub const SAVED_SCORES_KEY: &str = "savedScores";

/// A string key-value store that outlives a single game.
///
/// Implementations decide how failures are surfaced; the session treats the
/// store as best-effort and never aborts a game because of it.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

impl ScoreEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Finished-game results in the order they were recorded.
///
/// Persisted as a JSON array of `{ "name", "score" }` objects under
/// [`SAVED_SCORES_KEY`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{MemoryStore, SavedScores, ScoreEntry};
///
/// let mut store = MemoryStore::new();
/// let mut scores = SavedScores::load(&store);
/// scores.push(ScoreEntry::new("Ann", 120), &mut store);
///
/// let reloaded = SavedScores::load(&store);
/// assert_eq!(reloaded.entries(), [ScoreEntry::new("Ann", 120)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedScores {
    entries: Vec<ScoreEntry>,
}

impl SavedScores {
    /// Reads the list from `store`. A missing or malformed value yields an
    /// empty list.
    pub fn load<S>(store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        let entries = store
            .get(SAVED_SCORES_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends `entry` and writes the whole list back.
    pub fn push<S>(&mut self, entry: ScoreEntry, store: &mut S)
    where
        S: KeyValueStore + ?Sized,
    {
        self.entries.push(entry);
        self.save(store);
    }

    /// Empties the list and removes the persisted key.
    pub fn clear<S>(&mut self, store: &mut S)
    where
        S: KeyValueStore + ?Sized,
    {
        self.entries.clear();
        store.remove(SAVED_SCORES_KEY);
    }

    fn save<S>(&self, store: &mut S)
    where
        S: KeyValueStore + ?Sized,
    {
        // Serializing plain strings and integers cannot fail.
        if let Ok(json) = serde_json::to_string(&self.entries) {
            store.set(SAVED_SCORES_KEY, json);
        }
    }
}
