use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use blockfall_engine::KeyValueStore;

use crate::util;

pub const STORAGE_FILE_NAME: &str = "storage.json";
/// Where an unreadable storage file is moved before starting over.
pub const MALFORMED_FILE_NAME: &str = "storage.json.malformed";

/// Key-value store persisted as one JSON object in a file.
///
/// Every change rewrites the file. Write failures never interrupt the game:
/// they are collected and reported once the terminal is restored.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    write_errors: Vec<anyhow::Error>,
}

impl JsonFileStore {
    /// Opens the store in `data_dir`, starting empty if the file does not exist.
    ///
    /// A file that is not a JSON object of strings is moved aside to
    /// [`MALFORMED_FILE_NAME`] with a warning, and the store starts empty.
    /// Only a file that exists but cannot be read is an error.
    pub fn open<P>(data_dir: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref();
        let path = data_dir.join(STORAGE_FILE_NAME);
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file: {}", path.display()))?;
            match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("Ignoring malformed storage file {}: {e}", path.display());
                    let aside = data_dir.join(MALFORMED_FILE_NAME);
                    match fs::rename(&path, &aside) {
                        Ok(()) => eprintln!("Moved it to {}", aside.display()),
                        Err(e) => eprintln!("Failed to move it to {}: {e}", aside.display()),
                    }
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            write_errors: vec![],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_errors(&self) -> &[anyhow::Error] {
        &self.write_errors
    }

    pub fn into_write_errors(self) -> Vec<anyhow::Error> {
        self.write_errors
    }

    fn save(&mut self) {
        if let Err(e) = util::write_json_file("storage", &self.path, &self.entries) {
            self.write_errors.push(e);
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
        self.save();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.save();
        }
    }
}
