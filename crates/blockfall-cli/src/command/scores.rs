use blockfall_engine::SavedScores;

use crate::{command::StorageArg, store::JsonFileStore};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    #[clap(flatten)]
    storage: StorageArg,
}

pub(crate) fn run_list(arg: &ScoresArg) -> anyhow::Result<()> {
    let store = JsonFileStore::open(&arg.storage.data_dir)?;
    let scores = SavedScores::load(&store);
    if scores.is_empty() {
        eprintln!("No saved scores in {}", store.path().display());
        return Ok(());
    }

    for line in score_table(&scores) {
        println!("{line}");
    }
    Ok(())
}

/// Header plus one line per entry, newest first.
fn score_table(scores: &SavedScores) -> Vec<String> {
    let header = format!("{:<20} {:>10}", "NAME", "SCORE");
    let rows = scores
        .entries()
        .iter()
        .rev()
        .map(|entry| format!("{:<20} {:>10}", entry.name, entry.score));
    std::iter::once(header).chain(rows).collect()
}

pub(crate) fn run_clear(arg: &ScoresArg) -> anyhow::Result<()> {
    let mut store = JsonFileStore::open(&arg.storage.data_dir)?;
    let mut scores = SavedScores::load(&store);
    let count = scores.len();
    scores.clear(&mut store);

    let path = store.path().to_owned();
    if let Some(e) = store.into_write_errors().into_iter().next() {
        return Err(e.context("Failed to clear saved scores"));
    }
    eprintln!("Cleared {count} saved scores from {}", path.display());
    Ok(())
}
