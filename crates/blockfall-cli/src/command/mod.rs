use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg};

mod play;
mod scores;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// List saved scores
    Scores(#[clap(flatten)] ScoresArg),
    /// Delete all saved scores
    ClearScores(#[clap(flatten)] ScoresArg),
}

/// Location of the persistent key-value store.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StorageArg {
    /// Directory holding the storage file
    #[clap(long, default_value = "./data/")]
    data_dir: PathBuf,
}

impl Default for StorageArg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/"),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Scores(arg) => scores::run_list(&arg)?,
        Mode::ClearScores(arg) => scores::run_clear(&arg)?,
    }
    Ok(())
}
