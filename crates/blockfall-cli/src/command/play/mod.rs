use std::path::PathBuf;

use blockfall_engine::{GameConfig, GameSession, PieceSeed};

use crate::{
    command::{StorageArg, play::app::PlayApp},
    store::JsonFileStore,
    tui::Runtime,
    util,
};

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Player name; asked for on screen when omitted
    #[clap(long)]
    name: Option<String>,
    /// Game configuration file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Piece sequence seed, overriding the configuration file
    #[clap(long)]
    seed: Option<u128>,
    #[clap(flatten)]
    storage: StorageArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        name,
        config,
        seed,
        storage,
    } = arg;

    let mut game_config = match config {
        Some(path) => {
            eprintln!("Loading game configuration from {}", path.display());
            util::read_json_file::<GameConfig, _>("config", path)?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        game_config.seed = Some(PieceSeed::from_u128(*seed));
    }

    let store = JsonFileStore::open(&storage.data_dir)?;
    eprintln!("Scores are saved to {}", store.path().display());

    let mut app = PlayApp::new(GameSession::new(game_config, store), name.clone());
    Runtime::new().run(&mut app)?;

    let session = app.into_session();
    if !session.state().is_idle() {
        let status = session.status();
        eprintln!(
            "{}: score {}, rows {}, level {}, accuracy {:.1}%",
            session.player_name(),
            status.score(),
            status.rows(),
            status.level(),
            session.accuracy(),
        );
    }
    report_write_errors(session.into_store());
    Ok(())
}

/// Prints storage write failures collected while the terminal was in use.
fn report_write_errors(store: JsonFileStore) {
    for e in store.into_write_errors() {
        eprintln!("Failed to save scores: {e:#}");
    }
}
