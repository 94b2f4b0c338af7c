use std::time::Duration;

use crate::{
    StartGameError,
    core::{Board, Offset, Player, RotationDirection, check_collision},
};

use super::{
    config::GameConfig,
    drop_scheduler::DropScheduler,
    game_status::GameStatus,
    player_controller::PlayerController,
    saved_scores::{KeyValueStore, SavedScores, ScoreEntry},
    stage::Stage,
};

/// Player input, independent of any keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    /// Suspends automatic drops and drops one row immediately.
    SoftDropStart,
    /// Re-arms automatic drops at the current level's pace.
    SoftDropStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// No game has been started yet.
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot<'a> {
    pub board: &'a Board,
    pub score: u64,
    pub rows: u32,
    pub level: u32,
    /// Rows cleared per piece placed, as a percentage.
    pub accuracy: f64,
    pub state: SessionState,
    pub game_over: bool,
    pub saved_scores: &'a [ScoreEntry],
    pub player_name: &'a str,
    pub pieces_placed: u32,
}

/// A sequence of games played by one host, plus the scores they left behind.
///
/// All transitions happen inside `&mut self` methods: input arrives through
/// [`Self::handle_command`] and time through [`Self::advance`]. Each call runs
/// to completion (move, merge, status update) before the next one starts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameSession, MemoryStore, PieceSeed, SessionState};
///
/// let config = GameConfig {
///     seed: Some(PieceSeed::from_u128(1)),
///     ..GameConfig::default()
/// };
/// let mut session = GameSession::new(config, MemoryStore::new());
/// session.start_game("Ann").unwrap();
///
/// // Without input the stack grows until a piece cannot enter the board.
/// session.advance(Duration::from_secs(24 * 60 * 60));
/// assert_eq!(session.state(), SessionState::GameOver);
/// assert_eq!(session.saved_scores().len(), 1);
/// ```
#[derive(Debug)]
pub struct GameSession<S> {
    config: GameConfig,
    stage: Stage,
    controller: PlayerController,
    status: GameStatus,
    scheduler: DropScheduler,
    pieces_placed: u32,
    accuracy: f64,
    saved_scores: SavedScores,
    store: S,
    player_name: String,
    state: SessionState,
}

impl<S> GameSession<S>
where
    S: KeyValueStore,
{
    /// Creates an idle session and loads the saved scores from `store`.
    #[must_use]
    pub fn new(config: GameConfig, store: S) -> Self {
        let saved_scores = SavedScores::load(&store);
        Self {
            stage: Stage::new(config.width, config.height),
            controller: PlayerController::new(config.piece_generator(), config.width),
            status: GameStatus::new(),
            scheduler: DropScheduler::new(config.drop_speed),
            pieces_placed: 0,
            accuracy: 0.0,
            saved_scores,
            store,
            player_name: String::new(),
            state: SessionState::Idle,
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.stage.board()
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        self.controller.player()
    }

    #[must_use]
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    #[must_use]
    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    /// Rows cleared per piece placed, as a percentage; 0 before the first placement.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn saved_scores(&self) -> &SavedScores {
        &self.saved_scores
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Starts a new game for `name`, discarding any game in progress.
    ///
    /// The name is trimmed; an empty name is rejected and leaves the session
    /// untouched.
    pub fn start_game(&mut self, name: &str) -> Result<(), StartGameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StartGameError::EmptyPlayerName);
        }

        self.player_name = name.to_owned();
        self.stage = Stage::new(self.config.width, self.config.height);
        self.controller = PlayerController::new(self.config.piece_generator(), self.config.width);
        self.status = GameStatus::new();
        self.pieces_placed = 0;
        self.accuracy = 0.0;
        self.state = SessionState::Playing;
        self.scheduler.start(self.status.level());

        if self.spawn_blocked() {
            self.end_game();
        } else {
            self.refresh();
        }
        Ok(())
    }

    /// Applies a player command. Ignored unless a game is being played.
    pub fn handle_command(&mut self, command: Command) {
        if !self.state.is_playing() {
            return;
        }
        match command {
            Command::MoveLeft => self.move_player(Offset::LEFT),
            Command::MoveRight => self.move_player(Offset::RIGHT),
            Command::RotateClockwise => self.rotate_player(RotationDirection::Clockwise),
            Command::RotateCounterClockwise => {
                self.rotate_player(RotationDirection::CounterClockwise);
            }
            Command::SoftDropStart => {
                self.scheduler.suspend();
                self.drop();
            }
            Command::SoftDropStop => self.scheduler.resume(),
        }
    }

    /// Pauses or resumes the running game.
    ///
    /// Pausing cancels automatic drops; resuming re-arms them at the current
    /// level's pace.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Playing => {
                self.scheduler.stop();
                self.state = SessionState::Paused;
            }
            SessionState::Paused => {
                self.scheduler.start(self.status.level());
                self.state = SessionState::Playing;
            }
            SessionState::Idle | SessionState::GameOver => {}
        }
    }

    /// Feeds `elapsed` wall-clock time to the drop timer, running one drop per
    /// fire.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut budget = elapsed;
        while self.state.is_playing()
            && let Some(rest) = self.scheduler.poll(budget)
        {
            self.drop();
            budget = rest;
        }
    }

    /// Time until the next automatic drop, `None` when none is scheduled.
    #[must_use]
    pub fn time_until_next_drop(&self) -> Option<Duration> {
        if self.state.is_playing() {
            self.scheduler.time_until_next_fire()
        } else {
            None
        }
    }

    /// Ends the current game and records its score.
    ///
    /// Only the first call per game has an effect.
    pub fn end_game(&mut self) {
        if !matches!(self.state, SessionState::Playing | SessionState::Paused) {
            return;
        }
        self.state = SessionState::GameOver;
        self.scheduler.stop();
        self.update_accuracy();
        let entry = ScoreEntry::new(self.player_name.clone(), self.status.score());
        self.saved_scores.push(entry, &mut self.store);
    }

    /// Forgets every saved score, in memory and in the store.
    pub fn clear_scores(&mut self) {
        self.saved_scores.clear(&mut self.store);
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            board: self.stage.board(),
            score: self.status.score(),
            rows: self.status.rows(),
            level: self.status.level(),
            accuracy: self.accuracy,
            state: self.state,
            game_over: self.state.is_game_over(),
            saved_scores: self.saved_scores.entries(),
            player_name: &self.player_name,
            pieces_placed: self.pieces_placed,
        }
    }

    fn move_player(&mut self, offset: Offset) {
        if !check_collision(self.controller.player(), self.stage.board(), offset) {
            self.controller.update_position(offset, false);
            self.refresh();
        }
    }

    fn rotate_player(&mut self, direction: RotationDirection) {
        if self.controller.rotate(self.stage.board(), direction) {
            self.refresh();
        }
    }

    /// One step of gravity, shared by the timer and soft drop.
    fn drop(&mut self) {
        if self.status.level_up_due(self.config.lines_per_level) {
            self.status.level_up();
            self.scheduler.set_level(self.status.level());
        }

        if !check_collision(self.controller.player(), self.stage.board(), Offset::DOWN) {
            self.controller.update_position(Offset::DOWN, false);
        } else if self.controller.player().position.y < 1 {
            // Stuck on the top row: the stack has reached the spawn area.
            self.end_game();
            return;
        } else {
            self.controller.update_position(Offset::NONE, true);
            self.pieces_placed += 1;
        }
        self.refresh();
    }

    /// Redraws the stage and settles a collided piece.
    fn refresh(&mut self) {
        let cleared = self.stage.update(self.controller.player());
        if self.controller.player().collided {
            self.status.record_clear(cleared, &self.config.score_table);
            self.controller.reset();
            if self.spawn_blocked() {
                self.end_game();
            } else {
                self.stage.update(self.controller.player());
            }
        }
        self.update_accuracy();
    }

    fn spawn_blocked(&self) -> bool {
        check_collision(self.controller.player(), self.stage.board(), Offset::NONE)
    }

    fn update_accuracy(&mut self) {
        self.accuracy = if self.pieces_placed == 0 {
            0.0
        } else {
            f64::from(self.status.rows()) / f64::from(self.pieces_placed) * 100.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Cell, PieceKind},
        engine::{
            piece_generator::PieceSeed,
            saved_scores::{MemoryStore, SAVED_SCORES_KEY},
        },
    };

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn seeded_config(seed: u128) -> GameConfig {
        GameConfig {
            seed: Some(PieceSeed::from_u128(seed)),
            ..GameConfig::default()
        }
    }

    fn session() -> GameSession<MemoryStore> {
        GameSession::new(seeded_config(1), MemoryStore::new())
    }

    fn started() -> GameSession<MemoryStore> {
        let mut session = session();
        session.start_game("Ann").unwrap();
        session
    }

    /// Fills the bottom row except under the active piece's lowest blocks, so
    /// that dropping the piece straight down completes the row.
    fn prepare_single_clear(session: &mut GameSession<MemoryStore>) {
        let player = session.player().clone();
        let cells = player.piece.shape().occupied_cells();
        let lowest = cells.iter().map(|(_, dy)| *dy).max().unwrap();
        let holes: Vec<i32> = cells
            .iter()
            .filter(|(_, dy)| *dy == lowest)
            .map(|(dx, dy)| player.position.cell(*dx, *dy).0)
            .collect();

        let width = session.config.width;
        let bottom = session.config.height - 1;
        for x in 0..width {
            if !holes.contains(&i32::try_from(x).unwrap()) {
                session
                    .stage
                    .board_mut()
                    .set_cell(x, bottom, Cell::merged(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, SessionState::Idle);
        assert!(!snapshot.game_over);
        assert!(snapshot.board.is_empty());
        assert!(snapshot.saved_scores.is_empty());
        assert_eq!(session.time_until_next_drop(), None);
    }

    #[test]
    fn test_new_session_loads_saved_scores() {
        let mut store = MemoryStore::new();
        store.set(SAVED_SCORES_KEY, r#"[{"name":"Bo","score":7}]"#.to_owned());
        let session = GameSession::new(GameConfig::default(), store);
        assert_eq!(session.saved_scores().entries(), [ScoreEntry::new("Bo", 7)]);
    }

    #[test]
    fn test_empty_name_is_rejected_without_changes() {
        let mut session = session();
        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                session.start_game(name),
                Err(StartGameError::EmptyPlayerName)
            ));
            assert_eq!(session.state(), SessionState::Idle);
            assert_eq!(session.player_name(), "");
            assert!(session.board().is_empty());
        }

        // A running game is not disturbed either.
        session.start_game("Ann").unwrap();
        session.advance(ms(3000));
        let board = session.board().clone();
        let player = session.player().clone();
        assert!(session.start_game(" ").is_err());
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.board(), &board);
        assert_eq!(session.player(), &player);
        assert_eq!(session.player_name(), "Ann");
    }

    #[test]
    fn test_start_game_trims_name_and_spawns_piece() {
        let mut session = session();
        session.start_game("  Ann ").unwrap();
        assert_eq!(session.player_name(), "Ann");
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.player().position, session.controller.spawn_position());
        assert!(!session.board().is_empty());
        assert_eq!(session.time_until_next_drop(), Some(ms(1000)));
    }

    #[test]
    fn test_timer_drops_one_row_per_interval() {
        let mut session = started();
        let y = session.player().position.y;
        session.advance(ms(999));
        assert_eq!(session.player().position.y, y);
        session.advance(ms(1));
        assert_eq!(session.player().position.y, y + 1);
        session.advance(ms(2500));
        assert_eq!(session.player().position.y, y + 3);
        assert_eq!(session.time_until_next_drop(), Some(ms(500)));
    }

    #[test]
    fn test_moves_stop_at_the_walls() {
        let mut session = started();
        for _ in 0..20 {
            session.handle_command(Command::MoveLeft);
        }
        let leftmost = session.player().position.x;
        assert!(check_collision(session.player(), session.board(), Offset::LEFT));

        for _ in 0..20 {
            session.handle_command(Command::MoveRight);
        }
        assert!(session.player().position.x > leftmost);
        assert!(check_collision(session.player(), session.board(), Offset::RIGHT));
        assert!(!check_collision(session.player(), session.board(), Offset::NONE));
    }

    #[test]
    fn test_soft_drop_suspends_timer_until_released() {
        let mut session = started();
        let y = session.player().position.y;

        session.handle_command(Command::SoftDropStart);
        assert_eq!(session.player().position.y, y + 1);
        assert_eq!(session.time_until_next_drop(), None);
        session.advance(ms(10_000));
        assert_eq!(session.player().position.y, y + 1);

        session.handle_command(Command::SoftDropStart);
        assert_eq!(session.player().position.y, y + 2);

        session.handle_command(Command::SoftDropStop);
        assert_eq!(session.time_until_next_drop(), Some(ms(1000)));
        session.advance(ms(1000));
        assert_eq!(session.player().position.y, y + 3);
    }

    #[test]
    fn test_rotation_is_applied_in_open_space() {
        let mut session = started();
        for _ in 0..3 {
            session.handle_command(Command::SoftDropStart);
        }
        let before = session.player().piece.clone();
        session.handle_command(Command::RotateClockwise);
        assert_eq!(
            session.player().piece,
            before.rotated(RotationDirection::Clockwise)
        );
        session.handle_command(Command::RotateCounterClockwise);
        assert_eq!(session.player().piece, before);
    }

    #[test]
    fn test_pause_freezes_the_game() {
        let mut session = started();
        session.advance(ms(400));
        let player = session.player().clone();

        session.toggle_pause();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.time_until_next_drop(), None);
        session.advance(ms(10_000));
        session.handle_command(Command::MoveLeft);
        session.handle_command(Command::SoftDropStart);
        assert_eq!(session.player(), &player);

        session.toggle_pause();
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.time_until_next_drop(), Some(ms(1000)));
    }

    #[test]
    fn test_completed_row_scores_and_updates_accuracy() {
        let mut session = started();
        assert_eq!(session.accuracy(), 0.0);
        prepare_single_clear(&mut session);

        for _ in 0..100 {
            if session.pieces_placed() > 0 {
                break;
            }
            session.advance(ms(1000));
        }
        assert_eq!(session.pieces_placed(), 1);
        assert_eq!(session.status().rows(), 1);
        assert_eq!(session.status().score(), 40);
        assert!((session.accuracy() - 100.0).abs() < f64::EPSILON);
        assert_eq!(session.snapshot().rows, 1);
    }

    #[test]
    fn test_level_up_speeds_up_drops() {
        let mut session = started();
        let table = session.config.score_table.clone();
        session.status.record_clear(11, &table);

        session.advance(ms(1000));
        assert_eq!(session.status().level(), 1);
        assert_eq!(session.time_until_next_drop(), Some(ms(600)));

        // Only one level per drop, and never back down.
        session.status.record_clear(20, &table);
        let mut level = session.status().level();
        for _ in 0..5 {
            session.handle_command(Command::SoftDropStart);
            assert!(session.status().level() >= level);
            level = session.status().level();
        }
        assert!(level >= 2);
    }

    #[test]
    fn test_unattended_game_ends_with_one_saved_score() {
        let mut session = started();
        session.advance(DAY);

        assert_eq!(session.state(), SessionState::GameOver);
        assert!(session.snapshot().game_over);
        assert!(session.pieces_placed() > 0);
        assert_eq!(session.accuracy(), 0.0);
        assert_eq!(
            session.saved_scores().entries(),
            [ScoreEntry::new("Ann", session.status().score())]
        );

        // Nothing more happens once the game is over.
        session.advance(DAY);
        session.end_game();
        session.handle_command(Command::SoftDropStart);
        session.toggle_pause();
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.saved_scores().len(), 1);
        assert_eq!(SavedScores::load(session.store()), *session.saved_scores());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = started();
        session.advance(DAY);
        session.start_game("Bo").unwrap();

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.status(), &GameStatus::new());
        assert_eq!(session.pieces_placed(), 0);
        assert_eq!(session.accuracy(), 0.0);

        session.advance(DAY);
        let names: Vec<&str> = session
            .saved_scores()
            .entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, ["Ann", "Bo"]);
    }

    #[test]
    fn test_end_game_without_game_is_noop() {
        let mut session = session();
        session.end_game();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.saved_scores().is_empty());
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let config = GameConfig {
            width: 4,
            height: 1,
            ..seeded_config(3)
        };
        let mut session = GameSession::new(config, MemoryStore::new());
        session.start_game("Ann").unwrap();
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.saved_scores().entries(), [ScoreEntry::new("Ann", 0)]);
    }

    #[test]
    fn test_clear_scores_removes_persisted_key() {
        let mut session = started();
        session.advance(DAY);
        assert!(session.store().contains_key(SAVED_SCORES_KEY));

        session.clear_scores();
        assert!(session.saved_scores().is_empty());
        assert!(!session.store().contains_key(SAVED_SCORES_KEY));
        assert!(SavedScores::load(session.store()).is_empty());
    }
}
