use std::time::Duration;

use blockfall_engine::{Command, GameSession, SessionState};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
};

use crate::{
    store::JsonFileStore,
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

/// What a key press asks for outside the name prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Game(Command),
    TogglePause,
    Restart,
    ChangeName,
    ClearScores,
    Quit,
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return (key.code == KeyCode::Down).then_some(Action::Game(Command::SoftDropStop));
    }
    let action = match key.code {
        KeyCode::Left => Action::Game(Command::MoveLeft),
        KeyCode::Right => Action::Game(Command::MoveRight),
        KeyCode::Up | KeyCode::Char('x') => Action::Game(Command::RotateClockwise),
        KeyCode::Char('z') => Action::Game(Command::RotateCounterClockwise),
        KeyCode::Down => Action::Game(Command::SoftDropStart),
        KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Enter => Action::Restart,
        KeyCode::Char('n') => Action::ChangeName,
        KeyCode::Char('c') => Action::ClearScores,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

const NAME_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Start"), (&["Esc"], "Quit")];
const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑", "X"], "Rotate"),
    (&["Z"], "Rotate Left"),
    (&["↓"], "Soft Drop"),
    (&["P"], "Pause"),
    (&["Enter"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[
    (&["P"], "Resume"),
    (&["Enter"], "Restart"),
    (&["Q"], "Quit"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[
    (&["Enter"], "Play Again"),
    (&["N"], "New Player"),
    (&["C"], "Clear Scores"),
    (&["Q"], "Quit"),
];

const NOTICE_STYLE: Style = Style::new().fg(Color::Red);

#[derive(Debug)]
pub struct PlayScreen {
    session: GameSession<JsonFileStore>,
    /// Text typed so far while the name prompt is open.
    name_input: Option<String>,
    notice: Option<String>,
    key_release_events: bool,
    is_exiting: bool,
}

impl PlayScreen {
    /// Starts playing right away when `name` is given, otherwise asks for one.
    pub fn new(session: GameSession<JsonFileStore>, name: Option<String>) -> Self {
        let mut screen = Self {
            session,
            name_input: Some(String::new()),
            notice: None,
            key_release_events: false,
            is_exiting: false,
        };
        if let Some(name) = name {
            screen.start(&name);
        }
        screen
    }

    pub fn set_key_release_events(&mut self, enabled: bool) {
        self.key_release_events = enabled;
    }

    pub fn should_exit(&self) -> bool {
        self.is_exiting
    }

    #[cfg(test)]
    fn session(&self) -> &GameSession<JsonFileStore> {
        &self.session
    }

    pub fn into_session(self) -> GameSession<JsonFileStore> {
        self.session
    }

    pub fn next_update(&self) -> Option<Duration> {
        self.session.time_until_next_drop()
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.session.advance(elapsed);
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let snapshot = self.session.snapshot();
        let display = match &self.name_input {
            Some(input) => SessionDisplay::new(&snapshot).name_input(input),
            None => SessionDisplay::new(&snapshot),
        };
        let bindings = match (&self.name_input, snapshot.state) {
            (Some(_), _) | (None, SessionState::Idle) => NAME_BINDINGS,
            (None, SessionState::Playing) => PLAYING_BINDINGS,
            (None, SessionState::Paused) => PAUSED_BINDINGS,
            (None, SessionState::GameOver) => GAME_OVER_BINDINGS,
        };
        let storage_error = self
            .session
            .store()
            .write_errors()
            .last()
            .map(|e| format!("{e:#}"));
        let notice = self.notice.clone().or(storage_error).unwrap_or_default();

        let [main_area, help_area, notice_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
        frame.render_widget(Line::styled(notice, NOTICE_STYLE).centered(), notice_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if is_interrupt(&key) {
            self.is_exiting = true;
            return;
        }
        if self.name_input.is_some() {
            self.handle_name_key(&key);
            return;
        }
        let Some(action) = key_action(&key) else {
            return;
        };

        self.notice = None;
        match action {
            Action::Game(command) => {
                self.session.handle_command(command);
                if command == Command::SoftDropStart && !self.key_release_events {
                    self.session.handle_command(Command::SoftDropStop);
                }
            }
            Action::TogglePause => self.session.toggle_pause(),
            Action::Restart => {
                let name = self.session.player_name().to_owned();
                self.start(&name);
            }
            Action::ChangeName if self.session.state().is_game_over() => {
                self.name_input = Some(String::new());
            }
            Action::ClearScores if !self.session.state().is_playing() => {
                self.session.clear_scores();
            }
            Action::ChangeName | Action::ClearScores => {}
            Action::Quit => self.is_exiting = true,
        }
    }

    fn handle_name_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let Some(input) = &mut self.name_input else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if !c.is_control() => {
                input.push(c);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let name = input.clone();
                self.start(&name);
            }
            KeyCode::Esc => self.is_exiting = true,
            _ => {}
        }
    }

    fn start(&mut self, name: &str) {
        match self.session.start_game(name) {
            Ok(()) => {
                self.name_input = None;
                self.notice = None;
            }
            Err(e) => {
                self.name_input = Some(name.trim().to_owned());
                self.notice = Some(e.to_string());
            }
        }
    }
}
