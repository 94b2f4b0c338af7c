use std::time::Duration;

use blockfall_engine::GameSession;
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::screen::PlayScreen,
    store::JsonFileStore,
    tui::{App, RenderMode, Runtime},
};

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(session: GameSession<JsonFileStore>, name: Option<String>) -> Self {
        Self {
            screen: PlayScreen::new(session, name),
        }
    }

    pub fn into_session(self) -> GameSession<JsonFileStore> {
        self.screen.into_session()
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.screen.set_key_release_events(runtime.key_release_events());
    }

    fn should_exit(&self) -> bool {
        self.screen.should_exit()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, elapsed: Duration) {
        self.screen.update(elapsed);
    }

    fn next_update(&self) -> Option<Duration> {
        self.screen.next_update()
    }
}
