use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called once the terminal is set up, before the first event.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each `Event::Render`).
    fn draw(&self, frame: &mut Frame);

    /// Advances application time by `elapsed`.
    ///
    /// Called before every terminal event and whenever the deadline from
    /// [`Self::next_update`] passes.
    fn update(&mut self, elapsed: Duration);

    /// Time until the application next needs [`Self::update`], measured from
    /// the previous update. `None` means it only reacts to terminal events.
    fn next_update(&self) -> Option<Duration>;
}
