use blockfall_engine::{SessionSnapshot, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, SavedScoresDisplay, SessionStatsDisplay, color, style};

/// Board, statistics and saved scores, with a popup for the current state.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a SessionSnapshot<'a>,
    name_input: Option<&'a str>,
    horizontal_padding: u16,
    vertical_padding: u16,
    saved_scores: usize,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot<'a>) -> Self {
        Self {
            snapshot,
            name_input: None,
            horizontal_padding: 1,
            vertical_padding: 0,
            saved_scores: 8,
        }
    }

    /// Shows the name prompt with the text typed so far.
    pub fn name_input(self, name_input: &'a str) -> Self {
        Self {
            name_input: Some(name_input),
            ..self
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.snapshot.state {
            SessionState::Idle => color::CYAN,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let game_board = BoardDisplay::new(self.snapshot.board)
            .block(Block::bordered().border_style(border_style).style(style));
        let session_stats = SessionStatsDisplay::new(self.snapshot).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );
        let saved_scores = SavedScoresDisplay::new(self.snapshot.saved_scores, self.saved_scores)
            .block(
                Block::bordered()
                    .title(Line::from("SCORES").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style),
            );

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(u16::max(session_stats.width(), saved_scores.width())),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area, scores_area] = Layout::vertical([
            Constraint::Length(session_stats.height()),
            Constraint::Length(saved_scores.height()),
        ])
        .spacing(1)
        .areas(left_column);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        saved_scores.render(scores_area, buf);
        game_board.render(board_area, buf);

        let popup = match (self.name_input, self.snapshot.state) {
            (Some(input), _) => Some((format!("NAME: {input}_"), style::NAME_ENTRY)),
            (None, SessionState::Idle | SessionState::Playing) => None,
            (None, SessionState::Paused) => Some(("PAUSED".to_owned(), style::PAUSED)),
            (None, SessionState::GameOver) => Some(("GAME OVER!!".to_owned(), style::GAME_OVER)),
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
