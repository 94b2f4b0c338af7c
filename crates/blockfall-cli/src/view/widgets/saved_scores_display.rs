use blockfall_engine::ScoreEntry;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// The most recent saved scores, newest first.
pub struct SavedScoresDisplay<'a> {
    entries: &'a [ScoreEntry],
    capacity: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SavedScoresDisplay<'a> {
    pub fn new(entries: &'a [ScoreEntry], capacity: usize) -> Self {
        Self {
            entries,
            capacity,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.capacity.max(1)).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for SavedScoresDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        if self.entries.is_empty() {
            Line::styled("(none)", style::DIMMED).centered().render(area, buf);
            return;
        }

        let rows_areas =
            Layout::vertical((0..self.capacity).map(|_| Constraint::Length(1))).split(area);
        for (entry, area) in self.entries.iter().rev().zip(rows_areas.iter().copied()) {
            let [name_area, score_area] = area.layout(&Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(8),
            ]));
            Line::styled(entry.name.as_str(), style::DEFAULT)
                .left_aligned()
                .render(name_area, buf);
            Line::styled(entry.score.to_string(), style::DEFAULT)
                .right_aligned()
                .render(score_area, buf);
        }
    }
}
