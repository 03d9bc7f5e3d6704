pub mod bookmarks;
pub mod quiz;
pub mod quiz_result;
pub mod set_create;
pub mod set_list;
pub mod tabs;
pub mod translate;
pub mod word_create;
pub mod word_list;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub use bookmarks::BookmarksScreen;
pub use quiz::QuizScreen;
pub use quiz_result::QuizResultScreen;
pub use set_create::SetCreateScreen;
pub use set_list::SetListScreen;
pub use tabs::TabsScreen;
pub use translate::TranslateScreen;
pub use word_create::WordCreateScreen;
pub use word_list::WordListScreen;

/// One-line message shown under a screen's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn error(err: impl std::fmt::Display) -> Self {
        tracing::warn!("{err}");
        Status::Error(err.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            Status::Info(text) | Status::Error(text) => text,
        }
    }

    fn style(&self, theme: &Theme) -> Style {
        match self {
            Status::Info(_) => Style::default().fg(theme.colors.success()),
            Status::Error(_) => Style::default().fg(theme.colors.error()),
        }
    }
}

/// Wrapping cursor over a list of `len` rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
}

impl Selection {
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.index > 0 {
            self.index -= 1;
        } else {
            self.index = len - 1;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

/// Draw the bordered frame shared by every screen and return its inner area.
pub(crate) fn frame(area: Rect, buf: &mut Buffer, theme: &Theme, title: &str) -> Rect {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()).fg(colors.fg()));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

/// Render `status` on the last row of `area`, if any.
pub(crate) fn render_status(status: Option<&Status>, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let Some(status) = status else { return };
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    Paragraph::new(Line::from(Span::styled(
        format!(" {}", status.text()),
        status.style(theme),
    )))
    .render(row, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        let mut sel = Selection::default();
        sel.prev(3);
        assert_eq!(sel.index, 2);
        sel.next(3);
        assert_eq!(sel.index, 0);
        sel.next(0);
        assert_eq!(sel.index, 0);
    }

    #[test]
    fn selection_clamps_after_removal() {
        let mut sel = Selection { index: 4 };
        sel.clamp(2);
        assert_eq!(sel.index, 1);
        sel.clamp(0);
        assert_eq!(sel.index, 0);
    }
}
