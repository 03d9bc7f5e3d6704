use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError, Navigator};
use crate::store::WordSetStorage;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::screen::Screen;
use crate::ui::screens::{Status, frame, render_status};
use crate::ui::theme::Theme;

/// Modal form naming a new word set.
pub struct SetCreateScreen {
    deps: Dependency,
    sets: Rc<dyn WordSetStorage>,
    input: LineInput,
    status: Option<Status>,
}

impl SetCreateScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let sets = deps.word_sets()?;
        Ok(Self {
            deps,
            sets,
            input: LineInput::default(),
            status: None,
        })
    }

    fn close(&mut self) -> Result<(), NavError> {
        let id = self.id();
        self.deps.navigator.dismiss(id, true)
    }
}

impl Screen for SetCreateScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("set_create.title").to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        match self.input.handle(key) {
            InputResult::Continue => Ok(()),
            InputResult::Cancel => self.close(),
            InputResult::Submit => match self.sets.create(self.input.value()) {
                Ok(set) => {
                    tracing::info!(id = %set.id, "word set created");
                    self.close()
                }
                Err(e) => {
                    self.status = Some(Status::error(e));
                    Ok(())
                }
            },
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        Clear.render(area, buf);
        let inner = frame(area, buf, theme, &self.title());
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        Paragraph::new(t!("set_create.prompt").to_string())
            .style(Style::default().fg(theme.colors.text_pending()))
            .render(rows[0], buf);
        Paragraph::new(self.input.styled_line(theme, true)).render(rows[1], buf);
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        vec![t!("hint.save").to_string(), t!("hint.cancel").to_string()]
    }

    fn captures_text(&self) -> bool {
        true
    }
}
