use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError, Navigator};
use crate::store::WordStorage;
use crate::store::schema::Word;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::screen::Screen;
use crate::ui::screens::{Status, frame, render_status};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Definition,
    Meaning,
}

/// Modal form adding one word to a list, or editing one when opened with
/// an editing payload.
pub struct WordCreateScreen {
    deps: Dependency,
    words: Rc<dyn WordStorage>,
    editing: Option<Word>,
    definition: LineInput,
    meaning: LineInput,
    focus: Field,
    status: Option<Status>,
}

impl WordCreateScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let words = deps.words()?;
        let editing = deps.editing().cloned();
        let (definition, meaning) = match &editing {
            Some(word) => (LineInput::new(&word.definition), LineInput::new(&word.meaning)),
            None => (LineInput::default(), LineInput::default()),
        };
        Ok(Self {
            deps,
            words,
            editing,
            definition,
            meaning,
            focus: Field::Definition,
            status: None,
        })
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Definition => Field::Meaning,
            Field::Meaning => Field::Definition,
        };
    }

    fn close(&mut self) -> Result<(), NavError> {
        let id = self.id();
        self.deps.navigator.dismiss(id, true)
    }

    fn submit(&mut self) -> Result<(), NavError> {
        // Enter on the first field moves on while the second is still empty.
        if self.focus == Field::Definition && self.meaning.is_blank() {
            self.focus = Field::Meaning;
            return Ok(());
        }
        let saved = match &self.editing {
            Some(original) => {
                let word = Word {
                    definition: self.definition.value().trim().to_string(),
                    meaning: self.meaning.value().trim().to_string(),
                    ..original.clone()
                };
                self.words.update(&word).map(|()| word)
            }
            None => self.words.create(self.definition.value(), self.meaning.value()),
        };
        match saved {
            Ok(word) => {
                let action = if self.editing.is_some() { "edited" } else { "added" };
                tracing::info!(id = %word.id, parent_id = %word.parent_id, action, "word saved");
                self.close()
            }
            Err(e) => {
                self.status = Some(Status::error(e));
                Ok(())
            }
        }
    }
}

impl Screen for WordCreateScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        match self.editing {
            Some(_) => t!("word_create.edit_title", title = self.words.title()).to_string(),
            None => t!("word_create.title", title = self.words.title()).to_string(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) {
            self.toggle_focus();
            return Ok(());
        }
        let input = match self.focus {
            Field::Definition => &mut self.definition,
            Field::Meaning => &mut self.meaning,
        };
        match input.handle(key) {
            InputResult::Continue => Ok(()),
            InputResult::Cancel => self.close(),
            InputResult::Submit => self.submit(),
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        Clear.render(area, buf);
        let inner = frame(area, buf, theme, &self.title());
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let label = Style::default().fg(theme.colors.text_pending());
        Paragraph::new(t!("word_create.definition").to_string())
            .style(label)
            .render(rows[0], buf);
        Paragraph::new(self.definition.styled_line(theme, self.focus == Field::Definition))
            .render(rows[1], buf);
        Paragraph::new(t!("word_create.meaning").to_string())
            .style(label)
            .render(rows[2], buf);
        Paragraph::new(self.meaning.styled_line(theme, self.focus == Field::Meaning))
            .render(rows[3], buf);
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        vec![
            t!("hint.next_field").to_string(),
            t!("hint.save").to_string(),
            t!("hint.cancel").to_string(),
        ]
    }

    fn captures_text(&self) -> bool {
        true
    }
}
