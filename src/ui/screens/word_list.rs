use std::collections::HashSet;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use rust_i18n::t;
use uuid::Uuid;

use crate::nav::{Dependency, NavError, Navigator, Payload, Scene, Surface};
use crate::store::WordStorage;
use crate::store::schema::{Mark, Word};
use crate::ui::screen::Screen;
use crate::ui::screens::{Selection, Status, frame, render_status};
use crate::ui::theme::Theme;

/// The words of one set. Meanings stay hidden until flipped.
pub struct WordListScreen {
    deps: Dependency,
    words: Rc<dyn WordStorage>,
    items: Vec<Word>,
    selection: Selection,
    revealed: HashSet<Uuid>,
    reveal_all: bool,
    confirm_delete: bool,
    status: Option<Status>,
}

impl WordListScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let words = deps.words()?;
        let mut screen = Self {
            deps,
            words,
            items: Vec::new(),
            selection: Selection::default(),
            revealed: HashSet::new(),
            reveal_all: false,
            confirm_delete: false,
            status: None,
        };
        screen.refresh();
        Ok(screen)
    }

    pub fn items(&self) -> &[Word] {
        &self.items
    }

    pub fn is_revealed(&self, id: Uuid) -> bool {
        self.reveal_all || self.revealed.contains(&id)
    }

    fn refresh(&mut self) {
        match self.words.list() {
            Ok(items) => self.items = items,
            Err(e) => self.status = Some(Status::error(e)),
        }
        self.selection.clamp(self.items.len());
    }

    fn flip_selected(&mut self) {
        let Some(word) = self.items.get(self.selection.index) else {
            return;
        };
        if !self.revealed.remove(&word.id) {
            self.revealed.insert(word.id);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.items.get(self.selection.index).map(|w| w.id) else {
            return;
        };
        match self.words.delete(id) {
            Ok(()) => {
                self.revealed.remove(&id);
                self.refresh();
            }
            Err(e) => self.status = Some(Status::error(e)),
        }
    }

    fn storage_payload(&self) -> Payload {
        Payload::Storage(Rc::clone(&self.words))
    }

    fn edit_selected(&mut self) -> Result<(), NavError> {
        let Some(word) = self.items.get(self.selection.index).cloned() else {
            return Ok(());
        };
        let from = self.id();
        let payload = Payload::Editing {
            storage: Rc::clone(&self.words),
            word,
        };
        self.deps
            .navigator
            .present_modal(from, Scene::WordListCreate, payload, true)
    }

    fn score(&self) -> (usize, usize) {
        let right = self.items.iter().filter(|w| w.mark == Mark::Right).count();
        let wrong = self.items.iter().filter(|w| w.mark == Mark::Wrong).count();
        (right, wrong)
    }
}

impl Screen for WordListScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        self.words.title().to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        if self.confirm_delete {
            self.confirm_delete = false;
            self.status = None;
            if matches!(key.code, KeyCode::Char('y')) {
                self.delete_selected();
            }
            return Ok(());
        }

        self.status = None;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(self.items.len()),
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(self.items.len()),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('f') => self.flip_selected(),
            KeyCode::Char('m') => self.reveal_all = !self.reveal_all,
            KeyCode::Char('n') => {
                let from = self.id();
                let payload = self.storage_payload();
                self.deps
                    .navigator
                    .present_modal(from, Scene::WordListCreate, payload, true)?;
            }
            KeyCode::Char('e') => self.edit_selected()?,
            KeyCode::Char('t') => {
                let payload = self.storage_payload();
                self.deps
                    .navigator
                    .push(Surface::Main, Scene::Quiz, payload, true)?;
            }
            KeyCode::Char('d') if !self.items.is_empty() => {
                self.confirm_delete = true;
                self.status = Some(Status::Info(t!("word_list.confirm_delete").to_string()));
            }
            KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                self.deps.navigator.pop(Surface::Main, true)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let (right, wrong) = self.score();
        let title = format!(
            "{}  {}",
            self.title(),
            t!("word_list.score", right = right, wrong = wrong, total = self.items.len())
        );
        let inner = frame(area, buf, theme, &title);

        let lines: Vec<Line> = if self.items.is_empty() {
            vec![Line::from(Span::styled(
                t!("word_list.empty").to_string(),
                Style::default().fg(colors.text_pending()),
            ))]
        } else {
            self.items
                .iter()
                .enumerate()
                .map(|(i, word)| {
                    let selected = i == self.selection.index;
                    let mark_style = match word.mark {
                        Mark::Right => Style::default().fg(colors.success()),
                        Mark::Wrong => Style::default().fg(colors.error()),
                        Mark::Untested => Style::default().fg(colors.text_pending()),
                    };
                    let def_style = if selected {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    let meaning = if self.is_revealed(word.id) {
                        word.meaning.clone()
                    } else {
                        "·····".to_string()
                    };
                    Line::from(vec![
                        Span::raw(if selected { " > " } else { "   " }),
                        Span::styled(format!("{} ", word.mark.symbol()), mark_style),
                        Span::styled(word.definition.clone(), def_style),
                        Span::styled(format!("  {meaning}"), Style::default().fg(colors.text_pending())),
                    ])
                })
                .collect()
        };
        Paragraph::new(lines).render(inner, buf);
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        if self.confirm_delete {
            return vec![t!("hint.confirm").to_string()];
        }
        vec![
            t!("hint.flip").to_string(),
            t!("hint.reveal_all").to_string(),
            t!("hint.new").to_string(),
            t!("hint.edit").to_string(),
            t!("hint.quiz").to_string(),
            t!("hint.delete").to_string(),
            t!("hint.back").to_string(),
        ]
    }

    fn on_appear(&mut self) {
        self.refresh();
    }
}
