use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError, Navigator, Payload, Scene, Surface};
use crate::store::WordSetStorage;
use crate::store::schema::WordSet;
use crate::ui::screen::Screen;
use crate::ui::screens::{Selection, Status, frame, render_status};
use crate::ui::theme::Theme;

/// Top-level list of word sets.
pub struct SetListScreen {
    deps: Dependency,
    sets: Rc<dyn WordSetStorage>,
    items: Vec<WordSet>,
    selection: Selection,
    confirm_delete: bool,
    status: Option<Status>,
}

impl SetListScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let sets = deps.word_sets()?;
        let mut screen = Self {
            deps,
            sets,
            items: Vec::new(),
            selection: Selection::default(),
            confirm_delete: false,
            status: None,
        };
        screen.refresh();
        Ok(screen)
    }

    pub fn items(&self) -> &[WordSet] {
        &self.items
    }

    pub fn selected(&self) -> Option<&WordSet> {
        self.items.get(self.selection.index)
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    fn refresh(&mut self) {
        match self.sets.list() {
            Ok(items) => self.items = items,
            Err(e) => self.status = Some(Status::error(e)),
        }
        self.selection.clamp(self.items.len());
    }

    fn open_selected(&mut self) -> Result<(), NavError> {
        let Some(set) = self.selected() else {
            return Ok(());
        };
        let payload = Payload::TitledParent {
            title: set.title.clone(),
            parent_id: set.id,
        };
        self.deps
            .navigator
            .push(Surface::Main, Scene::WordList, payload, true)
    }

    fn delete_selected(&mut self) {
        let Some(set) = self.selected() else { return };
        let (id, title) = (set.id, set.title.clone());
        match self.sets.delete(id) {
            Ok(()) => {
                self.status = Some(Status::Info(t!("set_list.deleted", title = title).to_string()));
                self.refresh();
            }
            Err(e) => self.status = Some(Status::error(e)),
        }
    }

    fn move_selected(&mut self, up: bool) {
        let from = self.selection.index;
        let to = if up {
            match from.checked_sub(1) {
                Some(to) => to,
                None => return,
            }
        } else {
            if from + 1 >= self.items.len() {
                return;
            }
            from + 1
        };
        match self.sets.reorder(from, to) {
            Ok(()) => {
                self.refresh();
                self.selection.index = to;
            }
            Err(e) => self.status = Some(Status::error(e)),
        }
    }
}

impl Screen for SetListScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("set_list.title").to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        if self.confirm_delete {
            self.confirm_delete = false;
            if matches!(key.code, KeyCode::Char('y')) {
                self.delete_selected();
            } else {
                self.status = None;
            }
            return Ok(());
        }

        self.status = None;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(self.items.len()),
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(self.items.len()),
            KeyCode::Char('J') => self.move_selected(false),
            KeyCode::Char('K') => self.move_selected(true),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.open_selected()?,
            KeyCode::Char('n') => {
                let from = self.id();
                self.deps
                    .navigator
                    .present_modal(from, Scene::SetCreate, Payload::None, true)?;
            }
            KeyCode::Char('d') if self.selected().is_some() => {
                self.confirm_delete = true;
                let title = self.selected().map(|s| s.title.clone()).unwrap_or_default();
                self.status = Some(Status::Info(
                    t!("set_list.confirm_delete", title = title).to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let inner = frame(area, buf, theme, &self.title());

        let lines: Vec<Line> = if self.items.is_empty() {
            vec![Line::from(Span::styled(
                t!("set_list.empty").to_string(),
                Style::default().fg(colors.text_pending()),
            ))]
        } else {
            self.items
                .iter()
                .enumerate()
                .map(|(i, set)| {
                    let date = set.created_at.format("%Y-%m-%d").to_string();
                    if i == self.selection.index {
                        Line::from(vec![
                            Span::styled(
                                format!(" > {}", set.title),
                                Style::default()
                                    .fg(colors.accent())
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(format!("  {date}"), Style::default().fg(colors.text_pending())),
                        ])
                    } else {
                        Line::from(vec![
                            Span::styled(format!("   {}", set.title), Style::default().fg(colors.fg())),
                            Span::styled(format!("  {date}"), Style::default().fg(colors.text_pending())),
                        ])
                    }
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
            t!("hint.open").to_string(),
            t!("hint.new").to_string(),
            t!("hint.delete").to_string(),
            t!("hint.reorder").to_string(),
        ]
    }

    fn on_appear(&mut self) {
        self.refresh();
    }
}
