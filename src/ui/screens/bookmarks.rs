use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError};
use crate::store::BookmarkStorage;
use crate::store::schema::Bookmark;
use crate::ui::screen::Screen;
use crate::ui::screens::{Selection, Status, frame, render_status};
use crate::ui::theme::Theme;

/// Saved translations, newest first.
pub struct BookmarksScreen {
    deps: Dependency,
    bookmarks: Rc<dyn BookmarkStorage>,
    items: Vec<Bookmark>,
    selection: Selection,
    status: Option<Status>,
}

impl BookmarksScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let bookmarks = deps.bookmarks()?;
        let mut screen = Self {
            deps,
            bookmarks,
            items: Vec::new(),
            selection: Selection::default(),
            status: None,
        };
        screen.refresh();
        Ok(screen)
    }

    pub fn items(&self) -> &[Bookmark] {
        &self.items
    }

    fn refresh(&mut self) {
        match self.bookmarks.list() {
            Ok(items) => self.items = items,
            Err(e) => self.status = Some(Status::error(e)),
        }
        self.selection.clamp(self.items.len());
    }

    fn remove_selected(&mut self) {
        if self.items.is_empty() {
            return;
        }
        match self.bookmarks.remove(self.selection.index) {
            Ok(removed) => {
                tracing::debug!(source = %removed.source_text, "bookmark removed");
                self.refresh();
            }
            Err(e) => self.status = Some(Status::error(e)),
        }
    }
}

impl Screen for BookmarksScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("bookmarks.title").to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        self.status = None;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(self.items.len()),
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(self.items.len()),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let inner = frame(area, buf, theme, &self.title());

        let lines: Vec<Line> = if self.items.is_empty() {
            vec![Line::from(Span::styled(
                t!("bookmarks.empty").to_string(),
                Style::default().fg(colors.text_pending()),
            ))]
        } else {
            self.items
                .iter()
                .enumerate()
                .flat_map(|(i, bookmark)| {
                    let selected = i == self.selection.index;
                    let source_style = if selected {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    [
                        Line::from(vec![
                            Span::raw(if selected { " > " } else { "   " }),
                            Span::styled(
                                format!("[{}] ", bookmark.source_language.code()),
                                Style::default().fg(colors.text_pending()),
                            ),
                            Span::styled(bookmark.source_text.clone(), source_style),
                        ]),
                        Line::from(vec![
                            Span::raw("   "),
                            Span::styled(
                                format!("[{}] ", bookmark.target_language.code()),
                                Style::default().fg(colors.text_pending()),
                            ),
                            Span::styled(
                                bookmark.translated_text.clone(),
                                Style::default().fg(colors.fg()),
                            ),
                        ]),
                    ]
                })
                .collect()
        };
        Paragraph::new(lines).render(inner, buf);
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        vec![t!("hint.delete").to_string(), t!("hint.refresh").to_string()]
    }

    fn on_appear(&mut self) {
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    use super::*;
    use crate::nav::testing::detached_handle;
    use crate::nav::{Provision, Scene, ScreenId};
    use crate::store::StorageProvider;
    use crate::store::json_store::JsonStore;
    use crate::store::schema::Language;

    fn bookmark(source: &str, translated: &str) -> Bookmark {
        Bookmark {
            source_language: Language::En,
            target_language: Language::Ko,
            source_text: source.to_string(),
            translated_text: translated.to_string(),
        }
    }

    fn screen() -> (TempDir, BookmarksScreen) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let bookmarks = store.bookmarks();
        bookmarks.add(bookmark("cat", "고양이")).unwrap();
        bookmarks.add(bookmark("dog", "개")).unwrap();
        let (navigator, _queue) = detached_handle();
        let deps = Dependency {
            scene: Scene::Bookmarks,
            screen_id: ScreenId(4),
            navigator,
            provision: Provision::Bookmarks(bookmarks),
        };
        (dir, BookmarksScreen::new(deps).unwrap())
    }

    #[test]
    fn lists_newest_first() {
        let (_dir, screen) = screen();
        let sources: Vec<&str> = screen.items().iter().map(|b| b.source_text.as_str()).collect();
        assert_eq!(sources, vec!["dog", "cat"]);
    }

    #[test]
    fn d_removes_selected_bookmark() {
        let (_dir, mut screen) = screen();
        screen
            .handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
            .unwrap();
        screen
            .handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(screen.items(), &[bookmark("dog", "개")]);
        assert_eq!(screen.bookmarks.list().unwrap().len(), 1);
    }

    #[test]
    fn appear_shows_bookmarks_added_elsewhere() {
        let (_dir, mut screen) = screen();
        screen.bookmarks.add(bookmark("bird", "새")).unwrap();
        screen.on_appear();
        assert_eq!(screen.items()[0].source_text, "bird");
    }
}
