use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::nav::{Dependency, NavError};
use crate::store::BookmarkStorage;
use crate::store::schema::{Bookmark, Language};
use crate::translate::Translator;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::screen::Screen;
use crate::ui::screens::{Status, frame, render_status};
use crate::ui::theme::Theme;

pub struct TranslateScreen {
    deps: Dependency,
    bookmarks: Rc<dyn BookmarkStorage>,
    translator: Rc<dyn Translator>,
    source: Language,
    target: Language,
    input: LineInput,
    /// Last translation and the text it was made from.
    output: Option<(String, String)>,
    status: Option<Status>,
}

impl TranslateScreen {
    pub fn new(
        deps: Dependency,
        translator: Rc<dyn Translator>,
        source: Language,
        target: Language,
    ) -> Result<Self, NavError> {
        let bookmarks = deps.bookmarks()?;
        Ok(Self {
            deps,
            bookmarks,
            translator,
            source,
            target,
            input: LineInput::default(),
            output: None,
            status: None,
        })
    }

    pub fn languages(&self) -> (Language, Language) {
        (self.source, self.target)
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_ref().map(|(_, translated)| translated.as_str())
    }

    fn translate(&mut self) {
        match self
            .translator
            .translate(self.input.value(), self.source, self.target)
        {
            Ok(translated) => {
                self.output = Some((self.input.value().trim().to_string(), translated));
            }
            Err(e) => {
                self.output = None;
                self.status = Some(Status::error(e));
            }
        }
    }

    fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
        if let Some((_, translated)) = self.output.take() {
            self.input = LineInput::new(&translated);
        }
    }

    fn bookmark(&mut self) {
        let Some((source_text, translated_text)) = self.output.clone() else {
            self.status = Some(Status::Error(t!("translate.nothing_to_bookmark").to_string()));
            return;
        };
        let bookmark = Bookmark {
            source_language: self.source,
            target_language: self.target,
            source_text,
            translated_text,
        };
        match self.bookmarks.add(bookmark) {
            Ok(()) => self.status = Some(Status::Info(t!("translate.bookmarked").to_string())),
            Err(e) => self.status = Some(Status::error(e)),
        }
    }
}

impl Screen for TranslateScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("translate.title").to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        self.status = None;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => {
                    self.bookmark();
                    return Ok(());
                }
                KeyCode::Char('l') => {
                    self.swap_languages();
                    return Ok(());
                }
                _ => {}
            }
        }
        match self.input.handle(key) {
            InputResult::Submit => self.translate(),
            InputResult::Cancel => {
                self.input.clear();
                self.output = None;
            }
            InputResult::Continue => {}
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let inner = frame(area, buf, theme, &self.title());
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

        let label = Style::default().fg(colors.text_pending());
        Paragraph::new(Line::from(vec![
            Span::styled(
                self.source.title(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  →  ", label),
            Span::styled(self.target.title(), Style::default().fg(colors.accent())),
        ]))
        .render(rows[0], buf);

        Paragraph::new(self.input.styled_line(theme, true)).render(rows[2], buf);

        if let Some(translated) = self.output() {
            Paragraph::new(translated.to_string())
                .style(Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true })
                .render(rows[4], buf);
        }
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        vec![
            t!("hint.translate").to_string(),
            t!("hint.swap").to_string(),
            t!("hint.bookmark").to_string(),
            t!("hint.clear").to_string(),
        ]
    }

    fn captures_text(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;
    use crate::nav::testing::detached_handle;
    use crate::nav::{Provision, Scene, ScreenId};
    use crate::store::{StorageProvider, WordStorage};
    use crate::store::json_store::JsonStore;
    use crate::translate::WordBankTranslator;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn screen() -> (TempDir, TranslateScreen) {
        let dir = TempDir::new().unwrap();
        let store = Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        store
            .open_word_list("words", "animals", Uuid::new_v4())
            .unwrap()
            .create("cat", "고양이")
            .unwrap();
        let translator = Rc::new(WordBankTranslator::new(
            Rc::clone(&store) as Rc<dyn StorageProvider>,
            Language::En,
        ));
        let (navigator, _queue) = detached_handle();
        let deps = Dependency {
            scene: Scene::Translate,
            screen_id: ScreenId(2),
            navigator,
            provision: Provision::Bookmarks(store.bookmarks()),
        };
        let screen = TranslateScreen::new(deps, translator, Language::En, Language::Ko).unwrap();
        (dir, screen)
    }

    fn type_text(screen: &mut TranslateScreen, text: &str) {
        for ch in text.chars() {
            screen.handle_key(key(KeyCode::Char(ch))).unwrap();
        }
    }

    #[test]
    fn enter_translates_and_ctrl_b_bookmarks() {
        let (_dir, mut screen) = screen();
        type_text(&mut screen, "cat");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(screen.output(), Some("고양이"));

        screen.handle_key(ctrl('b')).unwrap();
        let saved = screen.bookmarks.list().unwrap();
        assert_eq!(
            saved,
            vec![Bookmark {
                source_language: Language::En,
                target_language: Language::Ko,
                source_text: "cat".to_string(),
                translated_text: "고양이".to_string(),
            }]
        );
    }

    #[test]
    fn bookmark_without_translation_is_refused() {
        let (_dir, mut screen) = screen();
        screen.handle_key(ctrl('b')).unwrap();
        assert!(matches!(screen.status, Some(Status::Error(_))));
        assert!(screen.bookmarks.list().unwrap().is_empty());
    }

    #[test]
    fn swap_moves_translation_into_input() {
        let (_dir, mut screen) = screen();
        type_text(&mut screen, "cat");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        screen.handle_key(ctrl('l')).unwrap();

        assert_eq!(screen.languages(), (Language::Ko, Language::En));
        assert_eq!(screen.input.value(), "고양이");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(screen.output(), Some("cat"));
    }

    #[test]
    fn unknown_text_shows_error() {
        let (_dir, mut screen) = screen();
        type_text(&mut screen, "zebra");
        screen.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(screen.output(), None);
        assert!(matches!(screen.status, Some(Status::Error(_))));
    }
}
