use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use crate::compose::Composition;
use crate::config::Config;
use crate::nav::{Coordinator, NavError, Presentation, Scene, Surface};
use crate::store::StorageProvider;
use crate::translate::WordBankTranslator;
use crate::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use crate::ui::screen::Screen;
use crate::ui::theme::Theme;

/// The terminal window. Activation only flips the started flag the draw
/// loop waits on.
pub struct TerminalPresentation {
    started: Rc<Cell<bool>>,
}

impl Presentation for TerminalPresentation {
    fn make_active(&mut self) {
        if !self.started.replace(true) {
            tracing::debug!("presentation active");
        }
    }
}

pub struct App {
    pub coordinator: Coordinator,
    pub theme: Theme,
    pub config: Config,
    /// Last navigation failure, shown in the footer until the next key.
    pub notice: Option<String>,
    pub should_quit: bool,
    started: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: Config, storage: Rc<dyn StorageProvider>) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });
        let composition = Composition {
            quiz: config.quiz_settings(),
            translator: Rc::new(WordBankTranslator::new(
                Rc::clone(&storage),
                config.source_language,
            )),
            source_language: config.source_language,
            target_language: config.target_language,
        };
        Self::with_composition(config, theme, storage, &composition)
    }

    pub fn with_composition(
        config: Config,
        theme: Theme,
        storage: Rc<dyn StorageProvider>,
        composition: &Composition,
    ) -> Self {
        let started = Rc::new(Cell::new(false));
        let presentation = TerminalPresentation {
            started: Rc::clone(&started),
        };
        let coordinator = Coordinator::new(composition.registry(), storage, Box::new(presentation));
        Self {
            coordinator,
            theme,
            config,
            notice: None,
            should_quit: false,
            started,
        }
    }

    /// Install the home tabs as the root screen.
    pub fn start(&mut self) -> Result<(), NavError> {
        self.coordinator.reset_root(Scene::Tabs, false)?;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started.get()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        self.notice = None;
        let Some(screen) = self.coordinator.visible_mut() else {
            self.should_quit = true;
            return;
        };
        if key.code == KeyCode::Char('q') && !screen.captures_text() {
            self.should_quit = true;
            return;
        }
        if let Err(e) = screen.handle_key(key) {
            tracing::error!(scene = %screen.scene(), "key handling failed: {e}");
            self.notice = Some(e.to_string());
        }

        if let Some(e) = self.coordinator.drain().pop() {
            self.notice = Some(e.to_string());
        }
    }

    pub fn visible(&self) -> Option<&dyn Screen> {
        self.coordinator.visible()
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let colors = &self.theme.colors;
        frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

        let hints: Vec<String> = self.visible().map(|s| s.hints()).unwrap_or_default();
        let mut hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
        let quit = t!("hint.quit").to_string();
        hint_refs.push(&quit);
        let footer_lines = match &self.notice {
            Some(_) => vec![],
            None => pack_hint_lines(&hint_refs, area.width as usize),
        };
        let layout = AppLayout::new(area, footer_lines.len().max(1) as u16);

        let crumbs = self.coordinator.breadcrumbs().join(" › ");
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", t!("app.name")),
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {crumbs}"), Style::default().fg(colors.header_fg())),
        ]))
        .style(Style::default().bg(colors.header_bg()));
        frame.render_widget(header, layout.header);

        let buf = frame.buffer_mut();
        for (i, screen) in self.coordinator.layers().into_iter().enumerate() {
            let target = if i == 0 {
                layout.main
            } else {
                modal_area(layout.main, i)
            };
            screen.render(target, buf, &self.theme);
        }

        let footer = match &self.notice {
            Some(notice) => Paragraph::new(Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(colors.error()),
            ))),
            None => Paragraph::new(
                footer_lines
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
                    .collect::<Vec<_>>(),
            ),
        };
        frame.render_widget(footer, layout.footer);
    }

    pub fn depth(&self) -> usize {
        self.coordinator.depth(Surface::Main)
    }
}

/// Each stacked modal is inset a little further than the one below it.
fn modal_area(main: Rect, level: usize) -> Rect {
    let inset = (level as u16 - 1).saturating_mul(2);
    let popup = centered_rect(60, 50, main);
    Rect::new(
        popup.x.saturating_add(inset),
        popup.y.saturating_add(inset / 2),
        popup.width.saturating_sub(inset * 2),
        popup.height.saturating_sub(inset),
    )
}
