use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Tabs, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError};
use crate::ui::screen::Screen;
use crate::ui::theme::Theme;

/// Root container switching between the home screens. Children share the
/// container's id, so their modals are presented over the container.
pub struct TabsScreen {
    deps: Dependency,
    children: Vec<Box<dyn Screen>>,
    active: usize,
}

impl TabsScreen {
    pub fn new(deps: Dependency, children: Vec<Box<dyn Screen>>) -> Self {
        Self {
            deps,
            children,
            active: 0,
        }
    }

    pub fn active(&self) -> Option<&dyn Screen> {
        self.children.get(self.active).map(|c| c.as_ref())
    }

    pub fn select(&mut self, index: usize) {
        if index >= self.children.len() || index == self.active {
            return;
        }
        self.active = index;
        if let Some(child) = self.children.get_mut(index) {
            tracing::debug!(scene = %child.scene(), "tab selected");
            child.on_appear();
        }
    }

    fn step(&mut self, forward: bool) {
        let len = self.children.len();
        if len == 0 {
            return;
        }
        let next = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
        self.select(next);
    }
}

impl Screen for TabsScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        self.active()
            .map(|c| c.title())
            .unwrap_or_else(|| t!("app.name").to_string())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        match key.code {
            KeyCode::Tab => self.step(true),
            KeyCode::BackTab => self.step(false),
            _ => {
                if let Some(child) = self.children.get_mut(self.active) {
                    child.handle_key(key)?;
                }
            }
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

        let titles: Vec<String> = self.children.iter().map(|c| c.title()).collect();
        Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(colors.text_pending()).bg(colors.bg()))
            .highlight_style(
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .render(rows[0], buf);

        if let Some(child) = self.active() {
            child.render(rows[1], buf, theme);
        }
    }

    fn hints(&self) -> Vec<String> {
        let mut hints = vec![t!("hint.tabs").to_string()];
        if let Some(child) = self.active() {
            hints.extend(child.hints());
        }
        hints
    }

    fn captures_text(&self) -> bool {
        self.active().is_some_and(|c| c.captures_text())
    }

    fn on_appear(&mut self) {
        if let Some(child) = self.children.get_mut(self.active) {
            child.on_appear();
        }
    }
}
