use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::nav::{Dependency, NavError, Navigator, Surface};
use crate::quiz::QuizSummary;
use crate::ui::screen::Screen;
use crate::ui::screens::frame;
use crate::ui::theme::Theme;

pub struct QuizResultScreen {
    deps: Dependency,
    summary: QuizSummary,
}

impl QuizResultScreen {
    pub fn new(deps: Dependency) -> Result<Self, NavError> {
        let summary = deps.results()?;
        Ok(Self { deps, summary })
    }

    pub fn summary(&self) -> &QuizSummary {
        &self.summary
    }
}

impl Screen for QuizResultScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("quiz_result.title").to_string()
    }

    /// Confirming closes the result and leaves the quiz it was shown over.
    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            let id = self.id();
            self.deps.navigator.dismiss(id, true)?;
            self.deps.navigator.pop(Surface::Main, true)?;
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        Clear.render(area, buf);
        let inner = frame(area, buf, theme, &self.title());
        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let score = t!(
            "quiz_result.score",
            total = self.summary.total,
            right = self.summary.right.len()
        );
        Paragraph::new(Line::from(Span::styled(
            score.to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(rows[0], buf);

        Paragraph::new(format!("{:.0}%", self.summary.accuracy()))
            .style(Style::default().fg(colors.text_pending()))
            .alignment(Alignment::Center)
            .render(rows[1], buf);

        if !self.summary.wrong.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                t!("quiz_result.review").to_string(),
                Style::default().fg(colors.warning()),
            ))];
            lines.extend(self.summary.wrong.iter().map(|word| {
                Line::from(vec![
                    Span::styled(
                        format!("  {} ", word.mark.symbol()),
                        Style::default().fg(colors.error()),
                    ),
                    Span::styled(word.definition.clone(), Style::default().fg(colors.fg())),
                    Span::styled(
                        format!("  {}", word.meaning),
                        Style::default().fg(colors.text_pending()),
                    ),
                ])
            }));
            Paragraph::new(lines).render(rows[2], buf);
        }
    }

    fn hints(&self) -> Vec<String> {
        vec![t!("hint.ok").to_string()]
    }
}
