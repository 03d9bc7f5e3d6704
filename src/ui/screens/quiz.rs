use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::SmallRng;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::nav::{Dependency, NavError, Navigator, Payload, Scene, Surface};
use crate::quiz::{QuizSession, QuizSettings, TestWord};
use crate::store::WordStorage;
use crate::ui::screen::Screen;
use crate::ui::screens::{Selection, Status, frame, render_status};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Feedback {
    chosen: usize,
    correct: bool,
}

/// Multiple-choice quiz over one word list. Marks are written back as
/// each answer is recorded.
pub struct QuizScreen {
    deps: Dependency,
    words: Rc<dyn WordStorage>,
    session: QuizSession<SmallRng>,
    selection: Selection,
    feedback: Option<Feedback>,
    status: Option<Status>,
}

impl QuizScreen {
    pub fn new(deps: Dependency, settings: QuizSettings) -> Result<Self, NavError> {
        let words = deps.words()?;
        let pool = words.list()?;
        tracing::info!(
            parent_id = %words.parent_id(),
            words = pool.len(),
            k = settings.distractor_count,
            "quiz started"
        );
        let session = QuizSession::new(settings.generator(), pool);
        let mut screen = Self {
            deps,
            words,
            session,
            selection: Selection::default(),
            feedback: None,
            status: None,
        };
        screen.advance()?;
        Ok(screen)
    }

    pub fn session(&self) -> &QuizSession<SmallRng> {
        &self.session
    }

    fn question(&self) -> Option<&TestWord> {
        self.session.current()
    }

    fn advance(&mut self) -> Result<(), NavError> {
        self.feedback = None;
        self.selection = Selection::default();
        if self.session.next_question().is_some() {
            self.session.present();
            return Ok(());
        }
        // An empty list never had a question; there is nothing to report.
        if self.session.pool_len() == 0 {
            return Ok(());
        }
        match self.session.summary() {
            Some(summary) => {
                let from = self.id();
                self.deps.navigator.present_modal(
                    from,
                    Scene::QuizResult,
                    Payload::Results(summary),
                    true,
                )
            }
            None => Ok(()),
        }
    }

    fn answer(&mut self, index: usize) {
        let Some(choice) = self.question().and_then(|q| q.choices.get(index)).cloned() else {
            return;
        };
        match self.session.record_answer(&choice) {
            Ok(outcome) => {
                self.feedback = Some(Feedback {
                    chosen: index,
                    correct: outcome.correct,
                });
                if let Err(e) = self.words.update(&outcome.word) {
                    self.status = Some(Status::error(e));
                }
            }
            Err(e) => self.status = Some(Status::error(e)),
        }
    }

    fn render_question(&self, question: &TestWord, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let colors = &theme.colors;
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);

        let progress = t!(
            "quiz.progress",
            current = self.session.asked_count(),
            total = self.session.pool_len()
        );
        Paragraph::new(progress.to_string())
            .style(Style::default().fg(colors.text_pending()))
            .alignment(Alignment::Right)
            .render(rows[0], buf);

        Paragraph::new(question.prompt().to_string())
            .style(
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rows[1], buf);

        let answer_index = question.answer_index();
        let choices: Vec<Line> = question
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let style = match self.feedback {
                    Some(_) if Some(i) == answer_index => Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                    Some(fb) if fb.chosen == i => Style::default().fg(colors.error()),
                    Some(_) => Style::default().fg(colors.text_pending()),
                    None if i == self.selection.index => Style::default()
                        .fg(colors.bg())
                        .bg(colors.accent()),
                    None => Style::default().fg(colors.fg()),
                };
                Line::from(Span::styled(format!(" {}. {choice} ", i + 1), style))
            })
            .collect();
        Paragraph::new(choices).render(rows[2], buf);

        if let Some(fb) = self.feedback {
            let line = if fb.correct {
                Span::styled(
                    t!("quiz.correct").to_string(),
                    Style::default().fg(colors.success()),
                )
            } else {
                Span::styled(
                    t!("quiz.wrong", answer = question.answer()).to_string(),
                    Style::default().fg(colors.error()),
                )
            };
            Paragraph::new(Line::from(line))
                .alignment(Alignment::Center)
                .render(rows[3], buf);
        }
    }
}

impl Screen for QuizScreen {
    fn dependency(&self) -> &Dependency {
        &self.deps
    }

    fn title(&self) -> String {
        t!("quiz.title", title = self.words.title()).to_string()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        if matches!(key.code, KeyCode::Esc) {
            return self.deps.navigator.pop(Surface::Main, true);
        }
        if self.session.is_complete() {
            if matches!(key.code, KeyCode::Enter) {
                return self.deps.navigator.pop(Surface::Main, true);
            }
            return Ok(());
        }

        if self.feedback.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right) {
                self.status = None;
                self.advance()?;
            }
            return Ok(());
        }

        let len = self.question().map_or(0, |q| q.choices.len());
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.selection.next(len),
            KeyCode::Up | KeyCode::Char('k') => self.selection.prev(len),
            KeyCode::Enter => self.answer(self.selection.index),
            KeyCode::Char(ch) => {
                if let Some(n) = ch.to_digit(10).filter(|n| (1..=len as u32).contains(n)) {
                    self.answer(n as usize - 1);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let inner = frame(area, buf, theme, &self.title());
        match self.question() {
            Some(question) => self.render_question(question, inner, buf, theme),
            None => {
                let message = if self.session.pool_len() == 0 {
                    t!("quiz.empty")
                } else {
                    t!("quiz.finished")
                };
                Paragraph::new(message.to_string())
                    .style(Style::default().fg(theme.colors.text_pending()))
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
        }
        render_status(self.status.as_ref(), inner, buf, theme);
    }

    fn hints(&self) -> Vec<String> {
        if self.feedback.is_some() {
            vec![t!("hint.next_question").to_string(), t!("hint.back").to_string()]
        } else if self.session.is_complete() {
            vec![t!("hint.back").to_string()]
        } else {
            vec![
                t!("hint.choose").to_string(),
                t!("hint.answer").to_string(),
                t!("hint.back").to_string(),
            ]
        }
    }
}
