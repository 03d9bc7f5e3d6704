use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::quiz::{QuizError, QuizGenerator, QuizSummary, TestWord};
use crate::store::schema::{Mark, Word};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    QuestionReady,
    AwaitingAnswer,
    Answered,
    SessionComplete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// The target word with its mark updated; persisting it is up to the caller.
    pub word: Word,
}

pub struct QuizSession<R: Rng> {
    generator: QuizGenerator<R>,
    pool: Vec<Word>,
    asked: HashSet<Uuid>,
    current: Option<TestWord>,
    right: Vec<Word>,
    wrong: Vec<Word>,
    phase: QuizPhase,
}

impl<R: Rng> QuizSession<R> {
    pub fn new(generator: QuizGenerator<R>, pool: Vec<Word>) -> Self {
        Self {
            generator,
            pool,
            asked: HashSet::new(),
            current: None,
            right: Vec::new(),
            wrong: Vec::new(),
            phase: QuizPhase::Idle,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&TestWord> {
        self.current.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::SessionComplete
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn asked_count(&self) -> usize {
        self.asked.len()
    }

    pub fn answered_count(&self) -> usize {
        self.right.len() + self.wrong.len()
    }

    /// Advance to the next question. A question that has not been answered
    /// yet is returned again rather than skipped.
    pub fn next_question(&mut self) -> Option<&TestWord> {
        match self.phase {
            QuizPhase::SessionComplete => return None,
            QuizPhase::QuestionReady | QuizPhase::AwaitingAnswer => return self.current.as_ref(),
            QuizPhase::Idle | QuizPhase::Answered => {}
        }

        match self.generator.next_question(&self.pool, &self.asked) {
            Some(question) => {
                self.asked.insert(question.target.id);
                self.current = Some(question);
                self.phase = QuizPhase::QuestionReady;
                self.current.as_ref()
            }
            None => {
                tracing::debug!(
                    total = self.asked.len(),
                    right = self.right.len(),
                    "quiz session complete"
                );
                self.current = None;
                self.phase = QuizPhase::SessionComplete;
                None
            }
        }
    }

    /// Mark the pending question as shown to the user.
    pub fn present(&mut self) -> Option<&TestWord> {
        if self.phase == QuizPhase::QuestionReady {
            self.phase = QuizPhase::AwaitingAnswer;
        }
        match self.phase {
            QuizPhase::AwaitingAnswer => self.current.as_ref(),
            _ => None,
        }
    }

    pub fn record_answer(&mut self, selected: &str) -> Result<AnswerOutcome, QuizError> {
        if !matches!(
            self.phase,
            QuizPhase::QuestionReady | QuizPhase::AwaitingAnswer
        ) {
            return Err(QuizError::NoQuestion);
        }
        let question = self.current.as_ref().ok_or(QuizError::NoQuestion)?;

        let correct = question.is_correct(selected);
        let word = if correct {
            question.target.with_mark(Mark::Right)
        } else {
            question.target.with_mark(Mark::Wrong)
        };

        if correct {
            self.right.push(word.clone());
        } else {
            self.wrong.push(word.clone());
        }
        self.phase = QuizPhase::Answered;

        Ok(AnswerOutcome { correct, word })
    }

    pub fn right(&self) -> &[Word] {
        &self.right
    }

    pub fn wrong(&self) -> &[Word] {
        &self.wrong
    }

    /// Available only after the session has completed.
    pub fn summary(&self) -> Option<QuizSummary> {
        if !self.is_complete() {
            return None;
        }
        Some(QuizSummary {
            total: self.asked.len(),
            right: self.right.clone(),
            wrong: self.wrong.clone(),
        })
    }
}
