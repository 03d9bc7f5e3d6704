pub mod generator;
pub mod session;

use icu_normalizer::ComposingNormalizerBorrowed;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::store::schema::Word;

pub use generator::QuizGenerator;
pub use session::{AnswerOutcome, QuizPhase, QuizSession};

/// Which side of a word is shown as the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizDirection {
    #[default]
    DefinitionToMeaning,
    MeaningToDefinition,
}

impl QuizDirection {
    pub fn prompt(self, word: &Word) -> &str {
        match self {
            QuizDirection::DefinitionToMeaning => &word.definition,
            QuizDirection::MeaningToDefinition => &word.meaning,
        }
    }

    pub fn answer(self, word: &Word) -> &str {
        match self {
            QuizDirection::DefinitionToMeaning => &word.meaning,
            QuizDirection::MeaningToDefinition => &word.definition,
        }
    }
}

/// How the next target word is picked among words not asked yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizOrder {
    #[default]
    Sequential,
    Random,
}

/// One multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestWord {
    pub target: Word,
    pub distractors: Vec<Word>,
    pub direction: QuizDirection,
    /// Answer texts of target and distractors, in display order.
    pub choices: Vec<String>,
}

impl TestWord {
    pub fn prompt(&self) -> &str {
        self.direction.prompt(&self.target)
    }

    pub fn answer(&self) -> &str {
        self.direction.answer(&self.target)
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        normalize_answer(selected) == normalize_answer(self.answer())
    }

    pub fn answer_index(&self) -> Option<usize> {
        self.choices.iter().position(|c| self.is_correct(c))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSummary {
    pub total: usize,
    pub right: Vec<Word>,
    pub wrong: Vec<Word>,
}

impl QuizSummary {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.right.len() as f64 / self.total as f64 * 100.0
    }
}

pub const DEFAULT_DISTRACTORS: usize = 3;

/// How quizzes are generated. Built from the user config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    pub distractor_count: usize,
    pub order: QuizOrder,
    pub direction: QuizDirection,
    /// Fixed seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            distractor_count: DEFAULT_DISTRACTORS,
            order: QuizOrder::default(),
            direction: QuizDirection::default(),
            seed: None,
        }
    }
}

impl QuizSettings {
    pub fn generator(&self) -> QuizGenerator<SmallRng> {
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        QuizGenerator::new(rng, self.distractor_count, self.order, self.direction)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no question is waiting for an answer")]
    NoQuestion,
}

/// Canonical form used to compare answers: NFC, collapsed whitespace, lowercase.
pub fn normalize_answer(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(&collapsed)
        .to_lowercase()
}
