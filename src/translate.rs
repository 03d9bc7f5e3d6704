//! Offline translation backed by the user's own word lists.

use std::collections::HashMap;
use std::rc::Rc;

use crate::quiz::normalize_answer;
use crate::store::schema::Language;
use crate::store::{StorageProvider, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("nothing to translate")]
    EmptyInput,
    #[error("no known translation for \"{0}\"")]
    Unknown(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub trait Translator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String, TranslateError>;
}

/// Looks text up in every stored word. The whole phrase is tried first,
/// then each whitespace-separated token; unknown tokens are kept as typed.
pub struct WordBankTranslator {
    provider: Rc<dyn StorageProvider>,
    /// Language the `definition` side of stored words is written in.
    definition_language: Language,
}

impl WordBankTranslator {
    pub fn new(provider: Rc<dyn StorageProvider>, definition_language: Language) -> Self {
        Self {
            provider,
            definition_language,
        }
    }

    fn dictionary(&self, from: Language) -> Result<HashMap<String, String>, StoreError> {
        let forward = from == self.definition_language;
        let mut dictionary = HashMap::new();
        for word in self.provider.word_bank()? {
            let (key, value) = if forward {
                (word.definition, word.meaning)
            } else {
                (word.meaning, word.definition)
            };
            dictionary.entry(normalize_answer(&key)).or_insert(value);
        }
        Ok(dictionary)
    }
}

fn lookup<'a>(dictionary: &'a HashMap<String, String>, token: &str) -> Option<&'a String> {
    dictionary.get(&normalize_answer(token)).or_else(|| {
        let bare = token.trim_matches(|c: char| c.is_ascii_punctuation());
        dictionary.get(&normalize_answer(bare))
    })
}

impl Translator for WordBankTranslator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String, TranslateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }
        if from == to {
            return Ok(text.to_string());
        }

        let dictionary = self.dictionary(from)?;
        if let Some(phrase) = lookup(&dictionary, text) {
            return Ok(phrase.clone());
        }

        let mut matched = 0;
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(|token| match lookup(&dictionary, token) {
                Some(found) => {
                    matched += 1;
                    found.as_str()
                }
                None => token,
            })
            .collect();
        if matched == 0 {
            return Err(TranslateError::Unknown(text.to_string()));
        }
        tracing::debug!(
            from = from.code(),
            to = to.code(),
            matched,
            tokens = tokens.len(),
            "translated from word bank"
        );
        Ok(tokens.join(" "))
    }
}
