pub mod json_store;
pub mod schema;

use std::rc::Rc;

use uuid::Uuid;

use crate::store::schema::{Bookmark, Word, WordSet};

/// Directory (model) the word lists of word sets live under.
pub const WORD_MODEL: &str = "words";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no record with id {0}")]
    NotFound(Uuid),
    #[error("index {index} out of range for {len} records")]
    InvalidIndex { index: usize, len: usize },
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level collection of word sets.
pub trait WordSetStorage {
    fn create(&self, title: &str) -> StoreResult<WordSet>;
    /// Sets ordered by their `position`.
    fn list(&self) -> StoreResult<Vec<WordSet>>;
    fn delete(&self, id: Uuid) -> StoreResult<()>;
    /// Move the set at `from` to `to` and renumber positions.
    fn reorder(&self, from: usize, to: usize) -> StoreResult<()>;
}

/// Words belonging to one word set.
pub trait WordStorage {
    fn title(&self) -> &str;
    fn parent_id(&self) -> Uuid;
    fn create(&self, definition: &str, meaning: &str) -> StoreResult<Word>;
    fn list(&self) -> StoreResult<Vec<Word>>;
    fn update(&self, word: &Word) -> StoreResult<()>;
    fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Saved translations, newest first. Every mutation rewrites the whole list.
pub trait BookmarkStorage {
    fn list(&self) -> StoreResult<Vec<Bookmark>>;
    fn add(&self, bookmark: Bookmark) -> StoreResult<()>;
    fn remove(&self, index: usize) -> StoreResult<Bookmark>;
}

/// Locates the stores a screen needs.
pub trait StorageProvider {
    fn word_sets(&self) -> Rc<dyn WordSetStorage>;
    fn bookmarks(&self) -> Rc<dyn BookmarkStorage>;
    /// Open the word list of `parent_id`, creating it when missing.
    fn open_word_list(
        &self,
        model: &str,
        title: &str,
        parent_id: Uuid,
    ) -> StoreResult<Rc<dyn WordStorage>>;
    /// Every word of every list, read-only.
    fn word_bank(&self) -> StoreResult<Vec<Word>>;
}
