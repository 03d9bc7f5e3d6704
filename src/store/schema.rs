use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSet {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub position: u32,
}

/// Quiz outcome recorded on a word. Serialized as the short codes used by
/// the word list files (0 untested, 1 wrong, 2 right).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Mark {
    #[default]
    Untested,
    Wrong,
    Right,
}

impl Mark {
    pub fn code(self) -> u8 {
        match self {
            Mark::Untested => 0,
            Mark::Wrong => 1,
            Mark::Right => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Mark::Untested),
            1 => Some(Mark::Wrong),
            2 => Some(Mark::Right),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::Untested => " ",
            Mark::Wrong => "✗",
            Mark::Right => "✓",
        }
    }
}

impl From<Mark> for u8 {
    fn from(mark: Mark) -> Self {
        mark.code()
    }
}

impl TryFrom<u8> for Mark {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Mark::from_code(code).ok_or_else(|| format!("unknown mark code {code}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub definition: String,
    pub meaning: String,
    #[serde(default)]
    pub mark: Mark,
    pub parent_id: Uuid,
}

impl Word {
    pub fn new(parent_id: Uuid, definition: &str, meaning: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            definition: definition.trim().to_string(),
            meaning: meaning.trim().to_string(),
            mark: Mark::Untested,
            parent_id,
        }
    }

    pub fn with_mark(&self, mark: Mark) -> Self {
        Self {
            mark,
            ..self.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ko, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Language::Ko => "한국어",
            Language::En => "English",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    pub fn other(self) -> Self {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub source_language: Language,
    pub target_language: Language,
    pub source_text: String,
    pub translated_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WordSetData {
    pub schema_version: u32,
    pub sets: Vec<WordSet>,
}

impl Default for WordSetData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sets: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WordListData {
    pub schema_version: u32,
    pub parent_id: Uuid,
    pub title: String,
    pub words: Vec<Word>,
}

impl WordListData {
    pub fn new(parent_id: Uuid, title: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            parent_id,
            title: title.to_string(),
            words: Vec::new(),
        }
    }
}

/// Bookmarks are stored newest-first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookmarkData {
    pub schema_version: u32,
    pub bookmarks: Vec<Bookmark>,
}

impl Default for BookmarkData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bookmarks: Vec::new(),
        }
    }
}
