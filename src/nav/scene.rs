use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::quiz::QuizSummary;
use crate::store::WordStorage;
use crate::store::schema::Word;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scene {
    SetList,
    SetCreate,
    WordList,
    WordListCreate,
    Quiz,
    QuizResult,
    Translate,
    Bookmarks,
    Tabs,
}

impl Scene {
    pub const ALL: [Scene; 9] = [
        Scene::SetList,
        Scene::SetCreate,
        Scene::WordList,
        Scene::WordListCreate,
        Scene::Quiz,
        Scene::QuizResult,
        Scene::Translate,
        Scene::Bookmarks,
        Scene::Tabs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scene::SetList => "set-list",
            Scene::SetCreate => "set-create",
            Scene::WordList => "word-list",
            Scene::WordListCreate => "word-list-create",
            Scene::Quiz => "quiz",
            Scene::QuizResult => "quiz-result",
            Scene::Translate => "translate",
            Scene::Bookmarks => "bookmarks",
            Scene::Tabs => "tabs",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigation stack managed by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Main,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Main => f.write_str("main"),
        }
    }
}

/// Context handed along with a scene request.
#[derive(Clone)]
pub enum Payload {
    None,
    /// Selects the word list of one word set; storage is opened by the coordinator.
    TitledParent { title: String, parent_id: Uuid },
    /// An already opened word list.
    Storage(Rc<dyn WordStorage>),
    /// A word of an opened list, to be edited in place.
    Editing {
        storage: Rc<dyn WordStorage>,
        word: Word,
    },
    Results(QuizSummary),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::None => "empty",
            Payload::TitledParent { .. } => "titled-parent",
            Payload::Storage(_) => "storage",
            Payload::Editing { .. } => "editing",
            Payload::Results(_) => "results",
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::TitledParent { title, parent_id } => f
                .debug_struct("TitledParent")
                .field("title", title)
                .field("parent_id", parent_id)
                .finish(),
            Payload::Storage(storage) => f
                .debug_tuple("Storage")
                .field(&storage.parent_id())
                .finish(),
            Payload::Editing { storage, word } => f
                .debug_struct("Editing")
                .field("parent_id", &storage.parent_id())
                .field("word", word)
                .finish(),
            Payload::Results(summary) => f.debug_tuple("Results").field(summary).finish(),
        }
    }
}
