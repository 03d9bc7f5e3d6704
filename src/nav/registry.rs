use std::collections::HashMap;
use std::rc::Rc;

use crate::nav::{NavError, NavHandle, Scene, ScreenId};
use crate::quiz::QuizSummary;
use crate::store::schema::Word;
use crate::store::{BookmarkStorage, WordSetStorage, WordStorage};
use crate::ui::screen::Screen;

/// Storage (or data) a screen is built with.
#[derive(Clone)]
pub enum Provision {
    Sets(Rc<dyn WordSetStorage>),
    Words(Rc<dyn WordStorage>),
    /// A word list plus the word being edited.
    Editing {
        words: Rc<dyn WordStorage>,
        word: Word,
    },
    Bookmarks(Rc<dyn BookmarkStorage>),
    Home {
        sets: Rc<dyn WordSetStorage>,
        bookmarks: Rc<dyn BookmarkStorage>,
    },
    Results(QuizSummary),
}

impl Provision {
    pub fn kind(&self) -> &'static str {
        match self {
            Provision::Sets(_) => "sets",
            Provision::Words(_) => "words",
            Provision::Editing { .. } => "editing",
            Provision::Bookmarks(_) => "bookmarks",
            Provision::Home { .. } => "home",
            Provision::Results(_) => "results",
        }
    }
}

/// Everything a screen receives at construction.
#[derive(Clone)]
pub struct Dependency {
    pub scene: Scene,
    pub screen_id: ScreenId,
    pub navigator: NavHandle,
    pub provision: Provision,
}

impl Dependency {
    /// Bundle for a screen embedded in this one (tab children). Children
    /// share the container's id so modals are presented over the container.
    pub fn child(&self, scene: Scene, provision: Provision) -> Self {
        Self {
            scene,
            screen_id: self.screen_id,
            navigator: self.navigator.clone(),
            provision,
        }
    }

    fn mismatch(&self) -> NavError {
        NavError::UnresolvableScene {
            scene: self.scene,
            payload: self.provision.kind(),
        }
    }

    pub fn word_sets(&self) -> Result<Rc<dyn WordSetStorage>, NavError> {
        match &self.provision {
            Provision::Sets(sets) | Provision::Home { sets, .. } => Ok(Rc::clone(sets)),
            _ => Err(self.mismatch()),
        }
    }

    pub fn words(&self) -> Result<Rc<dyn WordStorage>, NavError> {
        match &self.provision {
            Provision::Words(words) | Provision::Editing { words, .. } => Ok(Rc::clone(words)),
            _ => Err(self.mismatch()),
        }
    }

    /// The word to prefill when the screen edits rather than creates.
    pub fn editing(&self) -> Option<&Word> {
        match &self.provision {
            Provision::Editing { word, .. } => Some(word),
            _ => None,
        }
    }

    pub fn bookmarks(&self) -> Result<Rc<dyn BookmarkStorage>, NavError> {
        match &self.provision {
            Provision::Bookmarks(bookmarks) | Provision::Home { bookmarks, .. } => {
                Ok(Rc::clone(bookmarks))
            }
            _ => Err(self.mismatch()),
        }
    }

    pub fn results(&self) -> Result<QuizSummary, NavError> {
        match &self.provision {
            Provision::Results(summary) => Ok(summary.clone()),
            _ => Err(self.mismatch()),
        }
    }
}

pub type SceneBuilder = Box<dyn Fn(Dependency) -> Result<Box<dyn Screen>, NavError>>;

/// Scene to builder table, assembled once at startup.
#[derive(Default)]
pub struct SceneRegistry {
    builders: HashMap<Scene, SceneBuilder>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, scene: Scene, builder: F) -> Self
    where
        F: Fn(Dependency) -> Result<Box<dyn Screen>, NavError> + 'static,
    {
        if self.builders.insert(scene, Box::new(builder)).is_some() {
            tracing::warn!(%scene, "scene builder replaced");
        }
        self
    }

    pub fn get(&self, scene: Scene) -> Option<&SceneBuilder> {
        self.builders.get(&scene)
    }

    pub fn contains(&self, scene: Scene) -> bool {
        self.builders.contains_key(&scene)
    }

    /// Scenes with no builder registered.
    pub fn missing(&self) -> Vec<Scene> {
        Scene::ALL
            .into_iter()
            .filter(|s| !self.contains(*s))
            .collect()
    }
}
