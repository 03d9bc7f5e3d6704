//! Wires every scene to the screen that implements it.

use std::rc::Rc;

use crate::nav::{Provision, Scene, SceneRegistry};
use crate::quiz::QuizSettings;
use crate::store::schema::Language;
use crate::translate::Translator;
use crate::ui::screen::Screen;
use crate::ui::screens::{
    BookmarksScreen, QuizResultScreen, QuizScreen, SetCreateScreen, SetListScreen, TabsScreen,
    TranslateScreen, WordCreateScreen, WordListScreen,
};

/// Collaborators the screens are built with, besides what the coordinator
/// provisions.
#[derive(Clone)]
pub struct Composition {
    pub quiz: QuizSettings,
    pub translator: Rc<dyn Translator>,
    pub source_language: Language,
    pub target_language: Language,
}

fn boxed<S: Screen + 'static>(screen: S) -> Box<dyn Screen> {
    Box::new(screen)
}

impl Composition {
    pub fn registry(&self) -> SceneRegistry {
        let quiz = self.quiz;
        let (source, target) = (self.source_language, self.target_language);
        let translator = Rc::clone(&self.translator);
        let tab_translator = Rc::clone(&self.translator);

        SceneRegistry::new()
            .register(Scene::SetList, |deps| SetListScreen::new(deps).map(boxed))
            .register(Scene::SetCreate, |deps| SetCreateScreen::new(deps).map(boxed))
            .register(Scene::WordList, |deps| WordListScreen::new(deps).map(boxed))
            .register(Scene::WordListCreate, |deps| {
                WordCreateScreen::new(deps).map(boxed)
            })
            .register(Scene::Quiz, move |deps| QuizScreen::new(deps, quiz).map(boxed))
            .register(Scene::QuizResult, |deps| QuizResultScreen::new(deps).map(boxed))
            .register(Scene::Translate, move |deps| {
                TranslateScreen::new(deps, Rc::clone(&translator), source, target).map(boxed)
            })
            .register(Scene::Bookmarks, |deps| BookmarksScreen::new(deps).map(boxed))
            .register(Scene::Tabs, move |deps| {
                let sets = deps.word_sets()?;
                let bookmarks = deps.bookmarks()?;
                let children = vec![
                    boxed(SetListScreen::new(
                        deps.child(Scene::SetList, Provision::Sets(sets)),
                    )?),
                    boxed(TranslateScreen::new(
                        deps.child(Scene::Translate, Provision::Bookmarks(Rc::clone(&bookmarks))),
                        Rc::clone(&tab_translator),
                        source,
                        target,
                    )?),
                    boxed(BookmarksScreen::new(
                        deps.child(Scene::Bookmarks, Provision::Bookmarks(bookmarks)),
                    )?),
                ];
                Ok(boxed(TabsScreen::new(deps, children)))
            })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::nav::{Coordinator, Payload, Presentation, Surface};
    use crate::store::StorageProvider;
    use crate::store::json_store::JsonStore;
    use crate::translate::WordBankTranslator;

    struct Headless;

    impl Presentation for Headless {
        fn make_active(&mut self) {}
    }

    fn coordinator() -> (TempDir, Coordinator) {
        let dir = TempDir::new().unwrap();
        let store: Rc<dyn StorageProvider> =
            Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        let composition = Composition {
            quiz: QuizSettings::default(),
            translator: Rc::new(WordBankTranslator::new(Rc::clone(&store), Language::En)),
            source_language: Language::En,
            target_language: Language::Ko,
        };
        let coordinator = Coordinator::new(composition.registry(), store, Box::new(Headless));
        (dir, coordinator)
    }

    #[test]
    fn every_scene_has_a_builder() {
        let composition = Composition {
            quiz: QuizSettings::default(),
            translator: Rc::new(NullTranslator),
            source_language: Language::En,
            target_language: Language::Ko,
        };
        assert!(composition.registry().missing().is_empty());
    }

    struct NullTranslator;

    impl Translator for NullTranslator {
        fn translate(
            &self,
            text: &str,
            _from: Language,
            _to: Language,
        ) -> Result<String, crate::translate::TranslateError> {
            Ok(text.to_string())
        }
    }

    #[test]
    fn tabs_root_is_the_only_breadcrumb() {
        let (_dir, mut coordinator) = coordinator();
        coordinator.reset_root(Scene::Tabs, false).unwrap();
        let visible = coordinator.visible().unwrap();
        assert_eq!(visible.scene(), Scene::Tabs);
        assert_eq!(coordinator.breadcrumbs(), vec![visible.title()]);
    }

    #[test]
    fn real_screens_reject_wrong_payloads() {
        let (_dir, mut coordinator) = coordinator();
        coordinator.reset_root(Scene::SetList, false).unwrap();
        let err = coordinator
            .push(Surface::Main, Scene::QuizResult, Payload::None, true)
            .err()
            .unwrap();
        assert!(matches!(err, crate::nav::NavError::UnresolvableScene { .. }));
        assert_eq!(coordinator.depth(Surface::Main), 1);
    }
}
