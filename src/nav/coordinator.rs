use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::nav::registry::{Dependency, Provision, SceneRegistry};
use crate::nav::{NavError, NavHandle, NavRequest, Navigator, Payload, RequestQueue, Scene, ScreenId, Surface};
use crate::store::{StorageProvider, WORD_MODEL};
use crate::ui::screen::Screen;

/// The window the root stack is installed into.
pub trait Presentation {
    fn make_active(&mut self);
}

struct Presented {
    id: ScreenId,
    screen: Box<dyn Screen>,
}

struct StackEntry {
    base: Presented,
    /// Overlays presented above `base`, bottom to top.
    modals: Vec<Presented>,
}

impl StackEntry {
    fn top_mut(&mut self) -> &mut Presented {
        match self.modals.last_mut() {
            Some(modal) => modal,
            None => &mut self.base,
        }
    }

    fn contains(&self, id: ScreenId) -> bool {
        self.base.id == id || self.modals.iter().any(|m| m.id == id)
    }
}

pub struct Coordinator {
    registry: SceneRegistry,
    storage: Rc<dyn StorageProvider>,
    presentation: Box<dyn Presentation>,
    stacks: HashMap<Surface, Vec<StackEntry>>,
    queue: RequestQueue,
    next_id: u64,
}

impl Coordinator {
    pub fn new(
        registry: SceneRegistry,
        storage: Rc<dyn StorageProvider>,
        presentation: Box<dyn Presentation>,
    ) -> Self {
        let missing = registry.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, "scenes without a registered builder");
        }
        Self {
            registry,
            storage,
            presentation,
            stacks: HashMap::new(),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            next_id: 1,
        }
    }

    pub fn handle(&self) -> NavHandle {
        NavHandle::new(Rc::clone(&self.queue))
    }

    pub(crate) fn owns_queue(&self, queue: &RequestQueue) -> bool {
        Rc::ptr_eq(&self.queue, queue)
    }

    // Scene factory

    /// Build the screen for `scene`. This is the only place a
    /// `(title, parent_id)` pair turns into an opened word list.
    pub fn build_screen(
        &mut self,
        scene: Scene,
        payload: Payload,
    ) -> Result<Box<dyn Screen>, NavError> {
        if !self.registry.contains(scene) {
            return Err(NavError::Unregistered(scene));
        }
        let provision = self.provision(scene, payload)?;
        let screen_id = ScreenId(self.next_id);
        self.next_id += 1;

        let deps = Dependency {
            scene,
            screen_id,
            navigator: self.handle(),
            provision,
        };
        let builder = self
            .registry
            .get(scene)
            .ok_or(NavError::Unregistered(scene))?;
        let screen = builder(deps)?;
        tracing::debug!(%scene, id = %screen_id, "screen built");
        Ok(screen)
    }

    fn provision(&self, scene: Scene, payload: Payload) -> Result<Provision, NavError> {
        match (scene, payload) {
            (Scene::SetList | Scene::SetCreate, Payload::None) => {
                Ok(Provision::Sets(self.storage.word_sets()))
            }
            (Scene::Tabs, Payload::None) => Ok(Provision::Home {
                sets: self.storage.word_sets(),
                bookmarks: self.storage.bookmarks(),
            }),
            (Scene::Translate | Scene::Bookmarks, Payload::None) => {
                Ok(Provision::Bookmarks(self.storage.bookmarks()))
            }
            (
                Scene::WordList | Scene::WordListCreate,
                Payload::TitledParent { title, parent_id },
            ) => {
                let words = self
                    .storage
                    .open_word_list(WORD_MODEL, &title, parent_id)
                    .inspect_err(|e| tracing::error!(%parent_id, "cannot open word list: {e}"))?;
                Ok(Provision::Words(words))
            }
            (Scene::WordList | Scene::WordListCreate | Scene::Quiz, Payload::Storage(words)) => {
                Ok(Provision::Words(words))
            }
            (Scene::WordListCreate, Payload::Editing { storage, word }) => {
                Ok(Provision::Editing {
                    words: storage,
                    word,
                })
            }
            (Scene::QuizResult, Payload::Results(summary)) => Ok(Provision::Results(summary)),
            (scene, payload) => Err(NavError::UnresolvableScene {
                scene,
                payload: payload.kind(),
            }),
        }
    }

    // Transitions

    pub fn reset_root(&mut self, scene: Scene, animated: bool) -> Result<ScreenId, NavError> {
        let screen = self.build_screen(scene, Payload::None)?;
        let id = screen.id();
        self.stacks.clear();
        self.stacks.insert(
            Surface::Main,
            vec![StackEntry {
                base: Presented { id, screen },
                modals: Vec::new(),
            }],
        );
        self.presentation.make_active();
        tracing::info!(%scene, id = %id, animated, "root reset");
        Ok(id)
    }

    pub fn push(
        &mut self,
        surface: Surface,
        scene: Scene,
        payload: Payload,
        animated: bool,
    ) -> Result<ScreenId, NavError> {
        let screen = self.build_screen(scene, payload)?;
        let id = screen.id();
        self.stacks.entry(surface).or_default().push(StackEntry {
            base: Presented { id, screen },
            modals: Vec::new(),
        });
        tracing::info!(%surface, %scene, id = %id, animated, "pushed");
        Ok(id)
    }

    pub fn present_modal(
        &mut self,
        from: ScreenId,
        scene: Scene,
        payload: Payload,
        animated: bool,
    ) -> Result<ScreenId, NavError> {
        let (surface, index) = self.locate(from).ok_or(NavError::UnknownScreen(from))?;
        let screen = self.build_screen(scene, payload)?;
        let id = screen.id();
        let entry = self
            .stacks
            .get_mut(&surface)
            .and_then(|stack| stack.get_mut(index))
            .ok_or(NavError::UnknownScreen(from))?;
        entry.modals.push(Presented { id, screen });
        tracing::info!(%scene, id = %id, from = %from, animated, "presented modally");
        Ok(id)
    }

    /// Remove the top screen of `surface`. The root screen stays.
    pub fn pop(&mut self, surface: Surface, animated: bool) -> Result<ScreenId, NavError> {
        let stack = self
            .stacks
            .get_mut(&surface)
            .filter(|stack| !stack.is_empty())
            .ok_or(NavError::EmptyStack(surface))?;
        if stack.len() == 1 {
            return Err(NavError::RootPop(surface));
        }
        let popped = stack.pop().ok_or(NavError::EmptyStack(surface))?;
        tracing::info!(%surface, id = %popped.base.id, animated, "popped");
        self.notify_appear();
        Ok(popped.base.id)
    }

    /// Close a modal overlay together with anything presented above it.
    pub fn dismiss(&mut self, screen: ScreenId, animated: bool) -> Result<(), NavError> {
        let (surface, index) = self.locate(screen).ok_or(NavError::UnknownScreen(screen))?;
        let entry = self
            .stacks
            .get_mut(&surface)
            .and_then(|stack| stack.get_mut(index))
            .ok_or(NavError::UnknownScreen(screen))?;
        let position = entry
            .modals
            .iter()
            .position(|m| m.id == screen)
            .ok_or(NavError::NotModal(screen))?;
        entry.modals.truncate(position);
        tracing::info!(id = %screen, animated, "dismissed");
        self.notify_appear();
        Ok(())
    }

    /// Execute every queued request in order. Failures are logged and returned.
    pub fn drain(&mut self) -> Vec<NavError> {
        let mut errors = Vec::new();
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(request) = next else { break };
            if let Err(e) = self.execute(request) {
                tracing::error!("navigation failed: {e}");
                errors.push(e);
            }
        }
        errors
    }

    fn execute(&mut self, request: NavRequest) -> Result<(), NavError> {
        match request {
            NavRequest::ResetRoot { scene, animated } => {
                self.reset_root(scene, animated).map(|_| ())
            }
            NavRequest::Push {
                surface,
                scene,
                payload,
                animated,
            } => self.push(surface, scene, payload, animated).map(|_| ()),
            NavRequest::PresentModal {
                from,
                scene,
                payload,
                animated,
            } => self.present_modal(from, scene, payload, animated).map(|_| ()),
            NavRequest::Pop { surface, animated } => self.pop(surface, animated).map(|_| ()),
            NavRequest::Dismiss { screen, animated } => self.dismiss(screen, animated),
        }
    }

    fn notify_appear(&mut self) {
        if let Some(screen) = self.visible_mut() {
            screen.on_appear();
        }
    }

    // Queries

    fn locate(&self, id: ScreenId) -> Option<(Surface, usize)> {
        self.stacks.iter().find_map(|(surface, stack)| {
            stack
                .iter()
                .position(|entry| entry.contains(id))
                .map(|index| (*surface, index))
        })
    }

    /// Ids of the screens on `surface`, bottom to top, modals excluded.
    pub fn stack(&self, surface: Surface) -> Vec<ScreenId> {
        self.stacks
            .get(&surface)
            .map(|stack| stack.iter().map(|e| e.base.id).collect())
            .unwrap_or_default()
    }

    pub fn depth(&self, surface: Surface) -> usize {
        self.stacks.get(&surface).map_or(0, Vec::len)
    }

    /// Modal overlays above the top screen of `surface`.
    pub fn modals(&self, surface: Surface) -> Vec<ScreenId> {
        self.stacks
            .get(&surface)
            .and_then(|stack| stack.last())
            .map(|entry| entry.modals.iter().map(|m| m.id).collect())
            .unwrap_or_default()
    }

    /// The topmost screen of the main stack, modal or not.
    pub fn visible(&self) -> Option<&dyn Screen> {
        let entry = self.stacks.get(&Surface::Main)?.last()?;
        let top = entry.modals.last().unwrap_or(&entry.base);
        Some(top.screen.as_ref())
    }

    pub fn visible_mut(&mut self) -> Option<&mut (dyn Screen + 'static)> {
        let entry = self.stacks.get_mut(&Surface::Main)?.last_mut()?;
        Some(entry.top_mut().screen.as_mut())
    }

    /// Screens to draw for the top of the main stack: the pushed screen
    /// followed by its modal overlays.
    pub fn layers(&self) -> Vec<&dyn Screen> {
        let Some(entry) = self.stacks.get(&Surface::Main).and_then(|s| s.last()) else {
            return Vec::new();
        };
        std::iter::once(&entry.base)
            .chain(entry.modals.iter())
            .map(|p| p.screen.as_ref())
            .collect()
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        self.stacks
            .get(&Surface::Main)
            .map(|stack| stack.iter().map(|e| e.base.screen.title()).collect())
            .unwrap_or_default()
    }
}

impl Navigator for Coordinator {
    fn navigate(&mut self, request: NavRequest) -> Result<(), NavError> {
        self.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossterm::event::KeyEvent;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;
    use crate::quiz::QuizSummary;
    use crate::store::json_store::JsonStore;
    use crate::ui::theme::Theme;

    struct Probe {
        deps: Dependency,
        appeared: Rc<Cell<usize>>,
    }

    impl Screen for Probe {
        fn dependency(&self) -> &Dependency {
            &self.deps
        }

        fn title(&self) -> String {
            self.deps.scene.to_string()
        }

        fn handle_key(&mut self, _key: KeyEvent) -> Result<(), NavError> {
            Ok(())
        }

        fn on_appear(&mut self) {
            self.appeared.set(self.appeared.get() + 1);
        }

        fn render(&self, _area: Rect, _buf: &mut Buffer, _theme: &Theme) {}
    }

    struct Window(Rc<Cell<bool>>);

    impl Presentation for Window {
        fn make_active(&mut self) {
            self.0.set(true);
        }
    }

    struct Fixture {
        _dir: TempDir,
        coordinator: Coordinator,
        active: Rc<Cell<bool>>,
        appeared: Rc<Cell<usize>>,
        store: Rc<JsonStore>,
    }

    fn fixture_with(scenes: &[Scene]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        let appeared = Rc::new(Cell::new(0));
        let mut registry = SceneRegistry::new();
        for &scene in scenes {
            let appeared = Rc::clone(&appeared);
            registry = registry.register(scene, move |deps| {
                Ok(Box::new(Probe {
                    deps,
                    appeared: Rc::clone(&appeared),
                }) as Box<dyn Screen>)
            });
        }
        let active = Rc::new(Cell::new(false));
        let coordinator = Coordinator::new(
            registry,
            Rc::clone(&store) as Rc<dyn StorageProvider>,
            Box::new(Window(Rc::clone(&active))),
        );
        Fixture {
            _dir: dir,
            coordinator,
            active,
            appeared,
            store,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(&Scene::ALL)
    }

    fn titled(title: &str) -> Payload {
        Payload::TitledParent {
            title: title.to_string(),
            parent_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_built_screens_point_back_at_their_coordinator() {
        let mut fx = fixture();
        let other = fixture();
        let words = fx
            .store
            .open_word_list(WORD_MODEL, "animals", Uuid::new_v4())
            .unwrap();
        let requests = vec![
            (Scene::SetList, Payload::None),
            (Scene::SetCreate, Payload::None),
            (Scene::WordList, titled("animals")),
            (Scene::WordListCreate, titled("animals")),
            (Scene::WordListCreate, Payload::Storage(Rc::clone(&words))),
            (Scene::Quiz, Payload::Storage(words)),
            (Scene::QuizResult, Payload::Results(QuizSummary::default())),
            (Scene::Translate, Payload::None),
            (Scene::Bookmarks, Payload::None),
            (Scene::Tabs, Payload::None),
        ];
        for (scene, payload) in requests {
            let screen = fx.coordinator.build_screen(scene, payload).unwrap();
            assert_eq!(screen.scene(), scene);
            assert!(screen.dependency().navigator.is_bound_to(&fx.coordinator));
            assert!(!screen.dependency().navigator.is_bound_to(&other.coordinator));
        }
    }

    #[test]
    fn test_screen_ids_are_unique() {
        let mut fx = fixture();
        let a = fx.coordinator.build_screen(Scene::SetList, Payload::None).unwrap();
        let b = fx.coordinator.build_screen(Scene::SetList, Payload::None).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_titled_parent_opens_scoped_storage() {
        let mut fx = fixture();
        let parent_id = Uuid::new_v4();
        let screen = fx
            .coordinator
            .build_screen(
                Scene::WordList,
                Payload::TitledParent {
                    title: "animals".to_string(),
                    parent_id,
                },
            )
            .unwrap();
        let words = screen.dependency().words().unwrap();
        assert_eq!(words.parent_id(), parent_id);
        assert_eq!(words.title(), "animals");
    }

    #[test]
    fn test_unresolvable_payload_is_an_error() {
        let mut fx = fixture();
        let err = fx
            .coordinator
            .build_screen(Scene::Quiz, Payload::None)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            NavError::UnresolvableScene {
                scene: Scene::Quiz,
                payload: "empty"
            }
        ));
        let err = fx
            .coordinator
            .build_screen(Scene::SetList, titled("x"))
            .err()
            .unwrap();
        assert!(matches!(err, NavError::UnresolvableScene { .. }));
    }

    #[test]
    fn test_editing_payload_carries_the_word() {
        let mut fx = fixture();
        let words = fx
            .store
            .open_word_list(WORD_MODEL, "animals", Uuid::new_v4())
            .unwrap();
        let word = words.create("cat", "고양이").unwrap();
        let editing = |word: &crate::store::schema::Word| Payload::Editing {
            storage: Rc::clone(&words),
            word: word.clone(),
        };

        let screen = fx
            .coordinator
            .build_screen(Scene::WordListCreate, editing(&word))
            .unwrap();
        assert_eq!(screen.dependency().editing(), Some(&word));
        assert_eq!(screen.dependency().words().unwrap().parent_id(), word.parent_id);

        let err = fx
            .coordinator
            .build_screen(Scene::Quiz, editing(&word))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            NavError::UnresolvableScene {
                scene: Scene::Quiz,
                payload: "editing"
            }
        ));
    }

    #[test]
    fn test_unregistered_scene_is_an_error() {
        let mut fx = fixture_with(&[Scene::SetList]);
        let err = fx
            .coordinator
            .build_screen(Scene::Translate, Payload::None)
            .err()
            .unwrap();
        assert!(matches!(err, NavError::Unregistered(Scene::Translate)));
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let mut fx = fixture();
        // a file where the model directory should be
        std::fs::write(fx.store.base_dir().join(WORD_MODEL), "").unwrap();
        let err = fx
            .coordinator
            .build_screen(Scene::WordList, titled("animals"))
            .err()
            .unwrap();
        assert!(matches!(err, NavError::StorageUnavailable(_)));
    }

    #[test]
    fn test_reset_root_replaces_stack_and_activates() {
        let mut fx = fixture();
        fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        fx.coordinator
            .push(Surface::Main, Scene::WordList, titled("a"), true)
            .unwrap();
        assert!(fx.active.get());

        let root = fx.coordinator.reset_root(Scene::Tabs, false).unwrap();
        assert_eq!(fx.coordinator.stack(Surface::Main), vec![root]);
        assert_eq!(fx.coordinator.visible().unwrap().scene(), Scene::Tabs);
    }

    #[test]
    fn test_push_then_pop_restores_stack() {
        let mut fx = fixture();
        fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        fx.coordinator
            .push(Surface::Main, Scene::WordList, titled("a"), true)
            .unwrap();
        let before = fx.coordinator.stack(Surface::Main);
        let before_top = fx.coordinator.visible().unwrap().id();

        let pushed = fx
            .coordinator
            .push(Surface::Main, Scene::WordList, titled("b"), true)
            .unwrap();
        assert_eq!(fx.coordinator.visible().unwrap().id(), pushed);
        assert_eq!(fx.coordinator.depth(Surface::Main), 3);

        let popped = fx.coordinator.pop(Surface::Main, true).unwrap();
        assert_eq!(popped, pushed);
        assert_eq!(fx.coordinator.stack(Surface::Main), before);
        assert_eq!(fx.coordinator.visible().unwrap().id(), before_top);
        assert_eq!(fx.appeared.get(), 1);
    }

    #[test]
    fn test_pop_root_is_refused() {
        let mut fx = fixture();
        assert!(matches!(
            fx.coordinator.pop(Surface::Main, false),
            Err(NavError::EmptyStack(Surface::Main))
        ));
        fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        assert!(matches!(
            fx.coordinator.pop(Surface::Main, false),
            Err(NavError::RootPop(Surface::Main))
        ));
        assert_eq!(fx.coordinator.depth(Surface::Main), 1);
    }

    #[test]
    fn test_modal_overlays_without_changing_stack() {
        let mut fx = fixture();
        let root = fx.coordinator.reset_root(Scene::SetList, false).unwrap();

        let modal = fx
            .coordinator
            .present_modal(root, Scene::SetCreate, Payload::None, true)
            .unwrap();

        assert_eq!(fx.coordinator.stack(Surface::Main), vec![root]);
        assert_eq!(fx.coordinator.modals(Surface::Main), vec![modal]);
        assert_eq!(fx.coordinator.visible().unwrap().id(), modal);
        assert_eq!(fx.coordinator.layers().len(), 2);

        fx.coordinator.dismiss(modal, true).unwrap();
        assert!(fx.coordinator.modals(Surface::Main).is_empty());
        assert_eq!(fx.coordinator.visible().unwrap().id(), root);
        assert_eq!(fx.appeared.get(), 1);
    }

    #[test]
    fn test_dismiss_closes_overlays_above() {
        let mut fx = fixture();
        let root = fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        let first = fx
            .coordinator
            .present_modal(root, Scene::SetCreate, Payload::None, true)
            .unwrap();
        fx.coordinator
            .present_modal(first, Scene::Bookmarks, Payload::None, true)
            .unwrap();

        fx.coordinator.dismiss(first, true).unwrap();
        assert!(fx.coordinator.modals(Surface::Main).is_empty());
    }

    #[test]
    fn test_dismiss_rejects_pushed_and_unknown_screens() {
        let mut fx = fixture();
        let root = fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        assert!(matches!(
            fx.coordinator.dismiss(root, true),
            Err(NavError::NotModal(id)) if id == root
        ));
        assert!(matches!(
            fx.coordinator.dismiss(ScreenId(999), true),
            Err(NavError::UnknownScreen(_))
        ));
        assert!(matches!(
            fx.coordinator
                .present_modal(ScreenId(999), Scene::SetCreate, Payload::None, true),
            Err(NavError::UnknownScreen(_))
        ));
    }

    #[test]
    fn test_handle_requests_run_on_drain() {
        let mut fx = fixture();
        let root = fx.coordinator.reset_root(Scene::SetList, false).unwrap();
        let mut handle = fx.coordinator.handle();

        handle
            .push(Surface::Main, Scene::WordList, titled("a"), true)
            .unwrap();
        handle.present_modal(root, Scene::SetCreate, Payload::None, true).unwrap();
        handle.push(Surface::Main, Scene::Quiz, Payload::None, true).unwrap();
        assert_eq!(handle.pending(), 3);
        assert_eq!(fx.coordinator.depth(Surface::Main), 1);

        let errors = fx.coordinator.drain();

        assert_eq!(handle.pending(), 0);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], NavError::UnresolvableScene { .. }));
        assert_eq!(fx.coordinator.depth(Surface::Main), 2);
    }

    #[test]
    fn test_coordinator_is_a_navigator() {
        let mut fx = fixture();
        let nav: &mut dyn Navigator = &mut fx.coordinator;
        nav.reset_root(Scene::SetList, false).unwrap();
        nav.push(Surface::Main, Scene::Bookmarks, Payload::None, false)
            .unwrap();
        nav.pop(Surface::Main, false).unwrap();
        assert_eq!(fx.coordinator.depth(Surface::Main), 1);
    }
}
