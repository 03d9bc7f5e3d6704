//! Scene-based navigation.
//!
//! Screens never build each other. They hold a [`NavHandle`] and ask for a
//! [`Scene`]; the [`Coordinator`] resolves the builder, provisions storage and
//! performs the transition once the current input event has been handled.

pub mod coordinator;
pub mod registry;
pub mod scene;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::store::StoreError;

pub use coordinator::{Coordinator, Presentation};
pub use registry::{Dependency, Provision, SceneRegistry};
pub use scene::{Payload, Scene, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("scene {scene} cannot be built from a {payload} payload")]
    UnresolvableScene { scene: Scene, payload: &'static str },
    #[error("no builder registered for scene {0}")]
    Unregistered(Scene),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
    #[error("cannot pop the root screen of the {0} stack")]
    RootPop(Surface),
    #[error("the {0} stack is empty")]
    EmptyStack(Surface),
    #[error("screen {0} is not presented modally")]
    NotModal(ScreenId),
    #[error("screen {0} is not presented")]
    UnknownScreen(ScreenId),
}

#[derive(Debug)]
pub enum NavRequest {
    ResetRoot {
        scene: Scene,
        animated: bool,
    },
    Push {
        surface: Surface,
        scene: Scene,
        payload: Payload,
        animated: bool,
    },
    PresentModal {
        from: ScreenId,
        scene: Scene,
        payload: Payload,
        animated: bool,
    },
    Pop {
        surface: Surface,
        animated: bool,
    },
    Dismiss {
        screen: ScreenId,
        animated: bool,
    },
}

/// The navigation capability screens are given.
pub trait Navigator {
    fn navigate(&mut self, request: NavRequest) -> Result<(), NavError>;

    fn reset_root(&mut self, scene: Scene, animated: bool) -> Result<(), NavError> {
        self.navigate(NavRequest::ResetRoot { scene, animated })
    }

    fn push(
        &mut self,
        surface: Surface,
        scene: Scene,
        payload: Payload,
        animated: bool,
    ) -> Result<(), NavError> {
        self.navigate(NavRequest::Push {
            surface,
            scene,
            payload,
            animated,
        })
    }

    fn present_modal(
        &mut self,
        from: ScreenId,
        scene: Scene,
        payload: Payload,
        animated: bool,
    ) -> Result<(), NavError> {
        self.navigate(NavRequest::PresentModal {
            from,
            scene,
            payload,
            animated,
        })
    }

    fn pop(&mut self, surface: Surface, animated: bool) -> Result<(), NavError> {
        self.navigate(NavRequest::Pop { surface, animated })
    }

    fn dismiss(&mut self, screen: ScreenId, animated: bool) -> Result<(), NavError> {
        self.navigate(NavRequest::Dismiss { screen, animated })
    }
}

pub(crate) type RequestQueue = Rc<RefCell<VecDeque<NavRequest>>>;

/// Back-reference to a coordinator. Requests are queued and executed by
/// [`Coordinator::drain`].
#[derive(Clone)]
pub struct NavHandle {
    queue: RequestQueue,
}

impl NavHandle {
    pub(crate) fn new(queue: RequestQueue) -> Self {
        Self { queue }
    }

    pub fn is_bound_to(&self, coordinator: &Coordinator) -> bool {
        coordinator.owns_queue(&self.queue)
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Navigator for NavHandle {
    fn navigate(&mut self, request: NavRequest) -> Result<(), NavError> {
        tracing::trace!(?request, "navigation queued");
        self.queue.borrow_mut().push_back(request);
        Ok(())
    }
}
