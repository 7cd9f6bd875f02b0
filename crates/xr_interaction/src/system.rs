//! Systems and the host they run against.
//!
//! A [`System`] is invoked once per frame with a [`SystemContext`]. The
//! context splits mutable state in two: the [`World`] holds components, the
//! [`Host`] holds the external collaborators (scene, session, speech) plus
//! the id-keyed handler tables components refer to.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use xr_component::World;
use xr_scene::{SceneGraph, SpatialId, SpeechSynth, XrSession};

use crate::components::KeyWidget;
use crate::config::InteractionConfig;
use crate::interactable::InteractableRegistry;

/// Invoked when a button is released over it.
pub type ClickHandler = Box<dyn FnMut()>;

/// Invoked by a keyboard's enter key. Returns `true` on success.
pub type SubmitHandler = Box<dyn FnMut(&str) -> bool>;

/// Relations from scene nodes to host-side callbacks and widgets.
///
/// Components only store [`SpatialId`]s; removing a relation is a single map
/// removal and leaves no dangling reference behind.
#[derive(Default)]
pub struct Handlers {
    clicks: HashMap<SpatialId, ClickHandler>,
    submits: HashMap<SpatialId, SubmitHandler>,
    widgets: HashMap<SpatialId, Box<dyn KeyWidget>>,
}

impl Handlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_click(&mut self, button: SpatialId, handler: ClickHandler) {
        self.clicks.insert(button, handler);
    }

    pub fn remove_click(&mut self, button: SpatialId) -> bool {
        self.clicks.remove(&button).is_some()
    }

    /// Run the click handler of `button`. Returns `false` if none is set.
    pub fn click(&mut self, button: SpatialId) -> bool {
        match self.clicks.get_mut(&button) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn set_submit(&mut self, keyboard: SpatialId, handler: SubmitHandler) {
        self.submits.insert(keyboard, handler);
    }

    /// Submit the text of `keyboard`'s widget. Returns the handler's verdict,
    /// `false` without a handler.
    pub fn submit(&mut self, keyboard: SpatialId) -> bool {
        let text = self
            .widgets
            .get(&keyboard)
            .map(|w| w.text().to_string())
            .unwrap_or_default();
        self.submits
            .get_mut(&keyboard)
            .is_some_and(|handler| handler(&text))
    }

    pub fn set_widget(&mut self, keyboard: SpatialId, widget: Box<dyn KeyWidget>) {
        self.widgets.insert(keyboard, widget);
    }

    #[must_use]
    pub fn widget(&self, keyboard: SpatialId) -> Option<&dyn KeyWidget> {
        self.widgets.get(&keyboard).map(|w| w.as_ref())
    }

    pub fn widget_mut(&mut self, keyboard: SpatialId) -> Option<&mut (dyn KeyWidget + 'static)> {
        self.widgets.get_mut(&keyboard).map(|w| w.as_mut())
    }

    /// Drop every relation of `node`.
    pub fn remove(&mut self, node: SpatialId) {
        self.clicks.remove(&node);
        self.submits.remove(&node);
        self.widgets.remove(&node);
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("clicks", &self.clicks.len())
            .field("submits", &self.submits.len())
            .field("widgets", &self.widgets.len())
            .finish()
    }
}

/// External collaborators shared by all systems.
pub struct Host {
    pub scene: SceneGraph,
    pub session: Box<dyn XrSession>,
    pub speech: Box<dyn SpeechSynth>,
    pub config: InteractionConfig,
    pub interactables: InteractableRegistry,
    pub handlers: Handlers,
}

impl Host {
    #[must_use]
    pub fn new(
        scene: SceneGraph,
        session: Box<dyn XrSession>,
        speech: Box<dyn SpeechSynth>,
        config: InteractionConfig,
    ) -> Self {
        Self {
            scene,
            session,
            speech,
            config,
            interactables: InteractableRegistry::new(),
            handlers: Handlers::new(),
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("scene", &self.scene.len())
            .field("session_active", &self.session.is_active())
            .field("config", &self.config)
            .field("interactables", &self.interactables)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// Per-frame execution context.
pub struct SystemContext<'a> {
    pub tick_id: u64,
    /// Seconds since the previous frame.
    pub delta: f64,
    /// Seconds since the loop started.
    pub time: f64,
    pub world: &'a mut World,
    pub host: &'a mut Host,
}

pub trait System {
    /// Unique name; registering a second system with the same name is a
    /// no-op.
    fn name(&self) -> &'static str;

    /// Called once on registration.
    fn init(&mut self, _world: &mut World) {}

    fn execute(&mut self, ctx: &mut SystemContext<'_>);
}

/// Systems in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<Box<dyn System>>,
}

impl SystemRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register and initialise `system`. Returns `false` if a system with the
    /// same name is already registered.
    pub fn register(&mut self, mut system: Box<dyn System>, world: &mut World) -> bool {
        let name = system.name();
        if self.contains(name) {
            debug!(system = name, "system already registered");
            return false;
        }
        system.init(world);
        self.systems.push(system);
        info!(system = name, order = self.systems.len() - 1, "registered system");
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.systems.iter().any(|s| s.name() == name)
    }

    /// System names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|s| s.name())
    }

    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn System>> {
        self.systems.iter_mut()
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::components::TextEntry;

    #[derive(Debug)]
    struct Named(&'static str);

    impl System for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn execute(&mut self, _ctx: &mut SystemContext<'_>) {}
    }

    #[test]
    fn test_register_is_idempotent_by_name() {
        let mut world = World::new();
        let mut registry = SystemRegistry::new();
        assert!(registry.register(Box::new(Named("controller")), &mut world));
        assert!(registry.register(Box::new(Named("mouse")), &mut world));
        assert!(!registry.register(Box::new(Named("controller")), &mut world));
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["controller", "mouse"]
        );
    }

    #[test]
    fn test_click_handlers() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let mut handlers = Handlers::new();
        handlers.set_click(
            SpatialId(1),
            Box::new(move || counter.set(counter.get() + 1)),
        );

        assert!(handlers.click(SpatialId(1)));
        assert!(!handlers.click(SpatialId(2)));
        assert_eq!(clicks.get(), 1);

        assert!(handlers.remove_click(SpatialId(1)));
        assert!(!handlers.click(SpatialId(1)));
    }

    #[test]
    fn test_submit_receives_widget_text() {
        let mut handlers = Handlers::new();
        let root = SpatialId(7);
        assert!(!handlers.submit(root));

        let mut entry = TextEntry::new();
        entry.handle_key("4");
        entry.handle_key("2");
        handlers.set_widget(root, Box::new(entry));
        handlers.set_submit(root, Box::new(|text| text == "42"));
        assert!(handlers.submit(root));

        handlers.remove(root);
        assert!(handlers.widget(root).is_none());
        assert!(!handlers.submit(root));
    }
}
