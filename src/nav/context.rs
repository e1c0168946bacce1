//! Navigation session state
//!
//! [`NavigationContext`] owns the focus registry, the resolver and the scroll
//! controller for one application session and is the only entry point the
//! front-end talks to. Key handling is synchronous: each event is fully
//! resolved before the next one is processed.

use tracing::debug;

use super::geometry::Direction;
use super::keys::{normalize, Key, NavKey, RawKey};
use super::registry::FocusRegistry;
use super::resolver::{MoveContext, SpatialResolver};
use super::scroll::{ScrollController, ScrollSettings};
use super::tree::{Activation, ElementKind, NodeId, ViewTree};

/// What a key-down did, for the application to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A directional key was handled by the resolver (focus may be unchanged)
    Moved,
    /// A directional key scrolled the focused panel
    Scrolled,
    /// Enter on an element with an action, or Return inside a scope
    Activate(Activation),
    /// Return with no active scope
    Back,
    /// Recognised key the engine has no use for (channel, media, guide)
    Unhandled(NavKey),
    /// Unrecognised key, by name
    Passthrough(String),
    /// Nothing to do (Enter without an action, Return in a scope without a close button)
    Nothing,
}

#[derive(Default)]
pub struct NavigationContext {
    registry: FocusRegistry,
    resolver: SpatialResolver,
    scroll: ScrollController,
}

impl NavigationContext {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            registry: FocusRegistry::new(),
            resolver: SpatialResolver::default(),
            scroll: ScrollController::new(settings),
        }
    }

    pub fn current(&self, tree: &ViewTree) -> Option<NodeId> {
        self.registry.current(tree)
    }

    pub fn scope(&self, tree: &ViewTree) -> Option<NodeId> {
        self.registry.scope(tree)
    }

    pub fn focus(&mut self, tree: &mut ViewTree, target: Option<NodeId>, should_scroll: bool) {
        self.registry.focus(tree, target, should_scroll);
    }

    pub fn set_scope(&mut self, tree: &mut ViewTree, scope: Option<NodeId>) {
        self.registry.set_scope(tree, scope);
    }

    pub fn clear_scope_and_reanchor(&mut self, tree: &mut ViewTree) {
        self.registry.clear_scope_and_reanchor(tree);
    }

    pub fn scan(&mut self, tree: &mut ViewTree) {
        self.registry.scan(tree);
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_holding()
    }

    /// Re-sync after a full render: panels are new, focus may be stale
    pub fn after_render(&mut self, tree: &mut ViewTree) {
        self.scroll.stop();
        self.registry.scan(tree);
    }

    /// Move focus in `direction`, scanning first if nothing is focused
    pub fn move_focus(&mut self, tree: &mut ViewTree, direction: Direction) {
        let Some(current) = self.registry.current(tree) else {
            self.registry.scan(tree);
            return;
        };
        let scope = self.registry.scope(tree);
        let target = self.resolver.resolve(&MoveContext {
            tree: &*tree,
            current,
            scope,
            direction,
        });
        self.registry.focus(tree, target, true);
    }

    pub fn handle_key_down(&mut self, tree: &mut ViewTree, raw: &RawKey, now_ms: u64) -> KeyOutcome {
        let key = match normalize(raw) {
            Key::Nav(key) => key,
            Key::Other(name) => return KeyOutcome::Passthrough(name),
        };
        debug!("KEY: down {:?}", key);

        if let Some(direction) = key.direction() {
            if let Some(panel) = self.focused_scroll_panel(tree) {
                if self.scroll.key_down(tree, panel, direction, now_ms) {
                    return KeyOutcome::Scrolled;
                }
            } else {
                self.scroll.stop();
            }
            self.move_focus(tree, direction);
            return KeyOutcome::Moved;
        }

        self.scroll.stop();
        match key {
            NavKey::Enter => self
                .registry
                .current(tree)
                .and_then(|id| tree.get(id))
                .and_then(|n| n.activation.clone())
                .map(KeyOutcome::Activate)
                .unwrap_or(KeyOutcome::Nothing),
            NavKey::Return => match self.registry.scope(tree) {
                Some(scope) => tree
                    .eligible_in(scope)
                    .into_iter()
                    .filter_map(|id| tree.get(id))
                    .find(|n| n.element_kind() == Some(ElementKind::CloseButton))
                    .and_then(|n| n.activation.clone())
                    .map(KeyOutcome::Activate)
                    .unwrap_or(KeyOutcome::Nothing),
                None => KeyOutcome::Back,
            },
            other => KeyOutcome::Unhandled(other),
        }
    }

    pub fn handle_key_up(&mut self, raw: &RawKey) {
        debug!("KEY: up {:?}", raw.name);
        self.scroll.key_up();
    }

    /// Advance hold-scroll. Returns true if something moved.
    pub fn tick(&mut self, tree: &mut ViewTree, delta_ms: u64, now_ms: u64) -> bool {
        self.scroll.tick(tree, delta_ms, now_ms)
    }

    fn focused_scroll_panel(&self, tree: &ViewTree) -> Option<NodeId> {
        self.registry.current(tree).filter(|id| {
            tree.get(*id).and_then(|n| n.element_kind()) == Some(ElementKind::ScrollPanel)
        })
    }
}
