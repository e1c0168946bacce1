//! Focus registry
//!
//! Single owner of the current focus and the active navigation scope. Every
//! focus change in the engine goes through [`FocusRegistry::focus`] or
//! [`FocusRegistry::set_scope`].

use tracing::debug;

use super::tree::{ContainerKind, ElementKind, NodeId, ViewTree};

#[derive(Debug, Default, Clone)]
pub struct FocusRegistry {
    current: Option<NodeId>,
    scope: Option<NodeId>,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current focus, if it is still attached and visible
    pub fn current(&self, tree: &ViewTree) -> Option<NodeId> {
        self.current.filter(|id| tree.is_eligible(*id))
    }

    /// Active scope, if it is still attached
    pub fn scope(&self, tree: &ViewTree) -> Option<NodeId> {
        self.scope.filter(|id| tree.is_attached(*id))
    }

    /// Move the focus marker to `target` and optionally scroll it into view
    ///
    /// `None` and ineligible targets are silently ignored.
    pub fn focus(&mut self, tree: &mut ViewTree, target: Option<NodeId>, should_scroll: bool) {
        let Some(target) = target.filter(|id| tree.is_eligible(*id)) else {
            return;
        };
        if let Some(previous) = self.current {
            tree.set_marker(previous, false);
        }
        self.current = Some(target);
        tree.set_marker(target, true);
        if should_scroll {
            tree.scroll_into_view(target);
        }
        debug!("NAV: focus -> {:?}", target);
    }

    /// Replace the active scope, focusing its first eligible element
    ///
    /// Clearing the scope does not move focus; see
    /// [`FocusRegistry::clear_scope_and_reanchor`].
    pub fn set_scope(&mut self, tree: &mut ViewTree, scope: Option<NodeId>) {
        debug!("NAV: scope {:?} -> {:?}", self.scope, scope);
        self.scope = scope;
        if let Some(scope) = scope {
            let first = tree.first_eligible(scope);
            self.focus(tree, first, true);
        }
    }

    /// Clear the scope and put focus back on the active sidebar entry
    pub fn clear_scope_and_reanchor(&mut self, tree: &mut ViewTree) {
        self.scope = None;
        let anchor = tree.first_container(ContainerKind::Sidebar).and_then(|sidebar| {
            tree.eligible_in(sidebar).into_iter().find(|id| {
                tree.get(*id)
                    .is_some_and(|n| n.active && n.element_kind() == Some(ElementKind::SidebarItem))
            })
        });
        match anchor {
            Some(anchor) => self.focus(tree, Some(anchor), true),
            None => self.scan(tree),
        }
    }

    /// Re-sync focus after a render
    ///
    /// Keeps a still-valid focus inside the allowed root. Otherwise picks, at
    /// document level: a visible alert, the active tab of the content area,
    /// the first element of the content area, then the first element anywhere.
    pub fn scan(&mut self, tree: &mut ViewTree) {
        let scope = self.scope(tree);
        if scope.is_none() && self.scope.is_some() {
            debug!("NAV: scope detached, dropping it");
            self.scope = None;
        }
        let root = scope.unwrap_or(tree.root());

        if let Some(current) = self.current(tree) {
            if tree.contains(root, current) {
                return;
            }
        }

        let mut target = None;
        if scope.is_none() {
            target = tree
                .containers(ContainerKind::Alert)
                .into_iter()
                .find_map(|alert| tree.first_eligible(alert));

            if target.is_none() {
                if let Some(content) = tree.first_container(ContainerKind::Content) {
                    let eligible = tree.eligible_in(content);
                    target = eligible
                        .iter()
                        .copied()
                        .find(|id| {
                            tree.get(*id).is_some_and(|n| {
                                n.active && n.element_kind() == Some(ElementKind::Tab)
                            })
                        })
                        .or_else(|| eligible.first().copied());
                }
            }
        }
        let target = target.or_else(|| tree.first_eligible(root));

        match target {
            Some(target) => {
                debug!("NAV: scan picked {:?}", target);
                self.focus(tree, Some(target), true);
            }
            None => {
                if let Some(stale) = self.current.take() {
                    tree.set_marker(stale, false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::testing::*;

    // === focus ===

    #[test]
    fn test_focus_moves_marker() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = button(&mut tree, root, 0.0, 0.0);
        let b = button(&mut tree, root, 0.0, 20.0);
        let mut registry = FocusRegistry::new();

        registry.focus(&mut tree, Some(a), true);
        assert!(tree.get(a).unwrap().focused);

        registry.focus(&mut tree, Some(b), true);
        assert!(!tree.get(a).unwrap().focused);
        assert!(tree.get(b).unwrap().focused);
        assert_eq!(registry.current(&tree), Some(b));
    }

    #[test]
    fn test_focus_none_is_noop() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let a = button(&mut tree, root, 0.0, 0.0);
        let mut registry = FocusRegistry::new();
        registry.focus(&mut tree, Some(a), true);
        registry.focus(&mut tree, None, true);
        assert_eq!(registry.current(&tree), Some(a));
    }

    #[test]
    fn test_current_drops_detached_focus() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let a = button(&mut tree, content, 0.0, 0.0);
        let mut registry = FocusRegistry::new();
        registry.focus(&mut tree, Some(a), true);

        tree.clear_children(content);
        assert_eq!(registry.current(&tree), None);
    }

    // === scope ===

    #[test]
    fn test_set_scope_focuses_first_eligible() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let outside = button(&mut tree, root, 0.0, 0.0);
        let modal = modal(&mut tree);
        let first = button(&mut tree, modal, 10.0, 10.0);
        button(&mut tree, modal, 10.0, 30.0);
        let mut registry = FocusRegistry::new();
        registry.focus(&mut tree, Some(outside), true);

        registry.set_scope(&mut tree, Some(modal));
        assert_eq!(registry.current(&tree), Some(first));
    }

    #[test]
    fn test_clear_scope_reanchors_on_active_sidebar_item() {
        let mut tree = ViewTree::new();
        let (_, items) = sidebar(&mut tree, 3);
        tree.set_active(items[1], true);
        let modal = modal(&mut tree);
        button(&mut tree, modal, 10.0, 10.0);
        let mut registry = FocusRegistry::new();
        registry.set_scope(&mut tree, Some(modal));

        registry.clear_scope_and_reanchor(&mut tree);
        assert_eq!(registry.scope(&tree), None);
        assert_eq!(registry.current(&tree), Some(items[1]));
    }

    // === scan ===

    #[test]
    fn test_scan_prefers_visible_alert() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        button(&mut tree, content, 0.0, 0.0);
        let body = alert(&mut tree);
        let mut registry = FocusRegistry::new();

        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(body));
    }

    #[test]
    fn test_scan_prefers_active_tab_in_content() {
        let mut tree = ViewTree::new();
        let (_, items) = sidebar(&mut tree, 2);
        let content = content(&mut tree);
        tab(&mut tree, content, 0.0, false);
        let active = tab(&mut tree, content, 20.0, true);
        let mut registry = FocusRegistry::new();

        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(active));
        assert_ne!(registry.current(&tree), Some(items[0]));
    }

    #[test]
    fn test_scan_falls_back_to_first_in_content_then_document() {
        let mut tree = ViewTree::new();
        let (_, items) = sidebar(&mut tree, 2);
        let content = content(&mut tree);
        let mut registry = FocusRegistry::new();

        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(items[0]));

        let first = button(&mut tree, content, 0.0, 0.0);
        tree.set_marker(items[0], false);
        let mut registry = FocusRegistry::new();
        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(first));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        button(&mut tree, content, 0.0, 0.0);
        button(&mut tree, content, 0.0, 20.0);
        let mut registry = FocusRegistry::new();

        registry.scan(&mut tree);
        let first = registry.current(&tree);
        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), first);
        assert!(first.is_some());
    }

    #[test]
    fn test_scan_keeps_valid_focus() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        button(&mut tree, content, 0.0, 0.0);
        let second = button(&mut tree, content, 0.0, 20.0);
        let mut registry = FocusRegistry::new();
        registry.focus(&mut tree, Some(second), true);

        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(second));
    }

    #[test]
    fn test_scan_empty_tree_leaves_focus_unset() {
        let mut tree = ViewTree::new();
        let mut registry = FocusRegistry::new();
        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), None);
    }

    #[test]
    fn test_scan_inside_scope_ignores_outside_focus() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let outside = button(&mut tree, root, 0.0, 0.0);
        let modal = modal(&mut tree);
        let mut registry = FocusRegistry::new();
        registry.set_scope(&mut tree, Some(modal));
        registry.focus(&mut tree, Some(outside), true);

        let inside = button(&mut tree, modal, 10.0, 10.0);
        registry.scan(&mut tree);
        assert_eq!(registry.current(&tree), Some(inside));
    }
}
