//! View tree consumed by the focus engine
//!
//! The rendering layer describes each screen as a tree of containers (sidebar,
//! rows, rails, sections, grids, modals) and focusable elements. Container
//! membership is materialized when a node is inserted, so the resolver answers
//! "which rail/row/section am I in" with a field lookup instead of a tree walk.
//!
//! Rectangles are stored in document coordinates. Scrollable containers keep an
//! offset along one axis and [`ViewTree::viewport_rect`] applies those offsets
//! on demand, so positions are never cached across scrolls or renders.

use std::collections::HashMap;

use super::geometry::Rect;

/// Identifier of a node inside a [`ViewTree`]
///
/// Ids are never reused: once a subtree is cleared its ids stay detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Structural containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Global navigation menu
    Sidebar,
    /// Main content area that receives page renders
    Content,
    /// Page-level content container (match or league detail)
    Page,
    /// Date selector above the home rows
    DateHeader,
    /// Home layout row pairing a header with a rail
    Row,
    /// Horizontally scrolling strip of items
    Rail,
    /// Titled section holding a grid (favorites page)
    Section,
    /// Grid of cards inside a section
    Grid,
    /// Modal dialog
    Modal,
    /// Live alert overlay
    Alert,
    /// Generic grouping with no navigation semantics
    Panel,
}

/// Focusable element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Card,
    Button,
    RowHeader,
    SectionAction,
    Tab,
    SidebarItem,
    ScrollPanel,
    CloseButton,
    AlertBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Container(ContainerKind),
    Element(ElementKind),
}

/// Axis along which a container scrolls its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Opaque action attached to an element, invoked on Enter
///
/// The focus engine never interprets it; it mirrors `data-action`/`data-id`
/// style attributes of the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Activation {
    pub action: String,
    pub id: Option<i64>,
}

impl Activation {
    pub fn new(action: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            action: action.into(),
            id,
        }
    }
}

/// Scroll position of a scroll panel
///
/// `max_offset` is derived from the content height; a fresh panel starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub offset: f64,
    pub max_offset: f64,
}

impl ScrollState {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            offset: 0.0,
            max_offset: (content_height - viewport_height).max(0.0),
        }
    }

    pub fn is_at_top(&self) -> bool {
        self.offset <= 0.0
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset
    }

    /// Move by `delta`, clamped to the valid range. Returns the applied change.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        let before = self.offset;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset);
        self.offset - before
    }
}

/// Containers a node belongs to, nearest ancestor of each kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    /// Ancestor chain, nearest first (the root is last)
    pub ancestors: Vec<NodeId>,
    pub sidebar: Option<NodeId>,
    pub content: Option<NodeId>,
    pub page: Option<NodeId>,
    pub date_header: Option<NodeId>,
    pub row: Option<NodeId>,
    pub rail: Option<NodeId>,
    pub section: Option<NodeId>,
    pub grid: Option<NodeId>,
    pub modal: Option<NodeId>,
    pub alert: Option<NodeId>,
    pub scroll_panel: Option<NodeId>,
}

impl Membership {
    /// Membership of a child inserted under `parent`
    fn child_of(parent_id: NodeId, parent: &Node) -> Self {
        let mut m = parent.membership.clone();
        m.ancestors.insert(0, parent_id);
        match parent.kind {
            NodeKind::Container(kind) => {
                let slot = match kind {
                    ContainerKind::Sidebar => &mut m.sidebar,
                    ContainerKind::Content => &mut m.content,
                    ContainerKind::Page => &mut m.page,
                    ContainerKind::DateHeader => &mut m.date_header,
                    ContainerKind::Row => &mut m.row,
                    ContainerKind::Rail => &mut m.rail,
                    ContainerKind::Section => &mut m.section,
                    ContainerKind::Grid => &mut m.grid,
                    ContainerKind::Modal => &mut m.modal,
                    ContainerKind::Alert => &mut m.alert,
                    ContainerKind::Panel => return m,
                };
                *slot = Some(parent_id);
            }
            NodeKind::Element(ElementKind::ScrollPanel) => m.scroll_panel = Some(parent_id),
            _ => {}
        }
        m
    }
}

/// Description of a node to insert
#[derive(Debug, Clone)]
pub struct NodeSpec {
    kind: NodeKind,
    rect: Rect,
    key: Option<String>,
    label: String,
    activation: Option<Activation>,
    active: bool,
    visible: bool,
    content_height: Option<f64>,
}

impl NodeSpec {
    pub fn container(kind: ContainerKind, rect: Rect) -> Self {
        Self::new(NodeKind::Container(kind), rect)
    }

    pub fn element(kind: ElementKind, rect: Rect) -> Self {
        Self::new(NodeKind::Element(kind), rect)
    }

    fn new(kind: NodeKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            key: None,
            label: String::new(),
            activation: None,
            active: false,
            visible: true,
            content_height: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Total height of a scroll panel's content
    pub fn content_height(mut self, height: f64) -> Self {
        self.content_height = Some(height);
        self
    }
}

/// A container or element in the view tree
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Layout rectangle in document coordinates
    pub rect: Rect,
    pub key: Option<String>,
    pub label: String,
    /// Named text fragments (e.g. score, status) patched in place by live updates
    pub slots: HashMap<String, String>,
    pub activation: Option<Activation>,
    /// Active tab / selected sidebar entry
    pub active: bool,
    /// Visual focus marker
    pub focused: bool,
    pub visible: bool,
    pub attached: bool,
    pub overflow: Overflow,
    /// Scroll offset of a container along its overflow axis
    pub view_offset: f64,
    pub scroll: Option<ScrollState>,
    pub membership: Membership,
}

impl Node {
    pub fn is_focusable(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn element_kind(&self) -> Option<ElementKind> {
        match self.kind {
            NodeKind::Element(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.kind {
            NodeKind::Container(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

/// Arena-backed tree of containers and focusable elements
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<Node>,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
            key: None,
            label: String::new(),
            slots: HashMap::new(),
            activation: None,
            active: false,
            focused: false,
            visible: true,
            attached: true,
            overflow: Overflow::None,
            view_offset: 0.0,
            scroll: None,
            membership: Membership::default(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Set the root rectangle (the screen)
    pub fn set_viewport(&mut self, rect: Rect) {
        self.nodes[0].rect = rect;
    }

    /// Insert a node as the last child of `parent`
    ///
    /// Inserting under a detached or unknown parent yields a detached node.
    pub fn insert(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (membership, attached) = match self.nodes.get(parent.0) {
            Some(p) => (Membership::child_of(parent, p), p.attached),
            None => (Membership::default(), false),
        };
        let overflow = match spec.kind {
            NodeKind::Container(ContainerKind::Rail) => Overflow::Horizontal,
            NodeKind::Container(
                ContainerKind::Content | ContainerKind::Page | ContainerKind::Modal,
            ) => Overflow::Vertical,
            _ => Overflow::None,
        };
        let scroll = spec
            .content_height
            .map(|content| ScrollState::new(spec.rect.height, content));

        self.nodes.push(Node {
            kind: spec.kind,
            parent: Some(parent),
            children: Vec::new(),
            rect: spec.rect,
            key: spec.key,
            label: spec.label,
            slots: HashMap::new(),
            activation: spec.activation,
            active: spec.active,
            focused: false,
            visible: spec.visible,
            attached,
            overflow,
            view_offset: 0.0,
            scroll,
            membership,
        });
        if attached {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Detach every descendant of `id` (page re-render)
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            self.detach_subtree(child);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.view_offset = 0.0;
        }
    }

    /// Detach `id` and its subtree from the tree
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        if let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        self.detach_subtree(id);
    }

    fn detach_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0) {
                node.attached = false;
                node.focused = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.attached)
    }

    /// A node is visible when it and every ancestor are visible and attached
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        node.attached
            && node.visible
            && node
                .membership
                .ancestors
                .iter()
                .all(|a| self.nodes[a.0].visible)
    }

    /// Attached, focusable and visible
    pub fn is_eligible(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_focusable) && self.is_visible(id)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.visible = visible;
        }
    }

    pub fn set_active(&mut self, id: NodeId, active: bool) {
        if let Some(node) = self.get_mut(id) {
            node.active = active;
        }
    }

    pub fn set_marker(&mut self, id: NodeId, focused: bool) {
        if let Some(node) = self.get_mut(id) {
            node.focused = focused;
        }
    }

    /// Write a text slot only if it differs. Returns true if the text changed.
    pub fn set_slot(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.slot(name) == Some(value) {
            return false;
        }
        node.slots.insert(name.to_string(), value.to_string());
        true
    }

    pub fn remove_slot(&mut self, id: NodeId, name: &str) -> bool {
        self.get_mut(id)
            .is_some_and(|node| node.slots.remove(name).is_some())
    }

    /// DOM-style containment: `ancestor` contains itself and all its descendants
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        ancestor == id
            || self
                .get(id)
                .is_some_and(|n| n.membership.ancestors.contains(&ancestor))
    }

    /// All attached descendants of `root` in document order (root excluded)
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let Some(node) = self.get(root).filter(|n| n.attached) else {
            return result;
        };
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        result
    }

    /// Eligible focus targets under `root` in document order
    pub fn eligible_in(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.is_eligible(*id))
            .collect()
    }

    pub fn first_eligible(&self, root: NodeId) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.is_eligible(*id))
    }

    /// Attached containers of `kind` in document order
    pub fn containers(&self, kind: ContainerKind) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].kind == NodeKind::Container(kind))
            .collect()
    }

    /// First attached container of `kind`
    pub fn first_container(&self, kind: ContainerKind) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|id| self.nodes[id.0].kind == NodeKind::Container(kind))
    }

    /// Attached nodes carrying `key`, in document order
    pub fn find_by_key(&self, key: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].key.as_deref() == Some(key))
            .collect()
    }

    /// Rectangle of `id` in viewport coordinates
    pub fn viewport_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.get(id)?;
        let (mut dx, mut dy) = (0.0, 0.0);
        for ancestor in &node.membership.ancestors {
            let a = &self.nodes[ancestor.0];
            match a.overflow {
                Overflow::Horizontal => dx -= a.view_offset,
                Overflow::Vertical => dy -= a.view_offset,
                Overflow::None => {}
            }
        }
        Some(node.rect.translate(dx, dy))
    }

    /// Scroll ancestor containers so `id` is visible
    ///
    /// Horizontal containers center the element on the inline axis, vertical
    /// containers scroll by the minimum amount (nearest edge). Ancestors are
    /// handled innermost first, each one seeing the element where the inner
    /// containers already moved it, so nested containers on the same axis
    /// never add up their shifts.
    pub fn scroll_into_view(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let mut rect = node.rect;
        let ancestors = node.membership.ancestors.clone();

        for ancestor in ancestors {
            let container = &self.nodes[ancestor.0];
            let bounds = container.rect;
            let overflow = container.overflow;
            if overflow == Overflow::None {
                continue;
            }
            let max = self.max_view_offset(ancestor);
            let current = self.nodes[ancestor.0].view_offset;
            let offset = match overflow {
                Overflow::Horizontal => {
                    rect.center_x() - bounds.left() - bounds.width / 2.0
                }
                Overflow::Vertical => {
                    if rect.top() < bounds.top() + current {
                        rect.top() - bounds.top()
                    } else if rect.bottom() > bounds.bottom() + current {
                        rect.bottom() - bounds.bottom()
                    } else {
                        current
                    }
                }
                Overflow::None => current,
            };
            let offset = offset.clamp(0.0, max);
            self.nodes[ancestor.0].view_offset = offset;
            rect = match overflow {
                Overflow::Horizontal => rect.translate(-offset, 0.0),
                Overflow::Vertical => rect.translate(0.0, -offset),
                Overflow::None => rect,
            };
        }
    }

    /// Largest scroll offset of a container given its content extent
    fn max_view_offset(&self, id: NodeId) -> f64 {
        let container = &self.nodes[id.0];
        let bounds = container.rect;
        let descendants = self.descendants(id);
        match container.overflow {
            Overflow::Horizontal => {
                let extent = descendants
                    .iter()
                    .map(|d| self.nodes[d.0].rect.right())
                    .fold(bounds.right(), f64::max);
                extent - bounds.right()
            }
            Overflow::Vertical => {
                let extent = descendants
                    .iter()
                    .map(|d| self.nodes[d.0].rect.bottom())
                    .fold(bounds.bottom(), f64::max);
                extent - bounds.bottom()
            }
            Overflow::None => 0.0,
        }
    }

    pub fn scroll_state(&self, id: NodeId) -> Option<ScrollState> {
        self.get(id).and_then(|n| n.scroll)
    }

    pub fn scroll_state_mut(&mut self, id: NodeId) -> Option<&mut ScrollState> {
        self.get_mut(id).and_then(|n| n.scroll.as_mut())
    }
}
