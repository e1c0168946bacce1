//! Directional focus resolution
//!
//! [`SpatialResolver`] evaluates an ordered list of strategies. The first one
//! that claims the move wins:
//!
//! 1. `rail`: Left/Right stay inside the focused rail
//! 2. `row`: Up/Down between home row headers and rails by row index
//! 3. `grid-section`: Up/Down inside titled sections holding card grids
//! 4. `scoped-list`: Up/Down through the active scope in document order
//! 5. `geometric`: nearest candidate in the requested half-plane
//!
//! Structured layouts are handled by topology (1-3) so a move can never skip a
//! row or leave a rail. Distance search is left for unstructured content.

use tracing::{debug, trace};

use super::geometry::{Direction, Rect};
use super::tree::{ContainerKind, ElementKind, NodeId, ViewTree};

/// Weight of the perpendicular offset in geometric scoring
const PERPENDICULAR_PENALTY: f64 = 3.0;

/// Tolerance used to group grid cards into visual rows
const GRID_ROW_TOLERANCE: f64 = 0.5;

/// Inputs shared by all strategies for one move
pub struct MoveContext<'a> {
    pub tree: &'a ViewTree,
    pub current: NodeId,
    pub scope: Option<NodeId>,
    pub direction: Direction,
}

impl MoveContext<'_> {
    fn rect(&self, id: NodeId) -> Option<Rect> {
        self.tree.viewport_rect(id)
    }

    fn current_rect(&self) -> Option<Rect> {
        self.rect(self.current)
    }

    fn kind_of(&self, id: NodeId) -> Option<ElementKind> {
        self.tree.get(id).and_then(|n| n.element_kind())
    }
}

/// Outcome of a single strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Focus this element
    Move(NodeId),
    /// The strategy owns this key; nothing moves
    Stay,
    /// Not applicable, try the next strategy
    Continue,
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution;
}

/// Ordered chain of strategies
pub struct SpatialResolver {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for SpatialResolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(RailStrategy),
            Box::new(RowStrategy),
            Box::new(GridSectionStrategy),
            Box::new(ScopedListStrategy),
            Box::new(GeometricStrategy),
        ])
    }
}

impl SpatialResolver {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    #[cfg(test)]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Target of a move, or `None` when the move is a no-op
    pub fn resolve(&self, cx: &MoveContext<'_>) -> Option<NodeId> {
        for strategy in &self.strategies {
            match strategy.try_resolve(cx) {
                Resolution::Move(target) => {
                    debug!(
                        "NAV: {:?} {:?} -> {:?} via {}",
                        cx.direction,
                        cx.current,
                        target,
                        strategy.name()
                    );
                    return Some(target);
                }
                Resolution::Stay => {
                    debug!("NAV: {:?} blocked by {}", cx.direction, strategy.name());
                    return None;
                }
                Resolution::Continue => {}
            }
        }
        None
    }
}

/// Element of `candidates` whose horizontal center is closest to `reference`
///
/// Ties keep the first candidate.
fn closest_x(cx: &MoveContext<'_>, candidates: &[NodeId], reference: &Rect) -> Option<NodeId> {
    let mut best = None;
    let mut best_diff = f64::INFINITY;
    for id in candidates {
        let Some(r) = cx.rect(*id) else { continue };
        let diff = (r.center_x() - reference.center_x()).abs();
        if diff < best_diff {
            best_diff = diff;
            best = Some(*id);
        }
    }
    best
}

// === rail ===

pub struct RailStrategy;

impl Strategy for RailStrategy {
    fn name(&self) -> &'static str {
        "rail"
    }

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution {
        if !cx.direction.is_horizontal() {
            return Resolution::Continue;
        }
        let Some(rail) = cx.tree.get(cx.current).and_then(|n| n.membership.rail) else {
            return Resolution::Continue;
        };

        let siblings = cx.tree.eligible_in(rail);
        let Some(index) = siblings.iter().position(|id| *id == cx.current) else {
            return Resolution::Stay;
        };
        let target = match cx.direction {
            Direction::Right => siblings.get(index + 1),
            Direction::Left => index.checked_sub(1).and_then(|i| siblings.get(i)),
            _ => None,
        };
        match target {
            Some(target) => Resolution::Move(*target),
            None => Resolution::Stay,
        }
    }
}

// === row ===

pub struct RowStrategy;

impl RowStrategy {
    fn header_of(cx: &MoveContext<'_>, row: NodeId) -> Option<NodeId> {
        cx.tree
            .eligible_in(row)
            .into_iter()
            .find(|id| cx.kind_of(*id) == Some(ElementKind::RowHeader))
    }

    fn rail_items_of(cx: &MoveContext<'_>, row: NodeId) -> Vec<NodeId> {
        let eligible = cx.tree.eligible_in(row);
        let in_rail: Vec<NodeId> = eligible
            .iter()
            .copied()
            .filter(|id| cx.tree.get(*id).is_some_and(|n| n.membership.rail.is_some()))
            .collect();
        let candidates = if in_rail.is_empty() { eligible } else { in_rail };
        candidates
            .into_iter()
            .filter(|id| cx.kind_of(*id) != Some(ElementKind::RowHeader))
            .collect()
    }
}

impl Strategy for RowStrategy {
    fn name(&self) -> &'static str {
        "row"
    }

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution {
        if !cx.direction.is_vertical() {
            return Resolution::Continue;
        }
        let Some(node) = cx.tree.get(cx.current) else {
            return Resolution::Continue;
        };
        // Rails are a hard vertical boundary, inside a row or not
        let in_rail = node.membership.rail.is_some();
        let blocked = if in_rail { Resolution::Stay } else { Resolution::Continue };
        let Some(row) = node.membership.row else {
            return blocked;
        };
        let is_header = node.element_kind() == Some(ElementKind::RowHeader);

        let rows = cx.tree.containers(ContainerKind::Row);
        let Some(row_index) = rows.iter().position(|r| *r == row) else {
            return blocked;
        };

        // (target row, target is header)
        let target = match (cx.direction, is_header) {
            (Direction::Down, true) => Some((row, false)),
            (Direction::Down, false) => rows.get(row_index + 1).map(|r| (*r, true)),
            (Direction::Up, true) => {
                if row_index == 0 {
                    let date_control = cx
                        .tree
                        .first_container(ContainerKind::DateHeader)
                        .and_then(|header| cx.tree.first_eligible(header));
                    if let Some(control) = date_control {
                        return Resolution::Move(control);
                    }
                    None
                } else {
                    Some((rows[row_index - 1], false))
                }
            }
            (Direction::Up, false) => Some((row, true)),
            _ => None,
        };

        let resolved = target.and_then(|(target_row, to_header)| {
            if to_header {
                Self::header_of(cx, target_row)
            } else {
                let reference = cx.current_rect()?;
                closest_x(cx, &Self::rail_items_of(cx, target_row), &reference)
            }
        });

        match resolved {
            Some(id) => Resolution::Move(id),
            None => blocked,
        }
    }
}

// === grid section ===

pub struct GridSectionStrategy;

impl GridSectionStrategy {
    fn sections(cx: &MoveContext<'_>) -> Vec<NodeId> {
        let all = cx.tree.containers(ContainerKind::Section);
        match cx.scope {
            Some(scope) => all.into_iter().filter(|s| cx.tree.contains(scope, *s)).collect(),
            None => all,
        }
    }

    fn grid_cards(cx: &MoveContext<'_>, section: NodeId) -> Vec<NodeId> {
        cx.tree
            .descendants(section)
            .into_iter()
            .find(|id| {
                cx.tree.get(*id).and_then(|n| n.container_kind()) == Some(ContainerKind::Grid)
            })
            .map(|grid| cx.tree.eligible_in(grid))
            .unwrap_or_default()
    }

    fn header_action(cx: &MoveContext<'_>, section: NodeId) -> Option<NodeId> {
        cx.tree.eligible_in(section).into_iter().find(|id| {
            cx.kind_of(*id) == Some(ElementKind::SectionAction)
                && cx.tree.get(*id).is_some_and(|n| n.membership.grid.is_none())
        })
    }

    /// Cards on the top (`first`) or bottom visual row of a grid
    fn edge_row(cx: &MoveContext<'_>, cards: &[NodeId], first: bool) -> Vec<NodeId> {
        let centers: Vec<(NodeId, f64)> = cards
            .iter()
            .filter_map(|id| cx.rect(*id).map(|r| (*id, r.center_y())))
            .collect();
        let edge = centers.iter().map(|(_, y)| *y).fold(
            if first { f64::INFINITY } else { f64::NEG_INFINITY },
            |acc, y| if first { acc.min(y) } else { acc.max(y) },
        );
        centers
            .into_iter()
            .filter(|(_, y)| (y - edge).abs() < GRID_ROW_TOLERANCE)
            .map(|(id, _)| id)
            .collect()
    }

    /// Closest card above/below inside the same grid: vertical distance first, then horizontal
    fn grid_neighbor(cx: &MoveContext<'_>, grid: NodeId, reference: &Rect) -> Option<NodeId> {
        let mut best = None;
        let mut best_score = (f64::INFINITY, f64::INFINITY);
        for id in cx.tree.eligible_in(grid) {
            if id == cx.current {
                continue;
            }
            let Some(r) = cx.rect(id) else { continue };
            if !reference.is_in_direction(&r, cx.direction) {
                continue;
            }
            let score = (
                (r.center_y() - reference.center_y()).abs(),
                (r.center_x() - reference.center_x()).abs(),
            );
            if score < best_score {
                best_score = score;
                best = Some(id);
            }
        }
        best
    }

    /// Enter `section` from above (`from_above`) or below
    fn enter_section(cx: &MoveContext<'_>, section: NodeId, reference: &Rect, from_above: bool) -> Option<NodeId> {
        let cards = Self::grid_cards(cx, section);
        let edge = Self::edge_row(cx, &cards, from_above);
        closest_x(cx, &edge, reference).or_else(|| Self::header_action(cx, section))
    }

    fn adjacent_section(cx: &MoveContext<'_>, section: NodeId) -> Option<NodeId> {
        let sections = Self::sections(cx);
        let index = sections.iter().position(|s| *s == section)?;
        match cx.direction {
            Direction::Down => sections.get(index + 1).copied(),
            Direction::Up => index.checked_sub(1).and_then(|i| sections.get(i).copied()),
            _ => None,
        }
    }
}

impl Strategy for GridSectionStrategy {
    fn name(&self) -> &'static str {
        "grid-section"
    }

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution {
        if !cx.direction.is_vertical() {
            return Resolution::Continue;
        }
        let Some(node) = cx.tree.get(cx.current) else {
            return Resolution::Continue;
        };
        let Some(section) = node.membership.section else {
            return Resolution::Continue;
        };
        let Some(reference) = cx.current_rect() else {
            return Resolution::Continue;
        };
        let going_down = cx.direction == Direction::Down;

        let target = match node.membership.grid {
            Some(grid) if cx.tree.contains(section, grid) => Self::grid_neighbor(cx, grid, &reference)
                .or_else(|| {
                    Self::adjacent_section(cx, section)
                        .and_then(|next| Self::enter_section(cx, next, &reference, going_down))
                }),
            _ if node.element_kind() == Some(ElementKind::SectionAction) => {
                if going_down {
                    let cards = Self::grid_cards(cx, section);
                    closest_x(cx, &Self::edge_row(cx, &cards, true), &reference)
                } else {
                    Self::adjacent_section(cx, section)
                        .and_then(|prev| Self::enter_section(cx, prev, &reference, false))
                }
            }
            _ => None,
        };

        match target {
            Some(id) => Resolution::Move(id),
            None => Resolution::Continue,
        }
    }
}

// === scoped list ===

pub struct ScopedListStrategy;

impl Strategy for ScopedListStrategy {
    fn name(&self) -> &'static str {
        "scoped-list"
    }

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution {
        let Some(scope) = cx.scope else {
            return Resolution::Continue;
        };
        if !cx.direction.is_vertical() {
            return Resolution::Continue;
        }
        // Grid cards the grid strategy gave up on fall back to geometric
        if cx.tree.get(cx.current).is_some_and(|n| n.membership.grid.is_some()) {
            return Resolution::Continue;
        }
        let list = cx.tree.eligible_in(scope);
        let Some(index) = list.iter().position(|id| *id == cx.current) else {
            return Resolution::Continue;
        };
        let target = match cx.direction {
            Direction::Down => list.get(index + 1),
            Direction::Up => index.checked_sub(1).and_then(|i| list.get(i)),
            _ => None,
        };
        match target {
            Some(id) => Resolution::Move(*id),
            None => Resolution::Stay,
        }
    }
}

// === geometric ===

pub struct GeometricStrategy;

impl GeometricStrategy {
    /// Edge gap along the movement axis plus the weighted perpendicular offset
    pub fn score(from: &Rect, to: &Rect, direction: Direction) -> f64 {
        from.edge_gap(to, direction) + PERPENDICULAR_PENALTY * from.perpendicular_offset(to, direction)
    }
}

impl Strategy for GeometricStrategy {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn try_resolve(&self, cx: &MoveContext<'_>) -> Resolution {
        let Some(node) = cx.tree.get(cx.current) else {
            return Resolution::Stay;
        };
        let Some(from) = cx.current_rect() else {
            return Resolution::Stay;
        };
        let root = cx
            .scope
            .or(node.membership.sidebar)
            .unwrap_or(cx.tree.root());

        let mut best = None;
        let mut best_score = f64::INFINITY;
        for id in cx.tree.eligible_in(root) {
            if id == cx.current {
                continue;
            }
            let Some(to) = cx.rect(id) else { continue };
            if !from.is_in_direction(&to, cx.direction) {
                continue;
            }
            let score = Self::score(&from, &to, cx.direction);
            trace!("NAV: candidate {:?} score {:.1}", id, score);
            if score < best_score {
                best_score = score;
                best = Some(id);
            }
        }

        let Some(best) = best else {
            return Resolution::Stay;
        };

        let lands_in_sidebar = cx
            .tree
            .get(best)
            .is_some_and(|n| n.membership.sidebar.is_some());
        let on_page = node.membership.page.is_some() && node.membership.modal.is_none();
        if lands_in_sidebar && on_page {
            debug!("NAV: refusing to leave page for sidebar");
            return Resolution::Stay;
        }
        Resolution::Move(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::testing::*;
    use crate::nav::tree::NodeSpec;

    fn resolve(tree: &ViewTree, current: NodeId, scope: Option<NodeId>, direction: Direction) -> Option<NodeId> {
        SpatialResolver::default().resolve(&MoveContext {
            tree,
            current,
            scope,
            direction,
        })
    }

    /// Press `direction` `times` times, following focus
    fn walk(tree: &ViewTree, start: NodeId, direction: Direction, times: usize) -> Vec<NodeId> {
        let mut visited = vec![start];
        let mut current = start;
        for _ in 0..times {
            if let Some(next) = resolve(tree, current, None, direction) {
                current = next;
            }
            visited.push(current);
        }
        visited
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            SpatialResolver::default().strategy_names(),
            vec!["rail", "row", "grid-section", "scoped-list", "geometric"]
        );
    }

    // === rail ===

    #[test]
    fn test_rail_right_stops_at_last_item() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 2, 5);
        let items = &rows[0].items;

        let visited = walk(&tree, items[1], Direction::Right, 6);
        assert!(visited.iter().all(|id| items.contains(id)));
        assert_eq!(*visited.last().unwrap(), items[4]);
        assert_eq!(resolve(&tree, items[4], None, Direction::Right), None);
    }

    #[test]
    fn test_rail_left_stops_at_first_item() {
        let mut tree = ViewTree::new();
        let (_, _sidebar_items) = sidebar(&mut tree, 3);
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 1, 4);
        let items = &rows[0].items;

        let visited = walk(&tree, items[3], Direction::Left, 5);
        assert!(visited.iter().all(|id| items.contains(id)));
        // Never escapes to the sidebar on the left
        assert_eq!(resolve(&tree, items[0], None, Direction::Left), None);
    }

    #[test]
    fn test_rail_skips_hidden_items() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 1, 3);
        tree.set_visible(rows[0].items[1], false);
        assert_eq!(
            resolve(&tree, rows[0].items[0], None, Direction::Right),
            Some(rows[0].items[2])
        );
    }

    // === row ===

    #[test]
    fn test_row_traversal_order() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 3, 3);

        let down = resolve(&tree, rows[0].header, None, Direction::Down);
        assert_eq!(down, Some(rows[0].items[0]));
        let down = resolve(&tree, rows[0].items[0], None, Direction::Down);
        assert_eq!(down, Some(rows[1].header));
    }

    #[test]
    fn test_row_up_from_rail_goes_to_own_header() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 2, 3);
        assert_eq!(resolve(&tree, rows[1].items[2], None, Direction::Up), Some(rows[1].header));
    }

    #[test]
    fn test_row_up_from_header_picks_closest_x() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let r0 = home_row(&mut tree, content, 40.0, &[200.0, 350.0, 460.0, 700.0]);
        // Header of the second row centered at x=500
        let row = tree.insert(content, NodeSpec::container(ContainerKind::Row, rect(200.0, 160.0, 800.0, 100.0)));
        let header = tree.insert(row, NodeSpec::element(ElementKind::RowHeader, rect(400.0, 160.0, 200.0, 20.0)));

        // Centers of r0 items: 250, 400, 510, 750; 510 is nearest to 500
        assert_eq!(resolve(&tree, header, None, Direction::Up), Some(r0.items[2]));
    }

    #[test]
    fn test_row_down_at_last_row_is_blocked_in_rail() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let rows = home_rows(&mut tree, content, 2, 2);
        // Something below the last row must not be reached
        button(&mut tree, content, 200.0, 400.0);
        assert_eq!(resolve(&tree, rows[1].items[0], None, Direction::Down), None);
    }

    #[test]
    fn test_rail_outside_row_is_a_vertical_boundary() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        button(&mut tree, content, 200.0, 0.0);
        let rail = tree.insert(content, NodeSpec::container(ContainerKind::Rail, rect(200.0, 100.0, 800.0, 70.0)));
        let card = tree.insert(rail, NodeSpec::element(ElementKind::Card, rect(200.0, 100.0, 100.0, 70.0)));
        let next = tree.insert(rail, NodeSpec::element(ElementKind::Card, rect(310.0, 100.0, 100.0, 70.0)));
        button(&mut tree, content, 200.0, 300.0);

        assert_eq!(resolve(&tree, card, None, Direction::Down), None);
        assert_eq!(resolve(&tree, card, None, Direction::Up), None);
        assert_eq!(resolve(&tree, card, None, Direction::Right), Some(next));
    }

    #[test]
    fn test_row_up_from_first_header_goes_to_date_header() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let date_header = tree.insert(content, NodeSpec::container(ContainerKind::DateHeader, rect(200.0, 0.0, 800.0, 30.0)));
        let prev_day = button(&mut tree, date_header, 200.0, 5.0);
        button(&mut tree, date_header, 400.0, 5.0);
        let rows = home_rows(&mut tree, content, 2, 2);

        assert_eq!(resolve(&tree, rows[0].header, None, Direction::Up), Some(prev_day));
    }

    #[test]
    fn test_row_up_from_first_header_without_date_header_falls_through() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let tab = button(&mut tree, content, 200.0, 0.0);
        let rows = home_rows(&mut tree, content, 1, 2);
        assert_eq!(resolve(&tree, rows[0].header, None, Direction::Up), Some(tab));
    }

    // === grid section ===

    #[test]
    fn test_grid_moves_within_grid_first() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let s = grid_section(&mut tree, content, 0.0, 2, 3);
        assert_eq!(resolve(&tree, s.cards[0][1], None, Direction::Down), Some(s.cards[1][1]));
        assert_eq!(resolve(&tree, s.cards[1][2], None, Direction::Up), Some(s.cards[0][2]));
    }

    #[test]
    fn test_grid_bottom_row_jumps_to_next_section_grid() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let first = grid_section(&mut tree, content, 0.0, 2, 3);
        let second = grid_section(&mut tree, content, 200.0, 2, 3);

        assert_eq!(resolve(&tree, first.cards[1][2], None, Direction::Down), Some(second.cards[0][2]));
        assert_eq!(resolve(&tree, second.cards[0][1], None, Direction::Up), Some(first.cards[1][1]));
    }

    #[test]
    fn test_grid_empty_next_section_falls_back_to_action() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let first = grid_section(&mut tree, content, 0.0, 1, 2);
        let empty = grid_section(&mut tree, content, 200.0, 0, 0);
        assert_eq!(resolve(&tree, first.cards[0][0], None, Direction::Down), Some(empty.action));
    }

    #[test]
    fn test_grid_section_action_moves() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let first = grid_section(&mut tree, content, 0.0, 2, 2);
        let second = grid_section(&mut tree, content, 200.0, 1, 2);

        // Action sits at x=800..900; the closest first-row card is the right one
        assert_eq!(resolve(&tree, second.action, None, Direction::Down), Some(second.cards[0][1]));
        assert_eq!(resolve(&tree, second.action, None, Direction::Up), Some(first.cards[1][1]));
    }

    #[test]
    fn test_grid_last_section_falls_through_to_geometric() {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let s = grid_section(&mut tree, content, 0.0, 1, 2);
        let below = button(&mut tree, content, 200.0, 300.0);
        assert_eq!(resolve(&tree, s.cards[0][0], None, Direction::Down), Some(below));
    }

    // === scoped list ===

    #[test]
    fn test_scoped_list_walks_document_order_without_wrap() {
        let mut tree = ViewTree::new();
        let modal = modal(&mut tree);
        let a = button(&mut tree, modal, 320.0, 120.0);
        // b sits to the right of a, not below it
        let b = button(&mut tree, modal, 450.0, 120.0);
        let c = button(&mut tree, modal, 320.0, 200.0);

        assert_eq!(resolve(&tree, a, Some(modal), Direction::Down), Some(b));
        assert_eq!(resolve(&tree, b, Some(modal), Direction::Down), Some(c));
        assert_eq!(resolve(&tree, c, Some(modal), Direction::Down), None);
        assert_eq!(resolve(&tree, a, Some(modal), Direction::Up), None);
    }

    #[test]
    fn test_scoped_grid_edge_falls_back_to_geometric() {
        let mut tree = ViewTree::new();
        let modal = modal(&mut tree);
        let s = grid_section(&mut tree, modal, 100.0, 1, 3);
        let below = button(&mut tree, modal, 200.0, 300.0);

        // Document order would give the next card; the button is what lies below
        assert_eq!(resolve(&tree, s.cards[0][0], Some(modal), Direction::Down), Some(below));
        assert_eq!(resolve(&tree, below, Some(modal), Direction::Up), Some(s.cards[0][2]));
    }

    #[test]
    fn test_scope_is_a_hard_boundary() {
        let mut tree = ViewTree::new();
        let modal = modal(&mut tree);
        let grid = tree.insert(modal, NodeSpec::container(ContainerKind::Grid, rect(300.0, 100.0, 400.0, 100.0)));
        let a = button(&mut tree, grid, 320.0, 120.0);
        let b = button(&mut tree, grid, 450.0, 120.0);
        let c = button(&mut tree, modal, 320.0, 300.0);
        // d is outside the modal, right next to b and just below c
        let root = tree.root();
        let d = button(&mut tree, root, 710.0, 120.0);
        let d2 = button(&mut tree, root, 320.0, 520.0);

        for from in [a, b, c] {
            for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
                let target = resolve(&tree, from, Some(modal), direction);
                assert_ne!(target, Some(d));
                assert_ne!(target, Some(d2));
            }
        }
    }

    // === geometric ===

    #[test]
    fn test_geometric_prefers_aligned_candidates() {
        let mut tree = ViewTree::new();
        let panel = tree.insert(tree.root(), NodeSpec::container(ContainerKind::Panel, rect(0.0, 0.0, 1000.0, 600.0)));
        let from = button(&mut tree, panel, 100.0, 0.0);
        // Closer on the movement axis but far off to the side
        button(&mut tree, panel, 400.0, 30.0);
        let aligned = button(&mut tree, panel, 100.0, 80.0);
        assert_eq!(resolve(&tree, from, None, Direction::Down), Some(aligned));
    }

    #[test]
    fn test_geometric_requires_strict_half_plane() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let from = button(&mut tree, root, 0.0, 0.0);
        button(&mut tree, root, 200.0, 0.0);
        assert_eq!(resolve(&tree, from, None, Direction::Down), None);
        assert_eq!(resolve(&tree, from, None, Direction::Up), None);
    }

    #[test]
    fn test_geometric_tie_keeps_document_order() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let from = button(&mut tree, root, 200.0, 0.0);
        let left = button(&mut tree, root, 100.0, 50.0);
        button(&mut tree, root, 300.0, 50.0);
        assert_eq!(resolve(&tree, from, None, Direction::Down), Some(left));
    }

    #[test]
    fn test_geometric_sidebar_search_stays_in_sidebar() {
        let mut tree = ViewTree::new();
        let (_, items) = sidebar(&mut tree, 3);
        let content = content(&mut tree);
        button(&mut tree, content, 200.0, 10.0);
        assert_eq!(resolve(&tree, items[0], None, Direction::Down), Some(items[1]));
        assert_eq!(resolve(&tree, items[0], None, Direction::Right), None);
    }

    #[test]
    fn test_geometric_never_leaves_page_for_sidebar() {
        let mut tree = ViewTree::new();
        sidebar(&mut tree, 3);
        let content = content(&mut tree);
        let page = tree.insert(content, NodeSpec::container(ContainerKind::Page, rect(200.0, 0.0, 800.0, 600.0)));
        let back = button(&mut tree, page, 200.0, 10.0);
        assert_eq!(resolve(&tree, back, None, Direction::Left), None);
    }

    #[test]
    fn test_geometric_from_content_can_reach_sidebar() {
        let mut tree = ViewTree::new();
        let (_, items) = sidebar(&mut tree, 3);
        let content = content(&mut tree);
        let first = button(&mut tree, content, 200.0, 0.0);
        assert_eq!(resolve(&tree, first, None, Direction::Left), Some(items[0]));
    }

    #[test]
    fn test_geometric_skips_hidden_candidates() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let from = button(&mut tree, root, 0.0, 0.0);
        let hidden = button(&mut tree, root, 0.0, 40.0);
        let far = button(&mut tree, root, 0.0, 200.0);
        tree.set_visible(hidden, false);
        assert_eq!(resolve(&tree, from, None, Direction::Down), Some(far));
    }

    #[test]
    fn test_score_weights_perpendicular_offset() {
        let from = rect(0.0, 0.0, 10.0, 10.0);
        let to = rect(20.0, 30.0, 10.0, 10.0);
        // gap 20, perpendicular offset 20 * 3
        assert_eq!(GeometricStrategy::score(&from, &to, Direction::Down), 80.0);
    }
}
