//! Layout builders shared by navigation tests
//!
//! Coordinates mimic a 1000x600 screen: a 180 wide sidebar on the left and the
//! content area from x=200.

use super::geometry::Rect;
use super::tree::{Activation, ContainerKind, ElementKind, NodeId, NodeSpec, ViewTree};

pub const CONTENT_X: f64 = 200.0;

pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, w, h)
}

pub fn content(tree: &mut ViewTree) -> NodeId {
    tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Content, rect(CONTENT_X, 0.0, 800.0, 600.0)),
    )
}

/// Sidebar with `count` stacked items
pub fn sidebar(tree: &mut ViewTree, count: usize) -> (NodeId, Vec<NodeId>) {
    let sidebar = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Sidebar, rect(0.0, 0.0, 180.0, 600.0)),
    );
    let items = (0..count)
        .map(|i| {
            tree.insert(
                sidebar,
                NodeSpec::element(ElementKind::SidebarItem, rect(10.0, 40.0 * i as f64, 160.0, 30.0))
                    .label(format!("item {}", i)),
            )
        })
        .collect();
    (sidebar, items)
}

pub fn modal(tree: &mut ViewTree) -> NodeId {
    tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Modal, rect(300.0, 100.0, 400.0, 400.0)),
    )
}

/// Alert overlay; returns its focusable body
pub fn alert(tree: &mut ViewTree) -> NodeId {
    let alert = tree.insert(
        tree.root(),
        NodeSpec::container(ContainerKind::Alert, rect(700.0, 500.0, 280.0, 80.0)),
    );
    tree.insert(
        alert,
        NodeSpec::element(ElementKind::AlertBody, rect(700.0, 500.0, 280.0, 80.0))
            .activation(Activation::new("open-match", Some(1))),
    )
}

/// 100x20 button
pub fn button(tree: &mut ViewTree, parent: NodeId, x: f64, y: f64) -> NodeId {
    tree.insert(
        parent,
        NodeSpec::element(ElementKind::Button, rect(x, y, 100.0, 20.0)),
    )
}

pub fn tab(tree: &mut ViewTree, parent: NodeId, x: f64, active: bool) -> NodeId {
    tree.insert(
        parent,
        NodeSpec::element(ElementKind::Tab, rect(x, 0.0, 18.0, 10.0)).active(active),
    )
}

pub fn scroll_panel(tree: &mut ViewTree, parent: NodeId, y: f64, content_height: f64) -> NodeId {
    tree.insert(
        parent,
        NodeSpec::element(ElementKind::ScrollPanel, rect(CONTENT_X, y, 800.0, 200.0))
            .content_height(content_height),
    )
}

pub struct RowFixture {
    pub row: NodeId,
    pub header: NodeId,
    pub rail: NodeId,
    pub items: Vec<NodeId>,
}

/// Home row at `y`: header on top, rail of 100 wide cards at the given x positions
pub fn home_row(tree: &mut ViewTree, parent: NodeId, y: f64, item_xs: &[f64]) -> RowFixture {
    let row = tree.insert(
        parent,
        NodeSpec::container(ContainerKind::Row, rect(CONTENT_X, y, 800.0, 100.0)),
    );
    let header = tree.insert(
        row,
        NodeSpec::element(ElementKind::RowHeader, rect(CONTENT_X, y, 200.0, 20.0)),
    );
    let rail = tree.insert(
        row,
        NodeSpec::container(ContainerKind::Rail, rect(CONTENT_X, y + 30.0, 800.0, 70.0)),
    );
    let items = item_xs
        .iter()
        .map(|x| {
            tree.insert(
                rail,
                NodeSpec::element(ElementKind::Card, rect(*x, y + 30.0, 100.0, 70.0)),
            )
        })
        .collect();
    RowFixture {
        row,
        header,
        rail,
        items,
    }
}

pub fn home_rows(tree: &mut ViewTree, parent: NodeId, rows: usize, per_row: usize) -> Vec<RowFixture> {
    (0..rows)
        .map(|r| {
            let xs: Vec<f64> = (0..per_row).map(|i| CONTENT_X + 110.0 * i as f64).collect();
            home_row(tree, parent, 40.0 + 120.0 * r as f64, &xs)
        })
        .collect()
}

pub struct SectionFixture {
    pub section: NodeId,
    pub action: NodeId,
    pub grid: NodeId,
    /// Cards by grid row
    pub cards: Vec<Vec<NodeId>>,
}

/// Titled section at `y` with a header action and a `rows` x `cols` grid
pub fn grid_section(
    tree: &mut ViewTree,
    parent: NodeId,
    y: f64,
    rows: usize,
    cols: usize,
) -> SectionFixture {
    let height = 30.0 + 60.0 * rows as f64;
    let section = tree.insert(
        parent,
        NodeSpec::container(ContainerKind::Section, rect(CONTENT_X, y, 800.0, height)),
    );
    let action = tree.insert(
        section,
        NodeSpec::element(ElementKind::SectionAction, rect(CONTENT_X + 600.0, y, 100.0, 20.0)),
    );
    let grid = tree.insert(
        section,
        NodeSpec::container(ContainerKind::Grid, rect(CONTENT_X, y + 30.0, 800.0, height - 30.0)),
    );
    let cards = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    tree.insert(
                        grid,
                        NodeSpec::element(
                            ElementKind::Card,
                            rect(CONTENT_X + 110.0 * c as f64, y + 30.0 + 60.0 * r as f64, 100.0, 50.0),
                        ),
                    )
                })
                .collect()
        })
        .collect();
    SectionFixture {
        section,
        action,
        grid,
        cards,
    }
}
