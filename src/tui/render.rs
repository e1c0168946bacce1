//! Draw the view tree with ratatui
//!
//! Nodes are painted in document order with their viewport rectangles. A node
//! is only drawn when it fits entirely inside every scrolling ancestor, so
//! partially scrolled-out cards simply disappear.

use ratatui::{
    buffer::Buffer,
    layout::Rect as CellRect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::app::App;
use super::layout::{BODY_SLOT, DESCRIPTION_SLOT};
use crate::config::ThemeConfig;
use crate::live::reconciler::slots;
use crate::nav::tree::{Node, Overflow};
use crate::nav::{ContainerKind, ElementKind, NodeId, NodeKind, Rect, ViewTree};

/// Truncate `text` to `width` terminal cells
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Visible part of `id`: its viewport rect clipped by scrolling ancestors
fn visible_rect(tree: &ViewTree, id: NodeId) -> Option<Rect> {
    let node = tree.get(id)?;
    let rect = tree.viewport_rect(id)?;
    for ancestor in &node.membership.ancestors {
        let Some(a) = tree.get(*ancestor) else { continue };
        if a.overflow == Overflow::None {
            continue;
        }
        let clip = tree.viewport_rect(*ancestor)?;
        let inside = rect.left() >= clip.left()
            && rect.right() <= clip.right()
            && rect.top() >= clip.top()
            && rect.bottom() <= clip.bottom();
        if !inside {
            return None;
        }
    }
    Some(rect)
}

/// Convert to a cell rectangle inside `bounds`
fn to_cells(rect: Rect, bounds: CellRect) -> Option<CellRect> {
    if rect.x < 0.0 || rect.y < 0.0 {
        return None;
    }
    let cell = CellRect::new(rect.x as u16, rect.y as u16, rect.width as u16, rect.height as u16);
    let clipped = cell.intersection(bounds);
    (clipped.width > 0 && clipped.height > 0).then_some(clipped)
}

struct Painter<'a> {
    tree: &'a ViewTree,
    theme: &'a ThemeConfig,
    bounds: CellRect,
}

impl Painter<'_> {
    fn label_style(&self, node: &Node) -> Style {
        let mut style = Style::default();
        if node.active {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if node.focused {
            style = style.fg(self.theme.focus_fg).add_modifier(Modifier::REVERSED);
        }
        style
    }

    fn border_style(&self, node: &Node) -> Style {
        if node.focused {
            Style::default().fg(self.theme.focus_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn paint(&self, id: NodeId, buf: &mut Buffer) {
        let Some(node) = self.tree.get(id) else { return };
        if !self.tree.is_visible(id) {
            return;
        }
        let Some(area) = visible_rect(self.tree, id).and_then(|r| to_cells(r, self.bounds)) else {
            return;
        };
        match node.kind {
            NodeKind::Root => {}
            NodeKind::Container(kind) => self.paint_container(kind, node, area, buf),
            NodeKind::Element(kind) => self.paint_element(kind, node, area, buf),
        }
    }

    fn paint_container(&self, kind: ContainerKind, node: &Node, area: CellRect, buf: &mut Buffer) {
        match kind {
            ContainerKind::Sidebar => {
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .render(area, buf);
                let title = CellRect::new(area.x + 1, area.y, area.width.saturating_sub(2), 1);
                Paragraph::new(Span::styled(
                    fit(&node.label, title.width as usize),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .render(title, buf);
            }
            ContainerKind::DateHeader => {
                let width = node.label.width() as u16;
                let x = (area.x + area.width).saturating_sub(width + 1).max(area.x);
                Paragraph::new(node.label.as_str()).render(CellRect::new(x, area.y, width.min(area.width), 1), buf);
            }
            ContainerKind::Section => {
                Paragraph::new(Span::styled(
                    fit(&node.label, area.width as usize / 2),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .render(CellRect::new(area.x + 2, area.y, area.width.saturating_sub(2), 1), buf);
            }
            ContainerKind::Modal | ContainerKind::Alert => {
                Clear.render(area, buf);
                let color = if kind == ContainerKind::Alert {
                    self.theme.live_fg
                } else {
                    self.theme.focus_fg
                };
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(Span::styled(
                        format!(" {} ", node.label),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                    .render(area, buf);
            }
            ContainerKind::Panel => self.paint_panel(node, area, buf),
            ContainerKind::Grid if node.children.is_empty() && !node.label.is_empty() => {
                Paragraph::new(Span::styled(node.label.as_str(), Style::default().fg(Color::DarkGray)))
                    .render(CellRect::new(area.x + 2, area.y, area.width.saturating_sub(2), 1), buf);
            }
            _ => {}
        }
    }

    /// Plain text panel, or the detail score box when it carries a score
    fn paint_panel(&self, node: &Node, area: CellRect, buf: &mut Buffer) {
        let Some(score) = node.slot(slots::SCORE) else {
            Paragraph::new(Span::styled(node.label.as_str(), Style::default().fg(Color::DarkGray))).render(area, buf);
            return;
        };
        let status = node.slot(slots::STATUS).unwrap_or_default();
        let lines = vec![
            Line::from(node.label.as_str()).centered(),
            Line::from(Span::styled(score, Style::default().add_modifier(Modifier::BOLD))).centered(),
            Line::from(Span::styled(status, Style::default().fg(self.theme.live_fg))).centered(),
        ];
        Paragraph::new(lines).render(area, buf);
    }

    fn paint_element(&self, kind: ElementKind, node: &Node, area: CellRect, buf: &mut Buffer) {
        match kind {
            ElementKind::Card => self.paint_card(node, area, buf),
            ElementKind::ScrollPanel => self.paint_scroll_panel(node, area, buf),
            ElementKind::AlertBody => {
                let description = node.slot(DESCRIPTION_SLOT).unwrap_or_default();
                let lines = vec![
                    Line::from(Span::styled(
                        fit(&node.label, area.width as usize),
                        self.label_style(node).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(fit(description, area.width as usize)),
                ];
                Paragraph::new(lines).render(area, buf);
            }
            _ => {
                let text = fit(&node.label, area.width as usize);
                Paragraph::new(Span::styled(text, self.label_style(node))).render(area, buf);
            }
        }
    }

    fn paint_card(&self, node: &Node, area: CellRect, buf: &mut Buffer) {
        let mut block = Block::default().borders(Borders::ALL).border_style(self.border_style(node));
        if let Some(marker) = node.slot(slots::TRACKED) {
            block = block.title(Span::styled(marker.to_string(), Style::default().fg(self.theme.focus_fg)));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let team_line = |name: &str, score: &str| {
            let score_width = score.width();
            let name = fit(name, width.saturating_sub(score_width + 1));
            let pad = width.saturating_sub(name.width() + score_width);
            Line::from(format!("{}{}{}", name, " ".repeat(pad), score))
        };
        let live = node.slot(slots::LIVE) == Some("1");
        let status_style = if live {
            Style::default().fg(self.theme.live_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let lines = vec![
            team_line(
                node.slot("home").unwrap_or_default(),
                node.slot(slots::HOME_SCORE).unwrap_or_default(),
            ),
            team_line(
                node.slot("away").unwrap_or_default(),
                node.slot(slots::AWAY_SCORE).unwrap_or_default(),
            ),
            Line::from(Span::styled(
                fit(node.slot(slots::STATUS).unwrap_or_default(), width),
                status_style,
            )),
        ];
        Paragraph::new(lines).render(inner, buf);
    }

    fn paint_scroll_panel(&self, node: &Node, area: CellRect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).border_style(self.border_style(node));
        let inner = block.inner(area);
        block.render(area, buf);
        let offset = node.scroll.map(|s| s.offset.round() as usize).unwrap_or(0);
        let lines: Vec<Line> = node
            .slot(BODY_SLOT)
            .unwrap_or_default()
            .lines()
            .skip(offset)
            .take(inner.height as usize)
            .map(|l| Line::from(fit(l, inner.width as usize)))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Paint every attached node of the tree inside `bounds`
pub fn draw_tree(tree: &ViewTree, theme: &ThemeConfig, bounds: CellRect, buf: &mut Buffer) {
    let painter = Painter { tree, theme, bounds };
    for id in tree.descendants(tree.root()) {
        painter.paint(id, buf);
    }
}

/// Status line: last message on the left, refresh countdown on the right
pub fn draw_status_bar(app: &App, now_ms: u64, area: CellRect, buf: &mut Buffer) {
    let gauge_width = 24.min(area.width / 2);
    let text_area = CellRect::new(area.x, area.y, area.width.saturating_sub(gauge_width + 1), 1);
    let gauge_area = CellRect::new(area.x + area.width - gauge_width, area.y, gauge_width, 1);

    if let Some(status) = &app.status {
        let (text, style) = if status.is_error {
            (format!(" ERROR: {}", status.text), Style::default().fg(app.config.theme.live_fg))
        } else {
            (format!(" {}", status.text), Style::default())
        };
        Paragraph::new(Span::styled(fit(&text, text_area.width as usize), style)).render(text_area, buf);
    }

    let percent = app.countdown.percent_remaining(now_ms);
    Gauge::default()
        .gauge_style(Style::default().fg(Color::DarkGray))
        .percent(percent)
        .label(format!("next update {}s", app.countdown.remaining_secs(now_ms)))
        .render(gauge_area, buf);
}
