//! Hold-to-scroll controller for focused scroll panels
//!
//! Vertical keys on a focused scroll panel scroll it at a constant rate
//! instead of moving focus. The controller is an explicit state machine
//! advanced by [`ScrollController::tick`]; whoever owns the event loop decides
//! how often to call it.

use tracing::debug;

use super::geometry::Direction;
use super::tree::{NodeId, ViewTree};

/// Length of the frame applied immediately when a hold starts
const KICK_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettings {
    /// Scroll speed in tree units per second
    pub rate_per_sec: f64,
    /// Repeats arriving closer than this are absorbed
    pub debounce_ms: u64,
    /// A hold without key-down repeats for this long counts as released
    pub release_timeout_ms: u64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            rate_per_sec: 650.0,
            debounce_ms: 25,
            release_timeout_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldState {
    Idle,
    Holding {
        panel: NodeId,
        direction: Direction,
        last_input_ms: u64,
    },
}

#[derive(Debug)]
pub struct ScrollController {
    settings: ScrollSettings,
    state: HoldState,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(ScrollSettings::default())
    }
}

impl ScrollController {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            state: HoldState::Idle,
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, HoldState::Holding { .. })
    }

    /// Handle a vertical key on a focused scroll panel
    ///
    /// Returns true when the key was consumed. A panel already at the
    /// boundary in `direction` does not consume it, so focus can escape.
    pub fn key_down(&mut self, tree: &mut ViewTree, panel: NodeId, direction: Direction, now_ms: u64) -> bool {
        if !direction.is_vertical() {
            return false;
        }
        let Some(state) = tree.scroll_state(panel) else {
            return false;
        };
        let at_boundary = match direction {
            Direction::Up => state.is_at_top(),
            _ => state.is_at_bottom(),
        };
        if at_boundary {
            debug!("SCROLL: {:?} at boundary, releasing key", direction);
            self.stop();
            return false;
        }

        if let HoldState::Holding {
            panel: held,
            direction: held_direction,
            last_input_ms,
        } = &mut self.state
        {
            if *held == panel && *held_direction == direction {
                if now_ms.saturating_sub(*last_input_ms) >= self.settings.debounce_ms {
                    *last_input_ms = now_ms;
                }
                return true;
            }
        }

        debug!("SCROLL: hold {:?} on {:?}", direction, panel);
        self.state = HoldState::Holding {
            panel,
            direction,
            last_input_ms: now_ms,
        };
        self.advance(tree, KICK_FRAME_MS);
        true
    }

    /// Stop the hold animation (key release)
    pub fn key_up(&mut self) {
        if self.is_holding() {
            debug!("SCROLL: released");
        }
        self.stop();
    }

    pub fn stop(&mut self) {
        self.state = HoldState::Idle;
    }

    /// Advance one frame. Returns true if an offset changed.
    pub fn tick(&mut self, tree: &mut ViewTree, delta_ms: u64, now_ms: u64) -> bool {
        let HoldState::Holding { last_input_ms, .. } = self.state else {
            return false;
        };
        if now_ms.saturating_sub(last_input_ms) > self.settings.release_timeout_ms {
            debug!("SCROLL: no repeat within release timeout");
            self.stop();
            return false;
        }
        self.advance(tree, delta_ms)
    }

    fn advance(&mut self, tree: &mut ViewTree, delta_ms: u64) -> bool {
        let HoldState::Holding { panel, direction, .. } = self.state else {
            return false;
        };
        if !tree.is_eligible(panel) {
            self.stop();
            return false;
        }
        let Some(state) = tree.scroll_state_mut(panel) else {
            self.stop();
            return false;
        };

        let sign = if direction == Direction::Up { -1.0 } else { 1.0 };
        let applied = state.scroll_by(sign * self.settings.rate_per_sec * delta_ms as f64 / 1000.0);
        let at_boundary = match direction {
            Direction::Up => state.is_at_top(),
            _ => state.is_at_bottom(),
        };
        if at_boundary {
            debug!("SCROLL: reached boundary");
            self.stop();
        }
        applied != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::testing::*;

    fn setup(content_height: f64) -> (ViewTree, NodeId) {
        let mut tree = ViewTree::new();
        let content = content(&mut tree);
        let panel = scroll_panel(&mut tree, content, 100.0, content_height);
        (tree, panel)
    }

    fn offset(tree: &ViewTree, panel: NodeId) -> f64 {
        tree.scroll_state(panel).unwrap().offset
    }

    // === boundaries ===

    #[test]
    fn test_up_at_top_is_not_consumed() {
        let (mut tree, panel) = setup(1000.0);
        let mut scroll = ScrollController::default();
        assert!(!scroll.key_down(&mut tree, panel, Direction::Up, 0));
        assert_eq!(offset(&tree, panel), 0.0);
        assert!(!scroll.is_holding());
    }

    #[test]
    fn test_down_at_bottom_is_not_consumed() {
        let (mut tree, panel) = setup(150.0);
        let mut scroll = ScrollController::default();
        // Content shorter than the panel: already at the bottom
        assert!(!scroll.key_down(&mut tree, panel, Direction::Down, 0));
    }

    #[test]
    fn test_up_away_from_top_decreases_offset() {
        let (mut tree, panel) = setup(1000.0);
        tree.scroll_state_mut(panel).unwrap().offset = 300.0;
        let mut scroll = ScrollController::default();

        assert!(scroll.key_down(&mut tree, panel, Direction::Up, 0));
        assert!(offset(&tree, panel) < 300.0);
    }

    #[test]
    fn test_hold_stops_at_boundary() {
        let (mut tree, panel) = setup(300.0);
        let mut scroll = ScrollController::default();
        assert!(scroll.key_down(&mut tree, panel, Direction::Down, 0));
        for frame in 1..100 {
            scroll.tick(&mut tree, 16, frame * 16);
        }
        assert_eq!(offset(&tree, panel), 100.0);
        assert!(!scroll.is_holding());
    }

    // === rate ===

    #[test]
    fn test_tick_is_rate_based() {
        let (mut tree, panel) = setup(5000.0);
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        let after_kick = offset(&tree, panel);

        assert!(scroll.tick(&mut tree, 100, 100));
        assert!((offset(&tree, panel) - after_kick - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_does_not_restart_hold() {
        let (mut tree, panel) = setup(5000.0);
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        let after_kick = offset(&tree, panel);
        // Within the debounce window: absorbed
        assert!(scroll.key_down(&mut tree, panel, Direction::Down, 10));
        assert_eq!(offset(&tree, panel), after_kick);
        assert!(matches!(scroll.state(), HoldState::Holding { last_input_ms: 0, .. }));

        assert!(scroll.key_down(&mut tree, panel, Direction::Down, 40));
        assert_eq!(offset(&tree, panel), after_kick);
        assert_eq!(
            scroll.state(),
            HoldState::Holding {
                panel,
                direction: Direction::Down,
                last_input_ms: 40
            }
        );
    }

    // === release ===

    #[test]
    fn test_key_up_stops_immediately() {
        let (mut tree, panel) = setup(5000.0);
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        scroll.key_up();
        let before = offset(&tree, panel);
        assert!(!scroll.tick(&mut tree, 16, 16));
        assert_eq!(offset(&tree, panel), before);
    }

    #[test]
    fn test_release_timeout_stops_hold() {
        let (mut tree, panel) = setup(5000.0);
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        assert!(!scroll.tick(&mut tree, 16, 601));
        assert!(!scroll.is_holding());
    }

    #[test]
    fn test_direction_change_restarts_hold() {
        let (mut tree, panel) = setup(5000.0);
        tree.scroll_state_mut(panel).unwrap().offset = 500.0;
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        scroll.key_down(&mut tree, panel, Direction::Up, 50);
        assert!(matches!(
            scroll.state(),
            HoldState::Holding { direction: Direction::Up, .. }
        ));
    }

    #[test]
    fn test_detached_panel_stops_hold() {
        let (mut tree, panel) = setup(5000.0);
        let mut scroll = ScrollController::default();
        scroll.key_down(&mut tree, panel, Direction::Down, 0);
        tree.remove(panel);
        assert!(!scroll.tick(&mut tree, 16, 16));
        assert!(!scroll.is_holding());
    }
}
