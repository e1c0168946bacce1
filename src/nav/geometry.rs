//! Geometry primitives for spatial navigation
//!
//! Rectangles are expressed in floating point so that both terminal cells and
//! pixel layouts can feed the same resolver.

/// Direction of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// True for Up/Down
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True for Left/Right
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Shift the rectangle by the given offsets
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check if `to` lies strictly in the half-plane of `direction`, comparing centers
    pub fn is_in_direction(&self, to: &Rect, direction: Direction) -> bool {
        match direction {
            Direction::Down => to.center_y() > self.center_y(),
            Direction::Up => to.center_y() < self.center_y(),
            Direction::Right => to.center_x() > self.center_x(),
            Direction::Left => to.center_x() < self.center_x(),
        }
    }

    /// Edge-to-edge gap from `self` to `to` along the movement axis
    pub fn edge_gap(&self, to: &Rect, direction: Direction) -> f64 {
        match direction {
            Direction::Down => (to.top() - self.bottom()).abs(),
            Direction::Up => (to.bottom() - self.top()).abs(),
            Direction::Right => (to.left() - self.right()).abs(),
            Direction::Left => (to.right() - self.left()).abs(),
        }
    }

    /// Center-to-center distance on the axis perpendicular to `direction`
    pub fn perpendicular_offset(&self, to: &Rect, direction: Direction) -> f64 {
        if direction.is_vertical() {
            (to.center_x() - self.center_x()).abs()
        } else {
            (to.center_y() - self.center_y()).abs()
        }
    }
}
