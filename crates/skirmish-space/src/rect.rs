//! Rectangles in cell coordinates.

use std::fmt;

/// A rectangle of cells that may extend past a grid's edges.
///
/// `(x, y)` is the top-left cell; `width` and `height` count cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiscreteRect {
    /// Leftmost column.
    pub x: i32,
    /// Topmost row.
    pub y: i32,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl DiscreteRect {
    /// Construct a rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle covers no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True if the cell lies inside the rectangle.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    /// True if the two rectangles share at least one cell.
    pub fn intersects(&self, other: &DiscreteRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }
}

impl fmt::Display for DiscreteRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}; {}x{}]", self.x, self.y, self.width, self.height)
    }
}

/// A rectangle validated to lie inside a particular grid.
///
/// Only constructed by [`Grid`](crate::Grid) methods; may be empty when
/// produced by clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridRegion {
    /// Leftmost column.
    pub x: u32,
    /// Topmost row.
    pub y: u32,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridRegion {
    /// An empty region at the origin.
    pub const EMPTY: GridRegion = GridRegion {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// True if the region covers no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let region = *self;
        (region.y..region.y + region.height)
            .flat_map(move |y| (region.x..region.x + region.width).map(move |x| (x, y)))
    }
}

impl From<GridRegion> for DiscreteRect {
    fn from(r: GridRegion) -> Self {
        DiscreteRect::new(r.x as i32, r.y as i32, r.width, r.height)
    }
}
