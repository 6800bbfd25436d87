//! Dense 2D grid container.

use crate::error::SpaceError;
use crate::rect::{DiscreteRect, GridRegion};

/// A dense, row-major 2D grid of cells.
///
/// Grids always hold at least one cell. Region-based operations take a
/// [`GridRegion`] produced by this grid, so they never go out of bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a `width` × `height` grid with every cell set to `fill`.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is zero.
    pub fn new(width: u32, height: u32, fill: T) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        Ok(Self {
            width,
            height,
            cells: vec![fill; width as usize * height as usize],
        })
    }

    /// Set every cell in `region` to `value`.
    pub fn fill_region(&mut self, region: GridRegion, value: T) {
        self.for_each_mut(region, |cell| *cell = value.clone());
    }
}

impl<T> Grid<T> {
    /// Create a grid from row-major cell data.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(SpaceError::DimensionMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The region covering the whole grid.
    pub fn full_region(&self) -> GridRegion {
        GridRegion {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn check_bounds(&self, x: i64, y: i64) -> Result<usize, SpaceError> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Err(SpaceError::CellOutOfBounds {
                x,
                y,
                bounds: format!("[0, {}) x [0, {})", self.width, self.height),
            });
        }
        Ok(self.index(x as u32, y as u32))
    }

    /// The cell at `(x, y)`, or `None` if outside the grid.
    pub fn get(&self, x: i64, y: i64) -> Option<&T> {
        self.check_bounds(x, y).ok().map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `(x, y)`.
    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut T> {
        match self.check_bounds(x, y) {
            Ok(i) => Some(&mut self.cells[i]),
            Err(_) => None,
        }
    }

    /// Overwrite the cell at `(x, y)`.
    pub fn set(&mut self, x: i64, y: i64, value: T) -> Result<(), SpaceError> {
        let i = self.check_bounds(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Validate that `rect` lies wholly inside the grid.
    ///
    /// Returns `None` if any part of it falls outside.
    pub fn try_to_region(&self, rect: DiscreteRect) -> Option<GridRegion> {
        if rect.x < 0
            || rect.y < 0
            || rect.right() > self.width as i64
            || rect.bottom() > self.height as i64
        {
            return None;
        }
        Some(GridRegion {
            x: rect.x as u32,
            y: rect.y as u32,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Like [`try_to_region`](Self::try_to_region) but reports the failure.
    pub fn region(&self, rect: DiscreteRect) -> Result<GridRegion, SpaceError> {
        self.try_to_region(rect)
            .ok_or_else(|| SpaceError::RectOutOfBounds {
                rect,
                bounds: format!("[0, {}) x [0, {})", self.width, self.height),
            })
    }

    /// The part of `rect` that lies inside the grid (possibly empty).
    pub fn clip_region(&self, rect: DiscreteRect) -> GridRegion {
        let left = (rect.x as i64).clamp(0, self.width as i64);
        let top = (rect.y as i64).clamp(0, self.height as i64);
        let right = rect.right().clamp(0, self.width as i64);
        let bottom = rect.bottom().clamp(0, self.height as i64);
        if right <= left || bottom <= top {
            return GridRegion::EMPTY;
        }
        GridRegion {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }

    /// Visit every cell in `region`.
    pub fn for_each(&self, region: GridRegion, mut f: impl FnMut(&T)) {
        for (x, y) in region.cells() {
            f(&self.cells[self.index(x, y)]);
        }
    }

    /// Mutate every cell in `region`.
    pub fn for_each_mut(&mut self, region: GridRegion, mut f: impl FnMut(&mut T)) {
        for (x, y) in region.cells() {
            let i = self.index(x, y);
            f(&mut self.cells[i]);
        }
    }

    /// True if `pred` holds for any cell in `region`.
    pub fn any(&self, region: GridRegion, mut pred: impl FnMut(&T) -> bool) -> bool {
        region.cells().any(|(x, y)| pred(&self.cells[self.index(x, y)]))
    }

    /// The part of `other`, placed with its top-left at `(x, y)`, that
    /// overlaps this grid.
    fn overlay_region<U>(&self, x: u32, y: u32, other: &Grid<U>) -> GridRegion {
        self.clip_region(DiscreteRect::new(
            x as i32,
            y as i32,
            other.width,
            other.height,
        ))
    }

    /// True if `pred` holds for any pair of overlapping cells when `other`
    /// is placed with its top-left at `(x, y)`.
    ///
    /// Cells of `other` that fall outside this grid are skipped.
    pub fn any2<U>(
        &self,
        x: u32,
        y: u32,
        other: &Grid<U>,
        mut pred: impl FnMut(&T, &U) -> bool,
    ) -> bool {
        let region = self.overlay_region(x, y, other);
        region.cells().any(|(cx, cy)| {
            let ours = &self.cells[self.index(cx, cy)];
            let theirs = &other.cells[other.index(cx - x, cy - y)];
            pred(ours, theirs)
        })
    }

    /// Mutate each cell overlapped by `other` placed at `(x, y)`, pairing
    /// it with the overlapping cell of `other`.
    pub fn for_each2_mut<U>(
        &mut self,
        x: u32,
        y: u32,
        other: &Grid<U>,
        mut f: impl FnMut(&mut T, &U),
    ) {
        let region = self.overlay_region(x, y, other);
        for (cx, cy) in region.cells() {
            let i = self.index(cx, cy);
            f(&mut self.cells[i], &other.cells[other.index(cx - x, cy - y)]);
        }
    }
}
