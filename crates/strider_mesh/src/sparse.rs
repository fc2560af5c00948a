//! Sparse 2D grid keyed by discretized world coordinates

use std::collections::HashMap;

use strider_math::Rect2;

/// Integer cell coordinate
pub type Cell = (i32, i32);

/// Hash-backed 2D grid over world x/y.
///
/// Cell `(gx, gy)` covers `[gx * resolution, (gx + 1) * resolution)` on each
/// axis. Only populated cells take memory.
#[derive(Debug, Clone)]
pub struct SparseGrid2D<T> {
    resolution: f32,
    cells: HashMap<Cell, T>,
}

impl<T> SparseGrid2D<T> {
    /// `resolution` must be positive and finite; callers validate it
    pub fn new(resolution: f32) -> Self {
        Self {
            resolution,
            cells: HashMap::new(),
        }
    }

    pub fn with_capacity(resolution: f32, capacity: usize) -> Self {
        Self {
            resolution,
            cells: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World coordinate to grid coordinate (floor division)
    #[inline]
    pub fn local_to_grid(&self, f: f32) -> i32 {
        (f / self.resolution).floor() as i32
    }

    /// Grid coordinate to the world coordinate of the cell's lower edge
    #[inline]
    pub fn grid_to_local(&self, g: i32) -> f32 {
        g as f32 * self.resolution
    }

    #[inline]
    pub fn cell_at(&self, x: f32, y: f32) -> Cell {
        (self.local_to_grid(x), self.local_to_grid(y))
    }

    /// World rectangle covered by a cell
    pub fn cell_rect(&self, cell: Cell) -> Rect2 {
        let x0 = self.grid_to_local(cell.0);
        let y0 = self.grid_to_local(cell.1);
        Rect2::new(x0, y0, x0 + self.resolution, y0 + self.resolution)
    }

    /// Inclusive range of cells touched by a world rectangle
    pub fn cell_span(&self, rect: &Rect2) -> (Cell, Cell) {
        (
            self.cell_at(rect.min_x, rect.min_y),
            self.cell_at(rect.max_x, rect.max_y),
        )
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.cells.get(&cell)
    }

    pub fn get_or_insert_with(&mut self, cell: Cell, f: impl FnOnce() -> T) -> &mut T {
        self.cells.entry(cell).or_insert_with(f)
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.values()
    }

    /// All populated cells whose coordinates fall inside the rectangle's span
    pub fn values_in(&self, rect: &Rect2) -> Vec<&T> {
        if rect.is_empty() || self.cells.is_empty() {
            return Vec::new();
        }

        let ((x0, y0), (x1, y1)) = self.cell_span(rect);
        let span = (x1 as i64 - x0 as i64 + 1) * (y1 as i64 - y0 as i64 + 1);

        // Huge query boxes scan the populated cells instead of the span
        if span > self.cells.len() as i64 {
            return self
                .cells
                .iter()
                .filter(|((x, y), _)| (x0..=x1).contains(x) && (y0..=y1).contains(y))
                .map(|(_, v)| v)
                .collect();
        }

        let mut out = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(v) = self.cells.get(&(x, y)) {
                    out.push(v);
                }
            }
        }
        out
    }
}
