use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step towards `direction`.
    ///
    /// The result may lie outside the grid; bounds are checked by the caller.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body, head first and tail last.
///
/// Never empty: constructors refuse empty input and [`Body::drop_tail`]
/// keeps the last remaining cell.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Body {
    cells: VecDeque<Cell>,
}

impl Body {
    /// Creates a one-cell body at `origin`.
    #[must_use]
    pub fn new(origin: Cell) -> Self {
        let mut cells = VecDeque::new();
        cells.push_front(origin);
        Self { cells }
    }

    /// Creates a body from explicit cells (front is head). Returns `None` for
    /// an empty list.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self {
            cells: VecDeque::from(cells),
        })
    }

    /// Prepends `cell` as the new head.
    pub fn grow_head(&mut self, cell: Cell) {
        self.cells.push_front(cell);
    }

    /// Removes the tail cell. A single-cell body is left untouched.
    pub fn drop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }

    /// Advances one step into `cell` without growing.
    pub fn move_to(&mut self, cell: Cell) {
        self.grow_head(cell);
        self.drop_tail();
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .cells
            .front()
            .expect("snake body must always contain at least one cell")
    }

    /// Returns the current tail cell.
    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .cells
            .back()
            .expect("snake body must always contain at least one cell")
    }

    /// Returns true if any cell equals `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns true if the head overlaps any non-head cell.
    #[must_use]
    pub fn head_collides_with_body(&self) -> bool {
        let head = self.head();
        self.cells.iter().skip(1).any(|cell| *cell == head)
    }

    /// Returns true if moving the head into `candidate` would hit the body.
    ///
    /// Checked against the body before the move. Unless `keeps_tail` is set,
    /// the tail cell is about to be vacated and is not an obstacle.
    #[must_use]
    pub fn would_collide(&self, candidate: Cell, keeps_tail: bool) -> bool {
        let considered = if keeps_tail {
            self.cells.len()
        } else {
            self.cells.len() - 1
        };
        self.cells.iter().take(considered).any(|cell| *cell == candidate)
    }

    /// Returns current cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when there are no cells. Never the case for a live body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over cells from head to tail.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Copies the cells into a head-to-tail vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }
}
