use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` unit step for this direction. `y` grows downwards.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Parses a raw input token.
    ///
    /// Accepts direction names, browser-style arrow key names and WASD, all
    /// case-insensitive. Anything else is not a direction.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Some(Self::Up),
            "down" | "arrowdown" | "s" => Some(Self::Down),
            "left" | "arrowleft" | "a" => Some(Self::Left),
            "right" | "arrowright" | "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Resolves a requested heading against the current one.
///
/// Direct reversals are rejected and leave the heading unchanged.
#[must_use]
pub fn resolve(current: Direction, requested: Direction) -> Direction {
    if direction_change_is_valid(current, requested) {
        requested
    } else {
        current
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// FIFO of raw direction requests waiting for the next tick.
///
/// Unbounded by default. A bounded buffer drops requests that arrive while it
/// is full, so what was accepted keeps its arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    queue: VecDeque<Direction>,
    capacity: Option<usize>,
}

impl InputBuffer {
    /// Creates an unbounded buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer that holds at most `capacity` pending requests.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    /// Appends `direction`. Returns `false` when a bounded buffer is full and
    /// the request was dropped.
    pub fn enqueue(&mut self, direction: Direction) -> bool {
        if self.capacity.is_some_and(|capacity| self.queue.len() >= capacity) {
            return false;
        }

        self.queue.push_back(direction);
        true
    }

    /// Removes and returns the oldest pending request.
    pub fn dequeue(&mut self) -> Option<Direction> {
        self.queue.pop_front()
    }

    /// Returns true when no request is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the configured bound, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Drops every pending request.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
