use std::collections::VecDeque;

use crate::{Coords, GridInt};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// One step in this direction on a grid of `step`-sized cells.
    pub fn delta(self, step: GridInt) -> (GridInt, GridInt) {
        match self {
            Up => (0, -step),
            Down => (0, step),
            Left => (-step, 0),
            Right => (step, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// The direction to travel after `requested` is asked for while moving
    /// in `self`. Reversing straight into the neck is ignored.
    pub fn steer(self, requested: Direction) -> Direction {
        match (requested, self) {
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => self,
            _ => requested,
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Result of moving a snake one step: the candidate body and whether the
/// head landed on the food.
#[derive(Clone, Debug)]
pub struct Advance {
    pub snake: Snake,
    pub fed: bool,
}

/// Ordered, never-empty body with the head at the front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    /// Straight snake of `size` segments whose head is at `head`, laid out
    /// behind it so that it is already travelling in `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction, step: GridInt) -> Self {
        let diff = direction.delta(step);

        let body = (0..size.max(1) as GridInt)
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body }
    }

    /// Builds a snake from cells listed head first. Empty input has no snake.
    pub fn from_cells<I: IntoIterator<Item = Coords>>(cells: I) -> Option<Self> {
        let body: VecDeque<Coords> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Snake { body })
        }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true: a snake always has a head.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Coords) -> bool {
        self.body.contains(&cell)
    }

    /// Moves the head one step in `direction`. The tail follows unless the
    /// new head lands on `food`, in which case the snake grows by one.
    pub fn advance(&self, direction: Direction, step: GridInt, food: Option<Coords>) -> Advance {
        let old_head = self.head();
        let diff = direction.delta(step);
        let new_head = (old_head.0 + diff.0, old_head.1 + diff.1);

        let mut body = self.body.clone();
        body.push_front(new_head);

        let fed = food == Some(new_head);
        if !fed {
            body.pop_back();
        }

        Advance { snake: Snake { body }, fed }
    }
}
