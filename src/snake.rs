use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn offset(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// Snake body, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    /// Direction of the last step taken; turns are checked against this.
    moved: Direction,
}

impl Snake {
    /// Lays out `size` cells with the head at `pos` and the tail trailing
    /// behind it, opposite to `direction`.
    pub fn new(pos: Coords, size: usize, direction: Direction) -> Self {
        let diff = direction.offset();

        let body = (0..size.max(1) as i16)
            .map(|i| (pos.0 - diff.0 * i, pos.1 - diff.1 * i))
            .collect();
        Snake { body, direction, moved: direction }
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }

    /// The cell the head would enter on the next step.
    pub fn next_head(&self) -> Coords {
        let (hx, hy) = self.head();
        let (dx, dy) = self.direction.offset();
        (hx + dx, hy + dy)
    }

    /// Pushes `new_head`. Unless growing, drops the tail and returns it.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        self.body.push_front(new_head);
        self.moved = self.direction;

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    /// Returns whether the change was taken. Reversing the last step is
    /// ignored, however many turns were asked for since.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.moved) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}
