use rand::seq::IteratorRandom;
use rand::Rng;

use crate::snake::Snake;
use crate::stage::Bounds;
use crate::Coords;

/// What the snake's head would run into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Free,
    Wall,
    Body,
    Apple,
}

/// Wall beats body, body beats apple. The tail is left out of the body check
/// because it moves out of the way on the same step.
pub fn classify(candidate: Coords, snake: &Snake, apples: &[Coords], bounds: &Bounds) -> Collision {
    if !bounds.contains(candidate) {
        return Collision::Wall;
    }

    let body_len = snake.len().saturating_sub(1);
    if snake.body().take(body_len).any(|pos| *pos == candidate) {
        return Collision::Body;
    }

    if apples.contains(&candidate) {
        return Collision::Apple;
    }

    Collision::Free
}

/// Picks a uniformly random cell inside `bounds` that `is_taken` rejects.
/// `None` means the board is full.
pub fn spawn_apple<R, F>(rng: &mut R, bounds: &Bounds, is_taken: F) -> Option<Coords>
where
    R: Rng + ?Sized,
    F: Fn(&Coords) -> bool,
{
    bounds.cells().filter(|pos| !is_taken(pos)).choose(rng)
}
