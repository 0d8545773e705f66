//! The game state engine.
//!
//! [`GameState`] is the single owner and mutator of everything that changes
//! during play. The renderer and the collision helpers only ever see it by
//! shared reference.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::{classify, spawn_apple, Collision};
use crate::snake::{Direction, Snake};
use crate::stage::Bounds;
use crate::Coords;

const START_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub start_length: usize,
    pub lives: u32,
    pub apples: usize,
    pub score_per_apple: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules { start_length: 3, lives: 3, apples: 1, score_per_apple: 1 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Running,
    GameOver,
}

/// What a single [`GameState::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is over; nothing moved.
    Frozen,
    Moved { vacated: Coords },
    Ate { at: Coords },
    LifeLost,
    GameOver,
    /// The snake ate an apple and no free cell is left for a new one.
    BoardFull,
}

pub struct GameState {
    rules: Rules,
    bounds: Bounds,
    rng: StdRng,
    snake: Snake,
    apples: Vec<Coords>,
    score: u32,
    lives: u32,
    mode: Mode,
    won: bool,
    last_vacated: Option<Coords>,
    generation: u64,
}

impl GameState {
    pub fn new(rules: Rules, bounds: Bounds, seed: u64) -> Self {
        let mut state = GameState {
            rules,
            bounds,
            rng: StdRng::seed_from_u64(seed),
            snake: Snake::new((0, 0), 1, START_DIRECTION),
            apples: Vec::with_capacity(rules.apples),
            score: 0,
            lives: rules.lives,
            mode: Mode::Running,
            won: false,
            last_vacated: None,
            generation: 0,
        };
        state.reset();
        state
    }

    /// Back to a fresh game: score, lives and board all start over.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.rules.lives;
        self.mode = Mode::Running;
        self.won = false;
        self.respawn();
    }

    /// Only honored once the game is over.
    pub fn restart(&mut self) -> bool {
        if self.mode != Mode::GameOver {
            return false;
        }

        info!("Restarting after game over with score {}", self.score);
        self.reset();
        true
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.mode != Mode::Running {
            return false;
        }

        let taken = self.snake.set_direction(direction);
        if !taken {
            debug!("Ignoring reversal to {:?}", direction);
        }
        taken
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.last_vacated = None;

        if self.mode == Mode::GameOver {
            return TickOutcome::Frozen;
        }

        let new_head = self.snake.next_head();

        match classify(new_head, &self.snake, &self.apples, &self.bounds) {
            Collision::Wall | Collision::Body => self.lose_life(new_head),
            Collision::Apple => self.eat(new_head),
            Collision::Free => {
                let vacated = self.snake.advance(new_head, false).unwrap_or(new_head);
                self.last_vacated = Some(vacated);
                TickOutcome::Moved { vacated }
            }
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apples(&self) -> &[Coords] {
        &self.apples
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the game ended because the snake filled the board.
    pub fn won(&self) -> bool {
        self.won
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    /// The cell the tail left on the latest tick, if it moved.
    pub fn last_vacated(&self) -> Option<Coords> {
        self.last_vacated
    }

    /// Bumped whenever the board is rebuilt from scratch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[cfg(test)]
    pub(crate) fn set_apples(&mut self, apples: Vec<Coords>) {
        self.apples = apples;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn lose_life(&mut self, at: Coords) -> TickOutcome {
        self.lives = self.lives.saturating_sub(1);
        debug!("Crashed at {:?}, {} lives left", at, self.lives);

        if self.lives == 0 {
            info!("Game over with score {}", self.score);
            self.mode = Mode::GameOver;
            return TickOutcome::GameOver;
        }

        self.respawn();
        TickOutcome::LifeLost
    }

    fn eat(&mut self, at: Coords) -> TickOutcome {
        self.snake.advance(at, true);
        self.score += self.rules.score_per_apple;
        self.apples.retain(|apple| *apple != at);
        debug!("Ate apple at {:?}, score {}", at, self.score);

        match self.spawn_apple() {
            Some(apple) => {
                self.apples.push(apple);
                TickOutcome::Ate { at }
            }
            None => {
                info!("Board full with score {}", self.score);
                self.won = true;
                self.mode = Mode::GameOver;
                TickOutcome::BoardFull
            }
        }
    }

    /// Start position for snake and apples; score and lives untouched.
    fn respawn(&mut self) {
        let b = self.bounds;
        // The head sits at the origin when it fits; the tail is clipped to the arena.
        let head = (0i16.clamp(b.left, b.right - 1), 0i16.clamp(b.top, b.bottom - 1));
        let room = (head.0 - b.left + 1) as usize;

        self.snake = Snake::new(head, self.rules.start_length.min(room), START_DIRECTION);
        self.last_vacated = None;
        self.generation += 1;

        self.apples.clear();
        for _ in 0..self.rules.apples {
            match self.spawn_apple() {
                Some(apple) => self.apples.push(apple),
                None => {
                    warn!("Only room for {} of {} apples", self.apples.len(), self.rules.apples);
                    break;
                }
            }
        }
    }

    fn spawn_apple(&mut self) -> Option<Coords> {
        let (snake, apples) = (&self.snake, &self.apples);
        spawn_apple(&mut self.rng, &self.bounds, |pos| snake.contains(pos) || apples.contains(pos))
    }
}
