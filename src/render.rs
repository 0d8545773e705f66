//! Frame rendering.
//!
//! The renderer remembers a small summary of the last frame it drew and only
//! touches the cells that changed since: the new head, the old head, the cell
//! the tail left, apples that came or went, and the HUD fields whose values
//! moved. Whenever the board was rebuilt (reset, restart, respawn after a lost
//! life) it falls back to a full redraw.

use anyhow::Result;
use crossterm::style::Color;

use crate::game::{GameState, Mode};
use crate::stage::Stage;
use crate::theme::Theme;
use crate::{Coords, TermInt};

/// Where frames end up. Implementations treat out-of-range or failing cell
/// writes as no-ops; only `clear` and `present` may fail.
pub trait Surface {
    fn size(&self) -> (TermInt, TermInt);

    fn draw_cell(&mut self, x: TermInt, y: TermInt, glyph: &str, color: Color);

    fn clear(&mut self) -> Result<()>;

    fn present(&mut self) -> Result<()>;

    /// Re-reads the size after the terminal was resized.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Surface + ?Sized> Surface for &mut T {
    fn size(&self) -> (TermInt, TermInt) {
        (**self).size()
    }

    fn draw_cell(&mut self, x: TermInt, y: TermInt, glyph: &str, color: Color) {
        (**self).draw_cell(x, y, glyph, color)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }

    fn refresh(&mut self) -> Result<()> {
        (**self).refresh()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Frame {
    generation: u64,
    head: Coords,
    apples: Vec<Coords>,
    score: u32,
    lives: u32,
    mode: Mode,
}

impl Frame {
    fn of(state: &GameState) -> Self {
        Frame {
            generation: state.generation(),
            head: state.snake().head(),
            apples: state.apples().to_vec(),
            score: state.score(),
            lives: state.lives(),
            mode: state.mode(),
        }
    }
}

pub struct Renderer {
    stage: Stage,
    theme: Theme,
    prev: Option<Frame>,
}

impl Renderer {
    pub fn new(stage: Stage, theme: Theme) -> Self {
        Renderer { stage, theme, prev: None }
    }

    /// Forces the next frame to be drawn in full.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn draw_frame<S: Surface>(&mut self, state: &GameState, surface: &mut S) -> Result<()> {
        let frame = Frame::of(state);

        match self.prev.take() {
            Some(prev) if prev.generation == frame.generation => {
                self.draw_changes(state, &prev, &frame, surface)
            }
            _ => self.draw_full(state, surface)?,
        }

        self.prev = Some(frame);
        surface.present()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_full<S: Surface>(&self, state: &GameState, surface: &mut S) -> Result<()> {
        surface.clear()?;

        let b = self.stage.boundaries;
        let (bg_tile, bg_color) = (self.theme.get_tile("bg"), self.theme.get_color("bg"));
        for pos in b.cells() {
            self.put(surface, pos, bg_tile, bg_color);
        }

        self.draw_borders(surface);
        self.draw_text(surface);

        for apple in state.apples() {
            self.draw_apple(surface, *apple);
        }
        self.draw_snake(state, surface);
        self.draw_score(state, surface);
        self.draw_lives(state, surface);

        if state.mode() == Mode::GameOver {
            self.draw_game_over(state, surface);
        }

        Ok(())
    }

    fn draw_changes<S: Surface>(&self, state: &GameState, prev: &Frame, frame: &Frame, surface: &mut S) {
        if frame.mode != prev.mode {
            self.draw_snake(state, surface);
            if frame.mode == Mode::GameOver {
                self.draw_game_over(state, surface);
            }
        } else if frame.head != prev.head {
            if state.snake().contains(&prev.head) {
                self.put(surface, prev.head, self.theme.get_tile("snake-body"), self.theme.get_color("snake"));
            }
            if let Some(vacated) = state.last_vacated() {
                self.erase(surface, vacated);
            }
            self.put(surface, frame.head, self.theme.get_tile("snake-head"), self.theme.get_color("snake"));
        }

        for gone in prev.apples.iter().filter(|a| !frame.apples.contains(a)) {
            if !state.snake().contains(gone) {
                self.erase(surface, *gone);
            }
        }
        for new in frame.apples.iter().filter(|a| !prev.apples.contains(a)) {
            self.draw_apple(surface, *new);
        }

        if frame.score != prev.score {
            self.draw_score(state, surface);
        }
        if frame.lives != prev.lives {
            self.draw_lives(state, surface);
        }
    }

    fn draw_snake<S: Surface>(&self, state: &GameState, surface: &mut S) {
        let (head_tile, body_tile, color) = if state.mode() == Mode::GameOver && !state.won() {
            let dead = self.theme.get_tile("snake-dead");
            (dead, dead, self.theme.get_color("snake-dead"))
        } else {
            (self.theme.get_tile("snake-head"), self.theme.get_tile("snake-body"), self.theme.get_color("snake"))
        };

        for (i, pos) in state.snake().body().enumerate() {
            let tile = if i == 0 { head_tile } else { body_tile };
            self.put(surface, *pos, tile, color);
        }
    }

    fn draw_apple<S: Surface>(&self, surface: &mut S, pos: Coords) {
        self.put(surface, pos, self.theme.get_tile("apple"), self.theme.get_color("apple"));
    }

    fn erase<S: Surface>(&self, surface: &mut S, pos: Coords) {
        self.put(surface, pos, self.theme.get_tile("bg"), self.theme.get_color("bg"));
    }

    fn draw_borders<S: Surface>(&self, surface: &mut S) {
        let tile_v = self.theme.get_tile("border-v");
        let tile_h = self.theme.get_tile("border-h");
        let tile_c = self.theme.get_tile("border-c");
        let color = self.theme.get_color("border");
        let b = self.stage.boundaries;

        for y in b.top..b.bottom {
            self.put(surface, (b.left - 1, y), tile_v, color);
            self.put(surface, (b.right, y), tile_v, color);
        }

        for x in b.left..b.right {
            self.put(surface, (x, b.top - 1), tile_h, color);
            self.put(surface, (x, b.bottom), tile_h, color);
        }

        for corner in [(b.left - 1, b.top - 1), (b.left - 1, b.bottom), (b.right, b.top - 1), (b.right, b.bottom)] {
            self.put(surface, corner, tile_c, color);
        }
    }

    fn draw_text<S: Surface>(&self, surface: &mut S) {
        let color = self.theme.get_color("border");
        let b = self.stage.boundaries;
        let half_width = self.stage.width / 2;

        self.put(surface, (half_width - 4, b.top - 1), "score:", color);
        self.put(surface, (b.left, b.top - 1), "lives:", color);
        self.put_centered(surface, b.bottom, " Press Q to quit ", color);
    }

    fn draw_score<S: Surface>(&self, state: &GameState, surface: &mut S) {
        let pos = (self.stage.width / 2 - 1, self.stage.boundaries.top - 1);
        let text = format!("{:02}", state.score());
        self.put(surface, pos, &text, self.theme.get_color("border"));
    }

    /// One slot per starting life, as many as fit before the score; lost
    /// lives show the border again.
    fn draw_lives<S: Surface>(&self, state: &GameState, surface: &mut S) {
        let b = self.stage.boundaries;
        let y = b.top - 1;
        let border = (self.theme.get_tile("border-h"), self.theme.get_color("border"));
        let life = (self.theme.get_tile("lives"), self.theme.get_color("lives"));
        let slots = state.rules().lives.min(self.stage.life_slots());

        for slot in 0..slots {
            let x = b.left + 4 + 2 * slot as i16;
            let (tile, color) = if slot < state.lives() { life } else { border };
            self.put(surface, (x, y), tile, color);
            self.put(surface, (x + 1, y), border.0, border.1);
        }
    }

    fn draw_game_over<S: Surface>(&self, state: &GameState, surface: &mut S) {
        let color = self.theme.get_color("border");
        let title = if state.won() { " YOU WIN! " } else { " GAME OVER " };

        self.put_centered(surface, -1, title, color);
        self.put_centered(surface, 1, " Press ENTER to restart ", color);
    }

    /// Centers `text` over the arena on `row`, cut to the arena's width.
    fn put_centered<S: Surface>(&self, surface: &mut S, row: i16, text: &str, color: Color) {
        let cols = 2 * self.stage.width as usize;
        let text: String = text.chars().take(cols).collect();
        let (left, y) = self.stage.to_screen((self.stage.boundaries.left, row));
        let x = left + (cols - text.chars().count()) as i32 / 2;

        self.put_screen(surface, (x, y), &text, color);
    }

    /// Draws `glyph` at a cell. A one-column glyph is doubled to fill the
    /// cell; anything that would not fit on the terminal is dropped.
    fn put<S: Surface>(&self, surface: &mut S, pos: Coords, glyph: &str, color: Color) {
        self.put_screen(surface, self.stage.to_screen(pos), glyph, color);
    }

    fn put_screen<S: Surface>(&self, surface: &mut S, (x, y): (i32, i32), glyph: &str, color: Color) {
        let (cols, rows) = surface.size();
        let width = glyph.chars().count() as i32;

        let fits = |x: i32, width: i32| x >= 0 && y >= 0 && y < rows as i32 && x + width <= cols as i32;

        if width < 2 {
            for x in [x, x + 1] {
                if fits(x, width) {
                    surface.draw_cell(x as TermInt, y as TermInt, glyph, color);
                }
            }
        } else if fits(x, width) {
            surface.draw_cell(x as TermInt, y as TermInt, glyph, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Rules;
    use crate::snake::Direction;
    use std::collections::HashMap;

    /// Keeps the last glyph written to each position and counts writes.
    #[derive(Default)]
    struct Recorder {
        size: (TermInt, TermInt),
        cells: HashMap<(TermInt, TermInt), String>,
        writes: usize,
        clears: usize,
        presents: usize,
    }

    impl Recorder {
        fn new(cols: TermInt, rows: TermInt) -> Self {
            Recorder { size: (cols, rows), ..Default::default() }
        }

        fn shows(&self, text: &str) -> bool {
            self.cells.values().any(|glyph| glyph == text)
        }

        fn at(&self, x: i32, y: i32) -> Option<&str> {
            self.cells.get(&(x as TermInt, y as TermInt)).map(|s| s.as_str())
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (TermInt, TermInt) {
            self.size
        }

        fn draw_cell(&mut self, x: TermInt, y: TermInt, glyph: &str, _color: Color) {
            assert!(x < self.size.0 && y < self.size.1);
            self.cells.insert((x, y), glyph.to_string());
            self.writes += 1;
        }

        fn clear(&mut self) -> Result<()> {
            self.cells.clear();
            self.clears += 1;
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.presents += 1;
            Ok(())
        }
    }

    fn setup(rules: Rules) -> (GameState, Renderer, Recorder, Stage) {
        let stage = Stage::fit(20, 14, (60, 24)).unwrap();
        let state = GameState::new(rules, stage.boundaries, 3);
        let renderer = Renderer::new(stage, Theme::default());
        (state, renderer, Recorder::new(60, 24), stage)
    }

    fn glyph_at<'a>(rec: &'a Recorder, stage: &Stage, pos: Coords) -> Option<&'a str> {
        let (x, y) = stage.to_screen(pos);
        rec.at(x, y)
    }

    #[test]
    fn test_first_frame_is_full() {
        let (state, mut renderer, mut rec, stage) = setup(Rules::default());
        let theme = Theme::default();

        renderer.draw_frame(&state, &mut rec).unwrap();

        assert_eq!(rec.clears, 1);
        assert_eq!(rec.presents, 1);
        assert_eq!(glyph_at(&rec, &stage, (0, 0)), Some(theme.get_tile("snake-head")));
        assert_eq!(glyph_at(&rec, &stage, (-1, 0)), Some(theme.get_tile("snake-body")));
        assert_eq!(glyph_at(&rec, &stage, state.apples()[0]), Some(theme.get_tile("apple")));
        assert_eq!(glyph_at(&rec, &stage, (stage.width / 2 - 1, stage.boundaries.top - 1)), Some("00"));
    }

    #[test]
    fn test_move_touches_few_cells() {
        let (mut state, mut renderer, mut rec, stage) = setup(Rules::default());
        let theme = Theme::default();
        renderer.draw_frame(&state, &mut rec).unwrap();

        // Steer away from the apple so this is a plain move.
        let apple = state.apples()[0];
        if apple == (1, 0) {
            state.set_direction(Direction::Up);
        }
        let outcome = state.tick();
        assert!(matches!(outcome, crate::game::TickOutcome::Moved { .. }));

        rec.writes = 0;
        renderer.draw_frame(&state, &mut rec).unwrap();

        assert_eq!(rec.clears, 1);
        assert_eq!(rec.writes, 3);
        let head = state.snake().head();
        assert_eq!(glyph_at(&rec, &stage, head), Some(theme.get_tile("snake-head")));
        assert_eq!(glyph_at(&rec, &stage, (0, 0)), Some(theme.get_tile("snake-body")));
        assert_eq!(glyph_at(&rec, &stage, (-2, 0)), Some(theme.get_tile("bg")));
    }

    #[test]
    fn test_eating_redraws_apple_and_score() {
        let (mut state, mut renderer, mut rec, stage) = setup(Rules { start_length: 1, ..Rules::default() });
        let theme = Theme::default();
        state.set_apples(vec![(1, 0)]);
        renderer.draw_frame(&state, &mut rec).unwrap();

        state.tick();
        rec.writes = 0;
        renderer.draw_frame(&state, &mut rec).unwrap();

        // Old head, new head, new apple and score.
        assert_eq!(rec.writes, 4);
        assert_eq!(rec.clears, 1);
        assert_eq!(glyph_at(&rec, &stage, (1, 0)), Some(theme.get_tile("snake-head")));
        assert_eq!(glyph_at(&rec, &stage, (0, 0)), Some(theme.get_tile("snake-body")));
        assert_eq!(glyph_at(&rec, &stage, state.apples()[0]), Some(theme.get_tile("apple")));
        assert_eq!(glyph_at(&rec, &stage, (stage.width / 2 - 1, stage.boundaries.top - 1)), Some("01"));
    }

    #[test]
    fn test_life_loss_redraws_everything() {
        let (mut state, mut renderer, mut rec, _) = setup(Rules { start_length: 1, lives: 2, ..Rules::default() });
        renderer.draw_frame(&state, &mut rec).unwrap();

        while state.lives() == 2 {
            state.set_direction(Direction::Up);
            state.tick();
            renderer.draw_frame(&state, &mut rec).unwrap();
        }

        assert_eq!(rec.clears, 2);
    }

    #[test]
    fn test_game_over_banner() {
        let (mut state, mut renderer, mut rec, stage) = setup(Rules { start_length: 1, lives: 1, ..Rules::default() });
        let theme = Theme::default();
        renderer.draw_frame(&state, &mut rec).unwrap();

        while state.mode() == Mode::Running {
            state.set_direction(Direction::Up);
            state.tick();
            renderer.draw_frame(&state, &mut rec).unwrap();
        }

        assert!(rec.shows(" GAME OVER "));
        assert_eq!(glyph_at(&rec, &stage, state.snake().head()), Some(theme.get_tile("snake-dead")));

        state.restart();
        renderer.draw_frame(&state, &mut rec).unwrap();
        assert_eq!(rec.clears, 2);
        assert!(!rec.shows(" GAME OVER "));
    }

    #[test]
    fn test_many_lives_leave_the_score_alone() {
        let (state, mut renderer, mut rec, stage) = setup(Rules { lives: 9, ..Rules::default() });
        let theme = Theme::default();
        renderer.draw_frame(&state, &mut rec).unwrap();

        let top = stage.boundaries.top - 1;
        assert_eq!(glyph_at(&rec, &stage, (stage.width / 2 - 1, top)), Some("00"));
        assert_eq!(glyph_at(&rec, &stage, (stage.width / 2 - 4, top)), Some("score:"));

        let lives = rec.cells.values().filter(|g| g.as_str() == theme.get_tile("lives")).count();
        // Each life glyph is one column, drawn twice per slot.
        assert_eq!(lives, 2 * stage.life_slots() as usize);
    }

    #[test]
    fn test_banners_stay_inside_narrow_arena() {
        let stage = Stage::fit(4, 4, (30, 12)).unwrap();
        let mut state = GameState::new(Rules { start_length: 1, lives: 1, ..Rules::default() }, stage.boundaries, 3);
        let mut renderer = Renderer::new(stage, Theme::default());
        let mut rec = Recorder::new(30, 12);

        while state.mode() == Mode::Running {
            state.tick();
        }
        renderer.draw_frame(&state, &mut rec).unwrap();

        let (left, _) = stage.to_screen((stage.boundaries.left, 0));
        let (right, _) = stage.to_screen((stage.boundaries.right, 0));
        for row in [-1, 1, stage.boundaries.bottom] {
            let (_, y) = stage.to_screen((0, row));
            let texts: Vec<(TermInt, &String)> = rec
                .cells
                .iter()
                .filter(|((_, cy), glyph)| *cy as i32 == y && glyph.chars().count() > 2)
                .map(|((cx, _), glyph)| (*cx, glyph))
                .collect();

            assert!(!texts.is_empty(), "row {}", row);
            for (x, glyph) in texts {
                assert!(x as i32 >= left, "{:?} starts left of the arena", glyph);
                assert!(x as i32 + glyph.chars().count() as i32 <= right, "{:?} runs past the arena", glyph);
            }
        }
    }

    #[test]
    fn test_offscreen_cells_are_dropped() {
        let stage = Stage::fit(10, 10, (40, 20)).unwrap();
        let state = GameState::new(Rules::default(), stage.boundaries, 3);
        let mut renderer = Renderer::new(stage, Theme::default());
        // The surface shrank below the stage; the frame still completes.
        let mut rec = Recorder::new(12, 6);

        renderer.draw_frame(&state, &mut rec).unwrap();
        assert_eq!(rec.presents, 1);
        assert!(rec.cells.keys().all(|(x, y)| *x < 12 && *y < 6));
    }
}
