//! Arena geometry.
//!
//! Game cells are signed and centered on the arena origin. The stage is the
//! only place that knows how a cell maps onto terminal columns and rows: each
//! cell is two columns wide so the board looks roughly square.

use anyhow::{ensure, Result};

use crate::{Coords, TermInt};

/// Smallest terminal the game will start in, whatever the arena size.
pub const MIN_TERM_SIZE: (TermInt, TermInt) = (20, 10);

const TOP: usize = 0;
const LEFT: usize = 3;

/// Half-open cell bounds: `left <= x < right`, `top <= y < bottom`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub top: i16,
    pub bottom: i16,
    pub left: i16,
    pub right: i16,
}

impl Bounds {
    pub fn centered(width: i16, height: i16) -> Self {
        let left = (-width).div_euclid(2);
        let top = (-height).div_euclid(2);
        Bounds { top, bottom: top + height, left, right: left + width }
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 >= self.left && pos.0 < self.right && pos.1 >= self.top && pos.1 < self.bottom
    }

    pub fn width(&self) -> i16 {
        self.right - self.left
    }

    pub fn height(&self) -> i16 {
        self.bottom - self.top
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coords> + '_ {
        (self.top..self.bottom).flat_map(move |y| (self.left..self.right).map(move |x| (x, y)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    pub width: i16,
    pub height: i16,
    /// Top, right, bottom, left.
    pub padding: [i32; 4],
    pub boundaries: Bounds,
}

impl Stage {
    /// A stage with no padding, for use off-terminal.
    pub fn new(width: i16, height: i16) -> Self {
        Stage { width, height, padding: [0; 4], boundaries: Bounds::centered(width, height) }
    }

    /// Centers a `width` x `height` arena, plus its border, in a terminal of
    /// `term` columns and rows.
    pub fn fit(width: i16, height: i16, term: (TermInt, TermInt)) -> Result<Self> {
        let (cols, rows) = (term.0 as i32, term.1 as i32);
        let (need_cols, need_rows) = Self::required_size(width, height);

        ensure!(
            term.0 >= MIN_TERM_SIZE.0 && term.1 >= MIN_TERM_SIZE.1,
            "Terminal too small! Current: {}x{}, minimum required: {}x{}",
            term.0, term.1, MIN_TERM_SIZE.0, MIN_TERM_SIZE.1
        );
        ensure!(
            cols >= need_cols && rows >= need_rows,
            "Terminal too small for a {}x{} arena! Current: {}x{}, required: {}x{}",
            width, height, term.0, term.1, need_cols, need_rows
        );

        let mut stage = Stage::new(width, height);
        let b = stage.boundaries;
        let (w, h) = (width as i32, height as i32);

        let target_x = (cols - need_cols) / 2;
        let left = (target_x - 2 * (b.left as i32 - 1) - w / 2 + 1).div_euclid(2);
        let target_y = (rows - need_rows) / 2;
        let top = target_y - (b.top as i32 - 1) - h / 2;

        stage.padding = [top, cols - need_cols - target_x, rows - need_rows - target_y, left];
        Ok(stage)
    }

    /// Terminal columns and rows the arena, its border and HUD occupy.
    pub fn required_size(width: i16, height: i16) -> (i32, i32) {
        (2 * width as i32 + 5, height as i32 + 2)
    }

    /// Life glyphs that fit on the top border between the `lives:` label
    /// and the `score:` label. Each takes two cells.
    pub fn life_slots(&self) -> u32 {
        let first = self.boundaries.left + 4;
        let score_label = self.width / 2 - 4;
        ((score_label - first).max(0) / 2) as u32
    }

    /// Maps a cell onto a terminal position. The result may be negative or
    /// beyond the terminal; callers drop such positions.
    pub fn to_screen(&self, pos: Coords) -> (i32, i32) {
        let x = 2 * pos.0 as i32 + self.padding[LEFT] * 2 + self.width as i32 / 2;
        let y = pos.1 as i32 + self.padding[TOP] + self.height as i32 / 2;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_centered() {
        let b = Bounds::centered(20, 14);
        assert_eq!((b.left, b.right, b.top, b.bottom), (-10, 10, -7, 7));

        let odd = Bounds::centered(21, 15);
        assert_eq!((odd.left, odd.right, odd.top, odd.bottom), (-11, 10, -8, 7));
        assert_eq!(odd.width(), 21);
        assert_eq!(odd.height(), 15);
    }

    #[test]
    fn test_bounds_contains_is_half_open() {
        let b = Bounds::centered(4, 4);
        assert!(b.contains((-2, -2)));
        assert!(b.contains((1, 1)));
        assert!(!b.contains((2, 0)));
        assert!(!b.contains((0, 2)));
        assert_eq!(b.cells().count(), 16);
    }

    #[test]
    fn test_fit_rejects_small_terminals() {
        assert!(Stage::fit(4, 4, (19, 10)).is_err());
        assert!(Stage::fit(20, 14, (40, 30)).is_err());
        assert!(Stage::fit(20, 14, (80, 24)).is_ok());
    }

    #[test]
    fn test_fit_keeps_border_on_screen() {
        for &(w, h, cols, rows) in &[(20, 14, 80, 24), (21, 15, 47, 17), (4, 4, 20, 10), (30, 20, 65, 22)] {
            let stage = Stage::fit(w, h, (cols, rows)).unwrap();
            let b = stage.boundaries;

            let (x0, y0) = stage.to_screen((b.left - 1, b.top - 1));
            let (x1, y1) = stage.to_screen((b.right, b.bottom));
            assert!(x0 >= 0 && y0 >= 0, "{:?}", (w, h, x0, y0));
            assert!(x1 + 2 <= cols as i32, "{:?}", (w, h, x1));
            assert!(y1 < rows as i32, "{:?}", (w, h, y1));
        }
    }

    #[test]
    fn test_life_slots_end_before_score() {
        assert_eq!(Stage::new(20, 14).life_slots(), 6);
        assert_eq!(Stage::new(21, 14).life_slots(), 6);
        assert_eq!(Stage::new(26, 14).life_slots(), 9);
        assert_eq!(Stage::new(10, 10).life_slots(), 1);
        assert_eq!(Stage::new(4, 4).life_slots(), 0);

        for w in 4..40 {
            let stage = Stage::new(w, 10);
            let slots = stage.life_slots() as i16;
            // Last slot plus its trailing border cell.
            let end = stage.boundaries.left + 4 + 2 * slots;
            assert!(slots == 0 || end <= w / 2 - 4, "width {}", w);
        }
    }

    #[test]
    fn test_cells_are_two_columns_apart() {
        let stage = Stage::fit(20, 14, (80, 24)).unwrap();
        let (ax, ay) = stage.to_screen((0, 0));
        let (bx, by) = stage.to_screen((1, 1));
        assert_eq!((bx - ax, by - ay), (2, 1));
    }
}
