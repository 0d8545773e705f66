//! Terminal surface on top of crossterm.
//!
//! [`TermSurface::restore`] is safe to call any number of times and from a
//! half-finished [`TermSurface::setup`]: each mode is only undone if it was
//! turned on, and a failing step does not stop the remaining ones.

use std::io::{stdout, Stdout, Write};
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::{trace, warn};

use crate::render::Surface;
use crate::TermInt;

pub struct TermSurface {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    alt_screen: bool,
    raw_mode: bool,
    cursor_hidden: bool,
}

impl TermSurface {
    pub fn new() -> Self {
        TermSurface {
            width: 0,
            height: 0,
            stdout: stdout(),
            alt_screen: false,
            raw_mode: false,
            cursor_hidden: false,
        }
    }

    pub fn setup(&mut self) -> Result<()> {
        install_panic_hook();

        self.refresh()?;

        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.alt_screen = true;

        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        self.raw_mode = true;

        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        self.cursor_hidden = true;

        Ok(())
    }

    pub fn restore(&mut self) {
        if self.cursor_hidden {
            self.cursor_hidden = false;
            if let Err(err) = execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking) {
                warn!("Error showing cursor: {}", err);
            }
        }

        if self.raw_mode {
            self.raw_mode = false;
            if let Err(err) = terminal::disable_raw_mode() {
                warn!("Error disabling raw mode: {}", err);
            }
        }

        if self.alt_screen {
            self.alt_screen = false;
            if let Err(err) = execute!(self.stdout, LeaveAlternateScreen) {
                warn!("Error leaving alt screen: {}", err);
            }
        }

        if let Err(err) = self.stdout.flush() {
            warn!("Error flushing after restore: {}", err);
        }
    }

    pub fn is_active(&self) -> bool {
        self.alt_screen || self.raw_mode || self.cursor_hidden
    }
}

impl Default for TermSurface {
    fn default() -> Self {
        TermSurface::new()
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Surface for TermSurface {
    fn size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    fn draw_cell(&mut self, x: TermInt, y: TermInt, glyph: &str, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        let res = queue!(self.stdout, cursor::MoveTo(x, y), SetForegroundColor(color), Print(glyph));
        if let Err(err) = res {
            trace!("Dropped cell at {},{}: {}", x, y, err);
        }
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, ResetColor, terminal::Clear(ClearType::All)).context("Error clearing")?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    fn refresh(&mut self) -> Result<()> {
        let (w, h) = terminal::size().context("Error reading terminal size")?;
        self.width = w;
        self.height = h;
        Ok(())
    }
}

/// Undoes every mode the game may have turned on, ignoring failures. Used
/// where no [`TermSurface`] is reachable, such as the panic hook.
pub fn best_effort_restore() {
    let mut stdout = stdout();

    let _ = execute!(stdout, ResetColor, cursor::Show, cursor::EnableBlinking);
    let _ = terminal::disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_restore();
            previous(info);
        }));
    });
}
