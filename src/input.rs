use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
    Restart,
    /// The terminal changed under us; draw everything again.
    Redraw,
}

/// A non-blocking source of commands. Most polls return `None`.
pub trait InputSource {
    fn poll(&mut self) -> Result<Option<Command>>;
}

/// Reads at most one pending terminal event per poll.
#[derive(Default)]
pub struct TermInput;

impl InputSource for TermInput {
    fn poll(&mut self) -> Result<Option<Command>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }

        let cmd = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => map_key(&key),
            Event::Resize(_, _) => Some(Command::Redraw),
            _ => None,
        };
        Ok(cmd)
    }
}

pub fn map_key(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Enter => Some(Command::Restart),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
