//! Named tiles and colors.
//!
//! Lookups never fail: an unknown name gets the default tile or color, so a
//! typo can at worst draw a blank cell.

use clap::ValueEnum;
use crossterm::style::Color;

pub const DEFAULT_TILE: &str = "  ";
pub const DEFAULT_COLOR: Color = Color::Reset;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeKind {
    /// Block glyphs and colors.
    #[default]
    Classic,
    /// Plain ASCII, for terminals without box-drawing glyphs.
    Ascii,
}

#[derive(Copy, Clone, Debug)]
pub struct Theme {
    kind: ThemeKind,
}

impl Theme {
    pub fn new(kind: ThemeKind) -> Self {
        Theme { kind }
    }

    pub fn get_tile(&self, name: &str) -> &'static str {
        let tile = match self.kind {
            ThemeKind::Classic => match name {
                "bg" => Some("  "),
                "snake-head" => Some("██"),
                "snake-body" => Some("▓▓"),
                "snake-dead" => Some("░░"),
                "apple" => Some("()"),
                "lives" => Some("♥"),
                "border-h" => Some("─"),
                "border-v" => Some("│"),
                "border-c" => Some("+"),
                _ => None,
            },
            ThemeKind::Ascii => match name {
                "bg" => Some("  "),
                "snake-head" => Some("@@"),
                "snake-body" => Some("[]"),
                "snake-dead" => Some("xx"),
                "apple" => Some("()"),
                "lives" => Some("*"),
                "border-h" => Some("-"),
                "border-v" => Some("|"),
                "border-c" => Some("+"),
                _ => None,
            },
        };

        tile.unwrap_or(DEFAULT_TILE)
    }

    pub fn get_color(&self, name: &str) -> Color {
        let color = match self.kind {
            ThemeKind::Classic => match name {
                "bg" => Some(Color::Reset),
                "snake" => Some(Color::Green),
                "snake-dead" => Some(Color::DarkGrey),
                "apple" => Some(Color::Red),
                "border" => Some(Color::Cyan),
                "lives" => Some(Color::Magenta),
                _ => None,
            },
            ThemeKind::Ascii => match name {
                "apple" => Some(Color::Red),
                _ => None,
            },
        };

        color.unwrap_or(DEFAULT_COLOR)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::new(ThemeKind::default())
    }
}
