use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::game::Rules;
use crate::stage::Stage;
use crate::theme::ThemeKind;

const START_LENGTH: usize = 3;
const SCORE_PER_APPLE: u32 = 1;

/// Classic snake in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "snake", version, about)]
pub struct Config {
    /// Arena width in cells
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(i16).range(4..=200))]
    pub width: i16,

    /// Arena height in cells
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(i16).range(4..=100))]
    pub height: i16,

    /// Apples on the board at any time
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub apples: u16,

    /// Lives at the start of a game
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub lives: u32,

    /// Milliseconds per tick; lower is faster
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(10..=2000))]
    pub tick_ms: u64,

    #[arg(long, value_enum, default_value_t = ThemeKind::Classic)]
    pub theme: ThemeKind,

    /// Seed for apple placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn rules(&self) -> Rules {
        Rules {
            start_length: START_LENGTH,
            lives: self.lives,
            apples: self.apples as usize,
            score_per_apple: SCORE_PER_APPLE,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Lives beyond what the HUD has room for at this width. They still
    /// count, they just aren't drawn.
    pub fn hidden_lives(&self) -> u32 {
        let slots = Stage::new(self.width, self.height).life_slots();
        self.lives.saturating_sub(slots)
    }
}
