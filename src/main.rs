use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};

use snake::config::Config;
use snake::game::GameState;
use snake::game_loop::GameLoop;
use snake::input::TermInput;
use snake::logging::init_log;
use snake::render::{Renderer, Surface};
use snake::stage::Stage;
use snake::term::TermSurface;
use snake::theme::Theme;

fn main() -> Result<()> {
    let config = Config::parse();
    if let Some(path) = &config.log_file {
        init_log(config.log_level, path)?;
    }
    info!("Starting with {:?}", config);
    if config.hidden_lives() > 0 {
        warn!("A {} wide arena can't show {} of the lives", config.width, config.hidden_lives());
    }

    let mut term = TermSurface::new();
    let result = run(&config, &mut term);

    // Restore before anything is printed, whatever happened in `run`.
    term.restore();
    if let Err(err) = &result {
        error!("Exiting with error: {:#}", err);
    }
    result
}

fn run(config: &Config, term: &mut TermSurface) -> Result<()> {
    term.refresh()?;
    let stage = Stage::fit(config.width, config.height, term.size())?;
    term.setup()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Apple seed {}", seed);

    let state = GameState::new(config.rules(), stage.boundaries, seed);
    let renderer = Renderer::new(stage, Theme::new(config.theme));

    let mut game = GameLoop::new(state, renderer, term, TermInput, config.tick_interval());
    game.stop_handle().stop_on_signals()?;
    game.start()
}
