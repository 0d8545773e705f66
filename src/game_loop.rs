//! Fixed-interval scheduler: poll input, tick, draw, sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::game::{GameState, TickOutcome};
use crate::input::{Command, InputSource};
use crate::render::{Renderer, Surface};

/// Cooperative stop request, checked at the top of every iteration.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Turns SIGINT and SIGTERM into a stop request. The handler only sets a
    /// flag; the terminal is restored by whoever owns it once the loop returns.
    #[cfg(unix)]
    pub fn stop_on_signals(&self) -> Result<()> {
        use signal_hook::consts::{SIGINT, SIGTERM};

        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&self.0))
                .with_context(|| format!("Error registering handler for signal {}", signal))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn stop_on_signals(&self) -> Result<()> {
        Ok(())
    }
}

pub struct GameLoop<S: Surface, I: InputSource> {
    state: GameState,
    renderer: Renderer,
    surface: S,
    input: I,
    tick: Duration,
    stop: StopHandle,
}

impl<S: Surface, I: InputSource> GameLoop<S, I> {
    pub fn new(state: GameState, renderer: Renderer, surface: S, input: I, tick: Duration) -> Self {
        GameLoop { state, renderer, surface, input, tick, stop: StopHandle::default() }
    }

    /// Runs until [`GameLoop::stop`] is requested, a quit command arrives, or
    /// drawing fails.
    pub fn start(&mut self) -> Result<()> {
        info!("Starting game loop, tick every {:?}", self.tick);
        self.renderer.draw_frame(&self.state, &mut self.surface)?;

        while !self.stop.is_stopped() {
            let frame_start = Instant::now();
            self.step()?;

            if self.stop.is_stopped() {
                break;
            }
            if let Some(rest) = self.tick.checked_sub(frame_start.elapsed()) {
                sleep(rest);
            }
        }

        info!("Game loop stopped with score {}", self.state.score());
        Ok(())
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// One iteration without the sleep.
    pub fn step(&mut self) -> Result<()> {
        match self.input.poll()? {
            Some(Command::Turn(dir)) => {
                self.state.set_direction(dir);
            }
            Some(Command::Restart) => {
                if !self.state.restart() {
                    debug!("Ignoring restart while running");
                }
            }
            Some(Command::Redraw) => {
                self.surface.refresh()?;
                self.renderer.invalidate();
            }
            Some(Command::Quit) => {
                info!("Quit requested");
                self.stop();
                return Ok(());
            }
            None => {}
        }

        match self.state.tick() {
            TickOutcome::LifeLost => info!("Life lost, {} left", self.state.lives()),
            TickOutcome::BoardFull => info!("Board full, the snake wins"),
            _ => {}
        }

        self.renderer.draw_frame(&self.state, &mut self.surface)
    }
}
