pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod interaction;
pub mod render;

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::info;

use game::Game;

/// Puts the terminal back when dropped, whether the game ended normally,
/// failed part-way through setup, or panicked.
struct TerminalGuard<W: Write> {
    out: W
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<TerminalGuard<W>> {
        terminal::enable_raw_mode()?;
        let mut guard = TerminalGuard{out};
        guard.out.execute(EnterAlternateScreen)?;
        guard.out.execute(Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Each step runs even if an earlier one fails.
        let _ = self.out.execute(Show);
        let _ = self.out.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Plays in the terminal until the player quits. The terminal is restored
/// on every way out, including errors and panics.
pub fn game_loop(config: config::Config) -> Result<()> {
    let mut game = Game::new(config).context("failed to set up the minefield")?;
    info!(width = config.width, height = config.height, mines = config.mines, "starting game");

    let _guard = TerminalGuard::enter(io::stdout()).context("failed to prepare the terminal")?;
    run(&mut io::stdout(), &mut game)
}

fn run(stdout: &mut Stdout, game: &mut Game) -> Result<()> {
    render::draw(stdout, game)?;
    loop {
        match event::read()? {
            Event::Key(key) => {
                if let Some(action) = interaction::action_from_key(&key) {
                    if !game.apply(action)? {
                        return Ok(())
                    }
                    render::draw(stdout, game)?;
                }
            }
            Event::Resize(_, _) => render::draw(stdout, game)?,
            _ => {}
        }
    }
}
