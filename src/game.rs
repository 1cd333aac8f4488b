use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::board::{Minefield, Point};
use super::config::Config;
use super::error::Result;
use super::interaction::{ActionType, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Won,
    Lost
}

/// One player's session: the current field, the cursor, and how the round ended.
pub struct Game {
    config: Config,
    rng: StdRng,
    field: Minefield,
    cursor: Point,
    outcome: Outcome
}

impl Game {
    pub fn new(config: Config) -> Result<Game> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };
        let field = Minefield::with_rng(config.width, config.height, config.mines, &mut rng)?;
        Ok(Game::with_field(config, rng, field))
    }

    fn with_field(config: Config, rng: StdRng, field: Minefield) -> Game {
        Game{config, rng, field, cursor: Point(0, 0), outcome: Outcome::Playing}
    }

    pub fn field(&self) -> &Minefield {
        &self.field
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Applies one action. Returns `false` once the player asks to quit.
    pub fn apply(&mut self, action: ActionType) -> Result<bool> {
        match (self.outcome, action) {
            (_, ActionType::Quit) => return Ok(false),
            (Outcome::Playing, ActionType::Move(direction)) => self.move_cursor(direction),
            (Outcome::Playing, ActionType::Reveal) => {
                if self.field.reveal(&self.cursor)? {
                    self.field.reveal_all();
                    self.outcome = Outcome::Lost;
                    info!(x = self.cursor.0, y = self.cursor.1, "mine revealed, game lost");
                    debug!("final field:\n{}", self.field);
                }
            }
            (Outcome::Playing, ActionType::Flag) => {
                if self.field.toggle_flag(&self.cursor)? {
                    self.outcome = Outcome::Won;
                    info!("all mines flagged, game won");
                }
            }
            (_, ActionType::Reveal) => self.restart()?,
            _ => {}
        }
        Ok(true)
    }

    /// Throws the old field away and deals a new one with the same config.
    pub fn restart(&mut self) -> Result<()> {
        self.field = Minefield::with_rng(self.config.width, self.config.height, self.config.mines, &mut self.rng)?;
        self.cursor = Point(0, 0);
        self.outcome = Outcome::Playing;
        info!(width = self.config.width, height = self.config.height, mines = self.config.mines, "new game");
        Ok(())
    }

    fn move_cursor(&mut self, direction: Direction) {
        let Point(x, y) = self.cursor;
        self.cursor = match direction {
            Direction::Up => Point(x, y.saturating_sub(1)),
            Direction::Down => Point(x, (y + 1).min(self.field.height() - 1)),
            Direction::Left => Point(x.saturating_sub(1), y),
            Direction::Right => Point((x + 1).min(self.field.width() - 1), y)
        };
    }
}
