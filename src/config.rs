use regex::Regex;

use super::error::{Error, Result};

pub const USAGE: &str = "Usage: minefield [--width=N] [--height=N] [--mines=N] [--seed=N]";

/// Largest grid the terminal renderer can address.
pub const MAX_WIDTH: usize = 1000;
pub const MAX_HEIGHT: usize = 1000;

/// Settings for a game session. Every "play again" reuses the same config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub seed: Option<u64>
}

impl Default for Config {
    fn default() -> Config {
        Config{width: 8, height: 8, mines: 10, seed: None}
    }
}

impl Config {
    /// Reads `--name=N` options out of the joined command line. Text that
    /// matches no option is ignored.
    pub fn from_args(args: &str) -> Result<Config> {
        let defaults = Config::default();
        let config = Config {
            width: arg_value(args, "width")?.unwrap_or(defaults.width),
            height: arg_value(args, "height")?.unwrap_or(defaults.height),
            mines: arg_value(args, "mines")?.unwrap_or(defaults.mines),
            seed: arg_value(args, "seed")?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::InvalidConfiguration(String::from("field size must be positive")));
        }
        if self.width > MAX_WIDTH || self.height > MAX_HEIGHT {
            return Err(Error::InvalidConfiguration(
                format!("field size is limited to {}x{}", MAX_WIDTH, MAX_HEIGHT)));
        }
        match self.width.checked_mul(self.height) {
            Some(area) if self.mines < area => Ok(()),
            Some(_) => Err(Error::InvalidConfiguration(
                format!("{} mines do not fit in a {}x{} field", self.mines, self.width, self.height))),
            None => Err(Error::InvalidConfiguration(
                format!("a {}x{} field is too large", self.width, self.height)))
        }
    }
}

pub fn wants_help(args: &str) -> bool {
    args.split_whitespace().any(|arg| arg == "--help" || arg == "-h")
}

fn arg_value<T: std::str::FromStr>(args: &str, name: &str) -> Result<Option<T>> {
    let re = Regex::new(&format!(r"--{}=(\d+)", name))
        .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
    match re.captures(args) {
        None => Ok(None),
        Some(cap) => cap[1].parse().map(Some).map_err(|_| Error::InvalidConfiguration(
            format!("--{} value {} is out of range", name, &cap[1])))
    }
}
