use thiserror::Error;

use super::board::Point;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("point {point} is outside the {width}x{height} field")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
