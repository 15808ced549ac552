use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Timer was read or stopped before it was started")]
    TimerNotStarted,
}

pub type Result<T> = core::result::Result<T, GameError>;
