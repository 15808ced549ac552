#![no_std]

extern crate alloc;

pub use error::*;
pub use export::*;
pub use grid::*;
pub use lottery::*;
pub use puzzle::*;
pub use timer::*;
pub use types::*;

mod error;
mod export;
mod grid;
mod lottery;
mod puzzle;
mod timer;
mod types;

/// Result of a state-changing action that the current state may not allow.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Transition {
    NoChange,
    Changed,
}

impl Transition {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
