//! Errors surfaced to the host while preparing a machine

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The ROM does not fit between the load address and the end of memory
    #[error("ROM of {size} bytes does not fit in the {capacity} bytes available")]
    RomTooLarge { size: usize, capacity: usize },

    /// Reading the ROM from its source failed
    #[error("unable to read ROM: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
