use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not put the terminal into raw mode: {0}")]
    RawMode(#[source] crossterm::ErrorKind),
    #[error("terminal output failed: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
