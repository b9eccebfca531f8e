use std::io;
use std::path::PathBuf;

use crate::geometry::GeometryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unreadable high score file {path}: {source}")]
    ScoreFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not encode high score: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid board: {0}")]
    Geometry(#[from] GeometryError),
    #[error("terminal is {cols}x{rows}, the board needs at least {needed_cols}x{needed_rows}")]
    TerminalTooSmall { cols: u16, rows: u16, needed_cols: u32, needed_rows: u32 },
    #[error("could not start logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
