//! Configuration loader.
//!
//! * Looks for `gridsnake.toml` in the cwd unless overridden by `--config`.
//! * Every field has a default, so the file is optional.
//! * Command-line flags win over the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;
use serde::{Deserialize, Deserializer};

use crate::difficulty::Difficulty;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::GridInt;

pub const DEFAULT_CONFIG_FILE: &str = "gridsnake.toml";

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Grid snake in the terminal")]
pub struct Args {
    /// Config file (default: ./gridsnake.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Starting difficulty
    #[arg(short, long, value_enum)]
    pub difficulty: Option<Difficulty>,

    /// Board size in board units
    #[arg(long)]
    pub board_size: Option<GridInt>,

    /// Cell size in board units; must divide the board size
    #[arg(long)]
    pub cell_size: Option<GridInt>,

    /// Where the high score is kept
    #[arg(long)]
    pub high_score_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_parser = parse_level)]
    pub log_level: Option<LevelFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Board width and height.
    pub board_size: GridInt,
    pub cell_size: GridInt,
    pub difficulty: Difficulty,
    pub high_score_file: PathBuf,
    /// `false` keeps the high score in memory only.
    #[serde(skip, default = "default_persist")]
    pub persist: bool,
    pub log_file: PathBuf,
    #[serde(deserialize_with = "deserialize_level")]
    pub log_level: LevelFilter,
}

fn default_persist() -> bool { true }

/// Case-insensitive level name, as accepted by `LevelFilter::from_str`.
pub fn parse_level(s: &str) -> std::result::Result<LevelFilter, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("unknown log level {:?} (expected off, error, warn, info, debug or trace)", s))
}

fn deserialize_level<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<LevelFilter, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_level(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: 400,
            cell_size: 20,
            difficulty: Difficulty::Easy,
            high_score_file: PathBuf::from("snake_high_score.toml"),
            persist: true,
            log_file: PathBuf::from("gridsnake.log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing default file means defaults; a
    /// missing file that was asked for by name is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (p, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(p) {
            Ok(text) => Self::parse(&text).map_err(|source| Error::Config { path: p.to_path_buf(), source }),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Config file plus command-line overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply(args);
        Ok(config)
    }

    pub fn apply(&mut self, args: &Args) {
        if let Some(d) = args.difficulty {
            self.difficulty = d;
        }
        if let Some(size) = args.board_size {
            self.board_size = size;
        }
        if let Some(size) = args.cell_size {
            self.cell_size = size;
        }
        if let Some(path) = &args.high_score_file {
            self.high_score_file = path.clone();
        }
        if args.no_persist {
            self.persist = false;
        }
        if let Some(path) = &args.log_file {
            self.log_file = path.clone();
        }
        if let Some(level) = args.log_level {
            self.log_level = level;
        }
    }

    pub fn geometry(&self) -> Result<Geometry> {
        Ok(Geometry::new(self.board_size, self.cell_size)?)
    }
}
