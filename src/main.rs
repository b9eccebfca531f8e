mod game;
mod input;
mod term;

use std::fs::File;
use std::process::exit;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use gridsnake::{Args, Config, FileStore, MemoryStore, Result, ScoreStore, Session};

use crate::game::SnakeGame;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("gridsnake: {}", e);
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::from_args(args)?;
    init_logging(&config)?;

    let geometry = config.geometry()?;
    info!("Starting gridsnake on a {0}x{0} board, cell size {1}", geometry.extent(), geometry.cell_size());

    if config.persist {
        play(Session::new(geometry, config.difficulty, FileStore::new(&config.high_score_file)))
    } else {
        play(Session::new(geometry, config.difficulty, MemoryStore::new()))
    }
}

fn play<S: ScoreStore>(session: Session<S>) -> Result<()> {
    SnakeGame::new(session)?.run()
}

// The screen belongs to the game, so logs go to a file
fn init_logging(config: &Config) -> Result<()> {
    let level = config.log_level;
    if level == LevelFilter::Off {
        return Ok(());
    }

    WriteLogger::init(level, simplelog::Config::default(), File::create(&config.log_file)?)?;
    Ok(())
}
