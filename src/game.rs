use std::time::{Duration, Instant};

use log::info;

use gridsnake::{Result, ScoreStore, Session, SessionState};

use crate::input::Command;
use crate::term::TermManager;

/// How long to wait for keys when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct SnakeGame<S: ScoreStore> {
    term: TermManager,
    session: Session<S>,
}

impl<S: ScoreStore> SnakeGame<S> {
    pub fn new(session: Session<S>) -> Result<Self> {
        Ok(SnakeGame { term: TermManager::new()?, session })
    }

    /// Plays until the user quits. The terminal is restored even if the
    /// loop fails.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup(self.session.geometry())?;

        let res = self.event_loop();
        let restored = self.term.restore();
        res.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn event_loop(&mut self) -> Result<()> {
        self.redraw()?;

        loop {
            let timeout = self.session.time_until_tick(Instant::now()).unwrap_or(IDLE_POLL);
            let mut dirty = false;

            for key_ev in self.term.read_key_events(timeout)? {
                match Command::from_key_event(key_ev) {
                    Some(Command::Quit) => {
                        info!("quit with score {}", self.session.score());
                        return Ok(());
                    }
                    Some(cmd) => dirty |= self.apply(cmd),
                    None => {}
                }
            }

            if dirty {
                self.redraw()?;
            }

            let state_before = self.session.state();
            self.session.poll_tick(Instant::now(), &mut self.term)?;
            if state_before != self.session.state() {
                // Entered GameOver: show the final board with its overlay
                self.redraw()?;
            }
        }
    }

    /// Returns whether the screen needs redrawing.
    fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Steer(dir) => {
                self.session.set_direction(dir);
                false
            }
            Command::StartPause => {
                self.session.start();
                true
            }
            Command::PauseResume => {
                match self.session.state() {
                    SessionState::Running => self.session.pause(),
                    SessionState::Paused => self.session.resume(),
                    _ => return false,
                }
                true
            }
            Command::Reset => {
                self.session.reset();
                true
            }
            Command::SetDifficulty(level) => {
                self.session.set_difficulty(level);
                true
            }
            Command::Quit => false,
        }
    }

    fn redraw(&mut self) -> Result<()> {
        self.term.draw(&self.session.frame())
    }
}
