use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use gridsnake::{Difficulty, Direction};

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    /// Start button: new game, or pause/resume a running one.
    StartPause,
    /// Pause when running, resume when paused, nothing otherwise.
    PauseResume,
    Reset,
    SetDifficulty(Difficulty),
    Quit,
}

impl Command {
    pub fn from_key_event(ev: KeyEvent) -> Option<Command> {
        if is_ctrl_c(&ev) {
            return Some(Command::Quit);
        }

        let cmd = match ev.code {
            KeyCode::Char('w') | KeyCode::Up => Command::Steer(Direction::Up),
            KeyCode::Char('a') | KeyCode::Left => Command::Steer(Direction::Left),
            KeyCode::Char('s') | KeyCode::Down => Command::Steer(Direction::Down),
            KeyCode::Char('d') | KeyCode::Right => Command::Steer(Direction::Right),
            KeyCode::Char(' ') | KeyCode::Enter => Command::StartPause,
            KeyCode::Esc => Command::PauseResume,
            KeyCode::Char('r') => Command::Reset,
            KeyCode::Char('1') => Command::SetDifficulty(Difficulty::Easy),
            KeyCode::Char('2') => Command::SetDifficulty(Difficulty::Medium),
            KeyCode::Char('3') => Command::SetDifficulty(Difficulty::Hard),
            KeyCode::Char('q') => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
