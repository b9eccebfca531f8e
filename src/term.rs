use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyEvent, KeyEventKind, poll, read};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::debug;

use gridsnake::{Coords, Error, Frame, GameOverSummary, GameSink, Geometry, GridInt, Result, SessionState};

/// Terminal position, column first.
type TermCoords = (u16, u16);

// Each board cell is two columns wide so it comes out roughly square
const CELL_WIDTH: u16 = 2;
const SNAKE_BODY: &str = "██";
const FOOD: &str = "()";
const EMPTY: &str = "  ";
const STATUS_LINES: u16 = 2;

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    cells_per_side: u16,
    origin: TermCoords,
    last_overlay: Option<Vec<String>>,
    needs_clear: bool,
    last_game_over: Option<GameOverSummary>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_size(width, height))
    }

    fn with_size(width: u16, height: u16) -> Self {
        TermManager {
            width,
            height,
            stdout: stdout(),
            cells_per_side: 0,
            origin: (0, 0),
            last_overlay: None,
            needs_clear: true,
            last_game_over: None,
        }
    }

    /// Enters the alternate screen in raw mode and sizes the board.
    pub fn setup(&mut self, geometry: &Geometry) -> Result<()> {
        self.setup_size(geometry)?;

        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Sizes the board for `geometry` without touching the terminal.
    fn setup_size(&mut self, geometry: &Geometry) -> Result<()> {
        let cells = u32::try_from(geometry.cells_per_side()).unwrap_or(u32::MAX);
        self.fit_board(cells)
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Waits up to `timeout` for input, then drains whatever else is queued.
    pub fn read_key_events(&mut self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            match read()? {
                Event::Key(ev) if ev.kind != KeyEventKind::Release => events.push(ev),
                Event::Resize(w, h) => {
                    debug!("terminal resized to {}x{}", w, h);
                    self.width = w;
                    self.height = h;
                    self.fit_board(u32::from(self.cells_per_side))?;
                    self.needs_clear = true;
                }
                _ => {}
            }
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    /// Full redraw: border, every cell, status line and any overlay.
    pub fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        let overlay = self.overlay_lines(frame);

        if self.needs_clear || self.last_overlay != overlay {
            queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
            self.draw_borders()?;
            self.needs_clear = false;
        }

        self.draw_cells(frame)?;
        self.draw_status(frame)?;

        if let Some(lines) = &overlay {
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            self.show_message(&lines)?;
        }
        self.last_overlay = overlay;

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::ResetColor)?;

        // Print the top and bottom empty lines
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            self.print_at((top_left.0, y), &blank)?;
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            self.print_at((top_left.0, y), &padded_line)?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Checks that `cells` per side fit on screen and centres the board.
    fn fit_board(&mut self, cells: u32) -> Result<()> {
        let needed_cols = cells.saturating_mul(u32::from(CELL_WIDTH)).saturating_add(2);
        let needed_rows = cells.saturating_add(2 + u32::from(STATUS_LINES));
        let (cols, rows) = (u32::from(self.width), u32::from(self.height));

        if cols < needed_cols || rows < needed_rows {
            return Err(Error::TerminalTooSmall { cols: self.width, rows: self.height, needed_cols, needed_rows });
        }

        // Everything below is bounded by the terminal size, so fits in u16
        self.cells_per_side = cells as u16;
        self.origin = (((cols - needed_cols) / 2) as u16, ((rows - needed_rows) / 2) as u16);
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (x0, y0) = self.origin;
        let inner = self.cells_per_side * CELL_WIDTH;
        let end_y = y0 + self.cells_per_side + 1;

        let edge = format!("+{}+", "-".repeat(inner as usize));
        self.print_at((x0, y0), &edge)?;
        self.print_at((x0, end_y), &edge)?;

        for y in y0 + 1..end_y {
            self.print_at((x0, y), "|")?;
            self.print_at((x0 + inner + 1, y), "|")?;
        }

        Ok(())
    }

    fn draw_cells(&mut self, frame: &Frame<'_>) -> Result<()> {
        let geometry = frame.geometry;

        queue!(self.stdout, style::ResetColor)?;
        for row in 0..self.cells_per_side {
            let line = EMPTY.repeat(self.cells_per_side as usize);
            self.print_at(self.cell_pos((0, row)), &line)?;
        }

        if let Some(food) = frame.food {
            let pos = self.grid_pos(geometry, food);
            queue!(self.stdout, style::SetForegroundColor(Color::Red))?;
            self.print_at(pos, FOOD)?;
        }

        let head_color = if frame.state == SessionState::GameOver { Color::DarkRed } else { Color::Green };
        for (i, cell) in frame.snake.body().iter().enumerate() {
            let pos = self.grid_pos(geometry, *cell);
            if i == 0 {
                let ch = frame.direction.head_char();
                queue!(self.stdout, style::SetForegroundColor(head_color))?;
                self.print_at(pos, &format!("{}{}", ch, ch))?;
            } else {
                queue!(self.stdout, style::SetForegroundColor(Color::DarkGreen))?;
                self.print_at(pos, SNAKE_BODY)?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        Ok(())
    }

    fn draw_status(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (x0, y0) = self.origin;
        let y = y0 + self.cells_per_side + 2;
        let board_width = (self.cells_per_side * CELL_WIDTH + 2) as usize;

        let status = format!(
            "Score: {}  High: {}  {}  [{}]",
            frame.score, frame.high_score, frame.difficulty, frame.state
        );
        let help = "WASD/arrows  space  esc  r  1-3  q";

        self.print_at((x0, y), &format!("{:<width$}", status, width = board_width))?;
        self.print_at((x0, y + 1), &format!("{:<width$}", help, width = board_width))?;
        Ok(())
    }

    fn overlay_lines(&self, frame: &Frame<'_>) -> Option<Vec<String>> {
        let lines = match frame.state {
            SessionState::Running => return None,
            SessionState::Idle => vec![
                "Arrow keys or WASD to move".to_string(),
                "Space to start, Esc to pause".to_string(),
                "1/2/3 for easy/medium/hard".to_string(),
                "q or CTRL+C to quit".to_string(),
            ],
            SessionState::Paused => vec![
                "Paused".to_string(),
                "Press Space or Esc to resume".to_string(),
            ],
            SessionState::GameOver => {
                let (title, score) = match self.last_game_over {
                    Some(summary) if summary.won => ("You won!", summary.score),
                    Some(summary) => ("Game over!", summary.score),
                    None => ("Game over!", frame.score),
                };
                vec![
                    title.to_string(),
                    format!("Score: {}", score),
                    String::new(),
                    "Space to play again, r to reset,".to_string(),
                    "or q to quit.".to_string(),
                ]
            }
        };
        Some(lines)
    }

    fn cell_pos(&self, (col, row): TermCoords) -> TermCoords {
        (self.origin.0 + 1 + col * CELL_WIDTH, self.origin.1 + 1 + row)
    }

    fn grid_pos(&self, geometry: &Geometry, cell: Coords) -> TermCoords {
        let (col, row) = geometry.to_grid(cell);
        let clamp = |v: GridInt| u16::try_from(v.max(0)).unwrap_or(u16::MAX).min(self.cells_per_side.saturating_sub(1));
        self.cell_pos((clamp(col), clamp(row)))
    }

    fn print_at(&mut self, pos: TermCoords, text: &str) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text))?;
        Ok(())
    }
}

impl GameSink for TermManager {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.draw(frame)
    }

    /// Only remembers the result; the game loop redraws with the overlay.
    fn game_over(&mut self, summary: &GameOverSummary) -> Result<()> {
        self.last_game_over = Some(*summary);
        Ok(())
    }
}
