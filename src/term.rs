use crate::error::{Error, Result};
use crate::grid::Cell;
use crate::{Coords, TermInt};
use std::io::{stdout, Stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

const WALL_CHAR: char = '#';
const FOOD_CHAR: char = '*';
const SNAKE_CHAR: char = 'S';

const PLAYER_COLUMN: TermInt = 22;
const COORDS_COLUMN: TermInt = 50;

/// Draws cells and the status line. Positions are (row, col) on the playfield;
/// the status line sits on `status_row`, right below it.
pub struct TermManager<W: Write> {
    out: W,
    status_row: TermInt,
}

impl TermManager<Stdout> {
    pub fn stdout(status_row: TermInt) -> Self {
        TermManager::new(stdout(), status_row)
    }
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W, status_row: TermInt) -> Self {
        TermManager { out, status_row }
    }

    pub fn clear(&mut self) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn print_cell(&mut self, pos: Coords, cell: Cell) -> Result<()> {
        queue!(self.out, cursor::MoveTo(pos.1, pos.0))?;

        match cell {
            Cell::Empty => queue!(self.out, Print(' '))?,
            Cell::Wall => queue!(self.out, Print(WALL_CHAR))?,
            Cell::Food => self.print_colored(FOOD_CHAR, Color::Green)?,
            Cell::Snake => self.print_colored(SNAKE_CHAR, Color::Red)?,
        }

        Ok(())
    }

    pub fn print_score(&mut self, length: usize, score: u32) -> Result<()> {
        let line = format!(" L: {}  Score: {}", length, score);
        let row = self.status_row;
        queue!(self.out, cursor::MoveTo(0, row), Print(line))?;
        Ok(())
    }

    pub fn print_player(&mut self, name: &str) -> Result<()> {
        let line = format!(" Player: {}", name);
        let row = self.status_row;
        queue!(self.out, cursor::MoveTo(PLAYER_COLUMN, row), Print(line))?;
        Ok(())
    }

    pub fn print_coords(&mut self, pos: Coords) -> Result<()> {
        // Padded so a shorter number wipes out the previous one
        let line = format!(" Coord: {:>3} , {:>3} ", pos.0, pos.1);
        let row = self.status_row;
        queue!(self.out, cursor::MoveTo(COORDS_COLUMN, row), Print(line))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_colored(&mut self, ch: char, color: Color) -> Result<()> {
        queue!(self.out, SetForegroundColor(color), Print(ch), ResetColor)?;
        Ok(())
    }
}

type RawModeSwitch = fn() -> crossterm::Result<()>;

/// Holds the terminal in raw mode on the alternate screen with a hidden cursor.
/// Everything is put back when the guard is dropped, whichever way the game ends.
pub struct TerminalGuard<W: Write> {
    out: W,
    disable_raw_mode: RawModeSwitch,
}

impl TerminalGuard<Stdout> {
    pub fn acquire() -> Result<Self> {
        TerminalGuard::acquire_with(stdout(), terminal::enable_raw_mode, terminal::disable_raw_mode)
    }
}

impl<W: Write> TerminalGuard<W> {
    pub fn acquire_with(
        out: W,
        enable_raw_mode: RawModeSwitch,
        disable_raw_mode: RawModeSwitch,
    ) -> Result<Self> {
        enable_raw_mode().map_err(Error::RawMode)?;

        // From here on the guard owns raw mode, so an early return still restores it
        let mut guard = TerminalGuard { out, disable_raw_mode };
        execute!(guard.out, EnterAlternateScreen, cursor::Hide)?;

        log::debug!("terminal set up");
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show, LeaveAlternateScreen) {
            log::warn!("error leaving alternate screen: {}", e);
        }

        if let Err(e) = (self.disable_raw_mode)() {
            log::warn!("error disabling raw mode: {}", e);
        }

        log::debug!("terminal restored");
    }
}
