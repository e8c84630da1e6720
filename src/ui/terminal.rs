use std::io::{self, Write};

use crossterm::cursor::{MoveRight, MoveUp, RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Cursor movements used to rewrite output in place.
pub trait TerminalControl {
    fn move_cursor_up(&mut self, rows: u16) -> io::Result<()>;
    /// Clears from the cursor to the end of the line.
    fn clear_line(&mut self) -> io::Result<()>;
    fn save_cursor(&mut self) -> io::Result<()>;
    fn restore_cursor(&mut self) -> io::Result<()>;
    fn move_right(&mut self, cols: u16) -> io::Result<()>;
}

impl<W: Write> TerminalControl for W {
    fn move_cursor_up(&mut self, rows: u16) -> io::Result<()> {
        queue!(self, MoveUp(rows))
    }

    fn clear_line(&mut self) -> io::Result<()> {
        queue!(self, Clear(ClearType::UntilNewLine))
    }

    fn save_cursor(&mut self) -> io::Result<()> {
        queue!(self, SavePosition)
    }

    fn restore_cursor(&mut self) -> io::Result<()> {
        queue!(self, RestorePosition)
    }

    fn move_right(&mut self, cols: u16) -> io::Result<()> {
        queue!(self, MoveRight(cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn emits_ansi_sequences() {
        assert_eq!(emitted(|w| w.move_cursor_up(1)), "\x1b[1A");
        assert_eq!(emitted(|w| w.clear_line()), "\x1b[K");
        assert_eq!(emitted(|w| w.move_right(15)), "\x1b[15C");
        assert_eq!(emitted(|w| w.save_cursor()), "\x1b7");
        assert_eq!(emitted(|w| w.restore_cursor()), "\x1b8");
    }
}
