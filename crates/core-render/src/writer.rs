//! Terminal writer.
//!
//! Commands are queued per frame and flushed once; ordering is preserved and
//! nothing is written mid-frame. Styled runs wrap their text in crossterm
//! attribute changes and always reset afterwards.

use crate::CellFlags;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Styled(String, CellFlags),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    /// Clear the current line; caller positions the cursor first.
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn print<S: Into<String>>(&mut self, s: S, flags: CellFlags) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if flags.is_empty() {
            self.cmds.push(Command::Print(s));
        } else {
            self.cmds.push(Command::Styled(s, flags));
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Number of print commands queued (plain + styled).
    pub fn print_commands(&self) -> u64 {
        self.cmds
            .iter()
            .filter(|c| matches!(c, Command::Print(_) | Command::Styled(..)))
            .count() as u64
    }

    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Styled(s, flags) => {
                    if flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if flags.contains(CellFlags::BOLD) {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    queue!(out, Print(s), SetAttribute(Attribute::Reset))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prints_are_dropped() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("", CellFlags::empty());
        w.print("hi", CellFlags::empty());
        w.print("x", CellFlags::REVERSE);
        assert_eq!(w.print_commands(), 2);
        assert_eq!(w.commands()[2], Command::Styled("x".into(), CellFlags::REVERSE));
    }

    #[test]
    fn styled_text_is_reset_after_print() {
        let mut w = Writer::new();
        w.print("max", CellFlags::REVERSE);
        let mut out = Vec::new();
        w.flush_to(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        let text_at = s.find("max").unwrap();
        assert!(s[..text_at].contains("\x1b[7m"), "{s:?}");
        assert!(s[text_at..].contains("\x1b[0m"), "{s:?}");
    }
}
