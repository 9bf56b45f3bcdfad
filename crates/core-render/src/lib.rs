//! Frame composition and terminal emission for the quad layout.
//!
//! A frame is rebuilt from scratch whenever the layout changes:
//! * row 0: toolbar (visibility checkboxes + `[Reset Layout]`),
//! * the grid area: one bordered box per visible panel with its title and
//!   chrome buttons on the top border and content inside,
//! * last row: status line (drag state, hover hint, maximized slot, stored
//!   percentages, ephemeral message).
//!
//! Control placement comes from `core_actions::HitMap`, the same map that
//! resolves presses, so what is drawn is exactly what is clickable.
//!
//! Invariants:
//! * `Frame` cells hold one leader per visible column; wide characters mark
//!   the following cell as a continuation (`width == 0`) that never prints.
//! * Text is clipped to the target rectangle; nothing spills into a
//!   neighbouring panel.
//!
//! Components:
//! * `compose`: builds a `Frame` from the layout owner, hit map and contents.
//! * `panel`: `PanelContent` trait and the text panel.
//! * `status`: status line segments and formatting.
//! * `scheduler`: coalesces render requests into Full / StatusLine decisions.
//! * `render_engine`: emits frames (or just the status row) through `writer`.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001;
        const BOLD    = 0b0000_0010;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(ch: char, width: u8, flags: CellFlags) -> Self {
        Self {
            ch,
            width: width.max(1),
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            ch: ' ',
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::leader(' ', 1, CellFlags::empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set one character at (x, y). A wide character that would cross the
    /// right edge is replaced by a blank.
    pub fn set_char(&mut self, x: u16, y: u16, ch: char, flags: CellFlags) {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0).max(1) as u16;
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if x + w > self.width {
            self.cells[idx] = Cell::leader(' ', 1, flags);
            return;
        }
        self.cells[idx] = Cell::leader(ch, w as u8, flags);
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
    }

    /// Write `text` starting at (x, y), using at most `max_width` columns.
    /// Zero-width characters are dropped. Returns the columns consumed.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, max_width: u16, flags: CellFlags) -> u16 {
        let limit = max_width.min(self.width.saturating_sub(x));
        let mut used: u16 = 0;
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if used + w > limit {
                break;
            }
            self.set_char(x + used, y, ch, flags);
            used += w;
        }
        used
    }

    /// Apply additional flags over a span of cells.
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Maximal runs of leader cells sharing the same flags: (start_x, text, flags).
    pub fn row_runs(&self, y: u16) -> Vec<(u16, String, CellFlags)> {
        let mut runs: Vec<(u16, String, CellFlags)> = Vec::new();
        if y >= self.height {
            return runs;
        }
        let start = y as usize * self.width as usize;
        for x in 0..self.width {
            let cell = &self.cells[start + x as usize];
            if !cell.is_leader() {
                continue;
            }
            match runs.last_mut() {
                Some((_, text, flags)) if *flags == cell.flags => text.push(cell.ch),
                _ => runs.push((x, cell.ch.to_string(), cell.flags)),
            }
        }
        runs
    }

    /// Plain text of a row (leaders only). Testing and diagnostics.
    pub fn row_text(&self, y: u16) -> String {
        self.row_runs(y).into_iter().map(|(_, t, _)| t).collect()
    }
}

pub mod compose;
pub mod panel;
pub mod render_engine;
pub mod scheduler;
pub mod status;
pub mod timing;
pub mod writer;

pub use compose::{FrameInputs, build_frame};
pub use panel::{PanelContent, PanelContents, TextPanel};
pub use render_engine::RenderEngine;
pub use scheduler::{Decision, RenderDelta, RenderScheduler};
pub use status::{StatusContext, build_status_line};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_clips_and_reports_width() {
        let mut f = Frame::new(6, 1);
        let used = f.put_str(1, 0, "abcdefgh", 3, CellFlags::empty());
        assert_eq!(used, 3);
        assert_eq!(f.row_text(0), " abc  ");
    }

    #[test]
    fn wide_char_marks_continuation_and_never_splits() {
        let mut f = Frame::new(4, 1);
        let used = f.put_str(0, 0, "a界b", 4, CellFlags::empty());
        assert_eq!(used, 4);
        assert!(!f.cell(2, 0).unwrap().is_leader());
        assert_eq!(f.row_text(0), "a界b");

        let mut g = Frame::new(4, 1);
        assert_eq!(g.put_str(2, 0, "x界", 4, CellFlags::empty()), 1);
    }

    #[test]
    fn runs_split_on_flag_change() {
        let mut f = Frame::new(5, 1);
        f.put_str(0, 0, "abcde", 5, CellFlags::empty());
        f.apply_flags_span(1, 0, 2, CellFlags::REVERSE);
        let runs = f.row_runs(0);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1], (1, "bc".to_string(), CellFlags::REVERSE));
    }
}
