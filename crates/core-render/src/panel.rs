//! Panel content providers.
//!
//! Content is a pure function of the panel's inner cell rectangle: the
//! compositor asks for at most `area.height` lines, each already clipped to
//! `area.width` columns. Panels never see the layout state.

use anyhow::{Context, Result};
use core_layout::{CellRect, PanelSlot};
use std::path::Path;
use unicode_width::UnicodeWidthChar;

pub trait PanelContent: Send {
    fn lines(&self, area: CellRect) -> Vec<String>;
}

/// Static text, optionally loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPanel {
    body: Vec<String>,
}

impl TextPanel {
    pub fn new(text: &str) -> Self {
        Self {
            body: text.lines().map(|l| l.replace('\t', "    ")).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading panel source {}", path.display()))?;
        Ok(Self::new(&text))
    }

    /// Shown when no source is configured for a slot.
    pub fn placeholder(title: &str, slot: PanelSlot) -> Self {
        Self::new(&format!("{title}\n\n({slot}: no source configured)"))
    }

    pub fn line_count(&self) -> usize {
        self.body.len()
    }
}

impl PanelContent for TextPanel {
    fn lines(&self, area: CellRect) -> Vec<String> {
        self.body
            .iter()
            .take(area.height as usize)
            .map(|l| clip_to_width(l, area.width).to_string())
            .collect()
    }
}

/// Longest prefix of `s` that fits in `width` columns.
pub fn clip_to_width(s: &str, width: u16) -> &str {
    let mut used = 0usize;
    for (i, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width as usize {
            return &s[..i];
        }
        used += w;
    }
    s
}

/// One content provider per slot, indexed by `PanelSlot::index`.
pub struct PanelContents {
    slots: [Box<dyn PanelContent>; 4],
}

impl PanelContents {
    pub fn new(slots: [Box<dyn PanelContent>; 4]) -> Self {
        Self { slots }
    }

    pub fn get(&self, slot: PanelSlot) -> &dyn PanelContent {
        self.slots[slot.index()].as_ref()
    }
}
