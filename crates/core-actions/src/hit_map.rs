//! Control placement and hit testing for the toolbar row and panel chrome.
//!
//! The renderer draws controls exactly where `HitMap` places them, and the
//! event loop resolves presses through the same map, so a click always
//! lands on what is on screen. Presses that miss every control fall through
//! to the drag controller.

use core_layout::{CellRect, EffectiveGeometry, PanelSlot, VisibilityState};
use unicode_width::UnicodeWidthStr;

use crate::Action;

pub const TOOLBAR_GAP: u16 = 2;
pub const RESET_LAYOUT_LABEL: &str = "[Reset Layout]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelTitles([String; 4]);

impl Default for PanelTitles {
    fn default() -> Self {
        Self([
            "Document Viewer".to_string(),
            "Keywords".to_string(),
            "Headlines".to_string(),
            "Article".to_string(),
        ])
    }
}

impl PanelTitles {
    pub fn new(titles: [String; 4]) -> Self {
        Self(titles)
    }

    pub fn get(&self, slot: PanelSlot) -> &str {
        &self.0[slot.index()]
    }

    pub fn set(&mut self, slot: PanelSlot, title: impl Into<String>) {
        self.0[slot.index()] = title.into();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromeButton {
    Maximize,
    ResetPair,
    Close,
}

impl ChromeButton {
    pub const ALL: [ChromeButton; 3] = [
        ChromeButton::Maximize,
        ChromeButton::ResetPair,
        ChromeButton::Close,
    ];
    pub const WIDTH: u16 = 3;
    /// Narrowest panel that still gets chrome (buttons plus both corners).
    pub const MIN_PANEL_WIDTH: u16 = Self::WIDTH * 3 + 2;

    pub fn label(self, maximized: bool) -> &'static str {
        match self {
            ChromeButton::Maximize if maximized => "[-]",
            ChromeButton::Maximize => "[+]",
            ChromeButton::ResetPair => "[r]",
            ChromeButton::Close => "[x]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Checkbox(PanelSlot),
    ResetLayout,
    Chrome { slot: PanelSlot, button: ChromeButton },
}

impl HitTarget {
    pub fn action(&self) -> Action {
        match *self {
            HitTarget::Checkbox(slot) => Action::ToggleVisible(slot),
            HitTarget::ResetLayout => Action::ResetLayout,
            HitTarget::Chrome {
                slot,
                button: ChromeButton::Maximize,
            } => Action::ToggleMaximize(slot),
            HitTarget::Chrome {
                slot,
                button: ChromeButton::ResetPair,
            } => Action::ResetPair(slot),
            HitTarget::Chrome {
                slot,
                button: ChromeButton::Close,
            } => Action::Hide(slot),
        }
    }
}

/// One placed control: a single-row span starting at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedControl {
    pub target: HitTarget,
    pub x: u16,
    pub y: u16,
    pub label: String,
}

impl PlacedControl {
    pub fn width(&self) -> u16 {
        u16::try_from(self.label.width()).unwrap_or(u16::MAX)
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        row == self.y && column >= self.x && column < self.x.saturating_add(self.width())
    }
}

/// Cell rectangles of every visible, non-empty panel in slot order.
pub fn panel_cells(geometry: &EffectiveGeometry, area: CellRect) -> Vec<(PanelSlot, CellRect)> {
    geometry
        .iter()
        .map(|(slot, rect)| (slot, area.project(&rect)))
        .filter(|(_, cells)| !cells.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    toolbar: Vec<PlacedControl>,
    chrome: Vec<PlacedControl>,
}

impl HitMap {
    /// Place toolbar controls on `toolbar_row` (clipped to `width`) and
    /// chrome buttons on the top border of each panel cell rectangle.
    pub fn build(
        width: u16,
        toolbar_row: u16,
        titles: &PanelTitles,
        visibility: &VisibilityState,
        maximized: Option<PanelSlot>,
        panels: &[(PanelSlot, CellRect)],
    ) -> Self {
        let mut toolbar = Vec::new();
        let mut x: u16 = 1;
        let checkboxes = PanelSlot::ALL.into_iter().map(|slot| {
            let mark = if visibility.is_visible(slot) { 'x' } else { ' ' };
            (
                HitTarget::Checkbox(slot),
                format!("[{mark}] {}", titles.get(slot)),
            )
        });
        let reset = std::iter::once((HitTarget::ResetLayout, RESET_LAYOUT_LABEL.to_string()));
        for (target, label) in checkboxes.chain(reset) {
            let control = PlacedControl {
                target,
                x,
                y: toolbar_row,
                label,
            };
            let end = u32::from(x) + u32::from(control.width());
            if end > u32::from(width) {
                break;
            }
            x = control.x.saturating_add(control.width()).saturating_add(TOOLBAR_GAP);
            toolbar.push(control);
        }

        let mut chrome = Vec::new();
        for &(slot, cells) in panels {
            if cells.width < ChromeButton::MIN_PANEL_WIDTH || cells.height == 0 {
                continue;
            }
            let start = cells.right() - 1 - ChromeButton::WIDTH * 3;
            for (i, button) in ChromeButton::ALL.into_iter().enumerate() {
                chrome.push(PlacedControl {
                    target: HitTarget::Chrome { slot, button },
                    x: start + ChromeButton::WIDTH * i as u16,
                    y: cells.y,
                    label: button.label(maximized == Some(slot)).to_string(),
                });
            }
        }
        Self { toolbar, chrome }
    }

    pub fn toolbar(&self) -> &[PlacedControl] {
        &self.toolbar
    }

    pub fn chrome(&self) -> &[PlacedControl] {
        &self.chrome
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.toolbar
            .iter()
            .chain(self.chrome.iter())
            .find(|c| c.contains(column, row))
            .map(|c| c.target)
    }
}
