//! Full-frame composition.

use crate::panel::PanelContents;
use crate::{CellFlags, Frame};
use core_actions::{HitMap, HitTarget, PanelTitles};
use core_layout::{CellRect, PanelSlot};

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

pub struct FrameInputs<'a> {
    pub width: u16,
    pub height: u16,
    pub hit_map: &'a HitMap,
    /// Visible panels projected onto the grid area, slot order.
    pub panels: &'a [(PanelSlot, CellRect)],
    pub titles: &'a PanelTitles,
    pub contents: &'a PanelContents,
    pub focused: Option<PanelSlot>,
    pub status: &'a str,
}

pub fn build_frame(inputs: &FrameInputs<'_>) -> Frame {
    let mut frame = Frame::new(inputs.width, inputs.height);
    if inputs.height == 0 || inputs.width == 0 {
        return frame;
    }

    for control in inputs.hit_map.toolbar() {
        let flags = match control.target {
            HitTarget::ResetLayout => CellFlags::BOLD,
            _ => CellFlags::empty(),
        };
        frame.put_str(control.x, control.y, &control.label, control.width(), flags);
    }

    for &(slot, cells) in inputs.panels {
        draw_panel(&mut frame, inputs, slot, cells);
    }

    // Chrome goes over the borders drawn above.
    for control in inputs.hit_map.chrome() {
        frame.put_str(
            control.x,
            control.y,
            &control.label,
            control.width(),
            CellFlags::REVERSE,
        );
    }

    let status_row = inputs.height - 1;
    frame.put_str(0, status_row, inputs.status, inputs.width, CellFlags::empty());
    frame
}

fn draw_panel(frame: &mut Frame, inputs: &FrameInputs<'_>, slot: PanelSlot, cells: CellRect) {
    if cells.width < 2 || cells.height < 2 {
        // Too small for a box; fill so the slot is still visible.
        for y in cells.y..cells.bottom() {
            for x in cells.x..cells.right() {
                frame.set_char(x, y, '▒', CellFlags::empty());
            }
        }
        return;
    }
    let (left, top) = (cells.x, cells.y);
    let right = cells.right() - 1;
    let bottom = cells.bottom() - 1;
    for x in left + 1..right {
        frame.set_char(x, top, HORIZONTAL, CellFlags::empty());
        frame.set_char(x, bottom, HORIZONTAL, CellFlags::empty());
    }
    for y in top + 1..bottom {
        frame.set_char(left, y, VERTICAL, CellFlags::empty());
        frame.set_char(right, y, VERTICAL, CellFlags::empty());
    }
    frame.set_char(left, top, TOP_LEFT, CellFlags::empty());
    frame.set_char(right, top, TOP_RIGHT, CellFlags::empty());
    frame.set_char(left, bottom, BOTTOM_LEFT, CellFlags::empty());
    frame.set_char(right, bottom, BOTTOM_RIGHT, CellFlags::empty());

    // Title between the corner and the chrome buttons.
    let chrome_start = inputs
        .hit_map
        .chrome()
        .iter()
        .filter(|c| matches!(c.target, HitTarget::Chrome { slot: s, .. } if s == slot))
        .map(|c| c.x)
        .min()
        .unwrap_or(right);
    let title_x = left + 1;
    let room = chrome_start.saturating_sub(title_x + 1);
    let title = format!(" {} ", inputs.titles.get(slot));
    let flags = if inputs.focused == Some(slot) {
        CellFlags::BOLD
    } else {
        CellFlags::empty()
    };
    frame.put_str(title_x, top, &title, room, flags);

    let inner = CellRect::new(left + 1, top + 1, cells.width - 2, cells.height - 2);
    for (i, line) in inputs.contents.get(slot).lines(inner).iter().enumerate() {
        frame.put_str(inner.x, inner.y + i as u16, line, inner.width, CellFlags::empty());
    }
}
