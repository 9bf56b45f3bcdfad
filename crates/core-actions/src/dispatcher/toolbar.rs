//! Global toolbar: visibility checkboxes and the hard reset button.

use core_layout::{LayoutState, PanelSlot};
use core_state::{LayoutChange, LayoutSnapshot, QuadLayout};
use tracing::info;

use super::ACTION_MESSAGE_TTL;

/// Checkbox write. Re-showing a panel while a maximize override is active
/// ends the override and restores canonical geometry.
pub(super) fn set_visible(layout: &mut QuadLayout, slot: PanelSlot, visible: bool) -> bool {
    if layout.visibility().is_visible(slot) == visible {
        return false;
    }
    let mut next = layout.snapshot();
    next.visibility.set(slot, visible);
    let ends_override = visible && next.maximized.is_some();
    if ends_override {
        next.maximized = None;
        next.layout = LayoutState::canonical();
    }
    let changed = layout.commit(next, LayoutChange::VisibilitySet { slot, visible });
    if changed {
        info!(
            target: "layout.visibility",
            slot = slot.as_str(),
            visible,
            ends_override,
            "checkbox_toggled"
        );
    }
    changed
}

/// Hard reset independent of the current state.
pub(super) fn reset_layout(layout: &mut QuadLayout) -> bool {
    let changed = layout.commit(LayoutSnapshot::canonical(), LayoutChange::HardReset);
    if changed {
        info!(target: "layout.visibility", "layout_reset");
        layout.set_ephemeral("Layout reset", ACTION_MESSAGE_TTL);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_layout::VisibilityState;
    use pretty_assertions::assert_eq;

    #[test]
    fn showing_a_panel_during_maximize_ends_override() {
        let mut q = QuadLayout::default();
        q.commit(
            LayoutSnapshot::maximized(PanelSlot::BottomLeft),
            LayoutChange::Maximized(PanelSlot::BottomLeft),
        );
        assert!(set_visible(&mut q, PanelSlot::TopRight, true));
        assert_eq!(q.maximized(), None);
        assert!(q.layout().is_canonical());
        assert_eq!(
            *q.visibility(),
            VisibilityState::from_flags(false, true, true, false)
        );
    }

    #[test]
    fn unchanged_checkbox_is_clean() {
        let mut q = QuadLayout::default();
        assert!(!set_visible(&mut q, PanelSlot::TopLeft, true));
        assert!(!reset_layout(&mut q));
    }

    #[test]
    fn hiding_via_checkbox_keeps_stored_geometry() {
        let mut q = QuadLayout::default();
        let mut next = q.snapshot();
        next.layout.set_row_split(core_layout::Row::Bottom, 30.0);
        q.commit(next, LayoutChange::HardReset);
        assert!(set_visible(&mut q, PanelSlot::BottomRight, false));
        assert_eq!(q.layout().bottom_left_width, 30.0);
        let g = q.geometry();
        assert_eq!(g.rect(PanelSlot::BottomLeft).map(|r| r.width), Some(100.0));
    }
}
