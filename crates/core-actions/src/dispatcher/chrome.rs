//! Per-panel chrome: maximize/restore toggle, reset pair, hide.

use core_layout::PanelSlot;
use core_state::{LayoutChange, LayoutSnapshot, QuadLayout};
use tracing::info;

use super::ACTION_MESSAGE_TTL;

/// Maximize `slot`, or restore canonical defaults when it already is the
/// maximized panel. Restore never returns to the pre-maximize geometry.
pub(super) fn toggle_maximize(layout: &mut QuadLayout, slot: PanelSlot) -> bool {
    let restoring = layout.maximized() == Some(slot);
    let changed = if restoring {
        layout.commit(LayoutSnapshot::canonical(), LayoutChange::Restored)
    } else {
        layout.commit(LayoutSnapshot::maximized(slot), LayoutChange::Maximized(slot))
    };
    if changed {
        info!(
            target: "layout.chrome",
            slot = slot.as_str(),
            restored = restoring,
            "maximize_toggled"
        );
        let msg = if restoring {
            "Restored default layout".to_string()
        } else {
            format!("Maximized {slot}")
        };
        layout.set_ephemeral(msg, ACTION_MESSAGE_TTL);
    }
    changed
}

/// Reset the heights of the slot's column to 50/50 and make the slot
/// visible. Widths and the other column are untouched; a maximize override
/// is dropped.
pub(super) fn reset_pair(layout: &mut QuadLayout, slot: PanelSlot) -> bool {
    let mut next = layout.snapshot();
    next.layout.reset_column(slot.column());
    next.visibility.set(slot, true);
    next.maximized = None;
    let changed = layout.commit(next, LayoutChange::PairReset(slot));
    if changed {
        info!(
            target: "layout.chrome",
            slot = slot.as_str(),
            column = slot.column().as_str(),
            "pair_reset"
        );
        layout.set_ephemeral(
            format!("Reset {} column", slot.column().as_str()),
            ACTION_MESSAGE_TTL,
        );
    }
    changed
}

/// Hide `slot`. The maximize override (if any) is left as is.
pub(super) fn hide(layout: &mut QuadLayout, slot: PanelSlot) -> bool {
    let mut next = layout.snapshot();
    next.visibility.set(slot, false);
    let changed = layout.commit(next, LayoutChange::Hidden(slot));
    if changed {
        info!(target: "layout.chrome", slot = slot.as_str(), "panel_hidden");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_layout::{ContainerRect, VisibilityState};
    use core_state::{PointerKind, PointerPosition};
    use pretty_assertions::assert_eq;

    fn owner() -> QuadLayout {
        let mut q = QuadLayout::default();
        q.set_container(ContainerRect::new(0.0, 0.0, 1000.0, 800.0));
        q
    }

    #[test]
    fn reset_pair_only_touches_own_column() {
        let mut q = owner();
        // Drag the left column divider down and the right one up.
        q.pointer_down(PointerPosition::new(100.0, 395.0), PointerKind::Mouse);
        q.pointer_move(PointerPosition::new(100.0, 640.0));
        q.pointer_up();
        q.pointer_down(PointerPosition::new(900.0, 395.0), PointerKind::Mouse);
        q.pointer_move(PointerPosition::new(900.0, 160.0));
        q.pointer_up();
        hide(&mut q, PanelSlot::BottomLeft);
        // Keep one panel hidden so the reset does not complete all-visible.
        hide(&mut q, PanelSlot::TopRight);

        assert!(reset_pair(&mut q, PanelSlot::BottomLeft));
        let l = q.layout();
        assert_eq!((l.top_left_height, l.bottom_left_height), (50.0, 50.0));
        assert_eq!((l.top_right_height, l.bottom_right_height), (20.0, 80.0));
        assert!(q.visibility().is_visible(PanelSlot::BottomLeft));
    }

    #[test]
    fn reset_pair_is_noop_when_already_even() {
        let mut q = owner();
        assert!(!reset_pair(&mut q, PanelSlot::TopRight));
    }

    #[test]
    fn hide_keeps_maximize_override() {
        let mut q = owner();
        toggle_maximize(&mut q, PanelSlot::TopLeft);
        assert!(!hide(&mut q, PanelSlot::BottomRight));
        assert_eq!(q.maximized(), Some(PanelSlot::TopLeft));
        assert!(hide(&mut q, PanelSlot::TopLeft));
        assert_eq!(q.maximized(), Some(PanelSlot::TopLeft));
        assert_eq!(*q.visibility(), VisibilityState::none());
    }

    #[test]
    fn reset_pair_clears_maximize() {
        let mut q = owner();
        toggle_maximize(&mut q, PanelSlot::TopRight);
        assert!(reset_pair(&mut q, PanelSlot::BottomRight));
        assert_eq!(q.maximized(), None);
        assert_eq!(
            *q.visibility(),
            VisibilityState::from_flags(false, true, false, true)
        );
        assert_eq!(q.layout().top_right_height, 50.0);
        assert_eq!(q.layout().bottom_right_height, 50.0);
    }
}
