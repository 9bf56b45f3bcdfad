//! Dispatcher applying `Action` to the layout owner.
//!
//! Handlers are split by surface:
//! * `chrome`  - per-panel maximize/restore, reset pair, hide
//! * `toolbar` - visibility checkboxes and the hard reset button
//!
//! Every handler builds the next `LayoutSnapshot` and hands it to
//! `QuadLayout::commit`, which owns the all-visible auto-reset rule and
//! observer notification.

use std::time::Duration;

use crate::{Action, ActionObserver};
use core_state::QuadLayout;

mod chrome;
mod toolbar;

/// Status message lifetime for chrome and toolbar feedback.
pub const ACTION_MESSAGE_TTL: Duration = Duration::from_secs(2);

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
    fn from_changed(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action to the layout. Returns whether a render is needed
/// (`dirty`) or the program should exit (`quit`).
pub fn dispatch(
    action: Action,
    layout: &mut QuadLayout,
    observers: &[Box<dyn ActionObserver>],
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }

    let changed = match action {
        Action::ToggleMaximize(slot) => chrome::toggle_maximize(layout, slot),
        Action::ToggleMaximizeFocused => {
            // A focused panel that was hidden since the press is skipped.
            let focused = layout
                .focused()
                .filter(|slot| layout.visibility().is_visible(*slot));
            let target = layout
                .maximized()
                .or(focused)
                .or_else(|| layout.visibility().visible_slots().next());
            match target {
                Some(slot) => chrome::toggle_maximize(layout, slot),
                None => false,
            }
        }
        Action::ResetPair(slot) => chrome::reset_pair(layout, slot),
        Action::Hide(slot) => chrome::hide(layout, slot),
        Action::SetVisible(slot, visible) => toolbar::set_visible(layout, slot, visible),
        Action::ToggleVisible(slot) => {
            let visible = !layout.visibility().is_visible(slot);
            toolbar::set_visible(layout, slot, visible)
        }
        Action::ResetLayout => toolbar::reset_layout(layout),
        Action::Quit => return DispatchResult::quit(),
    };
    DispatchResult::from_changed(changed)
}
