//! Layout actions: panel chrome, toolbar and keyboard shortcuts.
//!
//! Every user-facing control resolves to an `Action`; `dispatcher::dispatch`
//! applies it to the `QuadLayout` owner. Pointer presses on controls are
//! resolved through `hit_map::HitMap`, keys through `key_translator`.

pub mod dispatcher;
pub mod hit_map;
pub mod key_translator;

use core_layout::PanelSlot;

pub use dispatcher::{DispatchResult, dispatch};
pub use hit_map::{ChromeButton, HitMap, HitTarget, PanelTitles};
pub use key_translator::translate_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Maximize `slot`, or restore defaults when it is already maximized.
    ToggleMaximize(PanelSlot),
    /// Toggle maximize on the focused panel (falls back to the first visible one).
    ToggleMaximizeFocused,
    /// Reset the slot's column heights to 50/50 and show the slot.
    ResetPair(PanelSlot),
    Hide(PanelSlot),
    /// Toolbar checkbox state.
    SetVisible(PanelSlot, bool),
    ToggleVisible(PanelSlot),
    /// Hard reset: all visible, canonical geometry, no maximize.
    ResetLayout,
    Quit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ToggleMaximize(_) => "toggle_maximize",
            Action::ToggleMaximizeFocused => "toggle_maximize_focused",
            Action::ResetPair(_) => "reset_pair",
            Action::Hide(_) => "hide",
            Action::SetVisible(..) => "set_visible",
            Action::ToggleVisible(_) => "toggle_visible",
            Action::ResetLayout => "reset_layout",
            Action::Quit => "quit",
        }
    }
}

/// Observer invoked before each action is applied.
pub trait ActionObserver: Send + Sync {
    fn on_action(&self, action: &Action);
}
