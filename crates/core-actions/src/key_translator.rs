//! Keyboard shortcuts.
//!
//! Stateless mapping:
//! * `q`, Ctrl-C: quit
//! * `1`..`4`: toggle visibility of TopLeft, TopRight, BottomLeft, BottomRight
//! * `m`: maximize or restore the focused panel
//! * `r`: hard layout reset

use crate::Action;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_layout::PanelSlot;

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(d @ '1'..='4') => {
            let index = d as usize - '1' as usize;
            Some(Action::ToggleVisible(PanelSlot::ALL[index]))
        }
        KeyCode::Char('m') => Some(Action::ToggleMaximizeFocused),
        KeyCode::Char('r') => Some(Action::ResetLayout),
        _ => None,
    }
}
