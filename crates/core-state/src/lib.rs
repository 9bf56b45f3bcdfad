//! Layout owner: the single authority over the quad grid's mutable state.
//!
//! `QuadLayout` holds the `LayoutState`, `VisibilityState`, the optional
//! maximized slot and the drag controller. Everything else (renderer, chrome
//! handlers, status line) reads derived geometry from here and mutates only
//! through the methods below, so no panel ever keeps its own copy.
//!
//! Change notification is push based: observers registered with `subscribe`
//! receive a `LayoutChange` plus a `LayoutSnapshot` after every committed
//! mutation (drag frame, chrome action, visibility change, reset).
//!
//! Auto-reset rule: any commit that moves visibility *into* the all-visible
//! state replaces the stored geometry with canonical defaults and clears the
//! maximize override. Degenerate values left behind by a chain of hides are
//! never shown again once every panel is back.
//!
//! Ephemeral status messages (`set_ephemeral` / `tick_ephemeral`) live here
//! too but are rendered by `core-render::status`.

pub mod drag;

use std::time::{Duration, Instant};

use core_layout::{
    ContainerRect, EffectiveGeometry, LayoutState, PanelSlot, VisibilityState, became_all_visible,
    effective_geometry,
};
use tracing::{debug, info};

pub use drag::{
    DEFAULT_DRAG_THRESHOLD, DragController, DragState, DragThresholds, PointerKind,
    PointerPosition, ResizeHint,
};

/// Copyable view of the authoritative records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub layout: LayoutState,
    pub visibility: VisibilityState,
    pub maximized: Option<PanelSlot>,
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self::canonical()
    }
}

impl LayoutSnapshot {
    /// All visible, even splits, nothing maximized.
    pub const fn canonical() -> Self {
        Self {
            layout: LayoutState::canonical(),
            visibility: VisibilityState::all(),
            maximized: None,
        }
    }

    /// Maximize override for `slot`.
    pub fn maximized(slot: PanelSlot) -> Self {
        Self {
            layout: LayoutState::maximized(slot),
            visibility: VisibilityState::only(slot),
            maximized: Some(slot),
        }
    }
}

/// What a committed mutation was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutChange {
    /// One drag move frame wrote new percentages.
    Dragged(DragState),
    Maximized(PanelSlot),
    Restored,
    PairReset(PanelSlot),
    Hidden(PanelSlot),
    VisibilitySet { slot: PanelSlot, visible: bool },
    /// Visibility moved into all-visible and geometry snapped to defaults.
    AutoReset,
    HardReset,
}

impl LayoutChange {
    pub fn label(&self) -> &'static str {
        match self {
            LayoutChange::Dragged(_) => "dragged",
            LayoutChange::Maximized(_) => "maximized",
            LayoutChange::Restored => "restored",
            LayoutChange::PairReset(_) => "pair_reset",
            LayoutChange::Hidden(_) => "hidden",
            LayoutChange::VisibilitySet { .. } => "visibility_set",
            LayoutChange::AutoReset => "auto_reset",
            LayoutChange::HardReset => "hard_reset",
        }
    }
}

/// Subscriber notified after each committed layout mutation.
pub trait LayoutObserver: Send + Sync {
    fn on_layout_change(&self, change: &LayoutChange, snapshot: &LayoutSnapshot);
}

/// Result of feeding one pointer-move into the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMoveOutcome {
    /// An armed drag wrote new percentages.
    Resized,
    /// Idle pointer changed the resize hint.
    HintChanged(ResizeHint),
    Unchanged,
}

impl PointerMoveOutcome {
    pub fn needs_render(&self) -> bool {
        !matches!(self, PointerMoveOutcome::Unchanged)
    }
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

pub struct QuadLayout {
    layout: LayoutState,
    visibility: VisibilityState,
    maximized: Option<PanelSlot>,
    container: ContainerRect,
    drag: DragController,
    /// Host-wide text selection suppression while a drag is armed.
    selection_suppressed: bool,
    hover: ResizeHint,
    /// Last panel that received a pointer-down.
    focused: Option<PanelSlot>,
    pub ephemeral_status: Option<EphemeralMessage>,
    observers: Vec<Box<dyn LayoutObserver>>,
}

impl std::fmt::Debug for QuadLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadLayout")
            .field("layout", &self.layout)
            .field("visibility", &self.visibility)
            .field("maximized", &self.maximized)
            .field("container", &self.container)
            .field("drag", &self.drag.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for QuadLayout {
    fn default() -> Self {
        Self::new(DragThresholds::default())
    }
}

impl QuadLayout {
    pub fn new(thresholds: DragThresholds) -> Self {
        Self {
            layout: LayoutState::canonical(),
            visibility: VisibilityState::all(),
            maximized: None,
            container: ContainerRect::new(0.0, 0.0, 0.0, 0.0),
            drag: DragController::new(thresholds),
            selection_suppressed: false,
            hover: ResizeHint::Default,
            focused: None,
            ephemeral_status: None,
            observers: Vec::new(),
        }
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn maximized(&self) -> Option<PanelSlot> {
        self.maximized
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            layout: self.layout,
            visibility: self.visibility,
            maximized: self.maximized,
        }
    }

    pub fn geometry(&self) -> EffectiveGeometry {
        effective_geometry(&self.layout, &self.visibility)
    }

    pub fn container(&self) -> ContainerRect {
        self.container
    }

    /// Update the container bounding box (host resize). A degenerate box
    /// turns every pointer interaction into a no-op.
    pub fn set_container(&mut self, container: ContainerRect) {
        self.container = container;
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn drag_thresholds(&self) -> DragThresholds {
        self.drag.thresholds()
    }

    pub fn set_drag_thresholds(&mut self, thresholds: DragThresholds) {
        self.drag.set_thresholds(thresholds);
    }

    pub fn selection_suppressed(&self) -> bool {
        self.selection_suppressed
    }

    pub fn hover_hint(&self) -> ResizeHint {
        self.hover
    }

    pub fn focused(&self) -> Option<PanelSlot> {
        self.focused
    }

    /// Focus a panel without a pointer-down (chrome presses).
    pub fn focus(&mut self, slot: PanelSlot) {
        self.focused = Some(slot);
    }

    pub fn subscribe(&mut self, observer: Box<dyn LayoutObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self, change: LayoutChange) {
        let snapshot = self.snapshot();
        for obs in &self.observers {
            obs.on_layout_change(&change, &snapshot);
        }
    }

    // ---------------- Pointer path ----------------

    /// Pointer-down / touch-start. Returns the panel under the pointer.
    pub fn pointer_down(&mut self, pos: PointerPosition, kind: PointerKind) -> Option<PanelSlot> {
        let geometry = self.geometry();
        let hit = self
            .drag
            .arm(pos, kind, &self.container, &geometry, &self.layout);
        if hit.is_some() {
            self.focused = hit;
        }
        if self.drag.state().is_armed() {
            self.selection_suppressed = true;
            self.hover = ResizeHint::Default;
        }
        hit
    }

    /// Global pointer-move / touch-move. While armed this writes layout
    /// percentages; while idle it only refreshes the hover hint.
    pub fn pointer_move(&mut self, pos: PointerPosition) -> PointerMoveOutcome {
        if self.drag.state().is_armed() {
            if self.drag.track(pos, &self.container, &mut self.layout) {
                self.notify(LayoutChange::Dragged(self.drag.state()));
                return PointerMoveOutcome::Resized;
            }
            return PointerMoveOutcome::Unchanged;
        }
        let hint = self.drag.hover_hint(pos, &self.container, &self.geometry());
        if hint != self.hover {
            self.hover = hint;
            return PointerMoveOutcome::HintChanged(hint);
        }
        PointerMoveOutcome::Unchanged
    }

    /// Global pointer-up / touch-end, wherever it lands. Returns true when a
    /// drag ended.
    pub fn pointer_up(&mut self) -> bool {
        self.selection_suppressed = false;
        self.drag.release().is_some()
    }

    /// Pointer left the host surface. Resets the hover hint; an armed drag
    /// keeps running until the matching up event.
    pub fn pointer_leave(&mut self) -> bool {
        let changed = self.hover != ResizeHint::Default;
        self.hover = ResizeHint::Default;
        changed
    }

    // ---------------- Commit path ----------------

    /// Replace the authoritative records in one step. Applies the
    /// all-visible auto-reset and notifies observers when anything changed.
    pub fn commit(&mut self, next: LayoutSnapshot, change: LayoutChange) -> bool {
        let previous = self.snapshot();
        let mut next = next;
        let mut change = change;
        if became_all_visible(&previous.visibility, &next.visibility)
            && (!next.layout.is_canonical() || next.maximized.is_some())
        {
            info!(
                target: "layout.visibility",
                trigger = change.label(),
                "all_visible_auto_reset"
            );
            next.layout = LayoutState::canonical();
            next.maximized = None;
            change = LayoutChange::AutoReset;
        }
        if next == previous {
            return false;
        }
        self.layout = next.layout;
        self.visibility = next.visibility;
        self.maximized = next.maximized;
        debug!(
            target: "layout.visibility",
            change = change.label(),
            visible = self.visibility.visible_count(),
            maximized = self.maximized.map(PanelSlot::as_str),
            "layout_committed"
        );
        self.notify(change);
        true
    }

    // ---------------- Ephemeral status ----------------

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_layout::Row;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn owner() -> QuadLayout {
        let mut q = QuadLayout::default();
        q.set_container(ContainerRect::new(0.0, 0.0, 1000.0, 800.0));
        q
    }

    struct Recorder(Arc<Mutex<Vec<&'static str>>>);
    impl LayoutObserver for Recorder {
        fn on_layout_change(&self, change: &LayoutChange, _snapshot: &LayoutSnapshot) {
            self.0.lock().unwrap().push(change.label());
        }
    }

    #[test]
    fn defaults_are_canonical() {
        let q = QuadLayout::default();
        assert_eq!(q.snapshot(), LayoutSnapshot::canonical());
        assert_eq!(q.drag_state(), DragState::Idle);
        assert!(!q.selection_suppressed());
        assert_eq!(q.geometry().iter().count(), 4);
    }

    #[test]
    fn arming_sets_and_release_clears_selection_suppression() {
        let mut q = owner();
        q.pointer_down(PointerPosition::new(495.0, 100.0), PointerKind::Mouse);
        assert!(q.selection_suppressed());
        assert_eq!(q.focused(), Some(PanelSlot::TopLeft));
        assert!(q.pointer_up());
        assert!(!q.selection_suppressed());
        assert!(!q.pointer_up());
    }

    #[test]
    fn drag_frames_notify_observers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut q = owner();
        q.subscribe(Box::new(Recorder(log.clone())));
        q.pointer_down(PointerPosition::new(495.0, 100.0), PointerKind::Mouse);
        assert_eq!(
            q.pointer_move(PointerPosition::new(600.0, 100.0)),
            PointerMoveOutcome::Resized
        );
        // Same x again writes nothing new.
        assert_eq!(
            q.pointer_move(PointerPosition::new(600.0, 300.0)),
            PointerMoveOutcome::Unchanged
        );
        assert_eq!(q.layout().row_split(Row::Top), 60.0);
        assert_eq!(*log.lock().unwrap(), vec!["dragged"]);
    }

    #[test]
    fn idle_move_updates_hover_hint_and_leave_resets_it() {
        let mut q = owner();
        assert_eq!(
            q.pointer_move(PointerPosition::new(505.0, 100.0)),
            PointerMoveOutcome::HintChanged(ResizeHint::Horizontal)
        );
        assert_eq!(
            q.pointer_move(PointerPosition::new(506.0, 120.0)),
            PointerMoveOutcome::Unchanged
        );
        assert!(q.pointer_leave());
        assert_eq!(q.hover_hint(), ResizeHint::Default);
        assert!(q.layout().is_canonical());
    }

    #[test]
    fn commit_into_all_visible_snaps_to_defaults() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut q = owner();
        q.subscribe(Box::new(Recorder(log.clone())));
        let mut hidden = q.snapshot();
        hidden.visibility.set(PanelSlot::TopRight, false);
        hidden.layout.set_row_split(Row::Top, 3.0);
        hidden.layout.set_height(PanelSlot::BottomLeft, 97.0);
        assert!(q.commit(hidden, LayoutChange::Hidden(PanelSlot::TopRight)));

        let mut shown = q.snapshot();
        shown.visibility.set(PanelSlot::TopRight, true);
        assert!(q.commit(
            shown,
            LayoutChange::VisibilitySet {
                slot: PanelSlot::TopRight,
                visible: true
            }
        ));
        assert_eq!(q.snapshot(), LayoutSnapshot::canonical());
        assert_eq!(*log.lock().unwrap(), vec!["hidden", "auto_reset"]);
    }

    #[test]
    fn commit_without_change_is_silent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut q = owner();
        q.subscribe(Box::new(Recorder(log.clone())));
        assert!(!q.commit(LayoutSnapshot::canonical(), LayoutChange::HardReset));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn ephemeral_expires_after_ttl() {
        let mut q = owner();
        q.set_ephemeral("hello", Duration::from_millis(0));
        assert!(q.tick_ephemeral());
        assert!(q.ephemeral_status.is_none());
        q.set_ephemeral("later", Duration::from_secs(60));
        assert!(!q.tick_ephemeral());
    }
}
