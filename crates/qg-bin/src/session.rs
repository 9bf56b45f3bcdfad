//! Terminal-independent half of the runtime: owns the layout, translates
//! normalized input into layout calls and decides what needs repainting.

use core_actions::hit_map::panel_cells;
use core_actions::{Action, ActionObserver, HitMap, HitTarget, PanelTitles, dispatch, translate_key};
use core_config::{Config, ConfigContext, EffectiveThresholds};
use core_events::{
    InputEvent, KeyEvent, MouseButton, MouseEvent, MouseEventKind, POINTER_DOWNS, POINTER_MOVES,
};
use core_layout::{CellRect, CellScale};
use core_render::panel::PanelContents;
use core_render::scheduler::{Decision, RenderDelta, RenderScheduler};
use core_render::status::{StatusContext, build_status_line};
use core_render::{Frame, FrameInputs, build_frame};
use core_state::{
    DragThresholds, LayoutChange, LayoutObserver, LayoutSnapshot, PointerKind, PointerMoveOutcome,
    PointerPosition, QuadLayout,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

pub(crate) const TOOLBAR_ROWS: u16 = 1;
pub(crate) const STATUS_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Quit,
}

/// Raises a flag on every committed layout mutation; the session turns it
/// into a full repaint after the event is handled.
struct RepaintOnChange {
    dirty: Arc<AtomicBool>,
}

impl LayoutObserver for RepaintOnChange {
    fn on_layout_change(&self, change: &LayoutChange, _snapshot: &LayoutSnapshot) {
        trace!(target: "runtime", change = change.label(), "layout_changed");
        self.dirty.store(true, Ordering::Relaxed);
    }
}

struct ActionTrace;

impl ActionObserver for ActionTrace {
    fn on_action(&self, action: &Action) {
        debug!(target: "runtime", action = action.label(), "action");
    }
}

fn drag_thresholds(effective: EffectiveThresholds) -> DragThresholds {
    DragThresholds {
        mouse: effective.mouse,
        touch: effective.touch,
        hover: effective.hover,
    }
}

pub(crate) struct Session {
    layout: QuadLayout,
    config: Config,
    titles: PanelTitles,
    contents: PanelContents,
    scale: CellScale,
    viewport: (u16, u16),
    scheduler: RenderScheduler,
    observers: Vec<Box<dyn ActionObserver>>,
    layout_dirty: Arc<AtomicBool>,
}

impl Session {
    pub(crate) fn new(
        mut config: Config,
        titles: PanelTitles,
        contents: PanelContents,
        viewport: (u16, u16),
    ) -> Self {
        let scale = CellScale {
            cell_width: config.file.terminal.cell_width,
            cell_height: config.file.terminal.cell_height,
        };
        let effective = config.apply_context(context_for(viewport));
        let mut layout = QuadLayout::new(drag_thresholds(effective));
        let layout_dirty = Arc::new(AtomicBool::new(false));
        layout.subscribe(Box::new(RepaintOnChange {
            dirty: layout_dirty.clone(),
        }));
        let mut session = Self {
            layout,
            config,
            titles,
            contents,
            scale,
            viewport,
            scheduler: RenderScheduler::new(),
            observers: vec![Box::new(ActionTrace)],
            layout_dirty,
        };
        session.sync_container();
        session.scheduler.mark(RenderDelta::Full);
        session
    }

    #[cfg(test)]
    pub(crate) fn layout(&self) -> &QuadLayout {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut QuadLayout {
        &mut self.layout
    }

    pub(crate) fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub(crate) fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Cells between the toolbar and the status line.
    pub(crate) fn grid_area(&self) -> CellRect {
        let (cols, rows) = self.viewport;
        let height = rows.saturating_sub(TOOLBAR_ROWS + STATUS_ROWS);
        CellRect::new(0, TOOLBAR_ROWS, cols, height)
    }

    fn sync_container(&mut self) {
        let container = self.scale.container(&self.grid_area());
        self.layout.set_container(container);
    }

    pub(crate) fn hit_map(&self) -> HitMap {
        let panels = panel_cells(&self.layout.geometry(), self.grid_area());
        HitMap::build(
            self.viewport.0,
            0,
            &self.titles,
            self.layout.visibility(),
            self.layout.maximized(),
            &panels,
        )
    }

    pub(crate) fn status_line(&self) -> String {
        let ctx = StatusContext {
            drag: self.layout.drag_state(),
            hint: self.layout.hover_hint(),
            maximized: self.layout.maximized(),
            layout: self.layout.layout(),
            ephemeral: self
                .layout
                .ephemeral_status
                .as_ref()
                .map(|m| m.text.as_str()),
        };
        build_status_line(&ctx, self.viewport.0)
    }

    /// Compose the full frame and the status text it contains.
    pub(crate) fn compose(&self) -> (Frame, String) {
        let panels = panel_cells(&self.layout.geometry(), self.grid_area());
        let hit_map = self.hit_map();
        let status = self.status_line();
        let frame = build_frame(&FrameInputs {
            width: self.viewport.0,
            height: self.viewport.1,
            hit_map: &hit_map,
            panels: &panels,
            titles: &self.titles,
            contents: &self.contents,
            focused: self.layout.focused(),
            status: &status,
        });
        (frame, status)
    }

    pub(crate) fn take_decision(&mut self) -> Option<Decision> {
        if self.layout_dirty.swap(false, Ordering::Relaxed) {
            self.scheduler.mark(RenderDelta::Full);
        }
        self.scheduler.consume()
    }

    pub(crate) fn handle_input(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::CtrlC => LoopControl::Quit,
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                LoopControl::Continue
            }
            InputEvent::Resize(w, h) => {
                self.handle_resize(*w, *h);
                LoopControl::Continue
            }
            InputEvent::FocusLost => {
                // No release will arrive once the terminal loses focus.
                let ended = self.layout.pointer_up();
                let cleared = self.layout.pointer_leave();
                if ended || cleared {
                    self.scheduler.mark_status();
                }
                LoopControl::Continue
            }
            InputEvent::FocusGained => LoopControl::Continue,
        }
    }

    pub(crate) fn handle_tick(&mut self) {
        if self.layout.tick_ephemeral() {
            self.scheduler.mark_status();
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        match translate_key(key) {
            Some(action) => self.process_action(action),
            None => LoopControl::Continue,
        }
    }

    pub(crate) fn process_action(&mut self, action: Action) -> LoopControl {
        let result = dispatch(action, &mut self.layout, &self.observers);
        if result.quit {
            return LoopControl::Quit;
        }
        if result.dirty {
            // Ephemeral confirmation and chrome labels change with the layout.
            self.scheduler.mark(RenderDelta::Full);
        }
        LoopControl::Continue
    }

    fn pointer_at(&self, column: u16, row: u16) -> PointerPosition {
        let (x, y) = self.scale.point(column, row);
        PointerPosition::new(x, y)
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if mouse.kind.is_motion() {
            POINTER_MOVES.fetch_add(1, Ordering::Relaxed);
            let pos = self.pointer_at(mouse.column, mouse.row);
            match self.layout.pointer_move(pos) {
                PointerMoveOutcome::Resized => self.scheduler.mark(RenderDelta::Full),
                PointerMoveOutcome::HintChanged(_) => self.scheduler.mark_status(),
                PointerMoveOutcome::Unchanged => {}
            }
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                POINTER_DOWNS.fetch_add(1, Ordering::Relaxed);
                if let Some(target) = self.hit_map().hit(mouse.column, mouse.row) {
                    trace!(target: "runtime", ?target, "control_pressed");
                    if let HitTarget::Chrome { slot, .. } = target {
                        if self.layout.focused() != Some(slot) {
                            self.layout.focus(slot);
                            self.scheduler.mark(RenderDelta::Full);
                        }
                    }
                    self.process_action(target.action());
                    return;
                }
                let before = self.layout.focused();
                let pos = self.pointer_at(mouse.column, mouse.row);
                self.layout.pointer_down(pos, PointerKind::Mouse);
                if self.layout.focused() != before {
                    self.scheduler.mark(RenderDelta::Full);
                } else if self.layout.drag_state().is_armed() {
                    self.scheduler.mark_status();
                }
            }
            MouseEventKind::Up(_) => {
                if self.layout.pointer_up() {
                    self.scheduler.mark_status();
                }
            }
            MouseEventKind::Down(_)
            | MouseEventKind::Drag(_)
            | MouseEventKind::Moved
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.sync_container();
        if let Some(effective) = self.config.recompute_with_context(context_for(self.viewport)) {
            debug!(
                target: "runtime",
                mouse = effective.mouse,
                touch = effective.touch,
                hover = effective.hover,
                "drag_thresholds_recomputed"
            );
            self.layout.set_drag_thresholds(drag_thresholds(effective));
        }
        self.scheduler.invalidate();
    }
}

fn context_for(viewport: (u16, u16)) -> ConfigContext {
    ConfigContext::new(viewport.0, viewport.1, TOOLBAR_ROWS, STATUS_ROWS)
}
