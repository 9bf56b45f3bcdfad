//! Drag controller: resize gestures across both grid axes.
//!
//! ```text
//! Idle --down near width edge-------> Horizontal{row}
//! Idle --down near height edge------> Vertical{column}
//! Idle --down near both (corner)----> Both{row, column}
//! Armed --move--> Armed (writes LayoutState every frame)
//! Armed --up / touch end--> Idle
//! ```
//!
//! The controller never owns layout state. It reads the effective geometry to
//! decide whether a pointer-down lands within `threshold` of a resize-relevant
//! edge, then writes percentages into a borrowed `LayoutState` on each move.
//! No throttling: every move event is applied, and a panel may be dragged to
//! 0% without ending the gesture.

use core_layout::{
    Bounds, Column, ContainerRect, EffectiveGeometry, LayoutState, PanelSlot, Row, resize_edges,
};
use tracing::{debug, trace, warn};

pub const DEFAULT_DRAG_THRESHOLD: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Edge proximity thresholds in host units.
///
/// Touch has one threshold shared by every panel edge. It defaults to the
/// mouse value and is widened through `[drag] touch_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragThresholds {
    pub mouse: f64,
    pub touch: f64,
    /// Used for the idle hover hint only.
    pub hover: f64,
}

impl Default for DragThresholds {
    fn default() -> Self {
        Self {
            mouse: DEFAULT_DRAG_THRESHOLD,
            touch: DEFAULT_DRAG_THRESHOLD,
            hover: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl DragThresholds {
    fn for_kind(&self, kind: PointerKind) -> f64 {
        match kind {
            PointerKind::Mouse => self.mouse,
            PointerKind::Touch => self.touch,
        }
    }
}

/// Active gesture. `column_total` is the column's summed stored height at
/// pointer-down; a vertical drag preserves it for the whole gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Horizontal {
        row: Row,
    },
    Vertical {
        column: Column,
        column_total: f64,
    },
    Both {
        row: Row,
        column: Column,
        column_total: f64,
    },
}

impl DragState {
    pub fn is_armed(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn row(&self) -> Option<Row> {
        match self {
            DragState::Horizontal { row } | DragState::Both { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub fn column(&self) -> Option<(Column, f64)> {
        match self {
            DragState::Vertical {
                column,
                column_total,
            }
            | DragState::Both {
                column,
                column_total,
                ..
            } => Some((*column, *column_total)),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Horizontal { .. } => "horizontal",
            DragState::Vertical { .. } => "vertical",
            DragState::Both { .. } => "both",
        }
    }
}

/// Cursor hint while idle (`ew-resize` / `ns-resize` in browser terms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeHint {
    #[default]
    Default,
    Horizontal,
    Vertical,
}

impl ResizeHint {
    pub fn label(&self) -> &'static str {
        match self {
            ResizeHint::Default => "default",
            ResizeHint::Horizontal => "ew-resize",
            ResizeHint::Vertical => "ns-resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeProximity {
    width_edge: bool,
    height_edge: bool,
}

fn proximity(slot: PanelSlot, bounds: &Bounds, pos: PointerPosition, threshold: f64) -> EdgeProximity {
    let edges = resize_edges(slot);
    EdgeProximity {
        width_edge: (pos.x - bounds.vertical_edge(edges.width_edge)).abs() < threshold,
        height_edge: (pos.y - bounds.horizontal_edge(edges.height_edge)).abs() < threshold,
    }
}

/// First visible panel (slot order) whose closed bounds contain the pointer.
fn hit_panel(
    pos: PointerPosition,
    container: &ContainerRect,
    geometry: &EffectiveGeometry,
) -> Option<(PanelSlot, Bounds)> {
    geometry
        .iter()
        .map(|(slot, rect)| (slot, container.bounds_of(&rect)))
        .find(|(_, bounds)| bounds.contains(pos.x, pos.y))
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    thresholds: DragThresholds,
    moves: u64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragThresholds::default())
    }
}

impl DragController {
    pub fn new(thresholds: DragThresholds) -> Self {
        Self {
            state: DragState::Idle,
            thresholds,
            moves: 0,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn thresholds(&self) -> DragThresholds {
        self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: DragThresholds) {
        self.thresholds = thresholds;
    }

    /// Move frames applied during the current (or last) gesture.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Pointer-down / touch-start. Returns the panel under the pointer (if
    /// any) so the owner can track focus. A down that arms nothing leaves an
    /// existing session untouched; one that arms replaces it.
    pub fn arm(
        &mut self,
        pos: PointerPosition,
        kind: PointerKind,
        container: &ContainerRect,
        geometry: &EffectiveGeometry,
        layout: &LayoutState,
    ) -> Option<PanelSlot> {
        if container.is_degenerate() {
            trace!(target: "layout.drag", "arm_skipped_degenerate_container");
            return None;
        }
        let (slot, bounds) = hit_panel(pos, container, geometry)?;
        let near = proximity(slot, &bounds, pos, self.thresholds.for_kind(kind));
        let row = slot.row();
        let column = slot.column();
        let column_total = layout.column_total(column);
        let next = match (near.width_edge, near.height_edge) {
            (true, true) => DragState::Both {
                row,
                column,
                column_total,
            },
            (true, false) => DragState::Horizontal { row },
            (false, true) => DragState::Vertical {
                column,
                column_total,
            },
            (false, false) => return Some(slot),
        };
        if self.state.is_armed() {
            warn!(
                target: "layout.drag",
                previous = self.state.label(),
                next = next.label(),
                "drag_session_replaced"
            );
        }
        debug!(
            target: "layout.drag",
            slot = slot.as_str(),
            state = next.label(),
            pointer = ?kind,
            x = pos.x,
            y = pos.y,
            "drag_armed"
        );
        self.state = next;
        self.moves = 0;
        Some(slot)
    }

    /// Pointer-move while armed. Returns true when `layout` changed. A
    /// degenerate container (no usable bounding box) skips the frame.
    pub fn track(
        &mut self,
        pos: PointerPosition,
        container: &ContainerRect,
        layout: &mut LayoutState,
    ) -> bool {
        if !self.state.is_armed() {
            return false;
        }
        if container.is_degenerate() {
            trace!(target: "layout.drag", "move_skipped_degenerate_container");
            return false;
        }
        let before = *layout;
        if let Some(row) = self.state.row() {
            layout.set_row_split(row, container.x_percent(pos.x));
        }
        if let Some((column, column_total)) = self.state.column() {
            let top = container.y_percent(pos.y);
            layout.set_height(PanelSlot::at(Row::Top, column), top);
            layout.set_height(
                PanelSlot::at(Row::Bottom, column),
                (column_total - top).max(0.0),
            );
        }
        self.moves = self.moves.saturating_add(1);
        let changed = *layout != before;
        trace!(
            target: "layout.drag",
            state = self.state.label(),
            x = pos.x,
            y = pos.y,
            changed,
            "drag_move"
        );
        changed
    }

    /// Pointer-up / touch-end from anywhere. Returns the state that ended.
    pub fn release(&mut self) -> Option<DragState> {
        let previous = std::mem::replace(&mut self.state, DragState::Idle);
        if previous.is_armed() {
            debug!(
                target: "layout.drag",
                state = previous.label(),
                moves = self.moves,
                "drag_released"
            );
            Some(previous)
        } else {
            None
        }
    }

    /// Hint for an idle pointer hovering a panel. Width-edge proximity wins.
    pub fn hover_hint(
        &self,
        pos: PointerPosition,
        container: &ContainerRect,
        geometry: &EffectiveGeometry,
    ) -> ResizeHint {
        if container.is_degenerate() {
            return ResizeHint::Default;
        }
        let Some((slot, bounds)) = hit_panel(pos, container, geometry) else {
            return ResizeHint::Default;
        };
        let near = proximity(slot, &bounds, pos, self.thresholds.hover);
        if near.width_edge {
            ResizeHint::Horizontal
        } else if near.height_edge {
            ResizeHint::Vertical
        } else {
            ResizeHint::Default
        }
    }
}
