//! Effective geometry: the rectangles panels actually occupy.
//!
//! `effective_geometry` is a pure function of `(LayoutState, VisibilityState)`.
//! Output rectangles are percentages of the container and every panel is
//! positioned independently (absolute offsets, no flow), so each read of a
//! stored value is clamped again here.
//!
//! Redistribution rules, in order:
//! 1. Both columns have a visible panel: stored heights are used as-is.
//! 2. Only one column has visible panels: each visible panel in it gets
//!    `100 / visible_in_column` of the height, never the stale stored value.
//! 3. No panel visible: every height collapses to 0.
//! 4. Widths are per row: a panel whose row sibling is hidden takes 100% of
//!    the row, otherwise the stored split (left) or its complement (right).
//! 5. A bottom panel starts where its column's top panel ends (effective
//!    height of the top sibling), top panels start at 0.

use crate::model::{FULL_PERCENT, LayoutState, VisibilityState, clamp_percent};
use crate::slot::{Column, PanelSlot, Row};

/// Side of the container a panel is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
}

/// Percentage rectangle. `left` is derived from the anchor so consumers that
/// only understand left/top offsets can use it directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub anchor: Anchor,
}

impl PanelRect {
    pub fn new(top: f64, width: f64, height: f64, anchor: Anchor) -> Self {
        let top = clamp_percent(top);
        let width = clamp_percent(width);
        let height = clamp_percent(height).min(FULL_PERCENT - top);
        let left = match anchor {
            Anchor::Left => 0.0,
            Anchor::Right => FULL_PERCENT - width,
        };
        Self {
            top,
            left,
            width,
            height,
            anchor,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Derived rectangles for all four slots. Hidden slots are `None` and must
/// not be rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveGeometry {
    rects: [Option<PanelRect>; 4],
}

impl EffectiveGeometry {
    pub fn rect(&self, slot: PanelSlot) -> Option<PanelRect> {
        self.rects[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelSlot, PanelRect)> + '_ {
        PanelSlot::ALL
            .into_iter()
            .filter_map(|slot| self.rect(slot).map(|r| (slot, r)))
    }
}

fn effective_heights(layout: &LayoutState, visibility: &VisibilityState) -> [f64; 4] {
    let left = visibility.column_has_visible(Column::Left);
    let right = visibility.column_has_visible(Column::Right);
    let mut heights = [0.0; 4];
    match (left, right) {
        (true, true) => {
            for slot in PanelSlot::ALL {
                heights[slot.index()] = clamp_percent(layout.height(slot));
            }
        }
        (true, false) | (false, true) => {
            let column = if left { Column::Left } else { Column::Right };
            let share = FULL_PERCENT / visibility.column_visible_count(column) as f64;
            for row in [Row::Top, Row::Bottom] {
                let slot = PanelSlot::at(row, column);
                if visibility.is_visible(slot) {
                    heights[slot.index()] = share;
                }
            }
        }
        (false, false) => {}
    }
    heights
}

fn effective_width(layout: &LayoutState, visibility: &VisibilityState, slot: PanelSlot) -> f64 {
    if !visibility.is_visible(slot.row_sibling()) {
        return FULL_PERCENT;
    }
    let split = clamp_percent(layout.row_split(slot.row()));
    match slot.column() {
        Column::Left => split,
        Column::Right => FULL_PERCENT - split,
    }
}

/// Derive every panel's on-screen rectangle.
pub fn effective_geometry(layout: &LayoutState, visibility: &VisibilityState) -> EffectiveGeometry {
    let heights = effective_heights(layout, visibility);
    let mut rects = [None; 4];
    for slot in visibility.visible_slots() {
        let top = match slot.row() {
            Row::Top => 0.0,
            Row::Bottom => heights[slot.column_sibling().index()],
        };
        let anchor = match slot.column() {
            Column::Left => Anchor::Left,
            Column::Right => Anchor::Right,
        };
        rects[slot.index()] = Some(PanelRect::new(
            top,
            effective_width(layout, visibility, slot),
            heights[slot.index()],
            anchor,
        ));
    }
    EffectiveGeometry { rects }
}

/// True when a visibility change moves into the all-visible state. The owner
/// answers this by restoring canonical geometry instead of inferring a split
/// from whatever degenerate values survived a chain of hides.
pub fn became_all_visible(previous: &VisibilityState, next: &VisibilityState) -> bool {
    next.all_visible() && !previous.all_visible()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Top,
    Bottom,
}

/// The two edges of a slot that border a divider: the vertical edge shared
/// with its row sibling and the horizontal edge shared with its column sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEdges {
    pub width_edge: VerticalEdge,
    pub height_edge: HorizontalEdge,
}

pub const fn resize_edges(slot: PanelSlot) -> ResizeEdges {
    let width_edge = match slot.column() {
        Column::Left => VerticalEdge::Right,
        Column::Right => VerticalEdge::Left,
    };
    let height_edge = match slot.row() {
        Row::Top => HorizontalEdge::Bottom,
        Row::Bottom => HorizontalEdge::Top,
    };
    ResizeEdges {
        width_edge,
        height_edge,
    }
}

/// Container bounding box in host units (pixels for a browser-like host,
/// scaled cells for the terminal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Host-unit rectangle of a single panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Closed containment: points on an edge belong to the panel.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn vertical_edge(&self, edge: VerticalEdge) -> f64 {
        match edge {
            VerticalEdge::Left => self.left,
            VerticalEdge::Right => self.right,
        }
    }

    pub fn horizontal_edge(&self, edge: HorizontalEdge) -> f64 {
        match edge {
            HorizontalEdge::Top => self.top,
            HorizontalEdge::Bottom => self.bottom,
        }
    }
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A zero-area (or non-finite) container cannot map pointer positions.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    pub fn bounds_of(&self, rect: &PanelRect) -> Bounds {
        let left = self.left + rect.left / FULL_PERCENT * self.width;
        let top = self.top + rect.top / FULL_PERCENT * self.height;
        Bounds {
            left,
            top,
            right: left + rect.width / FULL_PERCENT * self.width,
            bottom: top + rect.height / FULL_PERCENT * self.height,
        }
    }

    /// Horizontal pointer position as a clamped percentage of the width.
    pub fn x_percent(&self, x: f64) -> f64 {
        clamp_percent((x - self.left) / self.width * FULL_PERCENT)
    }

    /// Vertical pointer position as a clamped percentage of the height.
    pub fn y_percent(&self, y: f64) -> f64 {
        clamp_percent((y - self.top) / self.height * FULL_PERCENT)
    }
}
