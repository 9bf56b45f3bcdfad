//! Authoritative layout records: stored percentages and per-slot visibility.
//!
//! `LayoutState` keeps four independent panel heights (one per slot) plus one
//! width split per row. The simpler "two shared row heights" shape is the
//! special case where both heights of a row never diverge.
//!
//! Invariants:
//! * Every stored percentage lies in `[0, 100]`. Setters clamp, and
//!   `clamp_percent` maps NaN to 0 so a degenerate division can never leak.
//! * Heights are *not* required to sum to 100 per column; a maximize override
//!   stores 100/0 values and a vertical drag preserves whatever column total
//!   existed when the gesture started.

use crate::slot::{Column, PanelSlot, Row};

pub const FULL_PERCENT: f64 = 100.0;
pub const HALF_PERCENT: f64 = 50.0;

/// Clamp a percentage into `[0, 100]`. NaN collapses to 0.
#[inline]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, FULL_PERCENT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    pub top_left_height: f64,
    pub top_right_height: f64,
    pub bottom_left_height: f64,
    pub bottom_right_height: f64,
    /// Split of the top row: TopLeft's share of the container width.
    pub top_left_width: f64,
    /// Split of the bottom row: BottomLeft's share of the container width.
    pub bottom_left_width: f64,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::canonical()
    }
}

impl LayoutState {
    /// Even 50/50 split on both axes.
    pub const fn canonical() -> Self {
        Self {
            top_left_height: HALF_PERCENT,
            top_right_height: HALF_PERCENT,
            bottom_left_height: HALF_PERCENT,
            bottom_right_height: HALF_PERCENT,
            top_left_width: HALF_PERCENT,
            bottom_left_width: HALF_PERCENT,
        }
    }

    /// Maximize override: `slot` at 100% height, every other height 0, both
    /// row splits pinned to 100.
    pub fn maximized(slot: PanelSlot) -> Self {
        let mut state = Self {
            top_left_height: 0.0,
            top_right_height: 0.0,
            bottom_left_height: 0.0,
            bottom_right_height: 0.0,
            top_left_width: FULL_PERCENT,
            bottom_left_width: FULL_PERCENT,
        };
        state.set_height(slot, FULL_PERCENT);
        state
    }

    pub fn is_canonical(&self) -> bool {
        *self == Self::canonical()
    }

    pub fn height(&self, slot: PanelSlot) -> f64 {
        match slot {
            PanelSlot::TopLeft => self.top_left_height,
            PanelSlot::TopRight => self.top_right_height,
            PanelSlot::BottomLeft => self.bottom_left_height,
            PanelSlot::BottomRight => self.bottom_right_height,
        }
    }

    pub fn set_height(&mut self, slot: PanelSlot, value: f64) {
        let value = clamp_percent(value);
        match slot {
            PanelSlot::TopLeft => self.top_left_height = value,
            PanelSlot::TopRight => self.top_right_height = value,
            PanelSlot::BottomLeft => self.bottom_left_height = value,
            PanelSlot::BottomRight => self.bottom_right_height = value,
        }
    }

    /// Left panel's share of `row`.
    pub fn row_split(&self, row: Row) -> f64 {
        match row {
            Row::Top => self.top_left_width,
            Row::Bottom => self.bottom_left_width,
        }
    }

    pub fn set_row_split(&mut self, row: Row, value: f64) {
        let value = clamp_percent(value);
        match row {
            Row::Top => self.top_left_width = value,
            Row::Bottom => self.bottom_left_width = value,
        }
    }

    /// Sum of the two stored heights in `column` (may exceed 100 after a
    /// maximize override is partially undone).
    pub fn column_total(&self, column: Column) -> f64 {
        self.height(PanelSlot::at(Row::Top, column)) + self.height(PanelSlot::at(Row::Bottom, column))
    }

    /// Reset the height pair of `column` to 50/50 without touching widths or
    /// the other column.
    pub fn reset_column(&mut self, column: Column) {
        self.set_height(PanelSlot::at(Row::Top, column), HALF_PERCENT);
        self.set_height(PanelSlot::at(Row::Bottom, column), HALF_PERCENT);
    }

    pub fn is_within_bounds(&self) -> bool {
        [
            self.top_left_height,
            self.top_right_height,
            self.bottom_left_height,
            self.bottom_right_height,
            self.top_left_width,
            self.bottom_left_width,
        ]
        .iter()
        .all(|v| (0.0..=FULL_PERCENT).contains(v))
    }
}

/// One boolean per slot; default all visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityState {
    visible: [bool; 4],
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self::all()
    }
}

impl VisibilityState {
    pub const fn all() -> Self {
        Self { visible: [true; 4] }
    }

    pub const fn none() -> Self {
        Self { visible: [false; 4] }
    }

    /// Only `slot` visible (maximize override).
    pub fn only(slot: PanelSlot) -> Self {
        let mut v = Self::none();
        v.set(slot, true);
        v
    }

    pub fn from_flags(top_left: bool, top_right: bool, bottom_left: bool, bottom_right: bool) -> Self {
        Self {
            visible: [top_left, top_right, bottom_left, bottom_right],
        }
    }

    #[inline]
    pub fn is_visible(&self, slot: PanelSlot) -> bool {
        self.visible[slot.index()]
    }

    pub fn set(&mut self, slot: PanelSlot, visible: bool) {
        self.visible[slot.index()] = visible;
    }

    pub fn all_visible(&self) -> bool {
        self.visible.iter().all(|v| *v)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    pub fn column_visible_count(&self, column: Column) -> usize {
        [Row::Top, Row::Bottom]
            .into_iter()
            .filter(|row| self.is_visible(PanelSlot::at(*row, column)))
            .count()
    }

    pub fn column_has_visible(&self, column: Column) -> bool {
        self.column_visible_count(column) > 0
    }

    pub fn visible_slots(&self) -> impl Iterator<Item = PanelSlot> + '_ {
        PanelSlot::ALL.into_iter().filter(|s| self.is_visible(*s))
    }
}
