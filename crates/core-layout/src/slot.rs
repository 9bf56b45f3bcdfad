//! Fixed panel slot identifiers.
//!
//! The grid always has exactly four slots. They are never created or
//! destroyed at runtime, only toggled visible/hidden, so a slot doubles as a
//! dense array index (`PanelSlot::index`) for per-slot tables.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelSlot {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Horizontal band of the grid. Horizontal drags resize the width split of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    Top,
    Bottom,
}

/// Vertical band of the grid. Vertical drags resize the height split of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Left,
    Right,
}

impl PanelSlot {
    /// All slots in paint / hit-test order.
    pub const ALL: [PanelSlot; 4] = [
        PanelSlot::TopLeft,
        PanelSlot::TopRight,
        PanelSlot::BottomLeft,
        PanelSlot::BottomRight,
    ];

    pub const fn index(self) -> usize {
        match self {
            PanelSlot::TopLeft => 0,
            PanelSlot::TopRight => 1,
            PanelSlot::BottomLeft => 2,
            PanelSlot::BottomRight => 3,
        }
    }

    pub const fn at(row: Row, column: Column) -> Self {
        match (row, column) {
            (Row::Top, Column::Left) => PanelSlot::TopLeft,
            (Row::Top, Column::Right) => PanelSlot::TopRight,
            (Row::Bottom, Column::Left) => PanelSlot::BottomLeft,
            (Row::Bottom, Column::Right) => PanelSlot::BottomRight,
        }
    }

    pub const fn row(self) -> Row {
        match self {
            PanelSlot::TopLeft | PanelSlot::TopRight => Row::Top,
            PanelSlot::BottomLeft | PanelSlot::BottomRight => Row::Bottom,
        }
    }

    pub const fn column(self) -> Column {
        match self {
            PanelSlot::TopLeft | PanelSlot::BottomLeft => Column::Left,
            PanelSlot::TopRight | PanelSlot::BottomRight => Column::Right,
        }
    }

    /// Neighbor sharing this slot's row (the other side of the vertical divider).
    pub const fn row_sibling(self) -> Self {
        Self::at(self.row(), self.column().other())
    }

    /// Neighbor sharing this slot's column (the other side of the horizontal divider).
    pub const fn column_sibling(self) -> Self {
        Self::at(self.row().other(), self.column())
    }

    /// Stable kebab-case name used in logs and config keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            PanelSlot::TopLeft => "top-left",
            PanelSlot::TopRight => "top-right",
            PanelSlot::BottomLeft => "bottom-left",
            PanelSlot::BottomRight => "bottom-right",
        }
    }
}

impl Row {
    pub const fn other(self) -> Self {
        match self {
            Row::Top => Row::Bottom,
            Row::Bottom => Row::Top,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Row::Top => "top",
            Row::Bottom => "bottom",
        }
    }
}

impl Column {
    pub const fn other(self) -> Self {
        match self {
            Column::Left => Column::Right,
            Column::Right => Column::Left,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Column::Left => "left",
            Column::Right => "right",
        }
    }
}

impl fmt::Display for PanelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown panel slot `{0}` (expected top-left, top-right, bottom-left or bottom-right)")]
pub struct ParseSlotError(pub String);

impl FromStr for PanelSlot {
    type Err = ParseSlotError;

    /// Accepts kebab-case, snake_case and camelCase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "topleft" => Ok(PanelSlot::TopLeft),
            "topright" => Ok(PanelSlot::TopRight),
            "bottomleft" => Ok(PanelSlot::BottomLeft),
            "bottomright" => Ok(PanelSlot::BottomRight),
            _ => Err(ParseSlotError(s.to_string())),
        }
    }
}
