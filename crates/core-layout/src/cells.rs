//! Terminal cell mapping for percentage rectangles.
//!
//! Edges are rounded independently (start and end), so two panels sharing a
//! divider land on the same cell boundary and the grid tiles without gaps.

use crate::geometry::{ContainerRect, PanelRect};
use crate::model::FULL_PERCENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right column.
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom row.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    /// Project a percentage rectangle into this area.
    pub fn project(&self, rect: &PanelRect) -> CellRect {
        let edge = |origin: u16, span: u16, pct: f64| -> u16 {
            let offset = (pct / FULL_PERCENT * f64::from(span)).round();
            origin.saturating_add(offset.clamp(0.0, f64::from(span)) as u16)
        };
        let left = edge(self.x, self.width, rect.left);
        let right = edge(self.x, self.width, rect.right());
        let top = edge(self.y, self.height, rect.top);
        let bottom = edge(self.y, self.height, rect.bottom());
        CellRect {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }
}

/// Host scale: how many layout units one terminal cell spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

impl CellScale {
    /// Layout-unit bounding box of a cell area.
    pub fn container(&self, area: &CellRect) -> ContainerRect {
        ContainerRect::new(
            f64::from(area.x) * self.cell_width,
            f64::from(area.y) * self.cell_height,
            f64::from(area.width) * self.cell_width,
            f64::from(area.height) * self.cell_height,
        )
    }

    /// Layout-unit point at the center of cell `(column, row)`.
    pub fn point(&self, column: u16, row: u16) -> (f64, f64) {
        (
            (f64::from(column) + 0.5) * self.cell_width,
            (f64::from(row) + 0.5) * self.cell_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Anchor, effective_geometry};
    use crate::model::{LayoutState, VisibilityState};
    use crate::slot::PanelSlot;

    #[test]
    fn canonical_grid_tiles_area() {
        let area = CellRect::new(0, 1, 81, 21);
        let g = effective_geometry(&LayoutState::canonical(), &VisibilityState::all());
        let cells: Vec<_> = g.iter().map(|(s, r)| (s, area.project(&r))).collect();
        let tl = cells[0].1;
        let tr = cells[1].1;
        let bl = cells[2].1;
        assert_eq!(tl.x, 0);
        assert_eq!(tl.right(), tr.x);
        assert_eq!(tr.right(), 81);
        assert_eq!(tl.bottom(), bl.y);
        assert_eq!(cells[3].1.bottom(), 22);
        assert_eq!(cells[3].0, PanelSlot::BottomRight);
    }

    #[test]
    fn zero_width_panel_projects_empty() {
        let area = CellRect::new(0, 0, 40, 10);
        let r = PanelRect::new(0.0, 0.0, 100.0, Anchor::Left);
        assert!(area.project(&r).is_empty());
    }

    #[test]
    fn scale_maps_cell_centers_and_area() {
        let scale = CellScale::default();
        assert_eq!(scale.point(0, 0), (4.0, 8.0));
        assert_eq!(scale.point(10, 2), (84.0, 40.0));
        let c = scale.container(&CellRect::new(0, 1, 100, 40));
        assert_eq!((c.left, c.top, c.width, c.height), (0.0, 16.0, 800.0, 640.0));
    }

    #[test]
    fn contains_is_half_open() {
        let r = CellRect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(5, 5));
    }
}
