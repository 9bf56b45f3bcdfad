//! Quad layout geometry (four-panel resizable grid).
//!
//! This crate holds the pure half of the layout manager: the slot
//! identifiers, the stored geometry record (`LayoutState`), the per-slot
//! visibility record (`VisibilityState`) and the effective geometry
//! calculator that turns both into on-screen rectangles. Nothing here owns
//! mutable runtime state, performs I/O or logs; the owning controller lives
//! in `core-state`.
//!
//! Units:
//! * All stored and derived values are percentages of the container in
//!   `[0, 100]`.
//! * `ContainerRect` / `Bounds` translate percentages into host units
//!   (pixels, or scaled terminal cells) for hit testing.
//! * `CellRect` / `CellScale` map the same rectangles onto terminal cells.
//!
//! Invariants (must hold after every public call):
//! * Stored percentages stay within `[0, 100]` (setters clamp).
//! * A hidden slot never receives a rectangle.
//! * A visible slot whose row sibling is hidden spans the full row width.
//! * When a whole column is hidden, heights in the other column are
//!   recomputed as `100 / visible_count`; stale stored heights are never
//!   displayed in that configuration.
//!
//! Testing strategy:
//! * Unit tests next to each module cover the redistribution table.
//! * `tests/geometry_properties.rs` uses proptest to assert every derived
//!   rectangle stays inside the container for arbitrary (even out of range)
//!   stored values and visibility combinations.

mod cells;
mod geometry;
mod model;
mod slot;

pub use cells::{CellRect, CellScale};
pub use geometry::{
    Anchor, Bounds, ContainerRect, EffectiveGeometry, HorizontalEdge, PanelRect, ResizeEdges,
    VerticalEdge, became_all_visible, effective_geometry, resize_edges,
};
pub use model::{FULL_PERCENT, HALF_PERCENT, LayoutState, VisibilityState, clamp_percent};
pub use slot::{Column, PanelSlot, ParseSlotError, Row};
