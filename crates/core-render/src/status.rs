//! Status line composition.
//!
//! Format (segments joined by two spaces):
//! `drag:<state>  hint:<hint>  max:<slot|->  w:<top>/<bottom>  h:<tl>/<bl>|<tr>/<br>`
//!
//! * `w` shows the stored row splits (left width of each row).
//! * `h` shows the stored heights per column, left column first.
//! * Percentages print with no decimals.
//!
//! An ephemeral message is right-aligned when it fits after the base text
//! with at least one space of separation, otherwise dropped.

use core_layout::{Column, LayoutState, PanelSlot, Row};
use core_state::{DragState, ResizeHint};
use unicode_width::UnicodeWidthStr;

pub struct StatusContext<'a> {
    pub drag: DragState,
    pub hint: ResizeHint,
    pub maximized: Option<PanelSlot>,
    pub layout: &'a LayoutState,
    pub ephemeral: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusSegment {
    Drag(&'static str),
    Hint(&'static str),
    Maximized(Option<PanelSlot>),
    Widths { top: f64, bottom: f64 },
    Heights { left: (f64, f64), right: (f64, f64) },
}

pub fn compose_status(ctx: &StatusContext<'_>) -> Vec<StatusSegment> {
    let l = ctx.layout;
    let column = |c: Column| {
        (
            l.height(PanelSlot::at(Row::Top, c)),
            l.height(PanelSlot::at(Row::Bottom, c)),
        )
    };
    vec![
        StatusSegment::Drag(ctx.drag.label()),
        StatusSegment::Hint(ctx.hint.label()),
        StatusSegment::Maximized(ctx.maximized),
        StatusSegment::Widths {
            top: l.row_split(Row::Top),
            bottom: l.row_split(Row::Bottom),
        },
        StatusSegment::Heights {
            left: column(Column::Left),
            right: column(Column::Right),
        },
    ]
}

pub fn format_status(segments: &[StatusSegment]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(|seg| match seg {
            StatusSegment::Drag(s) => format!("drag:{s}"),
            StatusSegment::Hint(s) => format!("hint:{s}"),
            StatusSegment::Maximized(Some(slot)) => format!("max:{slot}"),
            StatusSegment::Maximized(None) => "max:-".to_string(),
            StatusSegment::Widths { top, bottom } => format!("w:{top:.0}/{bottom:.0}"),
            StatusSegment::Heights { left, right } => format!(
                "h:{:.0}/{:.0}|{:.0}/{:.0}",
                left.0, left.1, right.0, right.1
            ),
        })
        .collect();
    parts.join("  ")
}

/// Base status plus the right-aligned ephemeral message when it fits `width`.
pub fn build_status_line(ctx: &StatusContext<'_>, width: u16) -> String {
    let mut base = format_status(&compose_status(ctx));
    let Some(eph) = ctx.ephemeral else {
        return base;
    };
    let base_len = base.width();
    let eph_len = eph.width();
    let width = width as usize;
    if base_len + 1 + eph_len <= width {
        let pad = width - eph_len - base_len;
        base.extend(std::iter::repeat_n(' ', pad));
        base.push_str(eph);
    }
    base
}
