//! Frame composition scenarios: what is drawn matches the hit map, the
//! layout state and the status line.

use core_actions::hit_map::panel_cells;
use core_actions::{Action, ChromeButton, HitMap, HitTarget, PanelTitles, dispatch};
use core_layout::{CellRect, CellScale, PanelSlot};
use core_render::panel::{PanelContent, PanelContents, TextPanel};
use core_render::status::{StatusContext, build_status_line};
use core_render::{CellFlags, Frame, FrameInputs, build_frame};
use core_state::{PointerKind, PointerPosition, QuadLayout};
use pretty_assertions::assert_eq;

const WIDTH: u16 = 100;
const HEIGHT: u16 = 24;
const AREA: CellRect = CellRect::new(0, 1, WIDTH, HEIGHT - 2);

fn owner() -> QuadLayout {
    let mut q = QuadLayout::default();
    q.set_container(CellScale::default().container(&AREA));
    q
}

fn contents() -> PanelContents {
    let titles = PanelTitles::default();
    let boxed: [Box<dyn PanelContent>; 4] = PanelSlot::ALL
        .map(|slot| Box::new(TextPanel::placeholder(titles.get(slot), slot)) as Box<dyn PanelContent>);
    PanelContents::new(boxed)
}

fn render(q: &QuadLayout) -> (Frame, HitMap, String) {
    let titles = PanelTitles::default();
    let panels = panel_cells(&q.geometry(), AREA);
    let map = HitMap::build(WIDTH, 0, &titles, q.visibility(), q.maximized(), &panels);
    let status = build_status_line(
        &StatusContext {
            drag: q.drag_state(),
            hint: q.hover_hint(),
            maximized: q.maximized(),
            layout: q.layout(),
            ephemeral: None,
        },
        WIDTH,
    );
    let contents = contents();
    let frame = build_frame(&FrameInputs {
        width: WIDTH,
        height: HEIGHT,
        hit_map: &map,
        panels: &panels,
        titles: &titles,
        contents: &contents,
        focused: q.focused(),
        status: &status,
    });
    (frame, map, status)
}

#[test]
fn toolbar_row_lists_checkboxes_and_reset() {
    let (frame, _, _) = render(&owner());
    let row = frame.row_text(0);
    assert!(row.starts_with(" [x] Document Viewer  [x] Keywords"), "{row}");
    assert!(row.contains("[Reset Layout]"), "{row}");
}

#[test]
fn chrome_is_drawn_where_it_is_clickable() {
    let (frame, map, _) = render(&owner());
    assert_eq!(map.chrome().len(), 12);
    for control in map.chrome() {
        let drawn: String = control
            .label
            .chars()
            .enumerate()
            .map(|(i, _)| frame.cell(control.x + i as u16, control.y).unwrap().ch)
            .collect();
        assert_eq!(drawn, control.label);
        let cell = frame.cell(control.x, control.y).unwrap();
        assert!(cell.flags.contains(CellFlags::REVERSE));
    }
}

#[test]
fn canonical_grid_draws_four_boxes_with_titles() {
    let (frame, _, _) = render(&owner());
    // Top row of the grid holds both top panels' borders and titles.
    let top = frame.row_text(AREA.y);
    assert!(top.starts_with("┌ Document Viewer "), "{top}");
    assert!(top.contains("┐┌ Keywords "), "{top}");
    let mid = frame.row_text(AREA.y + AREA.height / 2);
    assert!(mid.contains(" Headlines "), "{mid}");
    assert!(mid.contains(" Article "), "{mid}");
    // Placeholder content sits inside the top-left box.
    assert!(frame.row_text(AREA.y + 1).starts_with("│Document Viewer"));
}

#[test]
fn maximized_panel_fills_grid_with_restore_label() {
    let mut q = owner();
    dispatch(Action::ToggleMaximize(PanelSlot::BottomRight), &mut q, &[]);
    let (frame, map, status) = render(&q);
    assert_eq!(map.chrome().len(), 3);
    let maximize = map
        .chrome()
        .iter()
        .find(|c| {
            c.target
                == HitTarget::Chrome {
                    slot: PanelSlot::BottomRight,
                    button: ChromeButton::Maximize,
                }
        })
        .unwrap();
    assert_eq!(maximize.label, "[-]");
    let top = frame.row_text(AREA.y);
    assert!(top.starts_with("┌ Article "), "{top}");
    assert_eq!(frame.cell(WIDTH - 1, AREA.y).unwrap().ch, '┐');
    assert!(status.contains("max:bottom-right"), "{status}");
    assert_eq!(frame.row_text(HEIGHT - 1).trim_end(), status);
}

#[test]
fn hidden_panel_is_not_drawn_and_sibling_spans_row() {
    let mut q = owner();
    dispatch(Action::Hide(PanelSlot::TopRight), &mut q, &[]);
    let (frame, map, _) = render(&q);
    let top = frame.row_text(AREA.y);
    assert!(!top.contains("Keywords"), "{top}");
    assert_eq!(frame.cell(WIDTH - 1, AREA.y).unwrap().ch, '┐');
    assert!(frame.row_text(0).contains("[ ] Keywords"));
    assert!(
        map.chrome()
            .iter()
            .all(|c| !matches!(c.target, HitTarget::Chrome { slot: PanelSlot::TopRight, .. }))
    );
}

#[test]
fn focused_panel_title_is_bold() {
    let mut q = owner();
    let (x, y) = CellScale::default().point(10, 5);
    q.pointer_down(PointerPosition::new(x, y), PointerKind::Mouse);
    q.pointer_up();
    assert_eq!(q.focused(), Some(PanelSlot::TopLeft));
    let (frame, _, _) = render(&q);
    assert!(frame.cell(2, AREA.y).unwrap().flags.contains(CellFlags::BOLD));
}
