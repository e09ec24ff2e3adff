use gm_screen::dashboard::{DashboardLayout, GridSize, Span, WidgetCatalog};
use gm_screen::{Axis, LayoutError};

fn new_layout(rows: usize, cols: usize) -> DashboardLayout {
    DashboardLayout::new(GridSize::new(rows, cols), WidgetCatalog::with_defaults()).unwrap()
}

#[test]
fn resized_widget_blocks_neighbouring_placement() {
    let mut layout = new_layout(2, 5);
    layout.place_widget(0, "dice-roller").unwrap();
    assert_eq!(layout.placement_at(0).unwrap().span, Span::new(1, 1));

    layout.resize_or_move(0, 2, 2, None).unwrap();
    for cell in [0, 1, 5, 6] {
        assert_eq!(layout.owner_of(cell).unwrap().origin, 0);
    }

    assert_eq!(
        layout.place_widget(1, "notes"),
        Err(LayoutError::Occupied { cell: 1 })
    );
    assert_eq!(layout.occupancy().len(), 1);
}

#[test]
fn move_relocates_whole_span() {
    let mut layout = new_layout(2, 5);
    layout.place_widget(2, "timer").unwrap();
    layout.resize_or_move(2, 2, 1, None).unwrap();

    layout.move_widget(2, 7).unwrap();

    assert!(layout.owner_of(2).is_none());
    assert!(layout.owner_of(3).is_none());
    assert_eq!(layout.owner_of(7).unwrap().origin, 7);
    assert_eq!(layout.owner_of(8).unwrap().origin, 7);
    assert_eq!(layout.placement_at(7).unwrap().span, Span::new(2, 1));
    assert!(layout.validate().is_empty());
}

#[test]
fn shrinking_rows_under_tall_widget_is_refused() {
    let mut layout = new_layout(3, 5);
    layout.place_widget(5, "notes").unwrap();
    layout.resize_or_move(5, 1, 2, None).unwrap();

    assert!(!layout.can_shrink_rows(2));
    assert!(layout.can_shrink_cols(1));
    let before = layout.state().clone();
    assert_eq!(
        layout.change_dimensions(2, 5),
        Err(LayoutError::WouldTruncate { axis: Axis::Rows })
    );
    assert_eq!(layout.state(), &before);
}

#[test]
fn oversized_span_is_out_of_bounds() {
    let mut layout = new_layout(2, 5);
    layout.place_widget(3, "notes").unwrap();
    let before = layout.state().clone();

    let err = layout.resize_or_move(3, 10, 1, Some(3)).unwrap_err();
    assert!(matches!(err, LayoutError::OutOfBounds { .. }));
    assert_eq!(layout.state(), &before);
}

#[test]
fn resize_on_empty_cell_is_not_found() {
    let mut layout = new_layout(2, 5);
    let before = layout.state().clone();
    assert_eq!(
        layout.resize_or_move(3, 10, 1, Some(3)),
        Err(LayoutError::NoWidgetAt { cell: 3 })
    );
    assert_eq!(layout.state(), &before);
}

#[test]
fn deleting_twice_matches_deleting_once() {
    let mut layout = new_layout(2, 5);
    let id = layout.place_widget(0, "notes").unwrap();

    let removed = layout.delete_widget(0).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(removed.type_tag, "notes");
    let after_first = layout.state().clone();

    assert!(layout.delete_widget(0).is_none());
    assert_eq!(layout.state(), &after_first);
    assert!(layout.instances().is_empty());
}

#[test]
fn cols_can_shrink_to_rightmost_edge() {
    let mut layout = new_layout(2, 5);
    layout.place_widget(6, "notes").unwrap();
    layout.resize_or_move(6, 2, 1, None).unwrap();

    assert!(layout.can_shrink_cols(3));
    assert!(!layout.can_shrink_cols(2));
    layout.set_cols(3).unwrap();

    let placement = layout.owner_of(4).unwrap();
    assert_eq!(placement.origin, 4);
    assert_eq!(layout.grid(), GridSize::new(2, 3));
    assert_eq!(
        layout.set_cols(2),
        Err(LayoutError::WouldTruncate { axis: Axis::Cols })
    );
}

#[test]
fn growing_is_always_allowed() {
    let mut layout = new_layout(2, 5);
    layout.place_widget(9, "timer").unwrap();
    layout.set_rows(4).unwrap();
    layout.set_cols(7).unwrap();
    assert_eq!(layout.grid(), GridSize::new(4, 7));
    assert!(layout.placement_at(9).is_none());
    let placement = layout.owner_of(11).unwrap();
    assert_eq!(placement.rect(7).row, 1);
    assert_eq!(placement.rect(7).col, 4);
}

#[test]
fn zero_dimensions_are_refused() {
    let mut layout = new_layout(2, 5);
    assert_eq!(layout.set_rows(0), Err(LayoutError::EmptyGrid));
    assert_eq!(layout.change_dimensions(3, 0), Err(LayoutError::EmptyGrid));
}

#[test]
fn resize_with_relocation_grows_over_free_region() {
    let mut layout = new_layout(3, 5);
    layout.place_widget(6, "dice-roller").unwrap();
    layout.place_widget(4, "notes").unwrap();

    // Drag the top-left handle up and left: origin moves to cell 0.
    layout.resize_or_move(6, 2, 2, Some(0)).unwrap();
    assert!(layout.placement_at(6).is_none());
    assert_eq!(layout.placement_at(0).unwrap().span, Span::new(2, 2));

    let before = layout.state().clone();
    assert_eq!(
        layout.resize_or_move(0, 5, 1, None),
        Err(LayoutError::Occupied { cell: 4 })
    );
    assert_eq!(layout.state(), &before);
}
