use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gm_screen::dashboard::{CellRect, DashboardLayout, GridSize, Span, WidgetCatalog};

const ROWS: usize = 10;
const COLS: usize = 10;

/// Checkerboard of 1x1 widgets on every other cell of a full-size grid.
fn build_layout() -> DashboardLayout {
    let mut layout =
        DashboardLayout::new(GridSize::new(ROWS, COLS), WidgetCatalog::with_defaults())
            .expect("grid is non-empty");
    for cell in 0..ROWS * COLS {
        let (row, col) = (cell / COLS, cell % COLS);
        if (row + col) % 2 == 0 {
            let _ = layout.place_widget(cell, "notes");
        }
    }
    layout
}

fn bench_layout(c: &mut Criterion) {
    let layout = build_layout();

    c.bench_function("occupancy_is_free_miss", |b| {
        let rect = CellRect::new(1, 0, Span::new(1, 1));
        b.iter(|| black_box(layout.occupancy().is_free(black_box(&rect), COLS, None)))
    });

    c.bench_function("occupancy_is_free_large_rect", |b| {
        let rect = CellRect::new(0, 0, Span::new(COLS, ROWS));
        b.iter(|| black_box(layout.occupancy().first_conflict(black_box(&rect), COLS, None)))
    });

    c.bench_function("owner_of_all_cells", |b| {
        b.iter(|| {
            let owned = (0..ROWS * COLS)
                .filter(|cell| layout.owner_of(*cell).is_some())
                .count();
            black_box(owned)
        })
    });

    c.bench_function("move_back_and_forth", |b| {
        let mut layout = build_layout();
        b.iter(|| {
            let _ = layout.move_widget(0, 1);
            let _ = layout.move_widget(1, 0);
        })
    });

    c.bench_function("shrink_predicates", |b| {
        b.iter(|| {
            black_box(layout.can_shrink_rows(black_box(ROWS - 1)));
            black_box(layout.can_shrink_cols(black_box(COLS - 1)));
        })
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
