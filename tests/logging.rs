use std::{fs, thread::sleep, time::Duration};

use gm_screen::dashboard::{DashboardLayout, GridSize, WidgetCatalog};
use serial_test::serial;
use tempfile::tempdir;

// Only the first `init` in a process installs a subscriber, so everything
// about it is checked in one test.
#[test]
#[serial]
fn layout_warnings_reach_log_file_and_later_init_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gm_screen.log");
    let other = dir.path().join("other.log");

    gm_screen::logging::init(false, Some(path.clone()));
    gm_screen::logging::init(false, Some(other.clone()));
    gm_screen::logging::init(true, None);

    let mut layout =
        DashboardLayout::new(GridSize::new(3, 5), WidgetCatalog::with_defaults()).unwrap();
    layout.place_widget(0, "notes").unwrap();
    let mut cfg = layout.to_config();
    cfg.slots[0].widget = "jukebox".into();
    let (_, warnings) = DashboardLayout::from_config(&cfg, WidgetCatalog::with_defaults());
    assert_eq!(warnings.len(), 1);
    // Debug output stays off when the first init asked for info.
    layout.delete_widget(0);

    sleep(Duration::from_millis(100));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("dropping unknown widget 'jukebox'"));
    assert!(contents.contains("WARN"));
    assert!(!contents.contains("widget deleted"));
    assert!(!contents.contains('\u{1b}'), "file output must not carry ANSI codes");
    let other_contents = fs::read_to_string(&other).unwrap_or_default();
    assert!(!other_contents.contains("jukebox"));
}
