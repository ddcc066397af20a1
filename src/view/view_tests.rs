//! Host shell tests against ratatui's `TestBackend`.

use super::*;
use crate::layout::test_support::ResizableProvider;
use crate::model::{LayoutMode, Size};
use crate::provider::SyntheticProvider;
use crate::queue::GestureListener;
use ratatui::backend::TestBackend;

// 40×30 cells is a 320×480 px viewport.
fn app_with(provider: SyntheticProvider, mode: LayoutMode) -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(40, 30)).unwrap();
    let config = ViewerConfig {
        layout_mode: mode,
        ..ViewerConfig::default()
    };
    TuiApp::new(terminal, Box::new(provider), &config).unwrap()
}

fn screen(app: &TuiApp<TestBackend>) -> String {
    let buffer = app.terminal().backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn tui_error_from_io_error() {
    let io_err = io::Error::other("test error");
    let tui_err: TuiError = io_err.into();
    assert!(matches!(tui_err, TuiError::Io(_)));
}

#[test]
fn new_app_lays_out_to_terminal_size() {
    let app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    assert_eq!(app.controller().viewport(), Size::new(320.0, 480.0));
    assert!(app.status_visible());
}

#[test]
fn first_frame_draws_current_page_and_status() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    app.step().unwrap();

    let text = screen(&app);
    assert!(text.contains("page 1"), "screen:\n{text}");
    assert!(text.contains("right-to-left  page 1/3"), "screen:\n{text}");
}

#[test]
fn quit_stops_and_redraw_does_not() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    assert!(!app.apply(ShellEvent::Redraw));
    assert!(app.apply(ShellEvent::Quit));
}

#[test]
fn posted_mode_switch_shows_in_status_bar() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    app.handle().set_layout_mode(LayoutMode::TopToBottom);
    app.step().unwrap();

    assert_eq!(app.controller().layout_mode(), LayoutMode::TopToBottom);
    assert!(screen(&app).contains("top-to-bottom"));
}

#[test]
fn centre_tap_toggles_status_bar() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    app.handle().on_single_tap_confirmed(160.0, 240.0);
    app.step().unwrap();

    assert!(!app.status_visible());
    assert!(!screen(&app).contains("page 1/3"));

    app.handle().on_single_tap_confirmed(160.0, 240.0);
    app.step().unwrap();
    assert!(app.status_visible());
}

#[test]
fn edge_tap_leaves_status_bar() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    app.handle().on_single_tap_confirmed(10.0, 240.0);
    app.step().unwrap();
    assert!(app.status_visible());
}

#[test]
fn toggle_status_event_flips_visibility() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    app.apply(ShellEvent::ToggleStatus);
    assert!(!app.status_visible());
    app.apply(ShellEvent::ToggleStatus);
    assert!(app.status_visible());
}

#[test]
fn provider_error_is_drawn() {
    let mut app = app_with(
        SyntheticProvider::new(3).with_error("offline"),
        LayoutMode::RightToLeft,
    );
    app.step().unwrap();
    assert!(screen(&app).contains("offline"));
}

#[test]
fn failed_page_shows_its_message() {
    let mut app = app_with(
        SyntheticProvider::new(3).with_failing_pages([0]),
        LayoutMode::LeftToRight,
    );
    app.step().unwrap();
    assert!(screen(&app).contains("Page 1 failed to load"));
}

#[test]
fn resize_relayouts_viewer() {
    let mut app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    assert!(!app.apply(ShellEvent::Resize { cols: 80, rows: 20 }));
    assert_eq!(app.controller().viewport(), Size::new(640.0, 320.0));
}

#[test]
fn posting_wakes_render_loop() {
    let app = app_with(SyntheticProvider::new(3), LayoutMode::RightToLeft);
    let _ = app.events.try_iter().count();

    app.handle().on_down(1.0, 1.0);
    assert_eq!(app.events.try_iter().collect::<Vec<_>>(), vec![ShellEvent::Redraw]);
}

#[test]
fn status_total_tracks_provider_size() {
    let (provider, size) = ResizableProvider::new(SyntheticProvider::pending());
    let terminal = Terminal::new(TestBackend::new(40, 30)).unwrap();
    let mut app = TuiApp::new(terminal, Box::new(provider), &ViewerConfig::default()).unwrap();
    app.step().unwrap();
    assert!(screen(&app).contains("page -/?"), "screen:\n{}", screen(&app));

    size.set(Some(4));
    app.controller.on_data_changed();
    app.step().unwrap();
    assert!(screen(&app).contains("page 1/4"), "screen:\n{}", screen(&app));
}
