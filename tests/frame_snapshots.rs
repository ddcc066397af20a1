//! Snapshot tests for placed views.
//!
//! Captures `describe_items` output so layout geometry changes show up as
//! snapshot diffs.

mod common;

use common::BOUNDS;
use gallery_engine::config::ViewerConfig;
use gallery_engine::controller::{describe_items, NoopListener, ViewerController};
use gallery_engine::model::LayoutMode;
use gallery_engine::provider::SyntheticProvider;
use gallery_engine::queue::GestureListener;
use std::time::Duration;

fn attached(mode: LayoutMode, provider: SyntheticProvider) -> ViewerController {
    let config = ViewerConfig {
        layout_mode: mode,
        ..ViewerConfig::default()
    };
    let mut controller =
        ViewerController::new(Box::new(provider), Box::new(NoopListener), &config, || {});
    controller.attach_surface();
    controller.layout(BOUNDS, true);
    controller
}

fn placed(controller: &ViewerController) -> String {
    describe_items(&controller.visible_items())
        .trim_end()
        .to_string()
}

#[test]
fn pager_first_frame() {
    let mut controller = attached(LayoutMode::RightToLeft, SyntheticProvider::new(24));
    controller.render_frame(Duration::ZERO);

    insta::assert_snapshot!("pager_first_frame", placed(&controller));
}

#[test]
fn pager_mid_drag_shows_neighbour() {
    let mut controller = attached(LayoutMode::RightToLeft, SyntheticProvider::new(24));
    let handle = controller.handle();
    // Finger moves right, revealing the next right-to-left page.
    handle.on_down(540.0, 960.0);
    handle.on_scroll(-300.0, 0.0, -300.0, 0.0, 840.0, 960.0);
    let report = controller.render_frame(Duration::ZERO);

    assert_eq!(
        report.summary(),
        "mode=right-to-left page=1 items=2 commands=2 filled=true animating=false"
    );
    insta::assert_snapshot!("pager_mid_drag", placed(&controller));
}

#[test]
fn error_placeholder() {
    let mut controller = attached(
        LayoutMode::TopToBottom,
        SyntheticProvider::new(24).with_error("offline"),
    );
    controller.render_frame(Duration::ZERO);

    insta::assert_snapshot!("error_placeholder", placed(&controller));
}
