//! Acceptance scenarios driven through the public controller API.
//!
//! Commands are posted through a `ViewerHandle` exactly as a recognizer
//! thread would, then executed by `render_frame`.

mod common;

use common::{spy_controller, provider_addr, Spy, BOUNDS};
use gallery_engine::config::ViewerConfig;
use gallery_engine::controller::{NoopListener, ViewerController};
use gallery_engine::layout::FrameItem;
use gallery_engine::model::{LayoutMode, StrategyKind};
use gallery_engine::provider::{ItemProvider, SyntheticProvider};
use gallery_engine::queue::GestureListener;
use std::time::Duration;

fn config(mode: LayoutMode) -> ViewerConfig {
    ViewerConfig {
        layout_mode: mode,
        ..ViewerConfig::default()
    }
}

fn real_controller(mode: LayoutMode, provider: SyntheticProvider) -> ViewerController {
    let mut controller =
        ViewerController::new(Box::new(provider), Box::new(NoopListener), &config(mode), || {});
    controller.attach_surface();
    controller.layout(BOUNDS, true);
    controller
}

// ===== Scenario 1: pinch claims the sequence =====

#[test]
fn scenario_pinch_then_scroll_never_scrolls() {
    let spy = Spy::new();
    let mut controller = spy_controller(
        &config(LayoutMode::RightToLeft),
        Box::new(SyntheticProvider::new(10)),
        &spy,
    );
    let handle = controller.handle();

    handle.on_down(5.0, 5.0);
    handle.on_pointer_down(6.0, 6.0);
    handle.on_scroll(1.0, 1.0, 1.0, 1.0, 6.0, 6.0);
    handle.on_up();
    let report = controller.render_frame(Duration::ZERO);

    assert_eq!(report.commands, 4);
    let state = controller.gesture_state();
    assert!(state.is_scaling());
    assert!(!state.is_scrolling());
    assert!(!state.is_touched());
    assert_eq!(spy.count(StrategyKind::Pager, "scroll"), 0);
    assert_eq!(spy.hooks(StrategyKind::Pager), vec!["direction", "attach", "down", "up"]);
}

// ===== Scenario 2: double tap while scaling =====

#[test]
fn scenario_double_tap_confirmed_is_dropped_while_scaling() {
    let spy = Spy::new();
    let mut controller = spy_controller(
        &config(LayoutMode::RightToLeft),
        Box::new(SyntheticProvider::new(10)),
        &spy,
    );
    let handle = controller.handle();

    handle.on_down(5.0, 5.0);
    handle.on_pointer_down(6.0, 6.0);
    handle.on_double_tap_confirmed(5.0, 5.0);
    controller.render_frame(Duration::ZERO);
    assert_eq!(spy.count(StrategyKind::Pager, "double_tap_confirmed"), 0);

    // A fresh sequence without the pinch reaches the strategy.
    handle.on_up();
    handle.on_down(5.0, 5.0);
    handle.on_double_tap_confirmed(5.0, 5.0);
    controller.render_frame(Duration::ZERO);
    assert_eq!(spy.count(StrategyKind::Pager, "double_tap_confirmed"), 1);
}

#[test]
fn refused_scale_leaves_scroll_available() {
    let spy = Spy::new();
    spy.scalable.set(false);
    let mut controller = spy_controller(
        &config(LayoutMode::LeftToRight),
        Box::new(SyntheticProvider::new(10)),
        &spy,
    );
    let handle = controller.handle();

    handle.on_down(5.0, 5.0);
    handle.on_scale_begin(6.0, 6.0);
    handle.on_scale(6.0, 6.0, 1.5);
    handle.on_scroll(1.0, 0.0, 1.0, 0.0, 4.0, 5.0);
    controller.render_frame(Duration::ZERO);

    assert_eq!(spy.count(StrategyKind::Pager, "scale"), 0);
    assert_eq!(spy.count(StrategyKind::Pager, "scroll"), 1);
    assert!(controller.gesture_state().is_scrolling());
}

// ===== Scenario 3: strategy switch moves the provider =====

#[test]
fn scenario_switch_to_scroll_moves_the_same_provider() {
    let spy = Spy::new();
    let provider: Box<dyn ItemProvider> = Box::new(SyntheticProvider::new(10));
    let original = provider_addr(&*provider);
    let mut controller = spy_controller(&config(LayoutMode::RightToLeft), provider, &spy);

    controller.handle().set_layout_mode(LayoutMode::TopToBottom);
    controller.render_frame(Duration::ZERO);

    assert_eq!(controller.layout_mode(), LayoutMode::TopToBottom);
    assert_eq!(controller.active_strategy(), Some(StrategyKind::Scroll));
    assert_eq!(spy.count(StrategyKind::Pager, "detach"), 1);
    assert_eq!(spy.count(StrategyKind::Scroll, "attach"), 1);
    assert_eq!(
        spy.attached_providers(),
        vec![
            (StrategyKind::Pager, original),
            (StrategyKind::Scroll, original)
        ]
    );
}

#[test]
fn switching_page_direction_keeps_pager_attached() {
    let spy = Spy::new();
    let mut controller = spy_controller(
        &config(LayoutMode::RightToLeft),
        Box::new(SyntheticProvider::new(10)),
        &spy,
    );

    controller.handle().set_layout_mode(LayoutMode::LeftToRight);
    controller.handle().set_layout_mode(LayoutMode::RightToLeft);
    controller.render_frame(Duration::ZERO);

    assert_eq!(spy.count(StrategyKind::Pager, "detach"), 0);
    assert_eq!(spy.count(StrategyKind::Pager, "attach"), 1);
    assert!(controller.strategy(StrategyKind::Scroll).is_none());
}

#[test]
fn switch_preserves_current_index() {
    let mut controller = real_controller(LayoutMode::LeftToRight, SyntheticProvider::new(40));
    controller.jump_to_index(4);
    controller.render_frame(Duration::ZERO);
    assert_eq!(controller.current_index(), Some(4));

    controller.handle().set_layout_mode(LayoutMode::TopToBottom);
    controller.render_frame(Duration::ZERO);

    assert_eq!(controller.current_index(), Some(4));
    assert!(controller.find_page_by_index(4).is_some());
}

// ===== Supplemental: fill, binding and placeholders =====

#[test]
fn fill_twice_does_work_once() {
    let provider = SyntheticProvider::new(10);
    let counters = provider.counters();
    let mut controller = real_controller(LayoutMode::TopToBottom, provider);
    let binds = counters.binds();
    assert!(binds > 0);

    assert!(!controller.fill());
    assert!(!controller.fill());
    assert_eq!(counters.binds(), binds);
}

#[test]
fn binds_balance_after_switches_and_detach() {
    let provider = SyntheticProvider::new(10);
    let counters = provider.counters();
    let mut controller = real_controller(LayoutMode::RightToLeft, provider);
    let handle = controller.handle();

    for mode in [
        LayoutMode::TopToBottom,
        LayoutMode::LeftToRight,
        LayoutMode::TopToBottom,
        LayoutMode::RightToLeft,
    ] {
        handle.set_layout_mode(mode);
        controller.render_frame(Duration::ZERO);
        assert_eq!(counters.live(), controller.visible_items().len());
    }

    controller.detach_surface();
    assert_eq!(counters.live(), 0);
    assert_eq!(counters.binds(), counters.unbinds());
}

#[test]
fn provider_error_shows_exactly_one_placeholder() {
    for mode in LayoutMode::ALL {
        let controller = real_controller(mode, SyntheticProvider::new(10).with_error("offline"));
        let items = controller.visible_items();
        assert_eq!(items.len(), 1, "mode {mode}");
        match items[0] {
            FrameItem::Error(view) => assert_eq!(view.message(), Some("offline")),
            other => panic!("expected error placeholder in {mode}, got {other:?}"),
        }
    }
}

#[test]
fn unknown_size_shows_progress() {
    let controller = real_controller(LayoutMode::TopToBottom, SyntheticProvider::pending());
    let items = controller.visible_items();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], FrameItem::Progress(_)));
    assert_eq!(controller.current_index(), None);
}

#[test]
fn pager_drag_past_threshold_turns_page() {
    let mut controller = real_controller(LayoutMode::LeftToRight, SyntheticProvider::new(10));
    let handle = controller.handle();

    handle.on_down(900.0, 960.0);
    handle.on_scroll(600.0, 0.0, 600.0, 0.0, 300.0, 960.0);
    handle.on_up();
    let mut now = Duration::ZERO;
    while controller.render_frame(now).animating {
        now += Duration::from_millis(16);
        assert!(now < Duration::from_secs(5), "turn never settled");
    }

    assert_eq!(controller.current_index(), Some(1));
}

#[test]
fn pager_short_drag_snaps_back() {
    let mut controller = real_controller(LayoutMode::LeftToRight, SyntheticProvider::new(10));
    let handle = controller.handle();

    handle.on_down(600.0, 960.0);
    handle.on_scroll(100.0, 0.0, 100.0, 0.0, 500.0, 960.0);
    handle.on_up();
    let mut now = Duration::ZERO;
    while controller.render_frame(now).animating {
        now += Duration::from_millis(16);
        assert!(now < Duration::from_secs(5), "snap never settled");
    }

    assert_eq!(controller.current_index(), Some(0));
    let rect = controller
        .find_page_by_index(0)
        .map(|view| view.rect())
        .unwrap();
    assert_eq!(rect.left, 0.0);
}
