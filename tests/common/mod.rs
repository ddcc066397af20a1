//! Shared fixtures: a layout strategy that records every hook it receives.

#![allow(dead_code)]

use gallery_engine::config::ViewerConfig;
use gallery_engine::controller::{NoopListener, ViewerController};
use gallery_engine::layout::{FrameItem, LayoutContext, LayoutManager, StrategyFactory};
use gallery_engine::model::{PageDirection, Rect, ScrollDelta, Size, StrategyKind};
use gallery_engine::pool::{ContentView, ResourcePool};
use gallery_engine::provider::ItemProvider;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub const BOUNDS: Rect = Rect {
    left: 0.0,
    top: 0.0,
    right: 1080.0,
    bottom: 1920.0,
};

/// Shared view of what every spy strategy saw.
#[derive(Clone)]
pub struct Spy {
    hooks: Rc<RefCell<Vec<(StrategyKind, &'static str)>>>,
    providers: Rc<RefCell<Vec<(StrategyKind, usize)>>>,
    pub scalable: Rc<Cell<bool>>,
}

impl Spy {
    pub fn new() -> Self {
        Self {
            hooks: Rc::default(),
            providers: Rc::default(),
            scalable: Rc::new(Cell::new(true)),
        }
    }

    pub fn count(&self, kind: StrategyKind, hook: &str) -> usize {
        self.hooks
            .borrow()
            .iter()
            .filter(|(k, h)| *k == kind && *h == hook)
            .count()
    }

    pub fn hooks(&self, kind: StrategyKind) -> Vec<&'static str> {
        self.hooks
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| *h)
            .collect()
    }

    /// Provider addresses passed to `attach`, in order.
    pub fn attached_providers(&self) -> Vec<(StrategyKind, usize)> {
        self.providers.borrow().clone()
    }

    fn record(&self, kind: StrategyKind, hook: &'static str) {
        self.hooks.borrow_mut().push((kind, hook));
    }
}

/// Address of the provider object, stable across moves of its `Box`.
pub fn provider_addr(provider: &dyn ItemProvider) -> usize {
    provider as *const dyn ItemProvider as *const () as usize
}

pub struct SpyLayout {
    kind: StrategyKind,
    spy: Spy,
    provider: Option<Box<dyn ItemProvider>>,
    current: Option<usize>,
}

impl LayoutManager for SpyLayout {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn attach(&mut self, provider: Box<dyn ItemProvider>) {
        self.spy.record(self.kind, "attach");
        self.spy
            .providers
            .borrow_mut()
            .push((self.kind, provider_addr(&*provider)));
        self.current = provider.size().filter(|&size| size > 0).map(|_| 0);
        self.provider = Some(provider);
    }

    fn detach(&mut self, _pool: &mut ResourcePool) -> Option<Box<dyn ItemProvider>> {
        self.spy.record(self.kind, "detach");
        self.provider.take()
    }

    fn is_attached(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Option<&dyn ItemProvider> {
        self.provider.as_deref()
    }

    fn set_viewport(&mut self, _size: Size) {}

    fn set_page_direction(&mut self, _direction: PageDirection) {
        self.spy.record(self.kind, "direction");
    }

    fn fill(&mut self, _ctx: &mut LayoutContext<'_>) -> bool {
        false
    }

    fn on_down(&mut self) {
        self.spy.record(self.kind, "down");
    }

    fn on_up(&mut self) {
        self.spy.record(self.kind, "up");
    }

    fn on_scroll(&mut self, _delta: ScrollDelta) {
        self.spy.record(self.kind, "scroll");
    }

    fn on_fling(&mut self, _velocity_x: f32, _velocity_y: f32) {
        self.spy.record(self.kind, "fling");
    }

    fn can_scale(&self) -> bool {
        self.spy.scalable.get()
    }

    fn on_scale(&mut self, _focus_x: f32, _focus_y: f32, _factor: f32) {
        self.spy.record(self.kind, "scale");
    }

    fn on_double_tap_confirmed(&mut self, _x: f32, _y: f32) {
        self.spy.record(self.kind, "double_tap_confirmed");
    }

    fn update_animation(&mut self, _now: Duration) -> bool {
        false
    }

    fn on_data_changed(&mut self, _pool: &mut ResourcePool) {
        self.spy.record(self.kind, "data_changed");
    }

    fn find_page_by_index(&self, _index: usize) -> Option<&ContentView> {
        None
    }

    fn find_page_by_index_mut(&mut self, _index: usize) -> Option<&mut ContentView> {
        None
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn jump_to_index(&mut self, index: usize, _internal: bool) {
        self.current = Some(index);
    }

    fn restore_index(&mut self, index: usize) {
        self.spy.record(self.kind, "restore");
        self.current = Some(index);
    }

    fn visible_items(&self) -> Vec<FrameItem<'_>> {
        Vec::new()
    }
}

pub struct SpyFactory(pub Spy);

impl StrategyFactory for SpyFactory {
    fn create(&mut self, kind: StrategyKind) -> Box<dyn LayoutManager> {
        Box::new(SpyLayout::new(kind, self.0.clone()))
    }
}

impl SpyLayout {
    pub fn new(kind: StrategyKind, spy: Spy) -> Self {
        Self {
            kind,
            spy,
            provider: None,
            current: None,
        }
    }
}

/// Attached controller over spy strategies, laid out to [`BOUNDS`].
pub fn spy_controller(
    config: &ViewerConfig,
    provider: Box<dyn ItemProvider>,
    spy: &Spy,
) -> ViewerController {
    let mut controller = ViewerController::with_factory(
        provider,
        Box::new(NoopListener),
        config,
        Box::new(SpyFactory(spy.clone())),
        || {},
    );
    controller.attach_surface();
    controller.layout(BOUNDS, true);
    controller
}
