//! The layout strategy contract and its two implementations.
//!
//! A strategy owns the item provider while attached, turns interaction hooks
//! into offsets/zoom, and on each dirty `fill` pass recycles content views so
//! that exactly the visible indices are bound. When the provider reports an
//! error, an unknown size or no items, a single placeholder replaces the
//! content.

pub mod animation;
pub mod edge;
pub mod height_index;
mod pager;
mod placeholder;
mod scroll;

pub use edge::{Edge, EdgeEffect, EdgeGlow};
pub use pager::PagerLayoutManager;
pub use scroll::ScrollLayoutManager;

use crate::config::ViewerConfig;
use crate::controller::ActionListener;
use crate::model::{PageDirection, Rect, ScrollDelta, Size, StrategyKind};
use crate::pool::{ContentView, ErrorView, ProgressView, ResourcePool};
use crate::provider::{bind_view, unbind_view, ItemProvider};
use std::time::Duration;

/// Resources a fill pass may touch besides the strategy itself.
pub struct LayoutContext<'a> {
    /// Recycler for content and placeholder views.
    pub pool: &'a mut ResourcePool,
    /// Receiver of page-change notifications.
    pub listener: &'a mut dyn ActionListener,
}

/// One placed view, as the renderer should draw it.
#[derive(Debug, Clone, Copy)]
pub enum FrameItem<'a> {
    /// A bound content view.
    Page(&'a ContentView),
    /// The loading indicator.
    Progress(&'a ProgressView),
    /// The error display.
    Error(&'a ErrorView),
}

impl FrameItem<'_> {
    /// Where the item is placed.
    pub fn rect(&self) -> Rect {
        match self {
            FrameItem::Page(view) => view.rect(),
            FrameItem::Progress(view) => view.rect(),
            FrameItem::Error(view) => view.rect(),
        }
    }

    /// Bound index for pages.
    pub fn index(&self) -> Option<usize> {
        match self {
            FrameItem::Page(view) => view.index(),
            _ => None,
        }
    }
}

/// A pagination strategy.
///
/// Only the rendering thread calls these methods. Every hook must tolerate
/// being called while detached.
pub trait LayoutManager {
    /// Which family this strategy belongs to.
    fn kind(&self) -> StrategyKind;

    /// Take ownership of the provider. Calling twice without `detach` is a
    /// contract violation.
    fn attach(&mut self, provider: Box<dyn ItemProvider>);

    /// Unbind and release every view and placeholder, then hand the provider back.
    fn detach(&mut self, pool: &mut ResourcePool) -> Option<Box<dyn ItemProvider>>;

    /// True while holding a provider.
    fn is_attached(&self) -> bool;

    /// The attached provider, for read-only queries.
    fn provider(&self) -> Option<&dyn ItemProvider>;

    /// Viewport size from the latest layout pass.
    fn set_viewport(&mut self, size: Size);

    /// Page advance direction. Only the pager cares.
    fn set_page_direction(&mut self, _direction: PageDirection) {}

    /// Recycle and place views for the current state. No-op unless dirty;
    /// returns whether any work was done.
    fn fill(&mut self, ctx: &mut LayoutContext<'_>) -> bool;

    /// First finger down.
    fn on_down(&mut self);

    /// Last finger up.
    fn on_up(&mut self);

    /// Drag moved.
    fn on_scroll(&mut self, delta: ScrollDelta);

    /// Finger released with velocity.
    fn on_fling(&mut self, velocity_x: f32, velocity_y: f32);

    /// Whether a pinch may start now.
    fn can_scale(&self) -> bool;

    /// Pinch changed by `factor` around the focus point.
    fn on_scale(&mut self, focus_x: f32, focus_y: f32, factor: f32);

    /// Pinch ended.
    fn on_scale_end(&mut self) {}

    /// Short press released.
    fn on_single_tap_up(&mut self, _x: f32, _y: f32) {}

    /// Single tap confirmed.
    fn on_single_tap_confirmed(&mut self, _x: f32, _y: f32) {}

    /// Second tap of a double tap went down.
    fn on_double_tap(&mut self, _x: f32, _y: f32) {}

    /// Double tap completed: toggle zoom around the tap.
    fn on_double_tap_confirmed(&mut self, x: f32, y: f32);

    /// Advance animations to `now`. Returns true while another frame is needed.
    fn update_animation(&mut self, now: Duration) -> bool;

    /// The provider's contents changed: drop bindings past the new size and
    /// rebind the rest.
    fn on_data_changed(&mut self, pool: &mut ResourcePool);

    /// The bound view for `index`, if one is laid out.
    fn find_page_by_index(&self, index: usize) -> Option<&ContentView>;

    /// Mutable access to the bound view for `index`, for pushing loaded
    /// content into it. Marks the strategy dirty.
    fn find_page_by_index_mut(&mut self, index: usize) -> Option<&mut ContentView>;

    /// Index of the current page, if it is laid out.
    fn current_index(&self) -> Option<usize>;

    /// Navigate to `index`; the listener hears about it with `internal`.
    fn jump_to_index(&mut self, index: usize, internal: bool);

    /// Position on `index` without notifying the listener.
    fn restore_index(&mut self, index: usize);

    /// Views to draw this frame.
    fn visible_items(&self) -> Vec<FrameItem<'_>>;

    /// Overscroll glows to draw over the content.
    fn edge_glows(&self) -> Vec<EdgeGlow> {
        Vec::new()
    }
}

/// Builds strategy instances on first use.
pub trait StrategyFactory {
    /// Construct the strategy for `kind`.
    fn create(&mut self, kind: StrategyKind) -> Box<dyn LayoutManager>;
}

/// Factory for the two built-in strategies.
#[derive(Debug, Clone, Default)]
pub struct DefaultStrategyFactory {
    config: ViewerConfig,
}

impl DefaultStrategyFactory {
    /// Factory configuring strategies from `config`.
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }
}

impl StrategyFactory for DefaultStrategyFactory {
    fn create(&mut self, kind: StrategyKind) -> Box<dyn LayoutManager> {
        match kind {
            StrategyKind::Pager => Box::new(PagerLayoutManager::new(&self.config)),
            StrategyKind::Scroll => Box::new(ScrollLayoutManager::new(&self.config)),
        }
    }
}

// ===== Shared fill helpers =====

/// What the provider can show right now.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProviderStatus {
    Failed(String),
    Pending,
    Empty,
    Ready(usize),
}

impl ProviderStatus {
    pub(crate) fn of(provider: &dyn ItemProvider, messages: &Messages) -> Self {
        if let Some(error) = provider.error() {
            let message = if error.is_empty() {
                messages.default_error.clone()
            } else {
                error.to_string()
            };
            return ProviderStatus::Failed(message);
        }
        match provider.size() {
            None => ProviderStatus::Pending,
            Some(0) => ProviderStatus::Empty,
            Some(size) => ProviderStatus::Ready(size),
        }
    }
}

/// Placeholder strings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Messages {
    pub(crate) empty: String,
    pub(crate) default_error: String,
}

impl Messages {
    pub(crate) fn from_config(config: &ViewerConfig) -> Self {
        Self {
            empty: config.empty_message.clone(),
            default_error: config.default_error_message.clone(),
        }
    }
}

/// Unbind and release every view whose index fails `keep`.
pub(crate) fn release_views(
    views: &mut Vec<ContentView>,
    provider: &mut dyn ItemProvider,
    pool: &mut ResourcePool,
    keep: impl Fn(usize) -> bool,
) -> usize {
    let mut released = 0;
    let mut i = 0;
    while i < views.len() {
        if views[i].index().is_some_and(&keep) {
            i += 1;
            continue;
        }
        let mut view = views.swap_remove(i);
        unbind_view(provider, &mut view);
        pool.release_content_view(view);
        released += 1;
    }
    views.sort_by_key(ContentView::index);
    released
}

/// Run unbind then bind again on every bound view so it picks up fresh content.
pub(crate) fn rebind_views(views: &mut [ContentView], provider: &mut dyn ItemProvider) {
    for view in views.iter_mut() {
        if let Some(index) = view.index() {
            unbind_view(provider, view);
            bind_view(provider, view, index);
        }
    }
}
