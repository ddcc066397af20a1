//! Continuous vertical strategy.
//!
//! Items are stacked top to bottom at the (zoomed) viewport width. An item is
//! `min_height` tall until its content reports a size, then takes its aspect
//! ratio. Item offsets come from a Fenwick [`HeightIndex`].

use super::animation::{FlingAnimation, SnapAnimation, MIN_FLING_VELOCITY, SNAP_DURATION};
use super::edge::{Edge, EdgeEffect, EdgeGlow};
use super::height_index::HeightIndex;
use super::placeholder::PlaceholderSlot;
use super::{
    rebind_views, release_views, FrameItem, LayoutContext, LayoutManager, Messages,
    ProviderStatus,
};
use crate::config::ViewerConfig;
use crate::model::{Point, Rect, ScrollDelta, Size, StrategyKind};
use crate::pool::{ContentView, ResourcePool};
use crate::provider::{bind_view, ItemProvider};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Zoom level a double tap toggles to.
const DOUBLE_TAP_SCALE: f32 = 2.0;

/// Unconsumed fling distance (in pixels) that counts as hitting an edge.
const BOUNDARY_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
enum ScrollAnimation {
    Fling(FlingAnimation),
    Zoom { snap: SnapAnimation, focus: Point },
}

/// Item sizing inputs.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    content_width: f32,
    min_height: f32,
}

impl Metrics {
    fn height_px(&self, aspect: Option<f32>) -> usize {
        let height = match aspect {
            Some(aspect) => self.content_width * aspect,
            None => self.min_height,
        };
        height.round().max(1.0) as usize
    }
}

fn visible_range(heights: &HeightIndex, offset_y: f32, viewport_height: f32) -> RangeInclusive<usize> {
    let last_index = heights.len().saturating_sub(1);
    let first = heights
        .lower_bound(offset_y.max(0.0) as usize)
        .unwrap_or(last_index);
    let bottom = offset_y + viewport_height;
    let mut last = first;
    while last < last_index && (heights.top(last + 1) as f32) < bottom {
        last += 1;
    }
    first..=last
}

fn clamp_offset(offset: f32, content: f32, viewport: f32) -> f32 {
    offset.clamp(0.0, (content - viewport).max(0.0))
}

/// Strategy that scrolls through all items as one vertical strip.
pub struct ScrollLayoutManager {
    provider: Option<Box<dyn ItemProvider>>,
    viewport: Size,
    offset_x: f32,
    offset_y: f32,
    zoom: f32,
    heights: HeightIndex,
    aspects: Vec<Option<f32>>,
    heights_stale: bool,
    size: usize,
    items: Vec<ContentView>,
    placeholder: PlaceholderSlot,
    dirty: bool,
    animation: Option<ScrollAnimation>,
    edge: EdgeEffect,
    pending_index: Option<usize>,
    current: Option<usize>,
    reported: Option<usize>,
    notify_internal: bool,
    min_height: f32,
    max_scale: f32,
    scroll_zoom: bool,
    messages: Messages,
}

impl ScrollLayoutManager {
    /// Scroll strategy configured from `config`.
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            provider: None,
            viewport: Size::default(),
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
            heights: HeightIndex::new(0),
            aspects: Vec::new(),
            heights_stale: true,
            size: 0,
            items: Vec::new(),
            placeholder: PlaceholderSlot::default(),
            dirty: true,
            animation: None,
            edge: EdgeEffect::default(),
            pending_index: None,
            current: None,
            reported: None,
            notify_internal: false,
            min_height: config.page_min_height.max(1.0),
            max_scale: config.max_scale.max(1.0),
            scroll_zoom: config.scroll_zoom,
            messages: Messages::from_config(config),
        }
    }

    /// Vertical scroll offset in pixels.
    pub fn scroll_offset(&self) -> f32 {
        self.offset_y
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f32 {
        self.zoom
    }

    /// Total height of the strip as last laid out.
    pub fn content_height(&self) -> f32 {
        self.heights.total() as f32
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            content_width: self.viewport.width * self.zoom,
            min_height: self.min_height * self.zoom,
        }
    }

    fn rebuild_heights(&mut self) {
        let metrics = self.metrics();
        self.heights.clear();
        for index in 0..self.size {
            self.heights
                .push(metrics.height_px(self.aspects.get(index).copied().flatten()));
        }
        self.heights_stale = false;
    }

    /// Clamp both offsets; returns the vertical distance that was cut off.
    fn clamp_offsets(&mut self) -> f32 {
        let wanted = self.offset_y;
        self.offset_y = clamp_offset(self.offset_y, self.content_height(), self.viewport.height);
        self.offset_x = clamp_offset(
            self.offset_x,
            self.viewport.width * self.zoom,
            self.viewport.width,
        );
        wanted - self.offset_y
    }

    fn set_zoom(&mut self, zoom: f32, focus: Point) {
        let zoom = zoom.clamp(1.0, self.max_scale);
        let ratio = zoom / self.zoom;
        self.offset_y = (self.offset_y + focus.y) * ratio - focus.y;
        self.offset_x = (self.offset_x + focus.x) * ratio - focus.x;
        self.zoom = zoom;
        self.rebuild_heights();
        self.clamp_offsets();
        self.dirty = true;
    }
}

impl LayoutManager for ScrollLayoutManager {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Scroll
    }

    fn attach(&mut self, provider: Box<dyn ItemProvider>) {
        debug_assert!(self.provider.is_none(), "scroll strategy attached twice");
        if self.provider.is_some() {
            warn!("scroll strategy attached while already attached, replacing provider");
        }
        self.provider = Some(provider);
        self.size = 0;
        self.aspects.clear();
        self.heights_stale = true;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.current = None;
        self.reported = None;
        self.notify_internal = false;
        self.dirty = true;
        debug!("scroll strategy attached");
    }

    fn detach(&mut self, pool: &mut ResourcePool) -> Option<Box<dyn ItemProvider>> {
        let mut provider = self.provider.take()?;
        release_views(&mut self.items, &mut *provider, pool, |_| false);
        self.placeholder.clear(pool);
        self.animation = None;
        self.edge.clear();
        self.pending_index = None;
        self.current = None;
        self.dirty = true;
        debug!(offset = self.offset_y, "scroll strategy detached");
        Some(provider)
    }

    fn is_attached(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Option<&dyn ItemProvider> {
        self.provider.as_deref()
    }

    fn set_viewport(&mut self, size: Size) {
        if size != self.viewport {
            if size.width != self.viewport.width {
                self.heights_stale = true;
            }
            self.viewport = size;
            self.dirty = true;
        }
    }

    fn fill(&mut self, ctx: &mut LayoutContext<'_>) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;

        let status = match self.provider.as_deref() {
            Some(provider) => ProviderStatus::of(provider, &self.messages),
            None => return false,
        };
        let viewport = Rect::from_size(self.viewport);

        let size = match status {
            ProviderStatus::Ready(size) => size,
            other => {
                if let Some(provider) = self.provider.as_deref_mut() {
                    release_views(&mut self.items, provider, ctx.pool, |_| false);
                }
                self.current = None;
                match other {
                    ProviderStatus::Pending => self.placeholder.show_progress(ctx.pool, viewport),
                    ProviderStatus::Failed(message) => {
                        self.placeholder.show_error(ctx.pool, &message, viewport)
                    }
                    _ => {
                        let message = self.messages.empty.clone();
                        self.placeholder.show_error(ctx.pool, &message, viewport)
                    }
                }
                return true;
            }
        };

        self.placeholder.clear(ctx.pool);
        if size != self.size || self.heights_stale || self.heights.len() != size {
            self.size = size;
            self.aspects.resize(size, None);
            self.rebuild_heights();
        }
        if let Some(index) = self.pending_index.take() {
            self.offset_y = self.heights.top(index.min(size - 1)) as f32;
        }
        self.clamp_offsets();

        let metrics = self.metrics();
        let Some(provider) = self.provider.as_deref_mut() else {
            return false;
        };
        // Binding can reveal real heights, which moves what is visible.
        loop {
            let range = visible_range(&self.heights, self.offset_y, self.viewport.height);
            release_views(&mut self.items, provider, ctx.pool, |index| {
                range.contains(&index)
            });
            for index in range {
                if self.items.iter().any(|item| item.index() == Some(index)) {
                    continue;
                }
                let mut view = ctx.pool.obtain_content_view();
                bind_view(provider, &mut view, index);
                self.items.push(view);
            }
            // Content pushed into an already bound item counts as well.
            let mut resized = false;
            for item in &self.items {
                let Some(index) = item.index() else {
                    continue;
                };
                let aspect = item.content().aspect();
                if aspect.is_some() && self.aspects[index] != aspect {
                    self.aspects[index] = aspect;
                    self.heights.set(index, metrics.height_px(aspect));
                    resized = true;
                }
            }
            if !resized {
                break;
            }
            self.offset_y = clamp_offset(
                self.offset_y,
                self.heights.total() as f32,
                self.viewport.height,
            );
        }

        self.items.sort_by_key(ContentView::index);
        for item in &mut self.items {
            if let Some(index) = item.index() {
                let top = self.heights.top(index) as f32 - self.offset_y;
                let left = -self.offset_x;
                item.set_rect(Rect::new(
                    left,
                    top,
                    left + metrics.content_width,
                    top + self.heights.height(index) as f32,
                ));
            }
        }

        self.current = self.heights.lower_bound(self.offset_y.max(0.0) as usize);
        if let Some(current) = self.current {
            if self.reported != Some(current) {
                ctx.listener.on_scroll_to_page(current, self.notify_internal);
                self.reported = Some(current);
            }
        }
        true
    }

    fn on_down(&mut self) {
        if matches!(self.animation, Some(ScrollAnimation::Fling(_))) {
            trace!(offset = self.offset_y, "fling caught");
            self.animation = None;
        }
    }

    fn on_up(&mut self) {
        self.edge.on_release();
    }

    fn on_scroll(&mut self, delta: ScrollDelta) {
        if self.provider.is_none() {
            return;
        }
        self.offset_y += delta.dy;
        if self.zoom > 1.0 {
            self.offset_x += delta.dx;
        }
        let cut = self.clamp_offsets();
        if cut != 0.0 {
            let edge = if cut < 0.0 { Edge::Top } else { Edge::Bottom };
            self.edge.on_pull(edge, cut.abs(), self.viewport.height);
        }
        self.notify_internal = true;
        self.dirty = true;
    }

    fn on_fling(&mut self, _velocity_x: f32, velocity_y: f32) {
        if self.provider.is_none() || velocity_y.abs() < MIN_FLING_VELOCITY {
            return;
        }
        // Content follows the finger, so the offset moves against it.
        self.animation = Some(ScrollAnimation::Fling(FlingAnimation::new(-velocity_y)));
        self.dirty = true;
    }

    fn can_scale(&self) -> bool {
        self.scroll_zoom
    }

    fn on_scale(&mut self, focus_x: f32, focus_y: f32, factor: f32) {
        if !self.scroll_zoom || self.provider.is_none() {
            return;
        }
        if matches!(self.animation, Some(ScrollAnimation::Zoom { .. })) {
            self.animation = None;
        }
        self.set_zoom(self.zoom * factor, Point::new(focus_x, focus_y));
    }

    fn on_double_tap_confirmed(&mut self, x: f32, y: f32) {
        if !self.scroll_zoom || self.provider.is_none() {
            return;
        }
        let target = if self.zoom > 1.0 {
            1.0
        } else {
            DOUBLE_TAP_SCALE.min(self.max_scale)
        };
        self.animation = Some(ScrollAnimation::Zoom {
            snap: SnapAnimation::new(self.zoom, target, SNAP_DURATION),
            focus: Point::new(x, y),
        });
        self.dirty = true;
    }

    fn update_animation(&mut self, now: Duration) -> bool {
        let mut glowing = self.edge.update(now);
        let Some(mut animation) = self.animation.take() else {
            return glowing;
        };
        let finished = match &mut animation {
            ScrollAnimation::Fling(fling) => {
                let (delta, running) = fling.update(now);
                self.offset_y += delta;
                let cut = self.clamp_offsets();
                self.notify_internal = true;
                let hit_edge = cut.abs() > BOUNDARY_EPSILON;
                if hit_edge {
                    let edge = if cut < 0.0 { Edge::Top } else { Edge::Bottom };
                    self.edge.on_absorb(edge, fling.velocity());
                    glowing = self.edge.update(now);
                }
                !running || hit_edge
            }
            ScrollAnimation::Zoom { snap, focus } => {
                let (value, done) = snap.update(now);
                self.set_zoom(value, *focus);
                done
            }
        };
        if !finished {
            self.animation = Some(animation);
        }
        self.dirty = true;
        !finished || glowing
    }

    fn on_data_changed(&mut self, pool: &mut ResourcePool) {
        self.dirty = true;
        self.heights_stale = true;
        let Some(provider) = self.provider.as_deref_mut() else {
            return;
        };
        if provider.error().is_some() {
            return;
        }
        let Some(size) = provider.size() else {
            return;
        };
        let released = release_views(&mut self.items, provider, pool, |index| index < size);
        rebind_views(&mut self.items, provider);
        self.aspects.truncate(size);
        debug!(size, released, "scroll data changed");
    }

    fn find_page_by_index(&self, index: usize) -> Option<&ContentView> {
        self.items.iter().find(|item| item.index() == Some(index))
    }

    fn find_page_by_index_mut(&mut self, index: usize) -> Option<&mut ContentView> {
        let item = self.items.iter_mut().find(|item| item.index() == Some(index))?;
        self.dirty = true;
        Some(item)
    }

    fn current_index(&self) -> Option<usize> {
        self.current
            .filter(|&index| self.find_page_by_index(index).is_some())
    }

    fn jump_to_index(&mut self, index: usize, internal: bool) {
        self.restore_index(index);
        self.reported = None;
        self.notify_internal = internal;
    }

    fn restore_index(&mut self, index: usize) {
        self.pending_index = Some(index);
        self.animation = None;
        self.reported = Some(index);
        self.notify_internal = false;
        self.dirty = true;
    }

    fn edge_glows(&self) -> Vec<EdgeGlow> {
        self.edge.glows()
    }

    fn visible_items(&self) -> Vec<FrameItem<'_>> {
        match self.placeholder.item() {
            Some(item) => vec![item],
            None => self.items.iter().map(FrameItem::Page).collect(),
        }
    }
}

#[cfg(test)]
#[path = "scroll_tests.rs"]
mod tests;
