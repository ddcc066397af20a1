//! Page-by-page strategy.
//!
//! Page `i` fills the viewport, shifted horizontally by
//! `(i - current) * width * sign + drag` where `sign` follows the page
//! direction. Dragging moves the strip; releasing commits a turn past a third
//! of the width or snaps back. The current page can be zoomed and panned.

use super::animation::{SnapAnimation, MIN_FLING_VELOCITY, SNAP_DURATION};
use super::edge::{Edge, EdgeEffect, EdgeGlow};
use super::placeholder::PlaceholderSlot;
use super::{
    rebind_views, release_views, FrameItem, LayoutContext, LayoutManager, Messages,
    ProviderStatus,
};
use crate::config::ViewerConfig;
use crate::model::{PageDirection, Point, Rect, ScrollDelta, Size, StrategyKind};
use crate::pool::{ContentView, ResourcePool};
use crate::provider::{bind_view, ItemProvider};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Fraction of the width a drag must exceed to turn the page on release.
const TURN_THRESHOLD: f32 = 1.0 / 3.0;

/// Damping applied to drags toward a missing neighbour.
const RUBBER_BAND: f32 = 0.3;

/// Zoom level a double tap toggles to.
const DOUBLE_TAP_SCALE: f32 = 2.0;

/// Zoom of the current page: scale plus the top-left of the scaled page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Zoom {
    scale: f32,
    left: f32,
    top: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            left: 0.0,
            top: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PagerAnimation {
    /// Committed turn by `step` pages.
    Turn { snap: SnapAnimation, step: isize },
    /// Drag offset returning to zero.
    Settle(SnapAnimation),
    /// Zoom toggle around a focus point.
    Zoom { snap: SnapAnimation, focus: Point },
}

/// Snapshot of everything page placement depends on.
#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    viewport: Size,
    sign: f32,
    current: usize,
    drag: f32,
    zoom: Zoom,
}

impl PageGeometry {
    fn left(&self, index: usize) -> f32 {
        (index as f32 - self.current as f32) * self.viewport.width * self.sign + self.drag
    }

    fn rect(&self, index: usize) -> Rect {
        let left = self.left(index);
        if index == self.current && self.zoom.scale > 1.0 {
            Rect::new(
                left + self.zoom.left,
                self.zoom.top,
                left + self.zoom.left + self.viewport.width * self.zoom.scale,
                self.zoom.top + self.viewport.height * self.zoom.scale,
            )
        } else {
            Rect::from_origin_size(left, 0.0, self.viewport)
        }
    }

    fn visible(&self, size: usize) -> Vec<usize> {
        let viewport = Rect::from_size(self.viewport);
        let first = self.current.saturating_sub(1);
        let last = (self.current + 1).min(size.saturating_sub(1));
        let visible: Vec<usize> = (first..=last)
            .filter(|&index| self.rect(index).intersects(&viewport))
            .collect();
        if visible.is_empty() {
            vec![self.current]
        } else {
            visible
        }
    }
}

/// Strategy that shows one page at a time.
pub struct PagerLayoutManager {
    provider: Option<Box<dyn ItemProvider>>,
    direction: PageDirection,
    viewport: Size,
    current: usize,
    size: usize,
    drag: f32,
    zoom: Zoom,
    animation: Option<PagerAnimation>,
    edge: EdgeEffect,
    pages: Vec<ContentView>,
    placeholder: PlaceholderSlot,
    dirty: bool,
    reported: Option<usize>,
    notify_internal: bool,
    max_scale: f32,
    messages: Messages,
}

impl PagerLayoutManager {
    /// Pager configured from `config`, advancing in the configured mode's direction.
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            provider: None,
            direction: config.layout_mode.page_direction().unwrap_or_default(),
            viewport: Size::default(),
            current: 0,
            size: 0,
            drag: 0.0,
            zoom: Zoom::default(),
            animation: None,
            edge: EdgeEffect::default(),
            pages: Vec::new(),
            placeholder: PlaceholderSlot::default(),
            dirty: true,
            reported: None,
            notify_internal: false,
            max_scale: config.max_scale.max(1.0),
            messages: Messages::from_config(config),
        }
    }

    /// Current page direction.
    pub fn page_direction(&self) -> PageDirection {
        self.direction
    }

    /// Zoom factor of the current page.
    pub fn scale(&self) -> f32 {
        self.zoom.scale
    }

    /// Horizontal drag offset of the current page.
    pub fn drag_offset(&self) -> f32 {
        self.drag
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            viewport: self.viewport,
            sign: self.direction.sign(),
            current: self.current,
            drag: self.drag,
            zoom: self.zoom,
        }
    }

    fn is_zoomed(&self) -> bool {
        self.zoom.scale > 1.0
    }

    fn is_turning(&self) -> bool {
        matches!(self.animation, Some(PagerAnimation::Turn { .. }))
    }

    fn has_neighbor(&self, step: isize) -> bool {
        match step {
            -1 => self.current > 0,
            1 => self.current + 1 < self.size,
            _ => false,
        }
    }

    /// The neighbour a strip shifted by `offset` reveals.
    fn step_toward(&self, offset: f32) -> isize {
        if offset * self.direction.sign() < 0.0 {
            1
        } else {
            -1
        }
    }

    fn start_turn(&mut self, step: isize) {
        let target = -(step as f32) * self.viewport.width * self.direction.sign();
        trace!(step, from = self.drag, target, "page turn committed");
        self.animation = Some(PagerAnimation::Turn {
            snap: SnapAnimation::new(self.drag, target, SNAP_DURATION),
            step,
        });
        self.dirty = true;
    }

    fn finish_turn(&mut self, step: isize) {
        let last = self.size.saturating_sub(1) as isize;
        self.current = (self.current as isize + step).clamp(0, last) as usize;
        self.drag = 0.0;
        self.zoom = Zoom::default();
        self.notify_internal = true;
        debug!(index = self.current, "page turn finished");
    }

    fn set_zoom(&mut self, scale: f32, focus: Point) {
        let scale = scale.clamp(1.0, self.max_scale);
        let ratio = scale / self.zoom.scale;
        self.zoom = Zoom {
            scale,
            left: focus.x - (focus.x - self.zoom.left) * ratio,
            top: focus.y - (focus.y - self.zoom.top) * ratio,
        };
        self.clamp_zoom();
        self.dirty = true;
    }

    fn clamp_zoom(&mut self) {
        if self.zoom.scale <= 1.0 {
            self.zoom = Zoom::default();
            return;
        }
        let min_left = self.viewport.width * (1.0 - self.zoom.scale);
        let min_top = self.viewport.height * (1.0 - self.zoom.scale);
        self.zoom.left = self.zoom.left.clamp(min_left.min(0.0), 0.0);
        self.zoom.top = self.zoom.top.clamp(min_top.min(0.0), 0.0);
    }
}

impl LayoutManager for PagerLayoutManager {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pager
    }

    fn attach(&mut self, provider: Box<dyn ItemProvider>) {
        debug_assert!(self.provider.is_none(), "pager attached twice");
        if self.provider.is_some() {
            warn!("pager attached while already attached, replacing provider");
        }
        self.provider = Some(provider);
        self.size = 0;
        self.reported = None;
        self.notify_internal = false;
        self.dirty = true;
        debug!(direction = ?self.direction, "pager attached");
    }

    fn detach(&mut self, pool: &mut ResourcePool) -> Option<Box<dyn ItemProvider>> {
        let mut provider = self.provider.take()?;
        release_views(&mut self.pages, &mut *provider, pool, |_| false);
        self.placeholder.clear(pool);
        self.animation = None;
        self.edge.clear();
        self.drag = 0.0;
        self.zoom = Zoom::default();
        self.dirty = true;
        debug!(index = self.current, "pager detached");
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
            self.viewport = size;
            self.clamp_zoom();
            self.dirty = true;
        }
    }

    fn set_page_direction(&mut self, direction: PageDirection) {
        if direction != self.direction {
            debug!(?direction, "pager direction changed");
            self.direction = direction;
            self.drag = 0.0;
            self.edge.clear();
            if !matches!(self.animation, Some(PagerAnimation::Zoom { .. })) {
                self.animation = None;
            }
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
                    release_views(&mut self.pages, provider, ctx.pool, |_| false);
                }
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
        self.size = size;
        if self.current >= size {
            self.current = size - 1;
        }

        let geometry = self.geometry();
        let visible = geometry.visible(size);
        let Some(provider) = self.provider.as_deref_mut() else {
            return false;
        };
        release_views(&mut self.pages, provider, ctx.pool, |index| {
            visible.contains(&index)
        });
        for &index in &visible {
            if !self.pages.iter().any(|page| page.index() == Some(index)) {
                let mut view = ctx.pool.obtain_content_view();
                bind_view(provider, &mut view, index);
                self.pages.push(view);
            }
        }
        self.pages.sort_by_key(ContentView::index);
        for page in &mut self.pages {
            if let Some(index) = page.index() {
                page.set_rect(geometry.rect(index));
            }
        }

        if self.reported != Some(self.current) {
            ctx.listener
                .on_scroll_to_page(self.current, self.notify_internal);
            self.reported = Some(self.current);
        }
        true
    }

    fn on_down(&mut self) {
        // Catch a page that is snapping back.
        if matches!(self.animation, Some(PagerAnimation::Settle(_))) {
            self.animation = None;
        }
    }

    fn on_up(&mut self) {
        self.edge.on_release();
        if self.animation.is_some() || self.drag == 0.0 {
            return;
        }
        let step = self.step_toward(self.drag);
        if self.drag.abs() > self.viewport.width * TURN_THRESHOLD && self.has_neighbor(step) {
            self.start_turn(step);
        } else {
            trace!(drag = self.drag, "snapping back");
            self.animation = Some(PagerAnimation::Settle(SnapAnimation::new(
                self.drag,
                0.0,
                SNAP_DURATION,
            )));
            self.dirty = true;
        }
    }

    fn on_scroll(&mut self, delta: ScrollDelta) {
        if self.provider.is_none() || self.is_turning() {
            return;
        }
        if self.is_zoomed() {
            self.zoom.left -= delta.dx;
            self.zoom.top -= delta.dy;
            self.clamp_zoom();
            self.dirty = true;
            return;
        }

        let mut dx = -delta.dx;
        let next = self.drag + dx;
        if next != 0.0 && !self.has_neighbor(self.step_toward(next)) {
            if next.abs() > self.drag.abs() {
                let edge = if next > 0.0 { Edge::Left } else { Edge::Right };
                self.edge.on_pull(edge, dx.abs(), self.viewport.width);
            }
            dx *= RUBBER_BAND;
        }
        let limit = self.viewport.width;
        self.drag = (self.drag + dx).clamp(-limit, limit);
        self.notify_internal = true;
        self.dirty = true;
    }

    fn on_fling(&mut self, velocity_x: f32, _velocity_y: f32) {
        if self.provider.is_none()
            || self.is_zoomed()
            || self.is_turning()
            || velocity_x.abs() < MIN_FLING_VELOCITY
        {
            return;
        }
        let step = self.step_toward(velocity_x);
        if self.has_neighbor(step) {
            self.start_turn(step);
        } else {
            let edge = if velocity_x > 0.0 { Edge::Left } else { Edge::Right };
            self.edge.on_absorb(edge, velocity_x);
            self.dirty = true;
        }
    }

    fn can_scale(&self) -> bool {
        !self.is_turning()
    }

    fn on_scale(&mut self, focus_x: f32, focus_y: f32, factor: f32) {
        if self.provider.is_none() || self.is_turning() {
            return;
        }
        if matches!(self.animation, Some(PagerAnimation::Zoom { .. })) {
            self.animation = None;
        }
        self.set_zoom(self.zoom.scale * factor, Point::new(focus_x, focus_y));
    }

    fn on_double_tap_confirmed(&mut self, x: f32, y: f32) {
        if self.provider.is_none() || self.is_turning() {
            return;
        }
        let target = if self.is_zoomed() {
            1.0
        } else {
            DOUBLE_TAP_SCALE.min(self.max_scale)
        };
        self.animation = Some(PagerAnimation::Zoom {
            snap: SnapAnimation::new(self.zoom.scale, target, SNAP_DURATION),
            focus: Point::new(x, y),
        });
        self.dirty = true;
    }

    fn update_animation(&mut self, now: Duration) -> bool {
        let glowing = self.edge.update(now);
        let Some(mut animation) = self.animation.take() else {
            return glowing;
        };
        let finished = match &mut animation {
            PagerAnimation::Turn { snap, step } => {
                let (value, done) = snap.update(now);
                self.drag = value;
                if done {
                    self.finish_turn(*step);
                }
                done
            }
            PagerAnimation::Settle(snap) => {
                let (value, done) = snap.update(now);
                self.drag = value;
                done
            }
            PagerAnimation::Zoom { snap, focus } => {
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
        let Some(provider) = self.provider.as_deref_mut() else {
            return;
        };
        if provider.error().is_some() {
            return;
        }
        let Some(size) = provider.size() else {
            return;
        };
        let released = release_views(&mut self.pages, provider, pool, |index| index < size);
        rebind_views(&mut self.pages, provider);
        self.size = size;
        if size > 0 && self.current >= size {
            self.current = size - 1;
            self.notify_internal = false;
        }
        debug!(size, released, "pager data changed");
    }

    fn find_page_by_index(&self, index: usize) -> Option<&ContentView> {
        self.pages.iter().find(|page| page.index() == Some(index))
    }

    fn find_page_by_index_mut(&mut self, index: usize) -> Option<&mut ContentView> {
        let page = self.pages.iter_mut().find(|page| page.index() == Some(index))?;
        self.dirty = true;
        Some(page)
    }

    fn current_index(&self) -> Option<usize> {
        self.find_page_by_index(self.current).map(|_| self.current)
    }

    fn jump_to_index(&mut self, index: usize, internal: bool) {
        self.restore_index(index);
        self.reported = None;
        self.notify_internal = internal;
    }

    fn restore_index(&mut self, index: usize) {
        self.animation = None;
        self.drag = 0.0;
        self.zoom = Zoom::default();
        self.current = if self.size > 0 {
            index.min(self.size - 1)
        } else {
            index
        };
        self.reported = Some(self.current);
        self.notify_internal = false;
        self.dirty = true;
    }

    fn edge_glows(&self) -> Vec<EdgeGlow> {
        self.edge.glows()
    }

    fn visible_items(&self) -> Vec<FrameItem<'_>> {
        match self.placeholder.item() {
            Some(item) => vec![item],
            None => self.pages.iter().map(FrameItem::Page).collect(),
        }
    }
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
