//! The viewer controller: owner of the queue, the gesture state and the
//! strategies, and driver of each frame.
//!
//! Everything here runs on the rendering thread. Producers only ever reach
//! the controller through a [`ViewerHandle`], which posts into the command
//! queue; attach, detach and mode switches happen while draining.

mod hit_zones;
mod listener;
mod report;
mod strategies;

pub use hit_zones::{HitZone, HitZones};
pub use listener::{ActionListener, NoopListener, ViewerAction};
pub use report::{describe_items, FrameReport};
pub use strategies::StrategySet;

use crate::config::ViewerConfig;
use crate::gesture::{GestureState, Routing};
use crate::layout::{
    DefaultStrategyFactory, EdgeGlow, FrameItem, LayoutContext, LayoutManager, StrategyFactory,
};
use crate::model::{Command, LayoutMode, Rect, Size, StrategyKind};
use crate::pool::{ContentView, GlyphAtlas, ResourcePool};
use crate::provider::ItemProvider;
use crate::queue::{CommandQueue, ViewerHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Top-level viewer state, living on the rendering thread.
pub struct ViewerController {
    queue: Arc<CommandQueue>,
    scratch: Vec<Command>,
    gesture: GestureState,
    strategies: StrategySet,
    // Held here only while no strategy is attached.
    provider: Option<Box<dyn ItemProvider>>,
    mode: LayoutMode,
    pool: ResourcePool,
    listener: Box<dyn ActionListener>,
    hit_zones: HitZones,
    viewport: Size,
    glyphs: Option<GlyphAtlas>,
}

impl ViewerController {
    /// Controller with the built-in strategies.
    ///
    /// `waker` runs on whatever thread posts a command; it should only
    /// schedule a frame.
    pub fn new(
        provider: Box<dyn ItemProvider>,
        listener: Box<dyn ActionListener>,
        config: &ViewerConfig,
        waker: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let factory = DefaultStrategyFactory::new(config.clone());
        Self::with_factory(provider, listener, config, Box::new(factory), waker)
    }

    /// Controller building strategies with a custom factory.
    pub fn with_factory(
        mut provider: Box<dyn ItemProvider>,
        listener: Box<dyn ActionListener>,
        config: &ViewerConfig,
        factory: Box<dyn StrategyFactory>,
        waker: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let queue = Arc::new(CommandQueue::new(waker));
        provider.attach_viewer(ViewerHandle::new(&queue));
        Self {
            queue,
            scratch: Vec::new(),
            gesture: GestureState::new(),
            strategies: StrategySet::new(factory),
            provider: Some(provider),
            mode: config.layout_mode,
            pool: ResourcePool::from_config(config),
            listener,
            hit_zones: HitZones::default(),
            viewport: Size::default(),
            glyphs: None,
        }
    }

    /// A producer-side handle for gesture callbacks and mode switches.
    pub fn handle(&self) -> ViewerHandle {
        ViewerHandle::new(&self.queue)
    }

    /// Mode requested most recently (applied or remembered).
    pub fn layout_mode(&self) -> LayoutMode {
        self.mode
    }

    /// Current gesture flags.
    pub fn gesture_state(&self) -> GestureState {
        self.gesture
    }

    /// Kind of the attached strategy, if any.
    pub fn active_strategy(&self) -> Option<StrategyKind> {
        self.strategies.active_kind()
    }

    /// The strategy instance for `kind`, if built.
    pub fn strategy(&self, kind: StrategyKind) -> Option<&dyn LayoutManager> {
        self.strategies.get(kind)
    }

    /// The view recycler.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Tap regions from the latest changed layout pass.
    pub fn hit_zones(&self) -> HitZones {
        self.hit_zones
    }

    /// Page-number glyphs, present while a surface is attached.
    pub fn glyphs(&self) -> Option<&GlyphAtlas> {
        self.glyphs.as_ref()
    }

    /// Viewport size from the latest layout pass.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    // ===== Host lifecycle =====

    /// The host surface exists: build placeholder resources and attach the
    /// strategy for the current mode.
    pub fn attach_surface(&mut self) {
        if self.strategies.active_kind().is_some() {
            warn!("surface attached twice");
            return;
        }
        let Some(provider) = self.provider.take() else {
            warn!("no provider to attach");
            return;
        };
        self.glyphs = Some(GlyphAtlas::digits());

        let mode = self.mode;
        let viewport = self.viewport;
        let layout = self.strategies.activate(mode.strategy());
        if let Some(direction) = mode.page_direction() {
            layout.set_page_direction(direction);
        }
        layout.set_viewport(viewport);
        layout.attach(provider);
        info!(%mode, "surface attached");
        self.queue.wake();
    }

    /// The host surface is going away: detach the strategy and drop every
    /// cached view and texture.
    pub fn detach_surface(&mut self) {
        if let Some(layout) = self.strategies.active_mut() {
            match layout.detach(&mut self.pool) {
                Some(provider) => self.provider = Some(provider),
                None => warn!("active strategy held no provider"),
            }
        }
        self.strategies.deactivate();
        self.glyphs = None;
        self.gesture = GestureState::new();
        debug!(stats = ?self.pool.stats(), "surface detached");
        self.pool.clear();
    }

    /// Layout pass with the viewer's bounds. Recomputes the hit zones when
    /// `changed`, then fills.
    pub fn layout(&mut self, bounds: Rect, changed: bool) -> bool {
        self.viewport = bounds.size();
        if changed {
            self.hit_zones = HitZones::compute(self.viewport);
            debug!(width = self.viewport.width, height = self.viewport.height, "layout changed");
        }
        let viewport = self.viewport;
        if let Some(layout) = self.strategies.active_mut() {
            layout.set_viewport(viewport);
        }
        self.fill()
    }

    // ===== Frame drive =====

    /// One frame: drain commands, advance animations, fill.
    pub fn render_frame(&mut self, now: Duration) -> FrameReport {
        let commands = self.drain_commands();
        let animating = self
            .strategies
            .active_mut()
            .is_some_and(|layout| layout.update_animation(now));
        let filled = self.fill();
        if animating {
            self.queue.wake();
        }
        let report = FrameReport {
            commands,
            animating,
            filled,
            mode: self.mode,
            current_index: self.current_index(),
            items: self.visible_items().len(),
        };
        trace!(summary = %report.summary(), "frame rendered");
        report
    }

    /// Execute every pending command in submission order. Returns how many
    /// ran. Commands posted while draining run on the next call.
    pub fn drain_commands(&mut self) -> usize {
        let mut commands = std::mem::take(&mut self.scratch);
        self.queue.drain_into(&mut commands);
        let count = commands.len();
        if count > 0 {
            trace!(count, "draining commands");
        }
        for command in commands.drain(..) {
            self.dispatch(command);
        }
        self.scratch = commands;
        count
    }

    /// Run a fill pass on the active strategy.
    pub fn fill(&mut self) -> bool {
        let Some(layout) = self.strategies.active_mut() else {
            return false;
        };
        let mut ctx = LayoutContext {
            pool: &mut self.pool,
            listener: self.listener.as_mut(),
        };
        layout.fill(&mut ctx)
    }

    fn dispatch(&mut self, command: Command) {
        if let Command::SetLayoutMode { mode } = command {
            self.switch_mode(mode);
            return;
        }
        let routing = self.gesture.handle(&command, self.strategies.active_mut());
        if let Command::SingleTapConfirmed { x, y } = command {
            if self.hit_zones.classify(x, y) == Some(HitZone::Center) {
                debug!(x, y, "centre tap");
                self.listener.on_tap_center();
            }
        }
        if routing == Routing::NoTarget {
            trace!(command = command.name(), "no strategy attached");
        }
    }

    fn switch_mode(&mut self, mode: LayoutMode) {
        if mode == self.mode {
            trace!(%mode, "layout mode unchanged");
            return;
        }
        let previous = self.mode;
        self.mode = mode;
        let target = mode.strategy();

        let Some(active) = self.strategies.active_kind() else {
            debug!(%mode, "no surface, mode applies on attach");
            return;
        };

        if active == target {
            if let (Some(layout), Some(direction)) =
                (self.strategies.active_mut(), mode.page_direction())
            {
                layout.set_page_direction(direction);
            }
            debug!(from = %previous, to = %mode, "page direction switched");
            return;
        }

        let (index, provider) = match self.strategies.active_mut() {
            Some(layout) => (layout.current_index(), layout.detach(&mut self.pool)),
            None => (None, None),
        };
        self.strategies.deactivate();

        let viewport = self.viewport;
        let layout = self.strategies.activate(target);
        if let Some(direction) = mode.page_direction() {
            layout.set_page_direction(direction);
        }
        layout.set_viewport(viewport);
        match provider {
            Some(provider) => layout.attach(provider),
            None => warn!("previous strategy held no provider"),
        }
        if let Some(index) = index {
            layout.restore_index(index);
        }
        info!(from = %previous, to = %mode, ?index, "layout mode switched");
    }

    // ===== Render-thread queries and calls =====

    /// The provider's data changed. Render thread only.
    pub fn on_data_changed(&mut self) {
        if let Some(layout) = self.strategies.active_mut() {
            layout.on_data_changed(&mut self.pool);
            self.queue.wake();
        }
    }

    /// Bound view for `index`, if laid out.
    pub fn find_page_by_index(&self, index: usize) -> Option<&ContentView> {
        self.strategies.active()?.find_page_by_index(index)
    }

    /// Bound view for `index`, mutably, so a provider's loader can push
    /// progress or finished content into it. Schedules a frame.
    pub fn find_page_by_index_mut(&mut self, index: usize) -> Option<&mut ContentView> {
        let layout = self.strategies.active_mut()?;
        let view = layout.find_page_by_index_mut(index)?;
        self.queue.wake();
        Some(view)
    }

    /// Item count as the provider reports it right now.
    pub fn item_count(&self) -> Option<usize> {
        match self.provider.as_deref() {
            Some(provider) => provider.size(),
            None => self.strategies.active()?.provider()?.size(),
        }
    }

    /// Current page, if laid out.
    pub fn current_index(&self) -> Option<usize> {
        self.strategies.active()?.current_index()
    }

    /// Navigate to `index` on behalf of the host. The listener hears about it
    /// as an external move.
    pub fn jump_to_index(&mut self, index: usize) {
        if let Some(layout) = self.strategies.active_mut() {
            layout.jump_to_index(index, false);
            self.queue.wake();
        }
    }

    /// Views to draw this frame.
    pub fn visible_items(&self) -> Vec<FrameItem<'_>> {
        self.strategies
            .active()
            .map(|layout| layout.visible_items())
            .unwrap_or_default()
    }

    /// Overscroll glows to draw after the content.
    pub fn edge_glows(&self) -> Vec<EdgeGlow> {
        self.strategies
            .active()
            .map(|layout| layout.edge_glows())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
