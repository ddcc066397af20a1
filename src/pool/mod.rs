//! Bounded recyclers for content views and placeholder views.
//!
//! Content views live in a fixed-capacity LIFO [`Pool`]: the most recently
//! released view is handed out first, and a view released into a full pool
//! is dropped instead of growing the pool. The progress and error
//! placeholders are cached in single slots, since at most one placeholder is
//! on screen at any time.

pub mod views;

pub use views::{
    ContentView, ErrorView, GlyphAtlas, PageContent, ProgressView, TextTexture, ViewId,
};

use crate::config::ViewerConfig;
use serde::Serialize;
use tracing::{debug, trace};

/// Default number of content views kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 5;

/// Fixed-capacity LIFO stack of reusable items.
#[derive(Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    /// Create an empty pool holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Take the most recently pushed item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Store an item for reuse.
    ///
    /// Returns the item back when the pool is full; the caller drops it.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.items.len() >= self.capacity {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    /// Number of pooled items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is pooled.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of pooled items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every pooled item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Allocation counters for content views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Views constructed because the pool was empty.
    pub created: usize,
    /// Views handed out from the pool.
    pub reused: usize,
    /// Views dropped because the pool was full.
    pub discarded: usize,
}

/// Every recyclable view the layout strategies draw from.
#[derive(Debug)]
pub struct ResourcePool {
    pages: Pool<ContentView>,
    progress: Option<ProgressView>,
    error: Option<ErrorView>,
    page_min_height: f32,
    progress_size: f32,
    next_id: u64,
    stats: PoolStats,
}

impl ResourcePool {
    /// Create a pool with explicit sizing.
    pub fn new(capacity: usize, page_min_height: f32, progress_size: f32) -> Self {
        Self {
            pages: Pool::new(capacity),
            progress: None,
            error: None,
            page_min_height,
            progress_size,
            next_id: 0,
            stats: PoolStats::default(),
        }
    }

    /// Create a pool sized from the viewer configuration.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.pool_capacity,
            config.page_min_height,
            config.progress_size,
        )
    }

    fn next_id(&mut self) -> ViewId {
        self.next_id += 1;
        ViewId::new(self.next_id)
    }

    // ===== Content views =====

    /// Reuse the most recently released content view, or build a new one.
    pub fn obtain_content_view(&mut self) -> ContentView {
        match self.pages.pop() {
            Some(view) => {
                self.stats.reused += 1;
                view
            }
            None => {
                self.stats.created += 1;
                let id = self.next_id();
                trace!(id = id.get(), "content view created");
                ContentView::new(id, self.page_min_height)
            }
        }
    }

    /// Clear the view's binding and keep it for reuse, unless the pool is full.
    ///
    /// Callers run the provider's unbind hook first.
    pub fn release_content_view(&mut self, mut view: ContentView) {
        view.reset();
        if let Err(view) = self.pages.push(view) {
            self.stats.discarded += 1;
            trace!(id = view.id().get(), "pool full, content view dropped");
        }
    }

    /// Number of content views waiting for reuse.
    pub fn pooled_content_views(&self) -> usize {
        self.pages.len()
    }

    // ===== Progress placeholder =====

    /// Take the cached progress view, or build one.
    pub fn obtain_progress_view(&mut self) -> ProgressView {
        match self.progress.take() {
            Some(view) => view,
            None => {
                let id = self.next_id();
                ProgressView::new(id, self.progress_size)
            }
        }
    }

    /// Cache the progress view, replacing any cached one.
    pub fn release_progress_view(&mut self, view: ProgressView) {
        self.progress = Some(view);
    }

    // ===== Error placeholder =====

    /// Take the cached error view, or build one. The view comes back unbound.
    pub fn obtain_error_view(&mut self) -> ErrorView {
        match self.error.take() {
            Some(view) => view,
            None => {
                let id = self.next_id();
                ErrorView::new(id)
            }
        }
    }

    /// Bind `message` to the error view, releasing any previous texture.
    pub fn bind_error_view(&mut self, view: &mut ErrorView, message: &str) {
        if let Some(previous) = view.bind_texture(TextTexture::new(message)) {
            previous.recycle();
        }
    }

    /// Release the error view's texture. Safe to call when nothing is bound.
    pub fn unbind_error_view(&mut self, view: &mut ErrorView) {
        if let Some(texture) = view.take_texture() {
            texture.recycle();
        }
    }

    /// Unbind the error view and cache it.
    pub fn release_error_view(&mut self, mut view: ErrorView) {
        self.unbind_error_view(&mut view);
        self.error = Some(view);
    }

    // ===== Housekeeping =====

    /// Drop every cached view and placeholder.
    pub fn clear(&mut self) {
        debug!(stats = ?self.stats, pooled = self.pages.len(), "resource pool cleared");
        self.pages.clear();
        self.progress = None;
        if let Some(mut view) = self.error.take() {
            self.unbind_error_view(&mut view);
        }
    }

    /// Allocation counters since construction.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
