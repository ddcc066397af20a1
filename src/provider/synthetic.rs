//! Deterministic provider used by the host shell, the replayer and tests.

use super::ItemProvider;
use crate::pool::{ContentView, PageContent};
use crate::queue::ViewerHandle;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

const PAGE_WIDTH: f32 = 1000.0;
const PAGE_HEIGHTS: [f32; 5] = [1414.0, 1500.0, 1200.0, 1800.0, 700.0];

/// Shared bind/unbind tallies, readable after the provider moved into the viewer.
#[derive(Debug, Clone, Default)]
pub struct BindCounters {
    binds: Arc<AtomicUsize>,
    unbinds: Arc<AtomicUsize>,
}

impl BindCounters {
    /// Total bind hooks run.
    pub fn binds(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }

    /// Total unbind hooks run.
    pub fn unbinds(&self) -> usize {
        self.unbinds.load(Ordering::SeqCst)
    }

    /// Views currently bound.
    pub fn live(&self) -> usize {
        self.binds().saturating_sub(self.unbinds())
    }
}

/// Pages with fixed, index-derived sizes.
///
/// Every page is 1000 px wide and cycles through five heights, so the scroll
/// strategy sees varying item heights. Selected pages can be made to fail or
/// to stay loading forever.
#[derive(Debug, Default)]
pub struct SyntheticProvider {
    size: Option<usize>,
    error: Option<String>,
    failing: BTreeSet<usize>,
    loading: BTreeSet<usize>,
    counters: BindCounters,
    viewer: Option<ViewerHandle>,
}

impl SyntheticProvider {
    /// Provider with `page_count` pages.
    pub fn new(page_count: usize) -> Self {
        Self {
            size: Some(page_count),
            ..Self::default()
        }
    }

    /// Provider whose page count is not known yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Make the given pages bind as failed.
    pub fn with_failing_pages(mut self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.failing.extend(pages);
        self
    }

    /// Make the given pages bind as still loading.
    pub fn with_loading_pages(mut self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.loading.extend(pages);
        self
    }

    /// Report a provider-level error.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Handle to the bind/unbind tallies.
    pub fn counters(&self) -> BindCounters {
        self.counters.clone()
    }

    /// Change the page count and ask the viewer for a frame.
    pub fn set_size(&mut self, size: Option<usize>) {
        self.size = size;
        self.request_redraw();
    }

    /// Change the provider-level error and ask the viewer for a frame.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.request_redraw();
    }

    /// Intrinsic size of page `index`.
    pub fn page_size(index: usize) -> (f32, f32) {
        (PAGE_WIDTH, PAGE_HEIGHTS[index % PAGE_HEIGHTS.len()])
    }

    fn request_redraw(&self) {
        if let Some(viewer) = &self.viewer {
            viewer.request_redraw();
        }
    }
}

impl ItemProvider for SyntheticProvider {
    fn size(&self) -> Option<usize> {
        self.size
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn on_bind(&mut self, view: &mut ContentView, index: usize) {
        self.counters.binds.fetch_add(1, Ordering::SeqCst);
        let content = if self.failing.contains(&index) {
            PageContent::Failed {
                message: format!("Page {} failed to load", index + 1),
            }
        } else if self.loading.contains(&index) {
            PageContent::Loading { progress: None }
        } else {
            let (width, height) = Self::page_size(index);
            PageContent::Ready { width, height }
        };
        trace!(index, view = view.id().get(), "page bound");
        view.set_content(content);
    }

    fn on_unbind(&mut self, view: &mut ContentView) {
        self.counters.unbinds.fetch_add(1, Ordering::SeqCst);
        trace!(index = ?view.index(), view = view.id().get(), "page unbound");
        view.set_content(PageContent::Empty);
    }

    fn attach_viewer(&mut self, viewer: ViewerHandle) {
        debug!("synthetic provider attached to viewer");
        self.viewer = Some(viewer);
    }
}
