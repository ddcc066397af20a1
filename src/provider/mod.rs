//! The item provider contract: the external data source behind the viewer.
//!
//! A provider reports how many items exist (or that it does not know yet),
//! an optional error, and fills content views for indices. The viewer owns
//! the provider and hands it to whichever layout strategy is attached; the
//! provider only ever gets a non-owning [`ViewerHandle`] back.

mod synthetic;

pub use synthetic::{BindCounters, SyntheticProvider};

use crate::pool::ContentView;
use crate::queue::ViewerHandle;

/// Data source for the gallery.
pub trait ItemProvider {
    /// Number of items, or `None` while the count is still loading.
    fn size(&self) -> Option<usize>;

    /// Provider-level error. When present the viewer shows only the error.
    fn error(&self) -> Option<&str>;

    /// Fill `view` with the content for `index`.
    fn on_bind(&mut self, view: &mut ContentView, index: usize);

    /// Release whatever `on_bind` attached to `view`.
    fn on_unbind(&mut self, view: &mut ContentView);

    /// Receive the handle used to ask the viewer for redraws.
    fn attach_viewer(&mut self, _viewer: ViewerHandle) {}
}

/// Run the provider's bind hook, then record the binding on the view.
pub fn bind_view(provider: &mut dyn ItemProvider, view: &mut ContentView, index: usize) {
    provider.on_bind(view, index);
    view.set_index(Some(index));
}

/// Run the provider's unbind hook, then clear the view's binding.
pub fn unbind_view(provider: &mut dyn ItemProvider, view: &mut ContentView) {
    provider.on_unbind(view);
    view.set_index(None);
}
