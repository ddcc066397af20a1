//! Outbound notifications from the viewer.

use serde::Serialize;
use std::sync::mpsc::Sender;
use tracing::trace;

/// Receiver of viewer notifications. Fire-and-forget.
pub trait ActionListener {
    /// A confirmed single tap landed in the centre band.
    fn on_tap_center(&mut self);

    /// The current page changed. `internal` is true when the viewer moved on
    /// its own (gesture, animation) rather than through `jump_to_index`.
    fn on_scroll_to_page(&mut self, page: usize, internal: bool);
}

/// A notification as a value, for channels and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewerAction {
    /// See [`ActionListener::on_tap_center`].
    TapCenter,
    /// See [`ActionListener::on_scroll_to_page`].
    ScrolledToPage {
        /// Zero-based page index.
        page: usize,
        /// Whether the viewer moved on its own.
        internal: bool,
    },
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ActionListener for NoopListener {
    fn on_tap_center(&mut self) {}

    fn on_scroll_to_page(&mut self, _page: usize, _internal: bool) {}
}

impl ActionListener for Sender<ViewerAction> {
    fn on_tap_center(&mut self) {
        if self.send(ViewerAction::TapCenter).is_err() {
            trace!("action receiver gone");
        }
    }

    fn on_scroll_to_page(&mut self, page: usize, internal: bool) {
        if self
            .send(ViewerAction::ScrolledToPage { page, internal })
            .is_err()
        {
            trace!(page, "action receiver gone");
        }
    }
}
