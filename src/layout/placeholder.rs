//! The single loading/error placeholder a strategy may show instead of content.

use super::FrameItem;
use crate::model::Rect;
use crate::pool::{ErrorView, ProgressView, ResourcePool};
use tracing::debug;

#[derive(Debug, Default)]
enum Shown {
    #[default]
    None,
    Progress(ProgressView),
    Error(ErrorView),
}

/// Holds at most one placeholder, swapping kinds through the pool.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderSlot {
    shown: Shown,
}

impl PlaceholderSlot {
    /// Show the progress indicator centred in `viewport`.
    pub(crate) fn show_progress(&mut self, pool: &mut ResourcePool, viewport: Rect) {
        let mut view = match std::mem::take(&mut self.shown) {
            Shown::Progress(view) => view,
            other => {
                Self::release(other, pool);
                debug!("showing progress placeholder");
                pool.obtain_progress_view()
            }
        };
        view.set_rect(viewport.centered(view.size()));
        self.shown = Shown::Progress(view);
    }

    /// Show `message` in the error view centred in `viewport`.
    pub(crate) fn show_error(&mut self, pool: &mut ResourcePool, message: &str, viewport: Rect) {
        let mut view = match std::mem::take(&mut self.shown) {
            Shown::Error(view) => view,
            other => {
                Self::release(other, pool);
                pool.obtain_error_view()
            }
        };
        if view.message() != Some(message) {
            debug!(message, "showing error placeholder");
            pool.bind_error_view(&mut view, message);
        }
        view.set_rect(viewport.centered(view.size()));
        self.shown = Shown::Error(view);
    }

    /// Return whatever is shown to the pool.
    pub(crate) fn clear(&mut self, pool: &mut ResourcePool) {
        Self::release(std::mem::take(&mut self.shown), pool);
    }

    /// True when a placeholder is shown.
    pub(crate) fn is_shown(&self) -> bool {
        !matches!(self.shown, Shown::None)
    }

    pub(crate) fn item(&self) -> Option<FrameItem<'_>> {
        match &self.shown {
            Shown::None => None,
            Shown::Progress(view) => Some(FrameItem::Progress(view)),
            Shown::Error(view) => Some(FrameItem::Error(view)),
        }
    }

    fn release(shown: Shown, pool: &mut ResourcePool) {
        match shown {
            Shown::None => {}
            Shown::Progress(view) => pool.release_progress_view(view),
            Shown::Error(view) => pool.release_error_view(view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    fn viewport() -> Rect {
        Rect::from_size(Size::new(1000.0, 2000.0))
    }

    #[test]
    fn switching_kinds_returns_previous_to_pool() {
        let mut pool = ResourcePool::new(5, 256.0, 48.0);
        let mut slot = PlaceholderSlot::default();

        slot.show_progress(&mut pool, viewport());
        assert!(matches!(slot.item(), Some(FrameItem::Progress(_))));
        let progress_id = match slot.item() {
            Some(FrameItem::Progress(view)) => view.id(),
            _ => unreachable!(),
        };

        slot.show_error(&mut pool, "offline", viewport());
        match slot.item() {
            Some(FrameItem::Error(view)) => {
                assert_eq!(view.message(), Some("offline"));
                assert_eq!(view.rect().center(), viewport().center());
            }
            other => panic!("expected error placeholder, got {other:?}"),
        }

        slot.clear(&mut pool);
        assert!(!slot.is_shown());
        assert_eq!(pool.obtain_progress_view().id(), progress_id);
        assert!(pool.obtain_error_view().texture().is_none());
    }

    #[test]
    fn progress_is_centered_at_configured_size() {
        let mut pool = ResourcePool::new(5, 256.0, 48.0);
        let mut slot = PlaceholderSlot::default();
        slot.show_progress(&mut pool, viewport());
        let rect = slot.item().map(|item| item.rect()).unwrap_or_default();
        assert_eq!(rect, Rect::new(476.0, 976.0, 524.0, 1024.0));
    }
}
