//! Per-frame outcome and a plain-text dump of the placed views.

use crate::layout::FrameItem;
use crate::model::LayoutMode;
use crate::pool::PageContent;
use serde::Serialize;
use std::fmt::Write as _;

/// What one `render_frame` call did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// Commands drained this frame.
    pub commands: usize,
    /// An animation still needs frames.
    pub animating: bool,
    /// The fill pass did work.
    pub filled: bool,
    /// Active layout mode.
    pub mode: LayoutMode,
    /// Current page, if laid out.
    pub current_index: Option<usize>,
    /// Number of placed views.
    pub items: usize,
}

impl FrameReport {
    /// One-line summary for logs and the replayer.
    pub fn summary(&self) -> String {
        let page = self
            .current_index
            .map_or_else(|| "-".to_string(), |index| (index + 1).to_string());
        format!(
            "mode={} page={} items={} commands={} filled={} animating={}",
            self.mode, page, self.items, self.commands, self.filled, self.animating
        )
    }
}

/// One line per placed view: kind, index, rect and state.
pub fn describe_items(items: &[FrameItem<'_>]) -> String {
    let mut out = String::new();
    for item in items {
        let rect = item.rect();
        let place = format!(
            "[{:.0},{:.0} {:.0}x{:.0}]",
            rect.left,
            rect.top,
            rect.width(),
            rect.height()
        );
        // Writing to a String cannot fail.
        let _ = match item {
            FrameItem::Page(view) => {
                let index = view
                    .index()
                    .map_or_else(|| "?".to_string(), |index| index.to_string());
                let state = match view.content() {
                    PageContent::Empty => "empty".to_string(),
                    PageContent::Loading { progress: None } => "loading".to_string(),
                    PageContent::Loading {
                        progress: Some(progress),
                    } => format!("loading {:.0}%", progress * 100.0),
                    PageContent::Ready { .. } => "ready".to_string(),
                    PageContent::Failed { message } => format!("failed: {message}"),
                };
                writeln!(out, "page {index} {place} {state}")
            }
            FrameItem::Progress(_) => writeln!(out, "progress {place}"),
            FrameItem::Error(view) => {
                writeln!(out, "error {place} {}", view.message().unwrap_or_default())
            }
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_one_based_pages() {
        let report = FrameReport {
            commands: 3,
            animating: false,
            filled: true,
            mode: LayoutMode::TopToBottom,
            current_index: Some(0),
            items: 2,
        };
        assert_eq!(
            report.summary(),
            "mode=top-to-bottom page=1 items=2 commands=3 filled=true animating=false"
        );
    }

    #[test]
    fn summary_without_page() {
        let report = FrameReport {
            commands: 0,
            animating: false,
            filled: false,
            mode: LayoutMode::RightToLeft,
            current_index: None,
            items: 0,
        };
        assert!(report.summary().contains("page=-"));
    }

    #[test]
    fn no_items_describe_as_empty() {
        assert_eq!(describe_items(&[]), "");
    }
}
