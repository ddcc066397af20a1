//! Drawing placed views into terminal cells.

use super::input::{CELL_HEIGHT, CELL_WIDTH};
use crate::layout::{Edge, EdgeGlow, FrameItem};
use crate::model::{LayoutMode, Rect as PixelRect};
use crate::pool::PageContent;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const PAGE_BORDER: Style = Style::new().fg(Color::Gray);
const PAGE_TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const LOADING_TEXT: Style = Style::new().fg(Color::Yellow);
const ERROR_TEXT: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const STATUS_BAR: Style = Style::new().fg(Color::Black).bg(Color::Cyan);
const EDGE_GLOW: Style = Style::new().bg(Color::LightBlue);
const EDGE_GLOW_FAINT: Style = Style::new().bg(Color::Blue);

/// Thickest glow strip, in cells.
const EDGE_GLOW_CELLS: f32 = 2.0;

/// What the status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    /// Active layout mode.
    pub mode: LayoutMode,
    /// Current page, zero-based.
    pub page: Option<usize>,
    /// Page count, when the provider knows it.
    pub pages: Option<usize>,
}

impl StatusLine {
    /// Text of the bar, e.g. `right-to-left  page 3/24`.
    pub fn text(&self) -> String {
        let page = self
            .page
            .map_or_else(|| "-".to_string(), |page| (page + 1).to_string());
        let pages = self
            .pages
            .map_or_else(|| "?".to_string(), |pages| pages.to_string());
        format!(" {}  page {}/{} ", self.mode, page, pages)
    }
}

/// Cells covered by a pixel rectangle, clipped to `area`.
///
/// Returns `None` when nothing of the rectangle is on screen.
pub fn cell_rect(rect: &PixelRect, area: Rect) -> Option<Rect> {
    let span = |start: f32, end: f32, cell: f32, limit: u16| -> (u16, u16) {
        let limit = f32::from(limit);
        let first = (start / cell).floor().clamp(0.0, limit);
        let last = (end / cell).ceil().clamp(0.0, limit);
        (first as u16, last as u16)
    };
    let (left, right) = span(rect.left, rect.right, CELL_WIDTH, area.width);
    let (top, bottom) = span(rect.top, rect.bottom, CELL_HEIGHT, area.height);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        area.x + left,
        area.y + top,
        right - left,
        bottom - top,
    ))
}

/// Strip of `area` covered by a glow; thicker the stronger it is.
pub fn glow_rect(glow: &EdgeGlow, area: Rect) -> Rect {
    let depth = (glow.intensity.clamp(0.0, 1.0) * EDGE_GLOW_CELLS).ceil() as u16;
    let depth = depth.max(1);
    match glow.edge {
        Edge::Left => Rect::new(area.x, area.y, depth.min(area.width), area.height),
        Edge::Right => {
            let depth = depth.min(area.width);
            Rect::new(area.x + area.width - depth, area.y, depth, area.height)
        }
        Edge::Top => Rect::new(area.x, area.y, area.width, depth.min(area.height)),
        Edge::Bottom => {
            let depth = depth.min(area.height);
            Rect::new(area.x, area.y + area.height - depth, area.width, depth)
        }
    }
}

/// Draw every placed view, the overscroll glows over them, then the status
/// bar when `status` is given.
pub fn draw_frame(
    frame: &mut Frame,
    items: &[FrameItem<'_>],
    glows: &[EdgeGlow],
    status: Option<StatusLine>,
) {
    let area = frame.area();
    for item in items {
        let Some(cells) = cell_rect(&item.rect(), area) else {
            continue;
        };
        match item {
            FrameItem::Page(view) => {
                let title = view
                    .index()
                    .map_or_else(|| " page ".to_string(), |index| format!(" page {} ", index + 1));
                let body = match view.content() {
                    PageContent::Empty => Line::from(""),
                    PageContent::Loading { progress: None } => {
                        Line::styled("loading", LOADING_TEXT)
                    }
                    PageContent::Loading {
                        progress: Some(progress),
                    } => Line::styled(format!("loading {:.0}%", progress * 100.0), LOADING_TEXT),
                    PageContent::Ready { width, height } => {
                        Line::from(format!("{width:.0}x{height:.0}"))
                    }
                    PageContent::Failed { message } => Line::styled(message.as_str(), ERROR_TEXT),
                };
                let page = Paragraph::new(body)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(PAGE_BORDER)
                            .title(Span::styled(title, PAGE_TITLE)),
                    );
                frame.render_widget(Clear, cells);
                frame.render_widget(page, cells);
            }
            FrameItem::Progress(_) => {
                frame.render_widget(
                    Paragraph::new(Line::styled("…", LOADING_TEXT)).alignment(Alignment::Center),
                    cells,
                );
            }
            FrameItem::Error(view) => {
                frame.render_widget(
                    Paragraph::new(Line::styled(view.message().unwrap_or_default(), ERROR_TEXT))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    cells,
                );
            }
        }
    }

    for glow in glows {
        let style = if glow.intensity >= 0.5 {
            EDGE_GLOW
        } else {
            EDGE_GLOW_FAINT
        };
        frame.render_widget(Block::new().style(style), glow_rect(glow, area));
    }

    if let Some(status) = status {
        if area.height == 0 {
            return;
        }
        let bar = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        frame.render_widget(Clear, bar);
        frame.render_widget(Paragraph::new(status.text()).style(STATUS_BAR), bar);
    }
}
