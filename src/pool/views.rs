//! Recyclable view nodes handed out by the [`ResourcePool`](super::ResourcePool).

use crate::model::{Rect, Size};
use serde::Serialize;
use tracing::trace;

/// Pixel height of error text; glyphs are assumed to be 0.6 em wide.
pub const ERROR_TEXT_SIZE: f32 = 32.0;

/// Identity of a pooled view, stable across recycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewId(u64);

impl ViewId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// What a content view currently shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageContent {
    /// Nothing bound.
    #[default]
    Empty,
    /// Content is being fetched; `progress` in `[0, 1]` when known.
    Loading {
        /// Fraction loaded, if the provider knows it.
        progress: Option<f32>,
    },
    /// Content is available with the given intrinsic size.
    Ready {
        /// Intrinsic width in pixels.
        width: f32,
        /// Intrinsic height in pixels.
        height: f32,
    },
    /// Content failed to load.
    Failed {
        /// Message to show in place of the page.
        message: String,
    },
}

impl PageContent {
    /// Height-over-width ratio of ready content.
    pub fn aspect(&self) -> Option<f32> {
        match *self {
            PageContent::Ready { width, height } if width > 0.0 && height > 0.0 => {
                Some(height / width)
            }
            _ => None,
        }
    }
}

/// A recyclable node that displays one item.
///
/// Bound to at most one index at a time; the pool clears the binding on
/// release.
#[derive(Debug)]
pub struct ContentView {
    id: ViewId,
    index: Option<usize>,
    content: PageContent,
    rect: Rect,
    min_height: f32,
}

impl ContentView {
    pub(crate) fn new(id: ViewId, min_height: f32) -> Self {
        Self {
            id,
            index: None,
            content: PageContent::Empty,
            rect: Rect::default(),
            min_height,
        }
    }

    /// Pool identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Bound index, `None` when unbound.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    /// Bound content.
    pub fn content(&self) -> &PageContent {
        &self.content
    }

    /// Replace the content. Providers call this from their bind hook.
    pub fn set_content(&mut self, content: PageContent) {
        self.content = content;
    }

    /// Position assigned by the last fill.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Height used before content is ready.
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    /// Drop the binding, content and position.
    pub(crate) fn reset(&mut self) {
        self.index = None;
        self.content = PageContent::Empty;
        self.rect = Rect::default();
    }
}

/// Indeterminate progress indicator shown while the item count is unknown.
#[derive(Debug)]
pub struct ProgressView {
    id: ViewId,
    size: Size,
    rect: Rect,
}

impl ProgressView {
    pub(crate) fn new(id: ViewId, side: f32) -> Self {
        Self {
            id,
            size: Size::new(side, side),
            rect: Rect::default(),
        }
    }

    /// Pool identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Measured size of the indicator.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Position assigned by the last fill.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// A rendered string, the graphic resource an [`ErrorView`] binds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTexture {
    text: String,
    size: Size,
}

impl TextTexture {
    /// Render `text` at [`ERROR_TEXT_SIZE`].
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let glyphs = text.chars().count() as f32;
        let size = Size::new(glyphs * ERROR_TEXT_SIZE * 0.6, ERROR_TEXT_SIZE);
        Self { text, size }
    }

    /// The rendered string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Pixel size of the rendered string.
    pub fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn recycle(self) {
        trace!(text = %self.text, "text texture recycled");
    }
}

/// Error display shown instead of content.
#[derive(Debug)]
pub struct ErrorView {
    id: ViewId,
    texture: Option<TextTexture>,
    rect: Rect,
}

impl ErrorView {
    pub(crate) fn new(id: ViewId) -> Self {
        Self {
            id,
            texture: None,
            rect: Rect::default(),
        }
    }

    /// Pool identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Bound text, if any.
    pub fn texture(&self) -> Option<&TextTexture> {
        self.texture.as_ref()
    }

    /// Bound message, if any.
    pub fn message(&self) -> Option<&str> {
        self.texture.as_ref().map(TextTexture::text)
    }

    /// Measured size: the text size, or nothing when unbound.
    pub fn size(&self) -> Size {
        self.texture
            .as_ref()
            .map(TextTexture::size)
            .unwrap_or_default()
    }

    /// Position assigned by the last fill.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn bind_texture(&mut self, texture: TextTexture) -> Option<TextTexture> {
        self.texture.replace(texture)
    }

    pub(crate) fn take_texture(&mut self) -> Option<TextTexture> {
        self.texture.take()
    }
}

/// Pre-rendered digit glyphs used to label pages.
///
/// Built when the host surface attaches and dropped when it detaches.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphAtlas {
    digits: [char; 10],
}

impl GlyphAtlas {
    /// Atlas for ASCII digits.
    pub fn digits() -> Self {
        Self {
            digits: ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
        }
    }

    /// Render a page number from the atlas.
    pub fn render_number(&self, number: usize) -> String {
        number
            .to_string()
            .bytes()
            .map(|b| self.digits[usize::from(b - b'0')])
            .collect()
    }
}
