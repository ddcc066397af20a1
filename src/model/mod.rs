//! Domain model types (pure).
//!
//! Plain data shared by every layer: queued commands, pixel geometry, layout
//! modes, keyboard intents and the error taxonomy.

pub mod command;
pub mod error;
pub mod geometry;
pub mod key_action;
pub mod layout_mode;

// Re-export for convenience
pub use command::{Command, ScrollDelta};
pub use error::{AppError, ReplayError};
pub use geometry::{Point, Rect, Size};
pub use key_action::KeyAction;
pub use layout_mode::{InvalidLayoutMode, LayoutMode, PageDirection, StrategyKind};
