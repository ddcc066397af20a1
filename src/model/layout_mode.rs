//! Layout modes and the strategy they select.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How pages are arranged on screen.
///
/// Parsed from and displayed as kebab-case strings (`right-to-left`), the
/// same spelling the config file, the env var and the CLI accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// One page at a time, next page to the right.
    LeftToRight,
    /// One page at a time, next page to the left.
    #[default]
    RightToLeft,
    /// Continuous vertical scroll.
    TopToBottom,
}

impl LayoutMode {
    /// Every mode, in declaration order.
    pub const ALL: [LayoutMode; 3] = [
        LayoutMode::LeftToRight,
        LayoutMode::RightToLeft,
        LayoutMode::TopToBottom,
    ];

    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::LeftToRight => "left-to-right",
            LayoutMode::RightToLeft => "right-to-left",
            LayoutMode::TopToBottom => "top-to-bottom",
        }
    }

    /// The strategy instance this mode runs on.
    pub fn strategy(&self) -> StrategyKind {
        match self {
            LayoutMode::LeftToRight | LayoutMode::RightToLeft => StrategyKind::Pager,
            LayoutMode::TopToBottom => StrategyKind::Scroll,
        }
    }

    /// Page advance direction, for modes served by the pager.
    pub fn page_direction(&self) -> Option<PageDirection> {
        match self {
            LayoutMode::LeftToRight => Some(PageDirection::LeftToRight),
            LayoutMode::RightToLeft => Some(PageDirection::RightToLeft),
            LayoutMode::TopToBottom => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no layout mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid layout mode '{0}' (expected left-to-right, right-to-left or top-to-bottom)")]
pub struct InvalidLayoutMode(pub String);

impl FromStr for LayoutMode {
    type Err = InvalidLayoutMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidLayoutMode(s.to_string()))
    }
}

/// Which of the two strategy families is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Page-by-page flipping.
    Pager,
    /// Continuous vertical scroll.
    Scroll,
}

impl StrategyKind {
    /// Slot index used by strategy tables.
    pub fn slot(&self) -> usize {
        match self {
            StrategyKind::Pager => 0,
            StrategyKind::Scroll => 1,
        }
    }
}

/// Direction in which the pager advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageDirection {
    /// Page `i + 1` sits to the right of page `i`.
    LeftToRight,
    /// Page `i + 1` sits to the left of page `i`.
    #[default]
    RightToLeft,
}

impl PageDirection {
    /// `+1.0` for left-to-right, `-1.0` for right-to-left.
    pub fn sign(&self) -> f32 {
        match self {
            PageDirection::LeftToRight => 1.0,
            PageDirection::RightToLeft => -1.0,
        }
    }
}
