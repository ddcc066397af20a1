//! Shell-level keyboard actions independent of key bindings.

use crate::model::LayoutMode;

/// Actions the terminal host can map keys to.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
/// Every action except `Quit` is turned into gesture or mode commands posted
/// through the viewer handle, so the keyboard path exercises the same queue
/// as the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Paging
    /// Turn to the next page (fling toward it). Default: n/Space/PageDown
    NextPage,
    /// Turn to the previous page. Default: p/Backspace/PageUp
    PrevPage,

    // Panning
    /// Drag the content up by a quarter viewport. Default: j/↓
    ScrollDown,
    /// Drag the content down by a quarter viewport. Default: k/↑
    ScrollUp,
    /// Drag the content left by a quarter viewport. Default: l/→
    ScrollRight,
    /// Drag the content right by a quarter viewport. Default: h/←
    ScrollLeft,

    // Zoom
    /// Pinch out around the viewport centre. Default: +/=
    ZoomIn,
    /// Pinch in around the viewport centre. Default: -
    ZoomOut,
    /// Double tap the viewport centre. Default: z
    ToggleZoom,

    // Layout
    /// Switch to a layout mode. Defaults: 1 (left-to-right), 2 (right-to-left), 3 (top-to-bottom)
    SetMode(LayoutMode),
    /// Cycle through the layout modes. Default: m
    CycleMode,

    // Shell
    /// Toggle the status bar, same as tapping the centre band. Default: s
    ToggleStatus,
    /// Exit the application. Default: q/Ctrl+c/Esc
    Quit,
}

impl KeyAction {
    /// Layout mode that follows `mode` when cycling.
    pub fn next_mode(mode: LayoutMode) -> LayoutMode {
        match mode {
            LayoutMode::LeftToRight => LayoutMode::RightToLeft,
            LayoutMode::RightToLeft => LayoutMode::TopToBottom,
            LayoutMode::TopToBottom => LayoutMode::LeftToRight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode() {
        let mut mode = LayoutMode::default();
        let mut seen = vec![mode];
        for _ in 0..2 {
            mode = KeyAction::next_mode(mode);
            seen.push(mode);
        }
        assert_eq!(KeyAction::next_mode(mode), LayoutMode::default());
        for expected in LayoutMode::ALL {
            assert!(seen.contains(&expected));
        }
    }

    #[test]
    fn set_mode_carries_its_mode() {
        assert_ne!(
            KeyAction::SetMode(LayoutMode::LeftToRight),
            KeyAction::SetMode(LayoutMode::TopToBottom)
        );
    }
}
