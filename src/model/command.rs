//! Commands funnelled from producer threads onto the rendering thread.

use crate::model::LayoutMode;
use serde::{Deserialize, Serialize};

/// One queued event.
///
/// Thirteen gesture kinds plus the layout-mode switch. Commands are immutable
/// once posted and are consumed in the frame that drains them. The serde form
/// is internally tagged by `"type"` so replay scripts read as
/// `{"type":"down","x":5,"y":5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Finger lifted after a short press.
    SingleTapUp {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Single tap that is known not to be the start of a double tap.
    SingleTapConfirmed {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Second tap of a double tap went down.
    DoubleTap {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Double tap completed.
    DoubleTapConfirmed {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Drag movement. `dx`/`dy` are the distance scrolled since the previous
    /// event, positive when the finger moves left/up. `total_*` accumulate
    /// since the gesture started and `x`/`y` is the current finger position.
    Scroll {
        /// Horizontal distance since the previous event.
        dx: f32,
        /// Vertical distance since the previous event.
        dy: f32,
        /// Horizontal distance since the gesture started.
        total_x: f32,
        /// Vertical distance since the gesture started.
        total_y: f32,
        /// Current finger x.
        x: f32,
        /// Current finger y.
        y: f32,
    },
    /// Finger released with velocity, in pixels per second.
    Fling {
        /// Horizontal velocity, in the finger's direction.
        velocity_x: f32,
        /// Vertical velocity, in the finger's direction.
        velocity_y: f32,
    },
    /// Pinch started.
    ScaleBegin {
        /// Focus x between the fingers.
        focus_x: f32,
        /// Focus y between the fingers.
        focus_y: f32,
    },
    /// Pinch changed by `factor` around the focus point.
    Scale {
        /// Focus x between the fingers.
        focus_x: f32,
        /// Focus y between the fingers.
        focus_y: f32,
        /// Scale change since the previous event.
        factor: f32,
    },
    /// Pinch finished.
    ScaleEnd,
    /// First finger touched down.
    Down {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Last finger lifted.
    Up,
    /// An additional finger touched down.
    PointerDown {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// An additional finger lifted.
    PointerUp,
    /// Switch the active layout mode.
    SetLayoutMode {
        /// Mode to switch to.
        mode: LayoutMode,
    },
}

impl Command {
    /// Stable snake_case tag, matching the serde `"type"` value.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SingleTapUp { .. } => "single_tap_up",
            Command::SingleTapConfirmed { .. } => "single_tap_confirmed",
            Command::DoubleTap { .. } => "double_tap",
            Command::DoubleTapConfirmed { .. } => "double_tap_confirmed",
            Command::Scroll { .. } => "scroll",
            Command::Fling { .. } => "fling",
            Command::ScaleBegin { .. } => "scale_begin",
            Command::Scale { .. } => "scale",
            Command::ScaleEnd => "scale_end",
            Command::Down { .. } => "down",
            Command::Up => "up",
            Command::PointerDown { .. } => "pointer_down",
            Command::PointerUp => "pointer_up",
            Command::SetLayoutMode { .. } => "set_layout_mode",
        }
    }

    /// True for the thirteen gesture kinds.
    pub fn is_gesture(&self) -> bool {
        !matches!(self, Command::SetLayoutMode { .. })
    }
}

/// A drag movement as handed to a layout strategy's scroll hook.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollDelta {
    /// Horizontal distance since the previous event (finger moving left is positive).
    pub dx: f32,
    /// Vertical distance since the previous event (finger moving up is positive).
    pub dy: f32,
    /// Horizontal distance since the gesture started.
    pub total_x: f32,
    /// Vertical distance since the gesture started.
    pub total_y: f32,
    /// Current finger x.
    pub x: f32,
    /// Current finger y.
    pub y: f32,
    /// True for the first forwarded scroll after a `down`.
    pub first_of_gesture: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_serde_tag() {
        let commands = [
            Command::Down { x: 1.0, y: 2.0 },
            Command::ScaleEnd,
            Command::Scroll {
                dx: 1.0,
                dy: 0.0,
                total_x: 1.0,
                total_y: 0.0,
                x: 3.0,
                y: 4.0,
            },
            Command::SetLayoutMode {
                mode: LayoutMode::TopToBottom,
            },
        ];
        for command in commands {
            let json = serde_json::to_value(command).unwrap();
            assert_eq!(json["type"], command.name());
        }
    }

    #[test]
    fn deserializes_integer_coordinates() {
        let command: Command = serde_json::from_str(r#"{"type":"down","x":5,"y":5}"#).unwrap();
        assert_eq!(command, Command::Down { x: 5.0, y: 5.0 });
    }

    #[test]
    fn deserializes_layout_mode_switch() {
        let command: Command =
            serde_json::from_str(r#"{"type":"set_layout_mode","mode":"top-to-bottom"}"#).unwrap();
        assert_eq!(
            command,
            Command::SetLayoutMode {
                mode: LayoutMode::TopToBottom
            }
        );
        assert!(!command.is_gesture());
    }
}
