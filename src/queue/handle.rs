//! Producer-side handle onto the command queue.

use super::CommandQueue;
use crate::model::{Command, LayoutMode};
use std::sync::{Arc, Weak};
use tracing::trace;

/// Callbacks a gesture recognizer delivers, already classified.
///
/// Coordinates are viewer pixels. Scroll deltas are positive when the finger
/// moves left/up; fling velocities are pixels per second in finger direction.
pub trait GestureListener {
    /// Short press released.
    fn on_single_tap_up(&self, x: f32, y: f32);
    /// Single tap that cannot become a double tap.
    fn on_single_tap_confirmed(&self, x: f32, y: f32);
    /// Second tap of a double tap touched down.
    fn on_double_tap(&self, x: f32, y: f32);
    /// Double tap completed.
    fn on_double_tap_confirmed(&self, x: f32, y: f32);
    /// Drag moved.
    fn on_scroll(&self, dx: f32, dy: f32, total_x: f32, total_y: f32, x: f32, y: f32);
    /// Finger released with velocity.
    fn on_fling(&self, velocity_x: f32, velocity_y: f32);
    /// Pinch started.
    fn on_scale_begin(&self, focus_x: f32, focus_y: f32);
    /// Pinch changed.
    fn on_scale(&self, focus_x: f32, focus_y: f32, factor: f32);
    /// Pinch ended.
    fn on_scale_end(&self);
    /// First finger down.
    fn on_down(&self, x: f32, y: f32);
    /// Last finger up.
    fn on_up(&self);
    /// Additional finger down.
    fn on_pointer_down(&self, x: f32, y: f32);
    /// Additional finger up.
    fn on_pointer_up(&self);
}

/// Cloneable, thread-safe handle that turns callbacks into queued commands.
///
/// Holds the queue weakly: once the viewer is dropped every call is a no-op.
#[derive(Debug, Clone)]
pub struct ViewerHandle {
    queue: Weak<CommandQueue>,
}

impl ViewerHandle {
    /// Handle posting into `queue`.
    pub fn new(queue: &Arc<CommandQueue>) -> Self {
        Self {
            queue: Arc::downgrade(queue),
        }
    }

    /// Post a command. Returns false when the viewer no longer exists.
    pub fn post(&self, command: Command) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.post(command);
                true
            }
            None => {
                trace!(command = command.name(), "viewer gone, command dropped");
                false
            }
        }
    }

    /// Queue a layout-mode switch.
    pub fn set_layout_mode(&self, mode: LayoutMode) {
        self.post(Command::SetLayoutMode { mode });
    }

    /// Ask for another frame without posting a command.
    pub fn request_redraw(&self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.wake();
        }
    }

    /// True while the viewer is alive.
    pub fn is_connected(&self) -> bool {
        self.queue.strong_count() > 0
    }
}

impl GestureListener for ViewerHandle {
    fn on_single_tap_up(&self, x: f32, y: f32) {
        self.post(Command::SingleTapUp { x, y });
    }

    fn on_single_tap_confirmed(&self, x: f32, y: f32) {
        self.post(Command::SingleTapConfirmed { x, y });
    }

    fn on_double_tap(&self, x: f32, y: f32) {
        self.post(Command::DoubleTap { x, y });
    }

    fn on_double_tap_confirmed(&self, x: f32, y: f32) {
        self.post(Command::DoubleTapConfirmed { x, y });
    }

    fn on_scroll(&self, dx: f32, dy: f32, total_x: f32, total_y: f32, x: f32, y: f32) {
        self.post(Command::Scroll {
            dx,
            dy,
            total_x,
            total_y,
            x,
            y,
        });
    }

    fn on_fling(&self, velocity_x: f32, velocity_y: f32) {
        self.post(Command::Fling {
            velocity_x,
            velocity_y,
        });
    }

    fn on_scale_begin(&self, focus_x: f32, focus_y: f32) {
        self.post(Command::ScaleBegin { focus_x, focus_y });
    }

    fn on_scale(&self, focus_x: f32, focus_y: f32, factor: f32) {
        self.post(Command::Scale {
            focus_x,
            focus_y,
            factor,
        });
    }

    fn on_scale_end(&self) {
        self.post(Command::ScaleEnd);
    }

    fn on_down(&self, x: f32, y: f32) {
        self.post(Command::Down { x, y });
    }

    fn on_up(&self) {
        self.post(Command::Up);
    }

    fn on_pointer_down(&self, x: f32, y: f32) {
        self.post(Command::PointerDown { x, y });
    }

    fn on_pointer_up(&self) {
        self.post(Command::PointerUp);
    }
}
