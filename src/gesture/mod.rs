//! Gesture interaction state: scale and scroll are mutually exclusive.
//!
//! Whichever of scaling or scrolling claims a touch sequence first keeps it
//! until the next `down`. Events that would break the claim are dropped
//! before they reach the layout strategy.

use crate::layout::LayoutManager;
use crate::model::{Command, ScrollDelta};
use tracing::trace;

/// Why an event was withheld from the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The sequence is scaling.
    Scaling,
    /// The sequence is scrolling.
    Scrolling,
    /// The strategy refused to scale.
    CannotScale,
}

/// Outcome of routing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Delivered to the strategy's hook.
    Forwarded,
    /// Only the interaction flags changed.
    StateOnly,
    /// Withheld from the strategy.
    Dropped(DropReason),
    /// No strategy attached; flags were still updated.
    NoTarget,
    /// Not a gesture the state machine handles.
    Ignored,
}

/// Touch, scale and scroll flags for the current touch sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    touched: bool,
    scaling: bool,
    scrolling: bool,
    first_scroll: bool,
}

fn forward(
    layout: Option<&mut dyn LayoutManager>,
    hook: impl FnOnce(&mut dyn LayoutManager),
) -> Routing {
    match layout {
        Some(layout) => {
            hook(layout);
            Routing::Forwarded
        }
        None => Routing::NoTarget,
    }
}

impl GestureState {
    /// Fresh state with no touch in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// A finger is down.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// The current sequence is scaling.
    pub fn is_scaling(&self) -> bool {
        self.scaling
    }

    /// The current sequence is scrolling.
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Update flags for `command` and forward it to `layout` when allowed.
    pub fn handle(&mut self, command: &Command, layout: Option<&mut dyn LayoutManager>) -> Routing {
        let routing = self.route(command, layout);
        trace!(
            command = command.name(),
            ?routing,
            scaling = self.scaling,
            scrolling = self.scrolling,
            "gesture routed"
        );
        routing
    }

    fn route(&mut self, command: &Command, layout: Option<&mut dyn LayoutManager>) -> Routing {
        match *command {
            Command::Down { .. } => {
                self.touched = true;
                self.scaling = false;
                self.scrolling = false;
                self.first_scroll = true;
                forward(layout, |layout| layout.on_down())
            }
            Command::Up => {
                self.touched = false;
                forward(layout, |layout| layout.on_up())
            }
            Command::PointerDown { .. } => match layout {
                None => Routing::NoTarget,
                Some(_) if self.scrolling => Routing::Dropped(DropReason::Scrolling),
                Some(layout) if layout.can_scale() => {
                    self.scaling = true;
                    Routing::StateOnly
                }
                Some(_) => Routing::Dropped(DropReason::CannotScale),
            },
            Command::PointerUp => Routing::Ignored,
            Command::Scroll {
                dx,
                dy,
                total_x,
                total_y,
                x,
                y,
            } => {
                if self.scaling {
                    return Routing::Dropped(DropReason::Scaling);
                }
                self.scrolling = true;
                let delta = ScrollDelta {
                    dx,
                    dy,
                    total_x,
                    total_y,
                    x,
                    y,
                    first_of_gesture: std::mem::take(&mut self.first_scroll),
                };
                forward(layout, |layout| layout.on_scroll(delta))
            }
            Command::ScaleBegin { focus_x, focus_y } => self.scale(focus_x, focus_y, 1.0, layout),
            Command::Scale {
                focus_x,
                focus_y,
                factor,
            } => self.scale(focus_x, focus_y, factor, layout),
            Command::ScaleEnd => forward(layout, |layout| layout.on_scale_end()),
            Command::SingleTapUp { x, y } => forward(layout, |layout| layout.on_single_tap_up(x, y)),
            Command::SingleTapConfirmed { x, y } => {
                forward(layout, |layout| layout.on_single_tap_confirmed(x, y))
            }
            Command::DoubleTap { x, y } => forward(layout, |layout| layout.on_double_tap(x, y)),
            Command::DoubleTapConfirmed { x, y } => {
                if self.scaling {
                    return Routing::Dropped(DropReason::Scaling);
                }
                forward(layout, |layout| layout.on_double_tap_confirmed(x, y))
            }
            Command::Fling {
                velocity_x,
                velocity_y,
            } => forward(layout, |layout| layout.on_fling(velocity_x, velocity_y)),
            Command::SetLayoutMode { .. } => Routing::Ignored,
        }
    }

    fn scale(
        &mut self,
        focus_x: f32,
        focus_y: f32,
        factor: f32,
        layout: Option<&mut dyn LayoutManager>,
    ) -> Routing {
        if self.scrolling {
            return Routing::Dropped(DropReason::Scrolling);
        }
        if layout.as_deref().is_some_and(|layout| !layout.can_scale()) {
            return Routing::Dropped(DropReason::CannotScale);
        }
        self.scaling = true;
        forward(layout, |layout| layout.on_scale(focus_x, focus_y, factor))
    }
}

#[cfg(test)]
#[path = "gesture_tests.rs"]
mod tests;
