//! Terminal input as a gesture recognizer.
//!
//! Mouse and key events are classified into the same callbacks a touch
//! recognizer would deliver and posted through a [`ViewerHandle`]. Terminal
//! cells map to pixel space at [`CELL_WIDTH`]×[`CELL_HEIGHT`], with events
//! placed at the centre of their cell.

use super::ShellEvent;
use crate::config::KeyBindings;
use crate::model::{KeyAction, LayoutMode, Point, Size};
use crate::queue::{GestureListener, ViewerHandle};
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Pixel width of one terminal cell.
pub const CELL_WIDTH: f32 = 8.0;

/// Pixel height of one terminal cell.
pub const CELL_HEIGHT: f32 = 16.0;

/// Second click within this window is a double click.
pub const DOUBLE_CLICK_TIMEOUT: Duration = Duration::from_millis(300);

/// Drag pause after which a release no longer flings.
const FLING_WINDOW: Duration = Duration::from_millis(100);

/// Slowest release that still counts as a fling, in px/s.
const MIN_FLING_SPEED: f32 = 400.0;

/// Double-click slop, in pixels.
const DOUBLE_CLICK_SLOP: f32 = 2.0 * CELL_HEIGHT;

/// Pixels scrolled per wheel notch.
const WHEEL_STEP: f32 = 3.0 * CELL_HEIGHT;

/// Pinch factor for one zoom key press.
const ZOOM_STEP: f32 = 1.25;

/// Pixel viewport covered by a `cols`×`rows` terminal.
pub fn viewport_for(cols: u16, rows: u16) -> Size {
    Size::new(f32::from(cols) * CELL_WIDTH, f32::from(rows) * CELL_HEIGHT)
}

/// Pixel centre of a terminal cell.
pub fn cell_center(column: u16, row: u16) -> Point {
    Point::new(
        f32::from(column) * CELL_WIDTH + CELL_WIDTH / 2.0,
        f32::from(row) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
    )
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    origin: Point,
    last: Point,
    last_at: Instant,
    velocity: Point,
    moved: bool,
    second_tap: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTap {
    at: Point,
    deadline: Instant,
}

/// Turns terminal events into gesture callbacks on a [`ViewerHandle`].
#[derive(Debug)]
pub struct InputRecognizer {
    handle: ViewerHandle,
    mode: LayoutMode,
    viewport: Size,
    drag: Option<Drag>,
    pending_tap: Option<PendingTap>,
}

impl InputRecognizer {
    /// Recognizer posting to `handle`, starting in `mode`.
    pub fn new(handle: ViewerHandle, mode: LayoutMode, viewport: Size) -> Self {
        Self {
            handle,
            mode,
            viewport,
            drag: None,
            pending_tap: None,
        }
    }

    /// Mode this recognizer last requested.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// The terminal was resized.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// When [`tick`](Self::tick) next has work, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_tap.map(|tap| tap.deadline)
    }

    /// Confirm a single tap whose double-click window has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(tap) = self.pending_tap {
            if now >= tap.deadline {
                self.pending_tap = None;
                self.handle.on_single_tap_confirmed(tap.at.x, tap.at.y);
            }
        }
    }

    // ===== Mouse =====

    /// Classify one mouse event observed at `now`.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let at = cell_center(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(at, now),
            MouseEventKind::Drag(MouseButton::Left) => self.drag_to(at, now),
            MouseEventKind::Up(MouseButton::Left) => self.release(at, now),
            MouseEventKind::ScrollDown => self.swipe(at, 0.0, WHEEL_STEP),
            MouseEventKind::ScrollUp => self.swipe(at, 0.0, -WHEEL_STEP),
            MouseEventKind::ScrollRight => self.swipe(at, WHEEL_STEP, 0.0),
            MouseEventKind::ScrollLeft => self.swipe(at, -WHEEL_STEP, 0.0),
            _ => {}
        }
    }

    fn press(&mut self, at: Point, now: Instant) {
        let second_tap = match self.pending_tap.take() {
            Some(tap) if now < tap.deadline && distance(tap.at, at) <= DOUBLE_CLICK_SLOP => true,
            Some(tap) => {
                self.handle.on_single_tap_confirmed(tap.at.x, tap.at.y);
                false
            }
            None => false,
        };

        self.handle.on_down(at.x, at.y);
        if second_tap {
            self.handle.on_double_tap(at.x, at.y);
        }
        self.drag = Some(Drag {
            origin: at,
            last: at,
            last_at: now,
            velocity: Point::default(),
            moved: false,
            second_tap,
        });
    }

    fn drag_to(&mut self, at: Point, now: Instant) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if at == drag.last {
            return;
        }
        let dx = drag.last.x - at.x;
        let dy = drag.last.y - at.y;
        let elapsed = now.saturating_duration_since(drag.last_at).as_secs_f32();
        if elapsed > 0.0 {
            drag.velocity = Point::new(-dx / elapsed, -dy / elapsed);
        }
        drag.last = at;
        drag.last_at = now;
        drag.moved = true;
        self.handle.on_scroll(
            dx,
            dy,
            drag.origin.x - at.x,
            drag.origin.y - at.y,
            at.x,
            at.y,
        );
    }

    fn release(&mut self, at: Point, now: Instant) {
        let Some(drag) = self.drag.take() else {
            return;
        };

        if drag.moved {
            let speed = drag.velocity.x.hypot(drag.velocity.y);
            let recent = now.saturating_duration_since(drag.last_at) <= FLING_WINDOW;
            if recent && speed >= MIN_FLING_SPEED {
                self.handle.on_fling(drag.velocity.x, drag.velocity.y);
            }
        } else if drag.second_tap {
            self.handle.on_double_tap_confirmed(at.x, at.y);
        } else {
            self.handle.on_single_tap_up(at.x, at.y);
            self.pending_tap = Some(PendingTap {
                at,
                deadline: now + DOUBLE_CLICK_TIMEOUT,
            });
        }
        self.handle.on_up();
    }

    /// A complete one-step drag: down, scroll, up.
    fn swipe(&mut self, at: Point, dx: f32, dy: f32) {
        self.drag = None;
        self.handle.on_down(at.x, at.y);
        self.handle.on_scroll(dx, dy, dx, dy, at.x - dx, at.y - dy);
        self.handle.on_up();
    }

    // ===== Keys =====

    /// Carry out a bound key action. Returns the shell event for actions the
    /// render loop handles itself.
    pub fn handle_action(&mut self, action: KeyAction) -> Option<ShellEvent> {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        let pan_x = self.viewport.width / 4.0;
        let pan_y = self.viewport.height / 4.0;
        match action {
            KeyAction::NextPage => self.turn(center, 1.0),
            KeyAction::PrevPage => self.turn(center, -1.0),
            KeyAction::ScrollDown => self.swipe(center, 0.0, pan_y),
            KeyAction::ScrollUp => self.swipe(center, 0.0, -pan_y),
            KeyAction::ScrollRight => self.swipe(center, pan_x, 0.0),
            KeyAction::ScrollLeft => self.swipe(center, -pan_x, 0.0),
            KeyAction::ZoomIn => self.pinch(center, ZOOM_STEP),
            KeyAction::ZoomOut => self.pinch(center, 1.0 / ZOOM_STEP),
            KeyAction::ToggleZoom => {
                self.handle.on_down(center.x, center.y);
                self.handle.on_double_tap(center.x, center.y);
                self.handle.on_double_tap_confirmed(center.x, center.y);
                self.handle.on_up();
            }
            KeyAction::SetMode(mode) => self.set_mode(mode),
            KeyAction::CycleMode => self.set_mode(KeyAction::next_mode(self.mode)),
            KeyAction::ToggleStatus => return Some(ShellEvent::ToggleStatus),
            KeyAction::Quit => return Some(ShellEvent::Quit),
        }
        None
    }

    /// Drag one page toward `direction` (+1 next, -1 previous).
    fn turn(&mut self, center: Point, direction: f32) {
        match self.mode {
            LayoutMode::LeftToRight => {
                self.swipe(center, direction * self.viewport.width / 2.0, 0.0)
            }
            LayoutMode::RightToLeft => {
                self.swipe(center, -direction * self.viewport.width / 2.0, 0.0)
            }
            LayoutMode::TopToBottom => self.swipe(center, 0.0, direction * self.viewport.height),
        }
    }

    fn pinch(&mut self, center: Point, factor: f32) {
        self.drag = None;
        self.handle.on_down(center.x, center.y);
        self.handle.on_pointer_down(center.x, center.y);
        self.handle.on_scale_begin(center.x, center.y);
        self.handle.on_scale(center.x, center.y, factor);
        self.handle.on_scale_end();
        self.handle.on_pointer_up();
        self.handle.on_up();
    }

    fn set_mode(&mut self, mode: LayoutMode) {
        debug!(%mode, "layout mode requested");
        self.mode = mode;
        self.handle.set_layout_mode(mode);
    }
}

fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Input thread body: read terminal events until quit or the shell goes away.
pub(crate) fn input_loop(
    mut recognizer: InputRecognizer,
    bindings: KeyBindings,
    shell: Sender<ShellEvent>,
) {
    loop {
        let timeout = recognizer
            .next_deadline()
            .map_or(Duration::from_millis(250), |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
        let ready = match event::poll(timeout) {
            Ok(ready) => ready,
            Err(err) => {
                debug!(error = %err, "input poll failed");
                let _ = shell.send(ShellEvent::Quit);
                return;
            }
        };
        recognizer.tick(Instant::now());
        if !ready {
            continue;
        }

        let outcome = match event::read() {
            Ok(Event::Key(key)) => handle_key(&mut recognizer, &bindings, key),
            Ok(Event::Mouse(mouse)) => {
                recognizer.handle_mouse(mouse, Instant::now());
                None
            }
            Ok(Event::Resize(cols, rows)) => {
                recognizer.resize(viewport_for(cols, rows));
                Some(ShellEvent::Resize { cols, rows })
            }
            Ok(_) => None,
            Err(err) => {
                debug!(error = %err, "input read failed");
                Some(ShellEvent::Quit)
            }
        };

        if let Some(event) = outcome {
            let quit = event == ShellEvent::Quit;
            if shell.send(event).is_err() || quit {
                trace!("input loop finished");
                return;
            }
        }
    }
}

fn handle_key(
    recognizer: &mut InputRecognizer,
    bindings: &KeyBindings,
    key: KeyEvent,
) -> Option<ShellEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    bindings
        .get(key)
        .and_then(|action| recognizer.handle_action(action))
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
