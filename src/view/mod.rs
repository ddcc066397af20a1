//! Terminal host for the viewer (impure shell).
//!
//! The render loop owns the [`ViewerController`] and blocks on a channel of
//! [`ShellEvent`]s. The queue's waker feeds that channel, so every posted
//! command and every running animation turns into a redraw. A separate input
//! thread reads crossterm events and only ever talks to the viewer through a
//! [`ViewerHandle`].

mod input;
mod render;

pub use input::{cell_center, viewport_for, InputRecognizer, CELL_HEIGHT, CELL_WIDTH};
pub use render::{cell_rect, draw_frame, glow_rect, StatusLine};

use crate::config::{KeyBindings, ViewerConfig};
use crate::controller::{FrameReport, ViewerAction, ViewerController};
use crate::model::Rect as PixelRect;
use crate::provider::ItemProvider;
use crate::queue::ViewerHandle;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// What wakes the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// A command was posted or an animation wants another frame.
    Redraw,
    /// The terminal changed size, in cells.
    Resize {
        /// Columns.
        cols: u16,
        /// Rows.
        rows: u16,
    },
    /// Show or hide the status bar.
    ToggleStatus,
    /// Leave the render loop.
    Quit,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    controller: ViewerController,
    events: Receiver<ShellEvent>,
    sender: Sender<ShellEvent>,
    actions: Receiver<ViewerAction>,
    status_visible: bool,
    started: Instant,
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the viewer over `provider`, attach it and lay it out to the
    /// terminal size.
    pub fn new(
        terminal: Terminal<B>,
        provider: Box<dyn ItemProvider>,
        config: &ViewerConfig,
    ) -> Result<Self, TuiError> {
        let (sender, events) = mpsc::channel();
        let (action_sender, actions) = mpsc::channel();

        let waker = sender.clone();
        let controller = ViewerController::new(provider, Box::new(action_sender), config, move || {
            // A closed channel means the shell already quit.
            let _ = waker.send(ShellEvent::Redraw);
        });

        let mut app = Self {
            terminal,
            controller,
            events,
            sender,
            actions,
            status_visible: true,
            started: Instant::now(),
        };
        app.controller.attach_surface();
        let size = app.terminal.size()?;
        app.resize(size.width, size.height);
        Ok(app)
    }

    /// Producer handle for the input thread.
    pub fn handle(&self) -> ViewerHandle {
        self.controller.handle()
    }

    /// Sender for shell events that do not go through the viewer.
    pub fn event_sender(&self) -> Sender<ShellEvent> {
        self.sender.clone()
    }

    /// The viewer being hosted.
    pub fn controller(&self) -> &ViewerController {
        &self.controller
    }

    /// Whether the status bar is drawn.
    pub fn status_visible(&self) -> bool {
        self.status_visible
    }

    /// The terminal, for inspecting a test backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run the render loop until [`ShellEvent::Quit`].
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.step()?;
        loop {
            let Ok(first) = self.events.recv() else {
                return Ok(());
            };
            // Fold a burst of wakes into one frame.
            let mut batch = vec![first];
            batch.extend(self.events.try_iter());
            for event in batch {
                if self.apply(event) {
                    info!("quit requested");
                    return Ok(());
                }
            }
            self.step()?;
        }
    }

    /// Apply one shell event. Returns true when the loop should stop.
    pub fn apply(&mut self, event: ShellEvent) -> bool {
        match event {
            ShellEvent::Redraw => {}
            ShellEvent::Resize { cols, rows } => self.resize(cols, rows),
            ShellEvent::ToggleStatus => self.status_visible = !self.status_visible,
            ShellEvent::Quit => return true,
        }
        false
    }

    /// Render one frame and draw it.
    pub fn step(&mut self) -> Result<FrameReport, TuiError> {
        let report = self.controller.render_frame(self.started.elapsed());
        for action in self.actions.try_iter() {
            match action {
                ViewerAction::TapCenter => self.status_visible = !self.status_visible,
                ViewerAction::ScrolledToPage { page, internal } => {
                    debug!(page, internal, "page changed")
                }
            }
        }
        self.draw()?;
        Ok(report)
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        debug!(cols, rows, "terminal resized");
        let viewport = viewport_for(cols.max(1), rows.max(1));
        self.controller.layout(PixelRect::from_size(viewport), true);
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let status = self.status_visible.then(|| StatusLine {
            mode: self.controller.layout_mode(),
            page: self.controller.current_index(),
            pages: self.controller.item_count(),
        });
        let items = self.controller.visible_items();
        let glows = self.controller.edge_glows();
        self.terminal
            .draw(|frame| draw_frame(frame, &items, &glows, status))?;
        Ok(())
    }
}

/// Initialize and run the TUI over `provider`.
///
/// Handles terminal setup, spawns the input thread and restores the
/// terminal on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(
    provider: Box<dyn ItemProvider>,
    config: &ViewerConfig,
    bindings: KeyBindings,
) -> Result<(), TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Run the app and ensure cleanup happens even on error
    let result = run_app(terminal, provider, config, bindings);

    // Always restore terminal state
    restore_terminal()?;

    result
}

fn run_app(
    terminal: Terminal<CrosstermBackend<Stdout>>,
    provider: Box<dyn ItemProvider>,
    config: &ViewerConfig,
    bindings: KeyBindings,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(terminal, provider, config)?;
    let size = app.terminal.size()?;
    let recognizer = InputRecognizer::new(
        app.handle(),
        config.layout_mode,
        viewport_for(size.width, size.height),
    );
    let shell = app.event_sender();
    thread::Builder::new()
        .name("gallery-input".to_string())
        .spawn(move || input::input_loop(recognizer, bindings, shell))?;
    app.run()
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
