//! Headless replay of gesture scripts.
//!
//! A script is JSON Lines. Each line is either a command in its serde form
//! (`{"type":"down","x":5,"y":5}`) or a frame marker (`{"at_ms":16}`).
//! Commands are posted through a [`ViewerHandle`](crate::queue::ViewerHandle)
//! exactly as an input thread would; a frame renders at every marker and the
//! replayer then settles any running animation.

use crate::config::ViewerConfig;
use crate::controller::{FrameReport, ViewerAction, ViewerController};
use crate::model::{Command, LayoutMode, Rect, ReplayError};
use crate::provider::ItemProvider;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, info};

/// Interval between frames while settling.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Upper bound on settle frames, about ten seconds of animation.
pub const MAX_SETTLE_FRAMES: usize = 600;

/// A frame marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameMarker {
    /// Frame timestamp in milliseconds since the script started.
    pub at_ms: u64,
}

/// One script line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Render a frame at the given time.
    Frame(FrameMarker),
    /// Post a command.
    Command(Command),
}

/// Parse a JSONL script. Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`ReplayError::InvalidStep`] with the 1-based line number of the
/// first line that is neither a command nor a frame marker.
pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>, ReplayError> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line.trim()).map_err(|e| ReplayError::InvalidStep {
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`ReplayError::Read`] when the file cannot be read, or the
/// parse error from [`parse_script`].
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ReplayError> {
    let source = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&source)
}

/// Gesture flags at the end of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GestureFlags {
    /// A finger is still down.
    pub touched: bool,
    /// The last sequence claimed scaling.
    pub scaling: bool,
    /// The last sequence claimed scrolling.
    pub scrolling: bool,
}

/// Result of a replay, printed as JSON by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Script lines executed.
    pub steps: usize,
    /// Commands posted.
    pub commands: usize,
    /// Frames rendered, settle frames included.
    pub frames: usize,
    /// Final layout mode.
    pub mode: LayoutMode,
    /// Final current page.
    pub current_index: Option<usize>,
    /// Indices bound at the end.
    pub visible: Vec<usize>,
    /// Final gesture flags.
    pub gesture: GestureFlags,
    /// Listener notifications in order.
    pub actions: Vec<ViewerAction>,
    /// Report of the last frame.
    pub last_frame: FrameReport,
}

/// Drives a controller from a script on the current thread.
pub struct Replayer {
    controller: ViewerController,
    actions: Receiver<ViewerAction>,
    bounds: Rect,
}

impl Replayer {
    /// Replayer over `provider` with a viewport of `bounds`.
    pub fn new(provider: Box<dyn ItemProvider>, config: &ViewerConfig, bounds: Rect) -> Self {
        let (tx, actions) = mpsc::channel();
        let controller = ViewerController::new(provider, Box::new(tx), config, || {});
        Self {
            controller,
            actions,
            bounds,
        }
    }

    /// The controller being driven.
    pub fn controller(&self) -> &ViewerController {
        &self.controller
    }

    /// Attach the surface, run every step, then settle animations.
    pub fn run(&mut self, steps: &[ScriptStep]) -> ReplaySummary {
        if self.controller.active_strategy().is_none() {
            self.controller.attach_surface();
        }
        self.controller.layout(self.bounds, true);

        let handle = self.controller.handle();
        let mut commands = 0;
        let mut frames = 0;
        let mut now = Duration::ZERO;
        self.controller.render_frame(now);
        frames += 1;

        for step in steps {
            match *step {
                ScriptStep::Command(command) => {
                    handle.post(command);
                    commands += 1;
                }
                ScriptStep::Frame(FrameMarker { at_ms }) => {
                    now = now.max(Duration::from_millis(at_ms));
                    self.controller.render_frame(now);
                    frames += 1;
                }
            }
        }

        let last_frame = loop {
            now += FRAME_INTERVAL;
            let frame = self.controller.render_frame(now);
            frames += 1;
            if !frame.animating || frames >= steps.len() + MAX_SETTLE_FRAMES {
                break frame;
            }
        };
        debug!(frames, "replay settled");

        let gesture = self.controller.gesture_state();
        let summary = ReplaySummary {
            steps: steps.len(),
            commands,
            frames,
            mode: self.controller.layout_mode(),
            current_index: self.controller.current_index(),
            visible: self
                .controller
                .visible_items()
                .iter()
                .filter_map(|item| item.index())
                .collect(),
            gesture: GestureFlags {
                touched: gesture.is_touched(),
                scaling: gesture.is_scaling(),
                scrolling: gesture.is_scrolling(),
            },
            actions: self.actions.try_iter().collect(),
            last_frame,
        };
        info!(summary = %summary.last_frame.summary(), "replay finished");
        summary
    }
}
