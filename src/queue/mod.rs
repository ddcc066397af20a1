//! Cross-thread command inbox.
//!
//! Producers on any thread append to a mutex-guarded list and wake the
//! rendering thread. The rendering thread swaps the whole list out under the
//! lock and replays it after releasing the lock, so handlers may post again
//! without deadlocking; those commands run on the next drain.
//!
//! The pending list is unbounded. A stalled consumer accumulates commands
//! without limit.

mod handle;

pub use handle::{GestureListener, ViewerHandle};

use crate::model::Command;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Callback that asks the rendering thread for another frame.
pub type Waker = Box<dyn Fn() + Send + Sync>;

/// FIFO of commands waiting for the rendering thread.
pub struct CommandQueue {
    pending: Mutex<Vec<Command>>,
    waker: Waker,
}

impl CommandQueue {
    /// Create a queue that calls `waker` after every post.
    pub fn new(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            waker: Box::new(waker),
        }
    }

    /// Append a command and wake the rendering thread. Callable from any thread.
    pub fn post(&self, command: Command) {
        self.lock().push(command);
        (self.waker)();
    }

    /// Wake the rendering thread without posting.
    pub fn wake(&self) {
        (self.waker)();
    }

    /// Swap the pending list into `buffer`, which must be empty.
    ///
    /// The lock is held only for the swap.
    pub fn drain_into(&self, buffer: &mut Vec<Command>) {
        debug_assert!(buffer.is_empty(), "drain buffer must be empty");
        let mut pending = self.lock();
        std::mem::swap(&mut *pending, buffer);
    }

    /// Take every pending command.
    pub fn drain(&self) -> Vec<Command> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of commands waiting.
    pub fn pending_len(&self) -> usize {
        self.lock().len()
    }

    // The list is plain data, so a panic while holding the lock cannot leave
    // it half-updated.
    fn lock(&self) -> MutexGuard<'_, Vec<Command>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
