//! Configuration: engine settings, the config file loader and key bindings.

pub mod keybindings;
pub mod loader;
mod viewer;

pub use keybindings::KeyBindings;
pub use loader::{ConfigError, ConfigFile, ResolvedConfig};
pub use viewer::{ViewerConfig, DEFAULT_MAX_SCALE, DEFAULT_PAGE_MIN_HEIGHT, DEFAULT_PROGRESS_SIZE};
