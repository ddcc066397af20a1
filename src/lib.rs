//! Gallery engine
//!
//! Gesture-driven image gallery viewer core: a cross-thread command queue,
//! a gesture state machine, interchangeable paged and continuous layout
//! strategies over a pluggable item provider, and a view recycler. A
//! terminal host and a headless script replayer sit on top.

pub mod config;
pub mod controller;
pub mod gesture;
pub mod layout;
pub mod logging;
pub mod model;
pub mod pool;
pub mod provider;
pub mod queue;
pub mod replay;
pub mod view;
