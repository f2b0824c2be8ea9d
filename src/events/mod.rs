//! Event handling module.
//!
//! Terminal events (key presses, resizes and ticks) are polled on a separate
//! thread and handed to the state on the main thread.

pub mod terminal;
