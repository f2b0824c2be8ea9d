//! Terminal task browser with Vim-style modal navigation.
//!
//! Tasks are read from a directory of JSON files and shown in a set of
//! composable views (list, detail, search, help) driven by a modal keystroke
//! interpreter.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;
