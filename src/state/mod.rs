//! Application state management module.
//!
//! This module contains the controller for the application, including:
//! - Main `State` struct that owns the views, the input engine and the tasks
//! - Navigation types (ActiveView, StatusFilter)
//! - State error handling

mod error;
mod navigation;

pub use error::StateError;
pub use navigation::{ActiveView, StatusFilter};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
