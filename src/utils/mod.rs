//! Shared helpers.

pub mod text_processing;
