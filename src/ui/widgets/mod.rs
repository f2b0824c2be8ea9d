//! Reusable styling helpers.
//!
//! Every helper returns an immutable `Style` value built from the active theme.

pub mod styling;
