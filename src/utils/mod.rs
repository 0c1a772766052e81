//! Utility functions shared across typegrid
//!
//! Common helpers that don't fit in specialized modules.

pub mod rem;

pub use rem::{format_rem, round_rem};
