//! CLI command implementations.

pub mod common;
pub mod package;
pub mod sync;
