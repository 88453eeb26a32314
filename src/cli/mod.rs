//! Command-line interface

pub mod app;

// Re-export main types
pub use app::*;
