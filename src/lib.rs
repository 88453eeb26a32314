//! Ork - a declarative task-workflow runner
//!
//! Ork reads a YAML Orkfile that declares named tasks (environment, actions,
//! dependencies, nested tasks, dynamic task templates, hooks and
//! requirements) and executes a selected task in an order that respects the
//! parent chain, dependencies, environment layering and cancellation.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod runner;

// Re-export commonly used types
pub use error::{OrkError, Result};

/// Current version of Ork
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
