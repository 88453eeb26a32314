//! Task execution engine
//!
//! This module contains the action runner, the environment layer, the task
//! inventory, the recursive executor and the Orkfile facade tying them
//! together.

pub mod action;
pub mod cancel;
pub mod env;
pub mod interpolate;
pub mod inventory;
pub mod orkfile;
pub mod task;

// Re-export main types
pub use action::{Action, ActionOutput, ActionStdin};
pub use cancel::CancellationToken;
pub use inventory::{actionable, all, Inventory, TaskId, TaskSelector, TASK_GROUP_SEP};
pub use orkfile::{Orkfile, DEFAULT_ORKFILE};
pub use task::{LabeledTask, ORK_ERROR_VAR};
