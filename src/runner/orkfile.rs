//! Orkfile facade
//!
//! Parses an Orkfile document, builds the task inventory, and exposes the
//! run / info / listing operations the CLI drives.

use crate::config;
use crate::config::Task;
use crate::error::{ExecutionError, ExecutionResult, OrkError};
use crate::logger::Logger;
use crate::runner::action::ActionStdin;
use crate::runner::cancel::CancellationToken;
use crate::runner::inventory::{Inventory, TaskId, TaskSelector};
use crate::runner::task::LabeledTask;
use std::io::PipeReader;

/// Default Orkfile path
pub const DEFAULT_ORKFILE: &str = "Orkfile.yml";

/// Label under which the global task executes
const GLOBAL_TASK_LABEL: &str = "global";

/// A parsed Orkfile with its addressable task inventory
#[derive(Debug, Default)]
pub struct Orkfile {
    global: Option<TaskId>,
    inventory: Inventory,
    stdin: ActionStdin,
}

impl Orkfile {
    /// Parse Orkfile contents and build the task inventory
    pub fn parse(contents: &str) -> Result<Self, OrkError> {
        let config = config::parse(contents)?;
        Self::from_config(config)
    }

    /// Build the Orkfile from an already-parsed config
    pub fn from_config(config: config::Config) -> Result<Self, OrkError> {
        let mut inventory = Inventory::new();
        inventory.populate(&config.tasks, "")?;
        // the global task stays out of the label map; it is not addressable
        let global = config.global.map(|task| inventory.intern(task));
        Ok(Orkfile {
            global,
            inventory,
            stdin: ActionStdin::inherit(),
        })
    }

    /// Redirect the stdin of every spawned action to the given pipe
    pub fn with_stdin(mut self, reader: PipeReader) -> Self {
        self.stdin = ActionStdin::piped(reader);
        self
    }

    /// Run the task filed under the given label
    ///
    /// The global task (if any) executes first; its failure aborts the run.
    pub fn run(
        &self,
        label: &str,
        logger: &dyn Logger,
        cancel: &CancellationToken,
    ) -> ExecutionResult<()> {
        if let Some(id) = self.global {
            let global = LabeledTask {
                label: GLOBAL_TASK_LABEL,
                task: self.inventory.get(id),
                id,
            };
            global
                .execute(&self.inventory, logger, &self.stdin, cancel)
                .map_err(|e| ExecutionError::Global(Box::new(e)))?;
        }

        let task = self
            .inventory
            .find(label)
            .ok_or_else(|| ExecutionError::TaskNotFound(label.to_string()))?;
        task.execute(&self.inventory, logger, &self.stdin, cancel)
    }

    /// Run the task named by the global task's `default` field
    pub fn run_default(
        &self,
        logger: &dyn Logger,
        cancel: &CancellationToken,
    ) -> ExecutionResult<()> {
        let default = self
            .global
            .map(|id| self.inventory.get(id))
            .and_then(|task| task.default.as_deref())
            .filter(|label| !label.is_empty());
        match default {
            Some(label) => self.run(label, logger, cancel),
            None => Err(ExecutionError::NoDefault),
        }
    }

    /// Info line for a label, present iff the label resolves
    pub fn info(&self, label: &str) -> Option<String> {
        self.inventory.find(label).map(|lt| {
            let description = lt
                .task
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("<no description>");
            format!("[{}] {}", lt.label, description)
        })
    }

    /// All tasks matching the selector, in label order
    pub fn tasks(&self, selector: TaskSelector) -> Vec<LabeledTask<'_>> {
        self.inventory.tasks(selector)
    }

    /// All labels matching the selector, in lexicographic order
    pub fn labels(&self, selector: TaskSelector) -> Vec<String> {
        self.inventory.labels(selector)
    }

    /// The global task's environment groups, if a global task is declared
    pub fn global_env(&self) -> &[config::EnvGroup] {
        self.global
            .map(|id| self.inventory.get(id).env.as_slice())
            .unwrap_or_default()
    }

    /// Direct access to a task record, mostly for inspection
    pub fn find(&self, label: &str) -> Option<&Task> {
        self.inventory.find(label).map(|lt| lt.task)
    }
}
