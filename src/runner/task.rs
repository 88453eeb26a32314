//! Task execution
//!
//! A `LabeledTask` pairs a task record with the fully-qualified label it was
//! filed under. Executing one walks, in order: the parent chain, the
//! declared dependencies (depth-first, with cycle detection), the
//! requirements, the environment groups, and finally the task's own
//! actions. Exit hooks run on every path out, success or failure.

use crate::config::Task;
use crate::error::{ActionError, ExecutionError, ExecutionResult};
use crate::logger::Logger;
use crate::runner::action::{Action, ActionOutput, ActionStdin};
use crate::runner::cancel::CancellationToken;
use crate::runner::env;
use crate::runner::interpolate;
use crate::runner::inventory::{Inventory, TaskId, TASK_GROUP_SEP};
use std::collections::HashMap;

/// Environment variable holding the failure message while `on_failure`
/// hooks run
pub const ORK_ERROR_VAR: &str = "ORK_ERROR";

/// Map from task to the dependency it visited last, scoped to one
/// `execute` call; revisiting the same edge signals a cycle
type CycleGraph = HashMap<TaskId, TaskId>;

/// A task filed under a fully-qualified label
#[derive(Debug, Clone)]
pub struct LabeledTask<'a> {
    pub label: &'a str,
    pub task: &'a Task,
    pub(crate) id: TaskId,
}

impl<'a> LabeledTask<'a> {
    /// Execute the task workflow, returning the first error encountered
    pub fn execute(
        &self,
        inventory: &'a Inventory,
        logger: &dyn Logger,
        stdin: &ActionStdin,
        cancel: &CancellationToken,
    ) -> ExecutionResult<()> {
        self.execute_with(inventory, logger, stdin, cancel, &mut CycleGraph::new())
    }

    fn execute_with(
        &self,
        inventory: &'a Inventory,
        logger: &dyn Logger,
        stdin: &ActionStdin,
        cancel: &CancellationToken,
        graph: &mut CycleGraph,
    ) -> ExecutionResult<()> {
        let result = self.run_phases(inventory, logger, stdin, cancel, graph);
        self.run_exit_hooks(&result, logger, stdin, cancel);
        result
    }

    fn run_phases(
        &self,
        inventory: &'a Inventory,
        logger: &dyn Logger,
        stdin: &ActionStdin,
        cancel: &CancellationToken,
        graph: &mut CycleGraph,
    ) -> ExecutionResult<()> {
        // parents run first so that their env is visible here, even when
        // this task was selected directly by its fully-qualified label
        if let Some(parent) = find_parent(self.label, inventory) {
            parent.execute_with(inventory, logger, stdin, cancel, graph)?;
        }

        logger.debug(&format!("[{}] executing dependencies", self.label));
        for dependency in &self.task.depends_on {
            let child =
                inventory
                    .find(dependency)
                    .ok_or_else(|| ExecutionError::DependencyMissing {
                        label: self.label.to_string(),
                        dependency: dependency.clone(),
                    })?;

            if graph.get(&self.id) == Some(&child.id) {
                return Err(ExecutionError::CyclicDependency {
                    label: self.label.to_string(),
                    from: self.task.name.clone(),
                    to: child.task.name.clone(),
                });
            }

            graph.insert(self.id, child.id);
            child.execute_with(inventory, logger, stdin, cancel, graph)?;
        }

        self.check_requirements()
            .map_err(|reason| ExecutionError::RequirementFailed {
                label: self.label.to_string(),
                reason,
            })?;

        logger.debug(&format!("[{}] applying task environment", self.label));
        for group in &self.task.env {
            env::apply(group, self.task.is_env_subst_greedy()).map_err(|e| {
                ExecutionError::EnvApply {
                    label: self.label.to_string(),
                    source: e,
                }
            })?;
        }

        logger.debug(&format!("[{}] executing actions", self.label));
        for action in &self.task.actions {
            logger.info(&format!("[{}] {}", self.label, action));
            self.run_action(action, logger, stdin, cancel)
                .map_err(|e| ExecutionError::Action {
                    label: self.label.to_string(),
                    source: e,
                })?;
        }

        Ok(())
    }

    /// Run the `on_success` or `on_failure` hooks depending on the result
    ///
    /// Hook failures are logged and never override the task's own result.
    fn run_exit_hooks(
        &self,
        result: &ExecutionResult<()>,
        logger: &dyn Logger,
        stdin: &ActionStdin,
        cancel: &CancellationToken,
    ) {
        logger.debug(&format!("[{}] executing post-action hooks", self.label));
        let actions = match result {
            Ok(()) => &self.task.on_success,
            Err(err) => {
                // SAFETY: the engine is single-threaded; no other thread
                // touches the process environment while a workflow runs
                unsafe {
                    std::env::set_var(ORK_ERROR_VAR, err.to_string());
                }
                &self.task.on_failure
            }
        };
        for statement in actions {
            if let Err(err) = self.run_action(statement, logger, stdin, cancel) {
                logger.error(&format!("[{}] failed to execute hook: {}", self.label, err));
            }
        }
    }

    fn run_action(
        &self,
        statement: &str,
        logger: &dyn Logger,
        stdin: &ActionStdin,
        cancel: &CancellationToken,
    ) -> Result<(), ActionError> {
        Action::new(statement)
            .with_env_expansion(self.task.expands_env())
            .with_working_dir(self.task.working_dir.as_deref())
            .with_stdin(stdin)
            .with_stdout(ActionOutput::Logger(logger))
            .with_cancellation(cancel)
            .execute()
    }

    fn check_requirements(&self) -> Result<(), String> {
        let Some(require) = &self.task.require else {
            return Ok(());
        };
        for key in &require.exists {
            if std::env::var_os(key).is_none() {
                return Err(format!("variable {key} is not defined"));
            }
        }
        for (key, expected) in &require.equals {
            let Ok(actual) = std::env::var(key) else {
                return Err(format!(
                    "variable {key} has an expected value but does not exist in the environment"
                ));
            };
            let expected = interpolate::expand_env(expected);
            if actual != expected {
                return Err(format!(
                    "variable {key} exists but does not match its expected value"
                ));
            }
        }
        Ok(())
    }
}

/// Find the nearest existing parent of a label
///
/// The parent is the longest strict prefix (splitting on the separator)
/// present in the inventory. A label whose segments never resolve has no
/// parent and executes on its own.
pub(crate) fn find_parent<'a>(label: &str, inventory: &'a Inventory) -> Option<LabeledTask<'a>> {
    let segments: Vec<&str> = label.split(TASK_GROUP_SEP).collect();
    (1..segments.len())
        .rev()
        .find_map(|i| inventory.find(&segments[..i].join(TASK_GROUP_SEP)))
}
