//! Task inventory
//!
//! Flattens the declarative task tree into a map from fully-qualified label
//! to task, enforcing label uniqueness. Task records live in an owning
//! arena; labels hold handles into it.

use crate::config::Task;
use crate::error::{ConfigError, ConfigResult};
use crate::runner::task::LabeledTask;
use std::collections::BTreeMap;

/// Character that joins a task's label segments
pub const TASK_GROUP_SEP: &str = ".";

/// Handle into the inventory's task arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

/// Predicate used to select tasks from the inventory
pub type TaskSelector = fn(&LabeledTask<'_>) -> bool;

/// Selector matching every task
pub fn all(_: &LabeledTask<'_>) -> bool {
    true
}

/// Selector matching tasks with at least one action or dependency
pub fn actionable(lt: &LabeledTask<'_>) -> bool {
    lt.task.is_actionable()
}

/// Label-addressable set of tasks
#[derive(Debug, Default)]
pub struct Inventory {
    arena: Vec<Task>,
    labels: BTreeMap<String, TaskId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// File the task tree under the given label prefix
    ///
    /// Generators are filed beneath their parent, and the parent's nested
    /// tasks are replicated once under every generator; without generators,
    /// nested tasks file directly under the parent's label.
    pub fn populate(&mut self, tasks: &[Task], prefix: &str) -> ConfigResult<()> {
        for task in tasks {
            let label = join_label(prefix, &task.name);
            // the stored record carries no subtree; nested and generated
            // tasks are filed under their own labels below
            let mut record = task.clone();
            record.tasks.clear();
            record.generate.clear();
            let id = self.intern(record);
            self.add(label.clone(), id)?;

            self.populate(&task.generate, &label)?;
            if task.generate.is_empty() {
                self.populate(&task.tasks, &label)?;
            } else {
                for generator in &task.generate {
                    self.populate(&task.tasks, &join_label(&label, &generator.name))?;
                }
            }
        }
        Ok(())
    }

    /// Move a task record into the arena without giving it a label
    pub(crate) fn intern(&mut self, task: Task) -> TaskId {
        self.arena.push(task);
        TaskId(self.arena.len() - 1)
    }

    fn add(&mut self, label: String, id: TaskId) -> ConfigResult<()> {
        if self.labels.contains_key(&label) {
            return Err(ConfigError::DuplicateTask(label));
        }
        self.labels.insert(label, id);
        Ok(())
    }

    pub(crate) fn get(&self, id: TaskId) -> &Task {
        &self.arena[id.0]
    }

    /// Look up a task by its fully-qualified label
    pub fn find(&self, label: &str) -> Option<LabeledTask<'_>> {
        self.labels.get_key_value(label).map(|(stored, id)| LabeledTask {
            label: stored,
            task: &self.arena[id.0],
            id: *id,
        })
    }

    /// All tasks matching the selector, in label order
    pub fn tasks(&self, selector: TaskSelector) -> Vec<LabeledTask<'_>> {
        self.labels
            .iter()
            .map(|(label, id)| LabeledTask {
                label,
                task: &self.arena[id.0],
                id: *id,
            })
            .filter(|lt| selector(lt))
            .collect()
    }

    /// All labels matching the selector, in lexicographic order
    pub fn labels(&self, selector: TaskSelector) -> Vec<String> {
        self.tasks(selector)
            .into_iter()
            .map(|lt| lt.label.to_string())
            .collect()
    }
}

fn join_label(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{TASK_GROUP_SEP}{name}")
    }
}
