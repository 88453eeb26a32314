//! Orkfile data model
//!
//! This module defines the data structures that represent an Orkfile.yml
//! document. The model is purely declarative; execution lives in `runner`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One group of environment bindings.
///
/// A task declares an ordered list of groups; the order of keys inside a
/// single group follows the map's key ordering. Authors that need one key
/// to reference another should place them in separate groups.
pub type EnvGroup = BTreeMap<String, String>;

/// Top-level Orkfile structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Optional global task; its env is the outermost layer, its `default`
    /// field names the task to run when none is requested, and it executes
    /// before any selected task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<Task>,

    /// Top-level tasks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Task name; unique within its parent's task list. May itself contain
    /// the group separator character.
    #[serde(default)]
    pub name: String,

    /// Label of the task to run when none is requested (global task only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Description for info display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Working directory for all actions of this task, relative to the
    /// process working directory at launch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Ordered environment groups
    #[serde(
        default,
        deserialize_with = "deserialize_env_groups",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub env: Vec<EnvGroup>,

    /// Whether to substitute environment variables in action statements
    /// before spawning (unset means true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_env: Option<bool>,

    /// Whether `$[...]` extraction in env values uses greedy matching
    /// (unset means false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_subst_greedy: Option<bool>,

    /// Command lines to execute, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    /// Fully-qualified labels of tasks that must run first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Nested tasks, addressable under this task's label
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,

    /// Dynamic task templates; nested tasks are replicated under each
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generate: Vec<Task>,

    /// Actions to run after the task succeeds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_success: Vec<String>,

    /// Actions to run after the task fails
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_failure: Vec<String>,

    /// Environment preconditions, checked before the task's own env applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<Requirements>,
}

/// Environment preconditions for a task
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Requirements {
    /// Variables that must be present in the process environment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exists: Vec<String>,

    /// Variables that must hold an expected value; the expectation is
    /// env-expanded before comparison
    #[serde(
        default,
        deserialize_with = "deserialize_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub equals: BTreeMap<String, String>,
}

impl Task {
    /// Whether action statements get environment variable substitution
    pub fn expands_env(&self) -> bool {
        self.expand_env.unwrap_or(true)
    }

    /// Whether `$[...]` extraction uses greedy matching
    pub fn is_env_subst_greedy(&self) -> bool {
        self.env_subst_greedy.unwrap_or(false)
    }

    /// A task is actionable when running it can have an effect
    pub fn is_actionable(&self) -> bool {
        !self.actions.is_empty() || !self.depends_on.is_empty()
    }
}

/// Render a scalar YAML value as a string
///
/// YAML happily writes `PORT: 8080` or `RELEASE: true`; the engine treats
/// every env value and expectation as a string.
fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Custom deserializer for env groups that accepts scalar values of any kind
fn deserialize_env_groups<'de, D>(deserializer: D) -> Result<Vec<EnvGroup>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(seq) => {
            let mut groups = Vec::new();
            for item in seq {
                let Value::Mapping(mapping) = item else {
                    return Err(D::Error::custom("env group must be a mapping"));
                };
                let mut group = EnvGroup::new();
                for (key, val) in &mapping {
                    let key = scalar_to_string(key)
                        .ok_or_else(|| D::Error::custom("env key must be a scalar"))?;
                    let val = scalar_to_string(val)
                        .ok_or_else(|| D::Error::custom("env value must be a scalar"))?;
                    group.insert(key, val);
                }
                groups.push(group);
            }
            Ok(groups)
        }
        _ => Err(D::Error::custom("env must be a sequence of mappings")),
    }
}

/// Custom deserializer for string maps that accepts scalar values of any kind
fn deserialize_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Null => Ok(BTreeMap::new()),
        Value::Mapping(mapping) => {
            let mut map = BTreeMap::new();
            for (key, val) in &mapping {
                let key = scalar_to_string(key)
                    .ok_or_else(|| D::Error::custom("key must be a scalar"))?;
                let val = scalar_to_string(val)
                    .ok_or_else(|| D::Error::custom("value must be a scalar"))?;
                map.insert(key, val);
            }
            Ok(map)
        }
        _ => Err(D::Error::custom("expected a mapping")),
    }
}
