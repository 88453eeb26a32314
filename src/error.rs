//! Error types for Ork

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for Ork operations
pub type Result<T> = std::result::Result<T, OrkError>;

/// Main error type for Ork
#[derive(Error, Debug)]
pub enum OrkError {
    /// Orkfile parsing and validation errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Command-line argument errors
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// Orkfile parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to find Orkfile in path {0}")]
    NotFound(String),

    #[error("failed to parse Orkfile: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate task: {0}")]
    DuplicateTask(String),

    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("no search term provided to -s")]
    EmptySearchTerm,

    #[error("search term {0} is an invalid regular expression")]
    InvalidSearchTerm(String),
}

/// Task execution errors
///
/// Every variant raised while walking a task workflow carries the label of
/// the task it belongs to, so the message pinpoints the failing node even
/// when the error surfaces several recursion levels up.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("task {0} does not exist")]
    TaskNotFound(String),

    #[error("default task has not been set")]
    NoDefault,

    #[error("[{label}] dependency {dependency} does not exist")]
    DependencyMissing { label: String, dependency: String },

    #[error("[{label}] cyclic dependency detected: {from}->{to}")]
    CyclicDependency {
        label: String,
        from: String,
        to: String,
    },

    #[error("[{label}] failed requirement: {reason}")]
    RequirementFailed { label: String, reason: String },

    #[error("[{label}] failed to apply environment: {source}")]
    EnvApply {
        label: String,
        #[source]
        source: EnvError,
    },

    #[error("[{label}] {source}")]
    Action {
        label: String,
        #[source]
        source: ActionError,
    },

    #[error("failed to execute global task: {0}")]
    Global(#[source] Box<ExecutionError>),
}

/// Errors from running a single action statement
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("failed to parse action: {statement}: {reason}")]
    Parse { statement: String, reason: String },

    #[error("failed to start action: {statement}: {source}")]
    Spawn {
        statement: String,
        #[source]
        source: io::Error,
    },

    #[error("process failed: {0}")]
    Failed(ExitStatus),

    #[error("failed to read action output: {0}")]
    Output(#[source] io::Error),

    #[error("C-c received")]
    Cancelled,
}

/// Errors from applying an environment group
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("key {key}: {value}: {source}")]
    Apply {
        key: String,
        value: String,
        #[source]
        source: ActionError,
    },
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
