//! Command-line application
//!
//! Flag parsing and dispatch: task execution, info listing, label search
//! and the version banner.

use crate::config;
use crate::error::{ConfigError, OrkError};
use crate::logger::{LogLevel, Logger};
use crate::runner::{actionable, CancellationToken, Orkfile, DEFAULT_ORKFILE};
use crate::VERSION;
use clap::{Arg, ArgAction, Command};
use regex::Regex;

/// Build the clap command
fn build_command() -> Command {
    Command::new("ork")
        .version(VERSION)
        .disable_version_flag(true)
        .about("workflow management for software projects")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("FILE")
                .help("path to Orkfile")
                .default_value(DEFAULT_ORKFILE),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .help("log level (one of 'info', 'error', 'debug')")
                .default_value("info"),
        )
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .value_name("REGEX")
                .help("print the task labels that match the supplied regex term"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(ArgAction::SetTrue)
                .help("show info for the supplied tasks or all tasks"),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue)
                .help("show program version"),
        )
        .arg(
            Arg::new("tasks")
                .value_name("TASK")
                .num_args(0..)
                .help("labels of the tasks to run, in order"),
        )
}

/// Run the application with the supplied arguments
pub fn run_app<I, T>(
    args: I,
    logger: &dyn Logger,
    cancel: &CancellationToken,
) -> Result<(), OrkError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;

    if matches.get_flag("version") {
        logger.output(&format!("ork version: {VERSION}\n"));
        return Ok(());
    }

    let level: LogLevel = matches
        .get_one::<String>("level")
        .map(String::as_str)
        .unwrap_or("info")
        .parse()?;
    logger.set_level(level);

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or(DEFAULT_ORKFILE);
    let contents = config::read(path)?;
    let orkfile = Orkfile::parse(&contents)?;

    if let Some(term) = matches.get_one::<String>("search") {
        return search(&orkfile, term, logger);
    }

    let labels: Vec<&String> = matches
        .get_many::<String>("tasks")
        .map(|values| values.collect())
        .unwrap_or_default();

    // with no labels requested, either list everything or run the default
    if labels.is_empty() {
        if matches.get_flag("info") {
            for label in orkfile.labels(actionable) {
                print_info(&orkfile, &label, logger);
            }
            return Ok(());
        }
        return Ok(orkfile.run_default(logger, cancel)?);
    }

    for label in labels {
        if matches.get_flag("info") {
            print_info(&orkfile, label, logger);
        } else {
            orkfile.run(label, logger, cancel)?;
        }
    }
    Ok(())
}

/// Print info lines for every actionable label matching the term
fn search(orkfile: &Orkfile, term: &str, logger: &dyn Logger) -> Result<(), OrkError> {
    if term.is_empty() {
        return Err(ConfigError::EmptySearchTerm.into());
    }
    let re = Regex::new(term).map_err(|_| ConfigError::InvalidSearchTerm(term.to_string()))?;
    for label in orkfile.labels(actionable) {
        if re.is_match(&label) {
            print_info(orkfile, &label, logger);
        }
    }
    Ok(())
}

fn print_info(orkfile: &Orkfile, label: &str, logger: &dyn Logger) {
    if let Some(info) = orkfile.info(label) {
        logger.output(&format!("{info}\n"));
    }
}
