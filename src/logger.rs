//! Leveled logging and the raw output sink
//!
//! The engine reports its own progress through the leveled methods and
//! streams child-process stdout through `output`, which writes text exactly
//! as received, without decoration.

use crate::error::ConfigError;
use std::cell::Cell;
use std::io::Write;
use std::str::FromStr;

/// Log levels, ordered by verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LogLevel::Error),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

/// Logging contract used throughout the engine
pub trait Logger {
    fn set_level(&self, level: LogLevel);
    fn level(&self) -> LogLevel;

    fn error(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);

    /// Raw stdout sink; carries child-process output verbatim
    fn output(&self, text: &str);
}

/// Logger that writes leveled lines to stdout/stderr
pub struct StdLogger {
    level: Cell<LogLevel>,
}

impl StdLogger {
    pub fn new() -> Self {
        StdLogger {
            level: Cell::new(LogLevel::Info),
        }
    }
}

impl Default for StdLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StdLogger {
    fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn level(&self) -> LogLevel {
        self.level.get()
    }

    fn error(&self, message: &str) {
        eprintln!("[error] {message}");
    }

    fn info(&self, message: &str) {
        if self.level.get() >= LogLevel::Info {
            println!("[info] {message}");
        }
    }

    fn debug(&self, message: &str) {
        if self.level.get() >= LogLevel::Debug {
            println!("[debug] {message}");
        }
    }

    fn output(&self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Error);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_unknown_level() {
        let result = "verbose".parse::<LogLevel>();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown log level: verbose"));
    }

    #[test]
    fn test_std_logger_level() {
        let logger = StdLogger::new();
        assert_eq!(logger.level(), LogLevel::Info);
        logger.set_level(LogLevel::Debug);
        assert_eq!(logger.level(), LogLevel::Debug);
    }
}
